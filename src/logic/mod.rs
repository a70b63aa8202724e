//! Logic Module - feature engineering & scoring pipeline
//!
//! ## Architecture
//! - `personnel/` - raw records, categorical domains, validation
//! - `features/` - versioned 28-column layout, encoders, scaler, builder
//! - `model/` - estimators, registry, artifact storage
//! - `scoring/` - formulas, thresholds, advice, score engine
//! - `dataset/` - synthetic generator, JSON/JSONL IO
//! - `training/` - batch fit of everything above

pub mod capabilities;
pub mod config;
pub mod dataset;
pub mod features;
pub mod model;
pub mod personnel;
pub mod scoring;
pub mod training;
