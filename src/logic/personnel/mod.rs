//! Personnel Module - raw input records
//!
//! # Architecture
//! - `category.rs`: categorical domains (`Rank`, `LeadershipPotential`, `CategoricalField`)
//! - `fields.rs`: numeric fields and their domains
//! - `record.rs`: `PersonnelRecord`, `Skills`
//! - `validate.rs`: domain checks run before feature building

pub mod category;
pub mod fields;
pub mod record;
pub mod validate;

pub use category::{CategoricalField, LeadershipPotential, Rank};
pub use fields::NumericField;
pub use record::{PersonnelRecord, Skills, SKILL_CATALOGUE, SKILL_COUNT};
pub use validate::validate_record;
