//! API Module
//!
//! Facade for collaborators (web layer, chatbot, CLI): JSON mappings in,
//! serializable results out, errors as `String`.
//!
//! Structure:
//! - commands.rs: scoring / training / reload commands over the shared registry
//! - engine_status.rs: loaded models and active feature layout

pub mod commands;
pub mod engine_status;

pub use commands::*;
pub use engine_status::{EngineStatus, ModelStatus};
