//! Dataset Module - synthetic training data
//!
//! Generates labelled personnel records and reads/writes them as JSON or
//! JSON Lines or flat CSV.

pub mod generator;
pub mod io;

#[cfg(test)]
mod tests;

pub use generator::{generate, leadership_label, SyntheticGenerator};
pub use io::{read_records, record_from_value, write_records, DatasetFormat};
