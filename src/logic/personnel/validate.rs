//! Input validation
//!
//! Only present values are checked; defaults are in-domain by construction.

use super::fields::NumericField;
use super::record::PersonnelRecord;
use crate::error::{Result, ScoringError};

/// Reject records with numeric fields outside their documented domain
pub fn validate_record(record: &PersonnelRecord) -> Result<()> {
    for field in NumericField::ALL {
        if let Some(value) = record.numeric(field) {
            validate_value(field, value)?;
        }
    }

    if let Some(readiness) = record.readiness_score {
        if !readiness.is_finite() {
            return Err(ScoringError::invalid("readiness_score", "must be finite"));
        }
    }

    Ok(())
}

pub fn validate_value(field: NumericField, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(ScoringError::invalid(field.as_str(), "must be finite"));
    }

    let (min, max) = field.domain();
    if value < min {
        return Err(ScoringError::invalid(
            field.as_str(),
            format!("{} is below the minimum of {}", value, min),
        ));
    }
    if let Some(max) = max {
        if value > max {
            return Err(ScoringError::invalid(
                field.as_str(),
                format!("{} is above the maximum of {}", value, max),
            ));
        }
    }

    Ok(())
}
