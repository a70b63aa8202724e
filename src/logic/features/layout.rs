//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls the feature schema shared by the builder and every model.**
//!
//! ## Rules:
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! Persisted encoders, scalers and models carry the version and hash they were
//! fitted against; a mismatch on load disables them.

use crc32fast::Hasher;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::derived::CareerVelocity;
use crate::error::ScoringError;

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Base numeric (0-12) ===
    "age",                      // 0
    "years_of_service",         // 1
    "fitness_score",            // 2
    "stress_index",             // 3
    "missions_participated",    // 4
    "mission_success_rate",     // 5
    "peer_review_score",        // 6
    "leadership_score",         // 7
    "engagement_score",         // 8
    "leave_records",            // 9
    "disciplinary_actions",     // 10
    "complaints",               // 11
    "salary_grade",             // 12

    // === Derived (13-17) ===
    "service_efficiency",       // 13: missions / (yos + 1)
    "stress_fitness_ratio",     // 14: stress / (fitness + 1)
    "leadership_engagement",    // 15: leadership * engagement / 100
    "performance_consistency",  // 16: peer_review * mission_success_rate
    "career_velocity",          // 17: see CareerVelocity

    // === Encoded categorical (18-27) ===
    "rank_encoded",                 // 18
    "branch_encoded",               // 19
    "unit_encoded",                 // 20
    "gender_encoded",               // 21
    "family_status_encoded",        // 22
    "education_level_encoded",      // 23
    "deployment_status_encoded",    // 24
    "security_clearance_encoded",   // 25
    "performance_rating_encoded",   // 26
    "leadership_potential_encoded", // 27
];

pub const BASE_COUNT: usize = 13;
pub const DERIVED_COUNT: usize = 5;
pub const CATEGORICAL_COUNT: usize = 10;

pub const DERIVED_OFFSET: usize = BASE_COUNT;
pub const CATEGORICAL_OFFSET: usize = BASE_COUNT + DERIVED_COUNT;

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = BASE_COUNT + DERIVED_COUNT + CATEGORICAL_COUNT;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over version, feature names and the career velocity formula
pub fn compute_layout_hash(career_velocity: CareerVelocity) -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.update(career_velocity.as_str().as_bytes());

    hasher.finalize()
}

static SIMPLIFIED_HASH: Lazy<u32> = Lazy::new(|| compute_layout_hash(CareerVelocity::Simplified));
static RANK_ADJUSTED_HASH: Lazy<u32> =
    Lazy::new(|| compute_layout_hash(CareerVelocity::RankAdjusted));

/// Cached layout hash for a career velocity variant
pub fn layout_hash(career_velocity: CareerVelocity) -> u32 {
    match career_velocity {
        CareerVelocity::Simplified => *SIMPLIFIED_HASH,
        CareerVelocity::RankAdjusted => *RANK_ADJUSTED_HASH,
    }
}

/// Which career velocity variant produced this hash, if any
pub fn variant_for_hash(hash: u32) -> Option<CareerVelocity> {
    CareerVelocity::ALL
        .into_iter()
        .find(|v| layout_hash(*v) == hash)
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub career_velocity: CareerVelocity,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current(career_velocity: CareerVelocity) -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(career_velocity),
            career_velocity,
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current(CareerVelocity::default())
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Validate that incoming data matches the expected layout
pub fn validate_layout(
    incoming_version: u8,
    incoming_hash: u32,
    expected_hash: u32,
) -> Result<(), ScoringError> {
    if incoming_version != FEATURE_VERSION || incoming_hash != expected_hash {
        return Err(ScoringError::LayoutMismatch {
            expected_version: FEATURE_VERSION,
            expected_hash,
            actual_version: incoming_version,
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get feature index by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Get feature name by index
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

// ============================================================================
// TESTS
// ============================================================================
