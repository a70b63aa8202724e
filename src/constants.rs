//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "hrms-scoring";

/// Default seed for synthetic data and train/test splits
pub const DEFAULT_SEED: u64 = 42;

/// Default number of synthetic records
pub const DEFAULT_GENERATE_COUNT: usize = 1000;

/// Default gradient descent epochs
pub const DEFAULT_EPOCHS: usize = 500;

/// Default hold-out fraction
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Artifact directory override
pub fn get_artifact_dir() -> Option<String> {
    std::env::var("HRMS_ARTIFACT_DIR").ok().filter(|s| !s.trim().is_empty())
}

/// Career velocity formula override (`simplified` / `rank_adjusted`)
pub fn get_career_velocity() -> Option<String> {
    std::env::var("HRMS_CAREER_VELOCITY").ok()
}

/// Training seed from environment or default
pub fn get_train_seed() -> u64 {
    std::env::var("HRMS_TRAIN_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED)
}

/// Training epochs from environment or default
pub fn get_train_epochs() -> usize {
    std::env::var("HRMS_TRAIN_EPOCHS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_EPOCHS)
}
