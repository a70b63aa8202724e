//! Artifact Storage - persisted encoders, scaler and models
//!
//! Each artifact is one JSON file `{name}.json` holding an envelope with the
//! layout it was fitted against, the training run that produced it and a
//! SHA-256 checksum over the payload text.
//! Loading never fails as a whole: any artifact that is missing, corrupt,
//! fitted against another layout or left over from another training run is
//! skipped and the matching scores fall back to their constants.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::registry::{ModelEntry, ModelKind, ModelRegistry};
use crate::error::{Result, ScoringError};
use crate::logic::features::layout::{validate_layout, variant_for_hash, FEATURE_VERSION};
use crate::logic::features::{EncoderSet, Preprocessor, Scaler};

pub const ENCODERS_ARTIFACT: &str = "encoders";
pub const SCALER_ARTIFACT: &str = "scaler";

/// Default artifact directory
pub fn default_artifact_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("hrms-scoring"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("artifacts")
}

pub fn artifact_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.json", name))
}

// ============================================================================
// ENVELOPE
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    pub feature_version: u8,
    pub layout_hash: u32,
    /// Training run the payload belongs to
    pub run_id: Uuid,
    pub saved_at: DateTime<Utc>,
    /// Hex SHA-256 of `payload`
    pub checksum: String,
    /// JSON text of the stored value
    pub payload: String,
}

pub fn checksum(payload: &str) -> String {
    hex::encode(Sha256::digest(payload.as_bytes()))
}

impl Artifact {
    pub fn wrap<T: Serialize>(name: &str, layout_hash: u32, run_id: Uuid, value: &T) -> Result<Self> {
        let payload = serde_json::to_string(value)?;
        Ok(Self {
            name: name.to_string(),
            feature_version: FEATURE_VERSION,
            layout_hash,
            run_id,
            saved_at: Utc::now(),
            checksum: checksum(&payload),
            payload,
        })
    }

    /// Verify the checksum, then decode the payload
    pub fn unwrap_payload<T: DeserializeOwned>(&self) -> Result<T> {
        if checksum(&self.payload) != self.checksum {
            return Err(ScoringError::ChecksumMismatch {
                artifact: self.name.clone(),
            });
        }
        Ok(serde_json::from_str(&self.payload)?)
    }
}

// ============================================================================
// SAVE / LOAD ONE ARTIFACT
// ============================================================================

pub fn save_artifact<T: Serialize>(
    dir: &Path,
    name: &str,
    layout_hash: u32,
    run_id: Uuid,
    value: &T,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let artifact = Artifact::wrap(name, layout_hash, run_id, value)?;
    let path = artifact_path(dir, name);
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_vec_pretty(&artifact)?)?;
    fs::rename(&tmp, &path)?;

    log::debug!("Saved artifact '{}' to {}", name, path.display());
    Ok(path)
}

/// Read and verify an artifact. `Ok(None)` when the file does not exist.
pub fn load_artifact<T: DeserializeOwned>(
    dir: &Path,
    name: &str,
    expected_hash: Option<u32>,
) -> Result<Option<(Artifact, T)>> {
    let path = artifact_path(dir, name);
    if !path.exists() {
        return Ok(None);
    }

    let data = fs::read(&path)?;
    let artifact: Artifact = serde_json::from_slice(&data)?;

    match expected_hash {
        Some(hash) => validate_layout(artifact.feature_version, artifact.layout_hash, hash)?,
        None if artifact.feature_version != FEATURE_VERSION => {
            return Err(ScoringError::LayoutMismatch {
                expected_version: FEATURE_VERSION,
                expected_hash: artifact.layout_hash,
                actual_version: artifact.feature_version,
                actual_hash: artifact.layout_hash,
            });
        }
        None => {}
    }

    let value = artifact.unwrap_payload()?;
    Ok(Some((artifact, value)))
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Training run shared by every model of the registry
fn registry_run_id(registry: &ModelRegistry) -> Result<Uuid> {
    let mut runs = registry.entries().map(|e| e.metadata.run_id);
    let Some(first) = runs.next() else {
        return Ok(Uuid::new_v4());
    };
    if runs.any(|run| run != first) {
        return Err(ScoringError::invalid(
            "registry",
            "models come from more than one training run",
        ));
    }
    Ok(first)
}

/// Persist the preprocessor and every model of a registry.
/// All artifacts are stamped with the models' run id; a partial write
/// leaves files that `load_registry` will not mix with this run.
pub fn save_registry(dir: &Path, registry: &ModelRegistry) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    let run_id = registry_run_id(registry)?;

    let hash = match registry.preprocessor() {
        Some(pre) => {
            let hash = pre.layout_hash();
            written.push(save_artifact(dir, ENCODERS_ARTIFACT, hash, run_id, &pre.encoders)?);
            written.push(save_artifact(dir, SCALER_ARTIFACT, hash, run_id, &pre.scaler)?);
            hash
        }
        None => {
            return Err(ScoringError::invalid(
                "registry",
                "cannot persist models without a fitted preprocessor",
            ))
        }
    };

    for entry in registry.entries() {
        written.push(save_artifact(dir, entry.kind().as_str(), hash, run_id, entry)?);
    }

    log::info!(
        "Persisted {} artifact(s) of run {} to {}",
        written.len(),
        run_id,
        dir.display()
    );
    Ok(written)
}

/// Preprocessor and the training run it was fitted in
fn load_preprocessor(dir: &Path) -> Option<(Preprocessor, Uuid)> {
    let (artifact, encoders) = match load_artifact::<EncoderSet>(dir, ENCODERS_ARTIFACT, None) {
        Ok(Some(found)) => found,
        Ok(None) => {
            log::warn!("No encoders in {}; all models disabled", dir.display());
            return None;
        }
        Err(e) => {
            log::warn!("Skipping encoders: {}", e);
            return None;
        }
    };

    let Some(career_velocity) = variant_for_hash(artifact.layout_hash) else {
        log::warn!(
            "Encoders were fitted against unknown layout {:08x}; all models disabled",
            artifact.layout_hash
        );
        return None;
    };

    if !encoders.is_complete() {
        log::warn!("Encoders artifact is incomplete; all models disabled");
        return None;
    }

    let run_id = artifact.run_id;
    let scaler = match load_artifact::<Scaler>(dir, SCALER_ARTIFACT, Some(artifact.layout_hash)) {
        Ok(Some((found, _))) if found.run_id != run_id => {
            log::warn!(
                "Scaler belongs to run {}, encoders to run {}; all models disabled",
                found.run_id,
                run_id
            );
            return None;
        }
        Ok(Some((_, scaler))) if scaler.is_valid() => scaler,
        Ok(Some(_)) => {
            log::warn!("Scaler has non-finite or zero deviations; all models disabled");
            return None;
        }
        Ok(None) => {
            log::warn!("No scaler in {}; all models disabled", dir.display());
            return None;
        }
        Err(e) => {
            log::warn!("Skipping scaler: {}", e);
            return None;
        }
    };

    Some((
        Preprocessor {
            career_velocity,
            encoders,
            scaler,
        },
        run_id,
    ))
}

/// Load whatever is usable from `dir`. Never fails.
pub fn load_registry(dir: &Path) -> ModelRegistry {
    let (preprocessor, run_id) = load_preprocessor(dir).unzip();
    let expected_hash = preprocessor.as_ref().map(Preprocessor::layout_hash);
    let mut registry = ModelRegistry::new(preprocessor);

    for kind in ModelKind::ALL {
        let hash = if kind.uses_feature_vector() {
            match expected_hash {
                Some(hash) => Some(hash),
                None => continue,
            }
        } else {
            None
        };

        match load_artifact::<ModelEntry>(dir, kind.as_str(), hash) {
            Ok(Some((artifact, entry)))
                if run_id.is_some_and(|run| run != artifact.run_id || run != entry.metadata.run_id) =>
            {
                log::warn!(
                    "Model '{}' is from run {}, encoders from run {}; skipped",
                    kind,
                    entry.metadata.run_id,
                    run_id.unwrap_or_default()
                );
            }
            Ok(Some((_, entry))) if entry.kind() == kind => {
                log::info!(
                    "Loaded model '{}' ({}, run {})",
                    kind,
                    entry.model.estimator_name(),
                    entry.metadata.run_id
                );
                registry = registry.with_model(entry);
            }
            Ok(Some((_, entry))) => {
                log::warn!("Artifact '{}' holds a '{}' model; skipped", kind, entry.kind());
            }
            Ok(None) => log::debug!("No '{}' model; fallback mode", kind),
            Err(e) => log::warn!("Skipping model '{}': {}", kind, e),
        }
    }

    registry
}
