// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Model acquisition fallback chain
//!
//! Serving availability is prioritized over result quality: a degraded
//! placeholder model is preferable to a crashed server, as long as the
//! degradation is observable through provenance. Accordingly, every tier
//! failure here is caught, logged, and converted into an attempt at the
//! next tier — acquisition as a whole reports a hard error only when even
//! the in-process placeholder cannot be trained.

use std::path::{Path, PathBuf};

use classifier::{
    CodecError, LogisticRegression, TfidfVectorizer, TrainingError, codec, placeholder,
};
use object_store::{ObjectStoreClient, ObjectStoreError};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::{
    locator::StorageLocator,
    provenance::{ModelProvenance, ModelSource},
    state::{ActiveModel, ModelState},
};

/// Fixed file name of the vectorizer artifact in the local directory.
const LOCAL_VECTORIZER_FILE: &str = "vectorizer.json";

/// Result type alias for acquisition operations
pub type LoaderResult<T> = Result<T, AcquisitionError>;

/// The only hard failure acquisition can report
#[derive(Debug, Error)]
pub enum AcquisitionError {
    /// Even the built-in placeholder could not be trained
    #[error("failed to synthesize placeholder model: {source}")]
    Placeholder {
        /// Underlying training failure
        #[from]
        source: TrainingError,
    },
}

/// Why a single fallback tier was abandoned. Logged, never propagated.
#[derive(Debug, Error)]
enum TierFailure {
    #[error(transparent)]
    Store(#[from] ObjectStoreError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("no model artifact found in {}", dir.display())]
    NoModelArtifact { dir: PathBuf },

    #[error("model expects {model_features} features but vectorizer emits {vectorizer_features}")]
    SchemaMismatch {
        model_features: usize,
        vectorizer_features: usize,
    },
}

/// A decoded pair is only served if the feature spaces line up; a mismatch
/// is treated like any other tier failure.
fn validate_pair(
    model: &LogisticRegression,
    vectorizer: &TfidfVectorizer,
) -> Result<(), TierFailure> {
    if model.n_features() != vectorizer.dimension() {
        return Err(TierFailure::SchemaMismatch {
            model_features: model.n_features(),
            vectorizer_features: vectorizer.dimension(),
        });
    }
    Ok(())
}

/// Walks the remote → local → synthesized fallback chain
#[derive(Debug)]
pub struct ModelLoader {
    store: ObjectStoreClient,
    locator: StorageLocator,
    local_dir: PathBuf,
}

impl ModelLoader {
    /// Create a loader over a store client, artifact locations, and a local
    /// fallback directory.
    pub fn new(
        store: ObjectStoreClient,
        locator: StorageLocator,
        local_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            locator,
            local_dir: local_dir.into(),
        }
    }

    /// Locations this loader reads from.
    pub fn locator(&self) -> &StorageLocator {
        &self.locator
    }

    /// Acquire a servable model, falling back tier by tier.
    ///
    /// # Errors
    ///
    /// Returns [`AcquisitionError::Placeholder`] only if all storage tiers
    /// failed *and* the built-in placeholder could not be trained.
    #[instrument(skip(self))]
    pub async fn acquire(&self) -> LoaderResult<ActiveModel> {
        match self.try_remote().await {
            Ok(active) => {
                info!(location = %active.provenance.location, "loaded model from object storage");
                return Ok(active);
            }
            Err(e) => {
                warn!(error = %e, "remote model load failed, trying local artifacts");
            }
        }

        match self.try_local().await {
            Ok(active) => {
                info!(location = %active.provenance.location, "loaded model from local artifacts");
                return Ok(active);
            }
            Err(e) => {
                warn!(error = %e, "local model load failed, synthesizing placeholder");
            }
        }

        let active = self.synthesize()?;
        warn!("serving synthesized placeholder model; predictions are not meaningful");
        Ok(active)
    }

    /// Acquire and atomically install into `state`.
    ///
    /// `state` is written only after acquisition fully succeeds, so a
    /// failed or cancelled load leaves the previous model active.
    pub async fn load_into(&self, state: &ModelState) -> LoaderResult<ModelProvenance> {
        let active = self.acquire().await?;
        let provenance = active.provenance.clone();
        state.replace(active);
        Ok(provenance)
    }

    /// Remote tier: both artifacts must download, decode, and validate.
    async fn try_remote(&self) -> Result<ActiveModel, TierFailure> {
        let bucket = self.locator.bucket();

        let model_bytes = self.store.download(bucket, self.locator.model_key()).await?;
        let vectorizer_bytes = self
            .store
            .download(bucket, self.locator.vectorizer_key())
            .await?;

        let model = codec::deserialize_model(&model_bytes)?;
        let vectorizer = codec::deserialize_vectorizer(&vectorizer_bytes)?;
        validate_pair(&model, &vectorizer)?;

        Ok(ActiveModel {
            provenance: ModelProvenance::new(
                ModelSource::Remote,
                self.locator.model_url(),
                LogisticRegression::MODEL_TYPE,
            ),
            model,
            vectorizer,
        })
    }

    /// Local tier: first artifact file in sorted order, plus the vectorizer
    /// at its fixed conventional name.
    async fn try_local(&self) -> Result<ActiveModel, TierFailure> {
        let model_path = self.find_local_model().await?;
        let vectorizer_path = self.local_dir.join(LOCAL_VECTORIZER_FILE);

        let model = codec::deserialize_model(&tokio::fs::read(&model_path).await?)?;
        let vectorizer = codec::deserialize_vectorizer(&tokio::fs::read(&vectorizer_path).await?)?;
        validate_pair(&model, &vectorizer)?;

        Ok(ActiveModel {
            provenance: ModelProvenance::new(
                ModelSource::Local,
                model_path.display().to_string(),
                LogisticRegression::MODEL_TYPE,
            ),
            model,
            vectorizer,
        })
    }

    async fn find_local_model(&self) -> Result<PathBuf, TierFailure> {
        let mut entries = tokio::fs::read_dir(&self.local_dir).await?;
        let mut candidates = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if is_model_artifact(&path) {
                candidates.push(path);
            }
        }

        // Sorted so the chosen artifact is stable across reloads.
        candidates.sort();
        candidates
            .into_iter()
            .next()
            .ok_or_else(|| TierFailure::NoModelArtifact {
                dir: self.local_dir.clone(),
            })
    }

    /// Terminal tier; has no external dependency.
    fn synthesize(&self) -> LoaderResult<ActiveModel> {
        let (model, vectorizer) = placeholder::synthesize()?;

        Ok(ActiveModel {
            provenance: ModelProvenance::new(
                ModelSource::Synthesized,
                "built-in corpus",
                LogisticRegression::MODEL_TYPE,
            ),
            model,
            vectorizer,
        })
    }
}

fn is_model_artifact(path: &Path) -> bool {
    if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
        return false;
    }
    path.file_name().and_then(|name| name.to_str()) != Some(LOCAL_VECTORIZER_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_artifact_filter() {
        assert!(is_model_artifact(Path::new("models/best_model.json")));
        assert!(!is_model_artifact(Path::new("models/vectorizer.json")));
        assert!(!is_model_artifact(Path::new("models/readme.txt")));
        assert!(!is_model_artifact(Path::new("models/best_model.joblib")));
    }

    #[test]
    fn schema_mismatch_is_rejected() {
        let samples = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let model = LogisticRegression::fit(&samples, &[1, 0], 10, 0.1).expect("model trains");
        let (_, vectorizer) = placeholder::synthesize().expect("placeholder trains");

        assert!(matches!(
            validate_pair(&model, &vectorizer),
            Err(TierFailure::SchemaMismatch {
                model_features: 2,
                ..
            })
        ));
    }
}
