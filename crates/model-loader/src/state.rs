// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Shared model state
//!
//! One [`ModelState`] instance is created at startup, handed to the serving
//! layer, and lives for the whole process. Predictions read it through
//! cheap snapshots; only a completed acquisition writes to it.

use std::sync::{Arc, PoisonError, RwLock};

use classifier::{
    LogisticRegression, PredictionEngine, PredictionError, TfidfVectorizer,
};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::provenance::ModelProvenance;

/// The bundle swapped as a single unit on every successful load
#[derive(Debug, Clone)]
pub struct ActiveModel {
    /// Trained classifier
    pub model: LogisticRegression,
    /// Vectorizer the classifier was trained against
    pub vectorizer: TfidfVectorizer,
    /// Where this pair came from
    pub provenance: ModelProvenance,
}

/// Thread-safe holder of the currently active model.
///
/// The bundle sits behind a single `Arc` inside a short-lived lock, so
/// readers never observe a state where one artifact reflects a new load and
/// another the old one. Writes go exclusively through
/// [`ModelState::replace`].
#[derive(Debug)]
pub struct ModelState {
    active: RwLock<Option<Arc<ActiveModel>>>,
    // tokio Mutex so the guard can be held across the await points of a
    // running reload.
    reload_gate: Arc<Mutex<()>>,
}

impl ModelState {
    /// Create an empty state; no model is active until the first `replace`.
    pub fn new() -> Self {
        Self {
            active: RwLock::new(None),
            reload_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Atomically swap in a freshly acquired bundle.
    pub fn replace(&self, active: ActiveModel) {
        let mut guard = self
            .active
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Some(Arc::new(active));
    }

    /// Consistent point-in-time view of the active model.
    ///
    /// Clones one `Arc` under a read lock; the critical section is bounded
    /// and readers do not block each other.
    pub fn snapshot(&self) -> ModelSnapshot {
        let guard = self.active.read().unwrap_or_else(PoisonError::into_inner);
        ModelSnapshot {
            active: guard.clone(),
        }
    }

    /// Whether a model is currently active.
    pub fn is_loaded(&self) -> bool {
        self.snapshot().is_loaded()
    }

    /// Claim the exclusive right to run a reload.
    ///
    /// At most one reload executes at a time; a second concurrent request
    /// gets `None` and should be rejected with a "reload in progress"
    /// status rather than queued.
    pub fn try_begin_reload(&self) -> Option<ReloadGuard> {
        self.reload_gate
            .clone()
            .try_lock_owned()
            .ok()
            .map(|permit| ReloadGuard { _permit: permit })
    }
}

impl Default for ModelState {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of the model state
#[derive(Debug, Clone)]
pub struct ModelSnapshot {
    active: Option<Arc<ActiveModel>>,
}

impl ModelSnapshot {
    /// The captured bundle, if any model was active at snapshot time.
    pub fn active(&self) -> Option<&ActiveModel> {
        self.active.as_deref()
    }

    /// Provenance of the captured bundle.
    pub fn provenance(&self) -> Option<&ModelProvenance> {
        self.active().map(|active| &active.provenance)
    }

    /// Whether a model was active at snapshot time.
    pub fn is_loaded(&self) -> bool {
        self.active.is_some()
    }

    /// Build a prediction engine over the captured pair.
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError::ModelNotLoaded`] when the snapshot is
    /// empty.
    pub fn engine(
        &self,
    ) -> Result<PredictionEngine<&LogisticRegression, &TfidfVectorizer>, PredictionError> {
        let active = self.active().ok_or(PredictionError::ModelNotLoaded)?;
        Ok(PredictionEngine::new(&active.model, &active.vectorizer))
    }
}

/// Exclusive permit to run one reload; dropping it reopens the gate.
#[derive(Debug)]
pub struct ReloadGuard {
    _permit: OwnedMutexGuard<()>,
}

#[cfg(test)]
mod tests {
    use std::thread;

    use classifier::placeholder;

    use super::*;
    use crate::provenance::ModelSource;

    fn bundle(source: ModelSource, location: &str) -> ActiveModel {
        let (model, vectorizer) = placeholder::synthesize().expect("placeholder trains");
        ActiveModel {
            model,
            vectorizer,
            provenance: ModelProvenance::new(source, location, LogisticRegression::MODEL_TYPE),
        }
    }

    #[test]
    fn starts_empty() {
        let state = ModelState::new();
        assert!(!state.is_loaded());
        assert!(state.snapshot().active().is_none());
        assert!(matches!(
            state.snapshot().engine(),
            Err(PredictionError::ModelNotLoaded)
        ));
    }

    #[test]
    fn replace_swaps_whole_bundle() {
        let state = ModelState::new();
        state.replace(bundle(ModelSource::Local, "models/a.json"));

        let snapshot = state.snapshot();
        assert!(snapshot.is_loaded());
        assert_eq!(
            snapshot.provenance().map(|p| p.source),
            Some(ModelSource::Local)
        );
        assert!(snapshot.engine().is_ok());
    }

    #[test]
    fn snapshot_outlives_replacement() {
        let state = ModelState::new();
        state.replace(bundle(ModelSource::Local, "models/a.json"));

        let before = state.snapshot();
        state.replace(bundle(ModelSource::Remote, "s3://bucket/b"));

        // The old snapshot keeps serving the pair it captured.
        assert_eq!(
            before.provenance().map(|p| p.source),
            Some(ModelSource::Local)
        );
        assert_eq!(
            state.snapshot().provenance().map(|p| p.source),
            Some(ModelSource::Remote)
        );
    }

    #[test]
    fn concurrent_readers_never_observe_torn_state() {
        let state = Arc::new(ModelState::new());
        let mut readers = Vec::new();

        for _ in 0..4 {
            let state = Arc::clone(&state);
            readers.push(thread::spawn(move || {
                for _ in 0..2_000 {
                    let snapshot = state.snapshot();
                    if let Some(active) = snapshot.active() {
                        // A loaded snapshot always carries a complete,
                        // internally consistent bundle.
                        let expected = match active.provenance.source {
                            ModelSource::Local => "models/a.json",
                            ModelSource::Remote => "s3://bucket/b",
                            ModelSource::Synthesized => unreachable!("never installed"),
                        };
                        assert_eq!(active.provenance.location, expected);
                        assert!(snapshot.engine().is_ok());
                    }
                }
            }));
        }

        for i in 0..200 {
            if i % 2 == 0 {
                state.replace(bundle(ModelSource::Local, "models/a.json"));
            } else {
                state.replace(bundle(ModelSource::Remote, "s3://bucket/b"));
            }
        }

        for reader in readers {
            reader.join().expect("reader thread panicked");
        }
    }

    #[test]
    fn reload_gate_is_exclusive() {
        let state = ModelState::new();

        let first = state.try_begin_reload();
        assert!(first.is_some());
        assert!(state.try_begin_reload().is_none());

        drop(first);
        assert!(state.try_begin_reload().is_some());
    }
}
