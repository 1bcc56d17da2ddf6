// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Result types produced by the prediction engine

use serde::{Deserialize, Serialize};

/// Class label for a news text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// Legitimate news (class index 0)
    Real,
    /// Fabricated news (class index 1)
    Fake,
}

impl Label {
    /// Map a classifier output index to a label.
    ///
    /// Index 1 is `fake`; every other index is `real`, matching the
    /// two-class contract of [`crate::Classifier`].
    pub fn from_class_index(index: usize) -> Self {
        if index == 1 { Self::Fake } else { Self::Real }
    }

    /// The wire representation of this label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Real => "real",
            Self::Fake => "fake",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-class probability distribution, ordered by class index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    /// Probability of the `real` class (index 0)
    pub real: f64,
    /// Probability of the `fake` class (index 1)
    pub fake: f64,
}

impl ClassProbabilities {
    /// All-zero distribution, used in per-item batch error entries.
    pub const ZERO: Self = Self {
        real: 0.0,
        fake: 0.0,
    };

    /// The larger of the two class probabilities.
    pub fn max(&self) -> f64 {
        self.real.max(self.fake)
    }
}

/// A single successful prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted class label
    pub prediction: Label,
    /// Probability of the predicted class
    pub confidence: f64,
    /// Full per-class distribution
    pub probabilities: ClassProbabilities,
}

/// One entry of a batch prediction result
///
/// Batch requests never fail wholesale on a bad item; invalid entries are
/// substituted with a structured error carrying the same shape as a
/// successful prediction.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum BatchItem {
    /// The item was predicted successfully
    Prediction(Prediction),
    /// The item could not be predicted
    Error(BatchItemError),
}

impl BatchItem {
    /// Whether this entry is a per-item error.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Structured per-item error entry for batch predictions
#[derive(Debug, Clone, Serialize)]
pub struct BatchItemError {
    /// Always the literal `"error"`, mirroring the `prediction` field of a
    /// successful entry
    pub prediction: &'static str,
    /// Always zero
    pub confidence: f64,
    /// Always the zero distribution
    pub probabilities: ClassProbabilities,
    /// Human-readable reason the item was rejected
    pub error: String,
}

impl BatchItemError {
    /// Create an error entry with the given reason.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            prediction: "error",
            confidence: 0.0,
            probabilities: ClassProbabilities::ZERO,
            error: message.into(),
        }
    }
}
