// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for classification, training, and artifact handling

use thiserror::Error;

use crate::engine::MAX_BATCH_SIZE;

/// Errors raised when serving predictions
#[derive(Debug, Error)]
pub enum PredictionError {
    /// No model is currently active; the caller should retry after a load
    #[error("no model is currently loaded")]
    ModelNotLoaded,

    /// Input text was empty or whitespace-only
    #[error("input text cannot be empty")]
    EmptyText,

    /// Batch request exceeded the per-request item limit
    #[error("batch of {len} items exceeds the maximum of {MAX_BATCH_SIZE}")]
    BatchTooLarge {
        /// Number of items in the rejected batch
        len: usize,
    },
}

/// Errors raised by the artifact codec
#[derive(Debug, Error)]
pub enum CodecError {
    /// Artifact could not be encoded
    #[error("failed to serialize artifact: {message}")]
    Serialization {
        /// Underlying encoder message
        message: String,
    },

    /// Bytes were corrupted, truncated, or not an artifact envelope
    #[error("failed to deserialize artifact: {message}")]
    Deserialization {
        /// Underlying decoder message
        message: String,
    },

    /// The envelope decoded cleanly but held the wrong artifact kind
    #[error("expected a {expected} artifact, found {found}")]
    WrongKind {
        /// Artifact kind the caller asked for
        expected: &'static str,
        /// Artifact kind actually present in the envelope
        found: &'static str,
    },

    /// The artifact decoded but is structurally unusable
    #[error("invalid artifact: {message}")]
    InvalidArtifact {
        /// Description of the failed structural check
        message: String,
    },
}

/// Errors raised while fitting models or vectorizers
#[derive(Debug, Error)]
pub enum TrainingError {
    /// No documents were supplied
    #[error("training corpus is empty")]
    EmptyCorpus,

    /// Documents and labels are not the same length
    #[error("corpus has {samples} documents but {labels} labels")]
    LabelMismatch {
        /// Number of training documents
        samples: usize,
        /// Number of labels supplied
        labels: usize,
    },

    /// Tokenization produced no usable vocabulary
    #[error("vocabulary is empty after tokenization")]
    EmptyVocabulary,
}
