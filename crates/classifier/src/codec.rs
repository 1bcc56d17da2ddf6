// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Artifact codec
//!
//! Trained artifacts travel through object storage and the local filesystem
//! as opaque byte blobs. The codec wraps them in a tagged envelope so a
//! decoded blob always identifies its own kind, and validates structure on
//! the way in so a corrupted or mismatched artifact fails loudly instead of
//! producing a silently-broken model.

use serde::{Deserialize, Serialize};

use crate::{error::CodecError, model::LogisticRegression, vectorizer::TfidfVectorizer};

/// Tagged envelope for a serialized artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "artifact", rename_all = "snake_case")]
pub enum Artifact {
    /// A trained classifier
    Model(LogisticRegression),
    /// A fitted vectorizer
    Vectorizer(TfidfVectorizer),
}

impl Artifact {
    /// Kind tag used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Model(_) => "model",
            Self::Vectorizer(_) => "vectorizer",
        }
    }

    fn validate(&self) -> Result<(), CodecError> {
        let result = match self {
            Self::Model(model) => model.validate(),
            Self::Vectorizer(vectorizer) => vectorizer.validate(),
        };
        result.map_err(|message| CodecError::InvalidArtifact { message })
    }
}

/// Encode an artifact to bytes.
pub fn serialize(artifact: &Artifact) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(artifact).map_err(|e| CodecError::Serialization {
        message: e.to_string(),
    })
}

/// Decode and validate an artifact from bytes.
pub fn deserialize(bytes: &[u8]) -> Result<Artifact, CodecError> {
    let artifact: Artifact =
        serde_json::from_slice(bytes).map_err(|e| CodecError::Deserialization {
            message: e.to_string(),
        })?;
    artifact.validate()?;
    Ok(artifact)
}

/// Decode bytes that must hold a model artifact.
pub fn deserialize_model(bytes: &[u8]) -> Result<LogisticRegression, CodecError> {
    match deserialize(bytes)? {
        Artifact::Model(model) => Ok(model),
        other => Err(CodecError::WrongKind {
            expected: "model",
            found: other.kind(),
        }),
    }
}

/// Decode bytes that must hold a vectorizer artifact.
pub fn deserialize_vectorizer(bytes: &[u8]) -> Result<TfidfVectorizer, CodecError> {
    match deserialize(bytes)? {
        Artifact::Vectorizer(vectorizer) => Ok(vectorizer),
        other => Err(CodecError::WrongKind {
            expected: "vectorizer",
            found: other.kind(),
        }),
    }
}
