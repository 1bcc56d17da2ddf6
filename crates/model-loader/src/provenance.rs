// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Load provenance
//!
//! Availability is bought with degradation: a placeholder model keeps the
//! API answering when storage is down. Provenance is what keeps that
//! trade-off observable — operators and tests can always tell which tier
//! produced the model currently being served.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which fallback tier produced the active model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSource {
    /// Downloaded from object storage
    Remote,
    /// Loaded from the local artifact directory
    Local,
    /// Trained in-process on the built-in corpus
    Synthesized,
}

impl std::fmt::Display for ModelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote => write!(f, "remote"),
            Self::Local => write!(f, "local"),
            Self::Synthesized => write!(f, "synthesized"),
        }
    }
}

/// Metadata describing where and when the active model was obtained.
///
/// Overwritten wholesale on every successful load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelProvenance {
    /// Fallback tier that produced the model
    pub source: ModelSource,
    /// Object URL or filesystem path the artifacts were read from
    pub location: String,
    /// When the load completed
    pub loaded_at: DateTime<Utc>,
    /// Human-readable model-type tag
    pub model_type: String,
}

impl ModelProvenance {
    /// Record a completed load, stamped with the current time.
    pub fn new(source: ModelSource, location: impl Into<String>, model_type: &str) -> Self {
        Self {
            source,
            location: location.into(),
            loaded_at: Utc::now(),
            model_type: model_type.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ModelSource::Synthesized).unwrap(),
            "\"synthesized\""
        );
        assert_eq!(serde_json::to_string(&ModelSource::Remote).unwrap(), "\"remote\"");
    }

    #[test]
    fn source_display_matches_wire_form() {
        assert_eq!(ModelSource::Local.to_string(), "local");
    }
}
