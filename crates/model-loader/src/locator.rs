// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Storage locator for model artifacts

/// Where to find the model and vectorizer artifacts in object storage.
///
/// Constructed once at startup from configuration and never mutated; a
/// reload re-reads the same locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLocator {
    endpoint: String,
    bucket: String,
    model_key: String,
    vectorizer_key: String,
}

impl StorageLocator {
    /// Create a locator from its four coordinates.
    pub fn new(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        model_key: impl Into<String>,
        vectorizer_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            bucket: bucket.into(),
            model_key: model_key.into(),
            vectorizer_key: vectorizer_key.into(),
        }
    }

    /// Object store endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Bucket holding both artifacts.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Object key of the classifier artifact.
    pub fn model_key(&self) -> &str {
        &self.model_key
    }

    /// Object key of the vectorizer artifact.
    pub fn vectorizer_key(&self) -> &str {
        &self.vectorizer_key
    }

    /// `s3://bucket/key` form of the model location, for provenance and logs.
    pub fn model_url(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.model_key)
    }

    /// `s3://bucket/key` form of the vectorizer location.
    pub fn vectorizer_url(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.vectorizer_key)
    }
}

impl Default for StorageLocator {
    fn default() -> Self {
        Self::new(
            "http://localhost:4566",
            "fake-news-models",
            "models/best_model.joblib",
            "models/vectorizer.joblib",
        )
    }
}
