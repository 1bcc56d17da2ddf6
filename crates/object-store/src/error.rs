// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for object storage operations

use thiserror::Error;

/// Result type alias for object storage operations
pub type ObjectStoreResult<T> = Result<T, ObjectStoreError>;

/// Errors that can occur when talking to the object store
#[derive(Debug, Error)]
pub enum ObjectStoreError {
    /// The backend could not be reached
    #[error("failed to reach object store: {message}")]
    Connection {
        /// Underlying transport message
        message: String,
    },

    /// The request exceeded the configured timeout
    #[error("object store request timed out after {seconds} seconds")]
    Timeout {
        /// Configured timeout in seconds
        seconds: u64,
    },

    /// The requested object does not exist
    #[error("object s3://{bucket}/{key} not found")]
    NotFound {
        /// Bucket that was queried
        bucket: String,
        /// Key that was queried
        key: String,
    },

    /// The backend returned a non-success status
    #[error("object store error: {status} - {message}")]
    Storage {
        /// HTTP status code returned by the backend
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// The configured endpoint is not a valid URL
    #[error("invalid object store endpoint: {message}")]
    InvalidEndpoint {
        /// Description of the rejected endpoint
        message: String,
    },

    /// The backend returned a listing the client could not parse
    #[error("invalid listing response: {message}")]
    InvalidResponse {
        /// Description of the malformed payload
        message: String,
    },
}

impl ObjectStoreError {
    /// Whether a retry of the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Connection { .. } | Self::Timeout { .. } => true,
            Self::Storage { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::NotFound { .. } | Self::InvalidEndpoint { .. } | Self::InvalidResponse { .. } => {
                false
            }
        }
    }
}
