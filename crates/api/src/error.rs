// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error handling module
//!
//! This module provides error types for server operations, including proper
//! HTTP response mapping. The fallback chain never surfaces here in normal
//! operation; the errors a client can actually see are the not-loaded,
//! invalid-input, and reload-contention conditions.

use std::net::SocketAddr;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use classifier::PredictionError;
use model_loader::AcquisitionError;
use thiserror::Error;

/// Error types for server operations
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration validation errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Network binding errors
    #[error("Failed to bind to {address}: {source}")]
    Bind {
        /// Socket address that failed to bind
        address: SocketAddr,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Server startup errors
    #[error("Server startup failed: {source}")]
    Startup {
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Server shutdown errors
    #[error("Server shutdown failed: {source}")]
    Shutdown {
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Model acquisition failed hard (placeholder training error)
    #[error("Model load failed: {source}")]
    ModelLoad {
        /// Underlying acquisition failure
        #[from]
        source: AcquisitionError,
    },

    /// A reload is already running; at most one executes at a time
    #[error("model reload already in progress")]
    ReloadInProgress,

    /// Typed prediction failures from the classification core
    #[error(transparent)]
    Prediction(#[from] PredictionError),

    /// Input validation errors
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// JSON parsing errors with detailed context
    #[error("Invalid JSON request: {message}")]
    JsonError {
        /// Detailed error message
        message: String,
    },

    /// Task join errors for async operations
    #[error("Task join error: {source}")]
    TaskJoin {
        /// Underlying tokio join error
        #[from]
        source: tokio::task::JoinError,
    },
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    /// HTTP status this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Prediction(PredictionError::ModelNotLoaded) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Prediction(
                PredictionError::EmptyText | PredictionError::BatchTooLarge { .. },
            )
            | Self::ValidationError(..)
            | Self::JsonError { .. } => StatusCode::BAD_REQUEST,
            Self::ReloadInProgress => StatusCode::CONFLICT,
            Self::Config { .. }
            | Self::Bind { .. }
            | Self::Startup { .. }
            | Self::Shutdown { .. }
            | Self::ModelLoad { .. }
            | Self::TaskJoin { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}
