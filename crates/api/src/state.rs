// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server state management module
//!
//! Shared application state for the fake news detector API: configuration,
//! the injected model state handle, the model loader, and the coordinated
//! cancellation token. The model state is created once at startup and
//! threaded through here rather than living in a global.

use std::sync::Arc;

use model_loader::{ModelLoader, ModelProvenance, ModelSnapshot, ModelSource, ModelState};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use utoipa::ToSchema;

use crate::{
    config::{Environment, ServerConfig},
    error::{ServerError, ServerResult},
    metrics,
};

/// Shared application state with cancellation token support
#[derive(Debug, Clone)]
pub struct ServerState {
    /// Server configuration
    config: ServerConfig,
    /// Loader that walks the acquisition fallback chain
    loader: Arc<ModelLoader>,
    /// Swappable holder of the active model
    model_state: Arc<ModelState>,
    /// Cancellation token for coordinated shutdown
    pub cancellation_token: CancellationToken,
}

impl ServerState {
    /// Create new server state
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `loader` - Model acquisition loader
    /// * `model_state` - Shared model state handle
    /// * `cancellation_token` - Token for coordinated cancellation
    pub fn new(
        config: ServerConfig,
        loader: Arc<ModelLoader>,
        model_state: Arc<ModelState>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            config,
            loader,
            model_state,
            cancellation_token,
        }
    }

    /// Server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Consistent view of the active model for one request.
    pub fn model_snapshot(&self) -> ModelSnapshot {
        self.model_state.snapshot()
    }

    /// The shared model state handle.
    pub fn model_state(&self) -> &Arc<ModelState> {
        &self.model_state
    }

    /// Run the acquisition chain once at startup and install the result.
    ///
    /// # Errors
    ///
    /// Fails only when even the synthesized placeholder cannot be built.
    pub async fn startup_load(&self) -> ServerResult<ModelProvenance> {
        let provenance = self.loader.load_into(&self.model_state).await?;
        metrics::record_model_load(provenance.source);
        Ok(provenance)
    }

    /// Re-run acquisition and swap the active model.
    ///
    /// At most one reload runs at a time; a concurrent request fails with
    /// [`ServerError::ReloadInProgress`] rather than queueing. The state is
    /// only written after acquisition fully succeeds, so a failed or
    /// cancelled reload leaves the previous model serving.
    pub async fn reload(&self) -> ServerResult<ModelProvenance> {
        let _guard = self
            .model_state
            .try_begin_reload()
            .ok_or(ServerError::ReloadInProgress)?;

        let provenance = self.loader.load_into(&self.model_state).await?;
        metrics::record_model_load(provenance.source);
        Ok(provenance)
    }

    /// Perform health check operations
    pub fn health_check(&self) -> HealthCheck {
        let snapshot = self.model_state.snapshot();
        let status = if snapshot.is_loaded() {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded {
                reason: Box::from("no model loaded"),
            }
        };

        HealthCheck {
            status,
            version: Box::from(env!("CARGO_PKG_VERSION")),
            environment: self.config.environment,
            timestamp: chrono::Utc::now().to_rfc3339(),
            model_loaded: snapshot.is_loaded(),
            model_source: snapshot.provenance().map(|p| p.source),
        }
    }
}

/// Health status of the service
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Service and model are fully operational
    Healthy,

    /// Service is answering but predictions will fail
    Degraded {
        /// Human-readable explanation of the degradation condition
        reason: Box<str>,
    },
}

/// Health check status
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthCheck {
    /// Service status
    pub status: HealthStatus,
    /// Service version
    pub version: Box<str>,
    /// Environment
    #[schema(value_type = String)]
    pub environment: Environment,
    /// Timestamp
    pub timestamp: String,
    /// Whether a model is currently active
    pub model_loaded: bool,
    /// Fallback tier the active model came from, if any
    #[schema(value_type = Option<String>)]
    pub model_source: Option<ModelSource>,
}
