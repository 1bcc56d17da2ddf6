// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP request handlers module
//!
//! Request handlers for the fake news detector API. Each handler builds a
//! prediction engine from a point-in-time model snapshot, so a reload that
//! completes mid-request never hands it a torn (model, vectorizer) pair.

use std::time::Instant;

use axum::{Json, extract::State, response::IntoResponse};
use classifier::{BatchItem, Prediction};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::{
    error::ServerError,
    extractors::JsonExtractor,
    metrics,
    state::{HealthCheck, ServerState},
};

/// Liveness response for the root endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LivenessResponse {
    /// Always `"ok"` while the process is serving
    pub status: String,
    /// Human-readable liveness message
    pub message: String,
}

/// Root endpoint handler
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    summary = "Liveness probe",
    responses(
        (status = 200, description = "Service is running", body = LivenessResponse)
    )
)]
pub async fn root_handler() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "ok".to_string(),
        message: "fake news detector API is running".to_string(),
    })
}

/// Health check endpoint handler
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    summary = "Health check endpoint",
    description = "Returns the current health status of the API service, including whether a model is loaded and which fallback tier produced it.",
    responses(
        (status = 200, description = "Service health report", body = HealthCheck)
    )
)]
pub async fn health_handler(State(state): State<ServerState>) -> impl IntoResponse {
    Json(state.health_check())
}

/// Prediction request for a single news text
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PredictRequest {
    /// Raw news text to classify (must not be blank)
    #[schema(example = "Scientists confirm the city council approved the new budget")]
    pub text: String,
}

/// Per-class probabilities for a prediction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Probabilities {
    /// Probability that the text is legitimate news
    pub real: f64,
    /// Probability that the text is fabricated
    pub fake: f64,
}

/// Response for a successful single prediction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct PredictionResponse {
    /// Predicted label: `"real"` or `"fake"`
    #[schema(example = "real")]
    pub prediction: String,
    /// Probability of the predicted label
    pub confidence: f64,
    /// Full class distribution
    pub probabilities: Probabilities,
}

impl From<Prediction> for PredictionResponse {
    fn from(prediction: Prediction) -> Self {
        Self {
            prediction: prediction.prediction.to_string(),
            confidence: prediction.confidence,
            probabilities: Probabilities {
                real: prediction.probabilities.real,
                fake: prediction.probabilities.fake,
            },
        }
    }
}

/// Single prediction
///
/// Classifies one news text as real or fake using the currently active
/// model.
///
/// # Errors
///
/// Returns `ServerError` if no model is loaded (503) or the text is blank
/// (400).
#[utoipa::path(
    post,
    path = "/predict",
    tag = "predictions",
    summary = "Classify a news text",
    request_body = PredictRequest,
    responses(
        (status = 200, description = "Prediction completed", body = PredictionResponse),
        (status = 400, description = "Empty or invalid input text", body = String),
        (status = 503, description = "No model is currently loaded", body = String)
    )
)]
pub async fn predict_handler(
    State(state): State<ServerState>,
    JsonExtractor(request): JsonExtractor<PredictRequest>,
) -> Result<Json<PredictionResponse>, ServerError> {
    let start_time = Instant::now();

    let snapshot = state.model_snapshot();
    let engine = snapshot.engine()?;
    let prediction = engine.predict(&request.text)?;

    metrics::record_prediction(prediction.prediction);
    metrics::observe_prediction_duration("single", start_time.elapsed().as_secs_f64());

    Ok(Json(prediction.into()))
}

/// Batch prediction request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BatchPredictRequest {
    /// News texts to classify, at most 100 per request
    pub texts: Vec<String>,
}

/// One entry of a batch prediction response
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum BatchEntry {
    /// The item was classified
    Success(PredictionResponse),
    /// The item was rejected; the batch itself went through
    Error(BatchErrorEntry),
}

/// Structured error entry for one rejected batch item
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchErrorEntry {
    /// Always the literal `"error"`
    pub prediction: String,
    /// Always zero
    pub confidence: f64,
    /// Always the zero distribution
    pub probabilities: Probabilities,
    /// Why the item was rejected
    pub error: String,
}

impl From<BatchItem> for BatchEntry {
    fn from(item: BatchItem) -> Self {
        match item {
            BatchItem::Prediction(prediction) => Self::Success(prediction.into()),
            BatchItem::Error(error) => Self::Error(BatchErrorEntry {
                prediction: error.prediction.to_string(),
                confidence: error.confidence,
                probabilities: Probabilities {
                    real: error.probabilities.real,
                    fake: error.probabilities.fake,
                },
                error: error.error,
            }),
        }
    }
}

/// Batch prediction response, entries in input order
#[derive(Debug, Serialize, ToSchema)]
pub struct BatchPredictionResponse {
    /// One entry per input text
    pub predictions: Vec<BatchEntry>,
}

/// Batch prediction
///
/// Classifies up to 100 news texts in one request. Blank items become
/// per-item error entries; an oversized batch is rejected wholesale.
///
/// # Errors
///
/// Returns `ServerError` if no model is loaded (503) or the batch exceeds
/// 100 items (400).
#[utoipa::path(
    post,
    path = "/batch_predict",
    tag = "predictions",
    summary = "Classify a batch of news texts",
    request_body = BatchPredictRequest,
    responses(
        (status = 200, description = "Batch processed", body = BatchPredictionResponse),
        (status = 400, description = "Batch exceeds 100 items", body = String),
        (status = 503, description = "No model is currently loaded", body = String)
    )
)]
pub async fn batch_predict_handler(
    State(state): State<ServerState>,
    JsonExtractor(request): JsonExtractor<BatchPredictRequest>,
) -> Result<Json<BatchPredictionResponse>, ServerError> {
    let start_time = Instant::now();

    let snapshot = state.model_snapshot();
    let engine = snapshot.engine()?;
    let items = engine.predict_batch(&request.texts)?;

    for item in &items {
        if let BatchItem::Prediction(prediction) = item {
            metrics::record_prediction(prediction.prediction);
        }
    }
    metrics::observe_prediction_duration("batch", start_time.elapsed().as_secs_f64());

    Ok(Json(BatchPredictionResponse {
        predictions: items.into_iter().map(BatchEntry::from).collect(),
    }))
}

/// Provenance of the active model, as exposed over the wire
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModelInfo {
    /// Fallback tier: `"remote"`, `"local"`, or `"synthesized"`
    pub source: String,
    /// Object URL or filesystem path the artifacts were read from
    pub location: String,
    /// RFC 3339 timestamp of when the load completed
    pub loaded_at: String,
    /// Human-readable model-type tag
    pub model_type: String,
}

/// Model info response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ModelInfoResponse {
    /// `"loaded"` or `"no_model"`
    pub status: String,
    /// Provenance of the active model, absent when nothing is loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_info: Option<ModelInfo>,
}

/// Model info
///
/// Exposes the provenance of the currently active model, letting operators
/// detect a degraded (placeholder) deployment.
#[utoipa::path(
    get,
    path = "/model/info",
    tag = "model",
    summary = "Provenance of the active model",
    responses(
        (status = 200, description = "Model info report", body = ModelInfoResponse)
    )
)]
pub async fn model_info_handler(State(state): State<ServerState>) -> Json<ModelInfoResponse> {
    let snapshot = state.model_snapshot();

    let response = match snapshot.provenance() {
        Some(provenance) => ModelInfoResponse {
            status: "loaded".to_string(),
            model_info: Some(ModelInfo {
                source: provenance.source.to_string(),
                location: provenance.location.clone(),
                loaded_at: provenance.loaded_at.to_rfc3339(),
                model_type: provenance.model_type.clone(),
            }),
        },
        None => ModelInfoResponse {
            status: "no_model".to_string(),
            model_info: None,
        },
    };

    Json(response)
}

/// Reload response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReloadResponse {
    /// Outcome message
    pub message: String,
    /// Fallback tier the reloaded model came from
    pub source: String,
}

/// Model reload
///
/// Re-runs the acquisition fallback chain and atomically swaps the active
/// model. In-flight predictions keep the pair they started with.
///
/// # Errors
///
/// Returns `ServerError` if a reload is already running (409) or
/// acquisition fails hard (500).
#[utoipa::path(
    post,
    path = "/model/reload",
    tag = "model",
    summary = "Reload the model from storage",
    responses(
        (status = 200, description = "Model reloaded", body = ReloadResponse),
        (status = 409, description = "A reload is already in progress", body = String),
        (status = 500, description = "Acquisition failed hard", body = String)
    )
)]
pub async fn reload_handler(
    State(state): State<ServerState>,
) -> Result<Json<ReloadResponse>, ServerError> {
    let provenance = state.reload().await?;
    info!(source = %provenance.source, location = %provenance.location, "model reloaded");

    Ok(Json(ReloadResponse {
        message: "model reloaded".to_string(),
        source: provenance.source.to_string(),
    }))
}
