// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! `OpenAPI` document definition

use utoipa::OpenApi;

use crate::{routes::handlers, state};

/// `OpenAPI` documentation for the fake news detector API
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "Fake News Detector API",
        description = "API for fake news detection using machine learning"
    ),
    paths(
        handlers::root_handler,
        handlers::health_handler,
        handlers::predict_handler,
        handlers::batch_predict_handler,
        handlers::model_info_handler,
        handlers::reload_handler,
    ),
    components(schemas(
        handlers::LivenessResponse,
        handlers::PredictRequest,
        handlers::PredictionResponse,
        handlers::Probabilities,
        handlers::BatchPredictRequest,
        handlers::BatchPredictionResponse,
        handlers::BatchEntry,
        handlers::BatchErrorEntry,
        handlers::ModelInfo,
        handlers::ModelInfoResponse,
        handlers::ReloadResponse,
        state::HealthCheck,
        state::HealthStatus,
    )),
    tags(
        (name = "health", description = "Liveness and health endpoints"),
        (name = "predictions", description = "Single and batch classification"),
        (name = "model", description = "Model provenance and reload")
    )
)]
pub struct ApiDoc;
