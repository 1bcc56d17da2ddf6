// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Routes module
//!
//! This module provides route configuration and handlers for the fake news
//! detector API server.

pub mod handlers;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use handlers::{
    batch_predict_handler, health_handler, model_info_handler, predict_handler, reload_handler,
    root_handler,
};

use crate::{
    metrics::metrics_handler,
    middleware::{RateLimiter, rate_limiting_middleware},
    openapi::{openapi_spec, swagger_ui},
    state::ServerState,
};

/// Create application routes with conditional rate limiting
#[allow(clippy::needless_pass_by_value)] // We need to clone the rate limiter for middleware
pub fn create_routes(rate_limiter: RateLimiter) -> Router<ServerState> {
    // Health and metrics endpoints are not rate limited for monitoring
    // purposes.
    let health_routes = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler));

    // Documentation endpoints are not rate limited
    let docs_routes = Router::new()
        .route("/api-doc/openapi.json", get(openapi_spec))
        .route("/swagger-ui", get(swagger_ui));

    // Prediction and model-management endpoints - conditionally rate limited
    let mut api_routes = Router::new()
        .route("/predict", post(predict_handler))
        .route("/batch_predict", post(batch_predict_handler))
        .route("/model/info", get(model_info_handler))
        .route("/model/reload", post(reload_handler));

    if rate_limiter.is_enabled() {
        api_routes = api_routes.layer(middleware::from_fn_with_state(
            rate_limiter.clone(),
            rate_limiting_middleware,
        ));
    }

    Router::new()
        .merge(health_routes)
        .merge(docs_routes)
        .merge(api_routes)
}
