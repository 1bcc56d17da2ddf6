// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Prometheus metrics module
//!
//! Provides global metrics using the default Prometheus registry via macros
//! and an Axum-compatible metrics handler.

use std::sync::LazyLock;

use axum::{
    http::{StatusCode, header},
    response::Response,
};
use classifier::Label;
use model_loader::ModelSource;
use prometheus::{
    Encoder, HistogramVec, IntCounterVec, IntGauge, TextEncoder, register_histogram_vec,
    register_int_counter_vec, register_int_gauge,
};

/// Total number of predictions served, labeled by outcome.
pub static PREDICTIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "fakenews_api_predictions_total",
        "Total number of predictions served, labeled by outcome",
        &["label"]
    )
    .expect("Failed to create fakenews_api_predictions_total counter vec")
});

/// Histogram for prediction request durations in seconds.
pub static PREDICTION_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    register_histogram_vec!(
        "fakenews_api_prediction_duration_seconds",
        "Prediction durations in seconds",
        &["kind"],
        vec![0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to create prediction duration histogram")
});

/// Total number of completed model loads, labeled by fallback tier.
pub static MODEL_LOADS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "fakenews_api_model_loads_total",
        "Total number of completed model loads, labeled by source tier",
        &["source"]
    )
    .expect("Failed to create fakenews_api_model_loads_total counter vec")
});

/// Whether a model is currently loaded (0 or 1).
pub static MODEL_LOADED: LazyLock<IntGauge> = LazyLock::new(|| {
    register_int_gauge!(
        "fakenews_api_model_loaded",
        "Whether a model is currently loaded (0 or 1)"
    )
    .expect("Failed to create fakenews_api_model_loaded gauge")
});

/// Count one served prediction.
///
/// # Arguments
/// * `label` - The predicted class label
pub fn record_prediction(label: Label) {
    PREDICTIONS_TOTAL.with_label_values(&[label.as_str()]).inc();
}

/// Observe the duration of a prediction request
///
/// # Arguments
/// * `kind` - `"single"` or `"batch"`
/// * `duration_secs` - The duration of the request in seconds
pub fn observe_prediction_duration(kind: &str, duration_secs: f64) {
    PREDICTION_DURATION
        .with_label_values(&[kind])
        .observe(duration_secs);
}

/// Record a completed model load and mark the model as present.
///
/// # Arguments
/// * `source` - The fallback tier that produced the model
pub fn record_model_load(source: ModelSource) {
    MODEL_LOADS_TOTAL
        .with_label_values(&[&source.to_string()])
        .inc();
    MODEL_LOADED.set(1);
}

/// Axum handler that exports metrics in Prometheus text format
///
/// # Panics
///
/// This function will panic if:
/// - The metrics encoder fails to encode the metrics data
/// - The UTF-8 conversion of the encoded buffer fails
/// - The HTTP response builder fails to create the response
pub async fn metrics_handler() -> Response<String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];
    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, encoder.format_type())
        .body(String::from_utf8(buffer).expect("metrics buffer should be valid UTF-8"))
        .expect("Failed to create metrics response")
}
