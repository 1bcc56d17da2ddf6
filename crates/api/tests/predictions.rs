// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the prediction endpoints
//!
//! The testing configuration points at a closed port, so every server here
//! comes up on the synthesized placeholder model. That model is fit on a
//! known corpus, which makes its predictions assertable.

use api::{Server, ServerConfig, ShutdownConfig};
use axum::http::StatusCode;
use serde_json::{Value, json};

async fn start_test_server() -> std::net::SocketAddr {
    let config = ServerConfig::for_testing();
    let shutdown_config = ShutdownConfig::default();
    let (addr, _) = Server::new(config, shutdown_config)
        .expect("Failed to create server")
        .run_for_testing()
        .await
        .expect("Failed to start test server");
    addr
}

#[tokio::test]
async fn predict_real_news() {
    let addr = start_test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{addr}/predict"))
        .json(&json!({"text": "This is real news"}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["prediction"], "real");

    let real = body["probabilities"]["real"].as_f64().expect("real prob");
    let fake = body["probabilities"]["fake"].as_f64().expect("fake prob");
    let confidence = body["confidence"].as_f64().expect("confidence");

    assert!(real > fake);
    assert!((real + fake - 1.0).abs() < 1e-6);
    assert!((confidence - real.max(fake)).abs() < 1e-9);
}

#[tokio::test]
async fn predict_fake_news() {
    let addr = start_test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{addr}/predict"))
        .json(&json!({"text": "This is fake news"}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["prediction"], "fake");
}

#[tokio::test]
async fn predict_empty_text_is_bad_request() {
    let addr = start_test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{addr}/predict"))
        .json(&json!({"text": "   "}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn predict_malformed_json_is_bad_request() {
    let addr = start_test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{addr}/predict"))
        .header("content-type", "application/json")
        .body(r#"{"text": "truncated"#)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn batch_over_limit_is_rejected_wholesale() {
    let addr = start_test_server().await;
    let client = reqwest::Client::new();

    let texts: Vec<String> = (0..101).map(|i| format!("news item {i}")).collect();
    let response = client
        .post(format!("http://{addr}/batch_predict"))
        .json(&json!({"texts": texts}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn batch_with_blank_item_returns_per_item_error() {
    let addr = start_test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{addr}/batch_predict"))
        .json(&json!({
            "texts": [
                "This is real news",
                "This is fake news",
                "",
                "Another real story",
                "one more fake story"
            ]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    let predictions = body["predictions"].as_array().expect("predictions array");
    assert_eq!(predictions.len(), 5);

    // Input order is preserved; only the blank item becomes an error entry.
    assert_eq!(predictions[0]["prediction"], "real");
    assert_eq!(predictions[2]["prediction"], "error");
    assert_eq!(predictions[2]["confidence"], 0.0);
    assert_eq!(predictions[2]["probabilities"]["real"], 0.0);
    assert_eq!(predictions[2]["probabilities"]["fake"], 0.0);
    for index in [0, 1, 3, 4] {
        assert_ne!(predictions[index]["prediction"], "error");
    }
}

#[tokio::test]
async fn health_reports_loaded_placeholder() {
    let addr = start_test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_loaded"], true);
    assert_eq!(body["model_source"], "synthesized");
}

#[tokio::test]
async fn model_info_exposes_provenance() {
    let addr = start_test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{addr}/model/info"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "loaded");
    assert_eq!(body["model_info"]["source"], "synthesized");
    assert_eq!(body["model_info"]["model_type"], "LogisticRegression");
}

#[tokio::test]
async fn reload_swaps_the_model() {
    let addr = start_test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{addr}/model/reload"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["source"], "synthesized");

    // Sequential reloads are always allowed; only concurrent ones conflict.
    let again = client
        .post(format!("http://{addr}/model/reload"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(again.status(), StatusCode::OK);
}

#[tokio::test]
async fn root_is_alive() {
    let addr = start_test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{addr}/"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn metrics_are_exposed() {
    let addr = start_test_server().await;
    let client = reqwest::Client::new();

    // Serve one prediction so the counters exist.
    client
        .post(format!("http://{addr}/predict"))
        .json(&json!({"text": "This is real news"}))
        .send()
        .await
        .expect("Failed to send request");

    let response = client
        .get(format!("http://{addr}/metrics"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.text().await.expect("Failed to read response");
    assert!(body.contains("fakenews_api_predictions_total"));
    assert!(body.contains("fakenews_api_model_loads_total"));
}
