// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Fake News Detector API Server Implementation
//!
//! This crate provides the HTTP server for the fake news detection service,
//! built with Axum and designed for production use with comprehensive
//! configuration, middleware, and graceful shutdown capabilities.
//!
//! # Module Structure
//!
//! - [`config`]: Server configuration and environment management with hierarchical loading
//! - [`error`]: Error types and HTTP response handling with proper status codes
//! - [`state`]: Shared application state holding the injected model state handle
//! - [`server`]: Main server implementation, startup model load, and coordinated shutdown
//! - [`routes`]: Route configuration and HTTP request handlers
//! - [`extractors`]: JSON extraction with detailed parse error messages
//! - [`middleware`]: Rate limiting and cross-cutting concerns
//! - [`metrics`]: Prometheus metrics and exposition handler
//! - [`openapi`]: `OpenAPI` specification and Swagger UI endpoints
//!
//! # Key Features
//!
//! - **Resilient Model Loading**: Remote storage, local disk, and synthesized
//!   placeholder tiers behind one loader, with provenance on every load
//! - **Safe Concurrent Serving**: Predictions read atomic model snapshots;
//!   reloads swap the model without tearing in-flight requests
//! - **Graceful Shutdown**: Coordinated termination using `CancellationToken`
//! - **Rate Limiting**: IP-based request limiting with configurable requests per minute
//! - **Observability**: Request tracing, request IDs, and Prometheus metrics

pub mod config;
pub mod docs;
pub mod error;
pub mod extractors;
pub mod metrics;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{Environment, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use server::{Server, ShutdownConfig};
pub use state::{HealthCheck, HealthStatus, ServerState};
