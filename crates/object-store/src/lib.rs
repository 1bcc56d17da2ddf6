// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Minimal S3-compatible object storage client
//!
//! This crate provides the storage access layer for model artifacts. It
//! speaks the plain S3 REST dialect (as served by LocalStack or any
//! S3-compatible endpoint) over `reqwest`, without authentication, and
//! reports every failure as a typed [`ObjectStoreError`].
//!
//! Nothing is swallowed here: deciding which storage failures are survivable
//! is the model loader's job, one layer up.
//!
//! # Operations
//!
//! - **`check_connection`**: deterministic reachability probe
//! - **`create_bucket`**: idempotent bucket creation ("already exists" is
//!   success)
//! - **`upload` / `download`**: whole-object transfer; downloads retry
//!   transient failures with exponential backoff
//! - **`list`**: keys under a prefix; an empty listing is an empty vector,
//!   not an error
//! - **`delete`**: single-object removal

pub mod client;
pub mod error;

pub use client::{ObjectStoreClient, ObjectStoreConfig};
pub use error::{ObjectStoreError, ObjectStoreResult};
