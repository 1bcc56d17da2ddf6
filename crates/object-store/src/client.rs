// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! S3-compatible HTTP client
//!
//! Speaks the unauthenticated S3 REST dialect: buckets are path segments,
//! objects are whole-body PUT/GET, and listings come back as XML from
//! `?list-type=2`.

use std::{sync::LazyLock, time::Duration};

use regex::Regex;
use reqwest::{Client, StatusCode};
use tokio_retry::{
    RetryIf,
    strategy::{ExponentialBackoff, jitter},
};
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::error::{ObjectStoreError, ObjectStoreResult};

// Keys inside a ListObjectsV2 XML body. The listing format is stable enough
// that a full XML parser buys nothing here.
static LIST_KEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<Key>([^<]+)</Key>").expect("list key regex is valid"));

// ExponentialBackoff treats this as the exponent base: 10ms, 100ms, 1s, ...
const RETRY_BASE_DELAY_MS: u64 = 10;
const RETRY_MAX_DELAY: Duration = Duration::from_secs(2);

/// Configuration for the object store client
#[derive(Debug, Clone)]
pub struct ObjectStoreConfig {
    /// Base URL of the S3-compatible endpoint
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Maximum retry attempts for transient download failures
    pub max_retries: u32,
}

impl Default for ObjectStoreConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:4566".to_string(),
            timeout_seconds: 30,
            max_retries: 3,
        }
    }
}

/// Minimal S3-compatible object store client
#[derive(Debug, Clone)]
pub struct ObjectStoreClient {
    client: Client,
    base_url: String,
    config: ObjectStoreConfig,
}

impl ObjectStoreClient {
    /// Create a new client.
    ///
    /// Construction validates the endpoint URL but does not require the
    /// backend to be reachable; use [`ObjectStoreClient::check_connection`]
    /// for that.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectStoreError::InvalidEndpoint`] for a malformed
    /// endpoint and [`ObjectStoreError::Connection`] if the HTTP client
    /// cannot be built.
    pub fn new(config: ObjectStoreConfig) -> ObjectStoreResult<Self> {
        let url = Url::parse(&config.endpoint).map_err(|e| ObjectStoreError::InvalidEndpoint {
            message: format!("{}: {e}", config.endpoint),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ObjectStoreError::InvalidEndpoint {
                message: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("fake-news-api/0.1.0")
            .build()
            .map_err(|e| ObjectStoreError::Connection {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            config,
        })
    }

    /// Endpoint this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.base_url
    }

    fn bucket_url(&self, bucket: &str) -> String {
        format!("{}/{bucket}", self.base_url)
    }

    fn object_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{bucket}/{key}", self.base_url)
    }

    fn transport_error(&self, error: &reqwest::Error) -> ObjectStoreError {
        if error.is_timeout() {
            ObjectStoreError::Timeout {
                seconds: self.config.timeout_seconds,
            }
        } else {
            ObjectStoreError::Connection {
                message: error.to_string(),
            }
        }
    }

    async fn status_error(status: StatusCode, response: reqwest::Response) -> ObjectStoreError {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| status.to_string());
        ObjectStoreError::Storage {
            status: status.as_u16(),
            message,
        }
    }

    /// Probe whether the backend is reachable (ListBuckets on the root).
    ///
    /// # Errors
    ///
    /// Returns the connection or status failure; a successful return means
    /// the store answered.
    pub async fn check_connection(&self) -> ObjectStoreResult<()> {
        let url = format!("{}/", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        if status.is_success() {
            debug!(endpoint = %self.base_url, "object store reachable");
            Ok(())
        } else {
            Err(Self::status_error(status, response).await)
        }
    }

    /// Create a bucket. An already-existing bucket is success, not an error.
    pub async fn create_bucket(&self, bucket: &str) -> ObjectStoreResult<()> {
        let response = self
            .client
            .put(self.bucket_url(bucket))
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        if status.is_success() || status == StatusCode::CONFLICT {
            debug!(bucket, "bucket ready");
            Ok(())
        } else {
            Err(Self::status_error(status, response).await)
        }
    }

    /// Upload a whole object.
    pub async fn upload(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> ObjectStoreResult<()> {
        let response = self
            .client
            .put(self.object_url(bucket, key))
            .body(bytes)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        if status.is_success() {
            debug!(bucket, key, "object uploaded");
            Ok(())
        } else {
            Err(Self::status_error(status, response).await)
        }
    }

    /// Download a whole object.
    ///
    /// Transient failures (connection loss, timeouts, 5xx, 429) are retried
    /// with exponential backoff and jitter up to the configured attempt
    /// budget; a missing object fails immediately with
    /// [`ObjectStoreError::NotFound`].
    pub async fn download(&self, bucket: &str, key: &str) -> ObjectStoreResult<Vec<u8>> {
        let request_id = Uuid::new_v4();
        let retry_strategy = ExponentialBackoff::from_millis(RETRY_BASE_DELAY_MS)
            .max_delay(RETRY_MAX_DELAY)
            .map(jitter)
            .take(self.config.max_retries as usize);

        RetryIf::spawn(
            retry_strategy,
            || async {
                debug!(
                    request_id = %request_id,
                    bucket, key, "downloading object"
                );
                self.download_once(bucket, key).await
            },
            |error: &ObjectStoreError| {
                let transient = error.is_transient();
                if transient {
                    warn!(
                        request_id = %request_id,
                        bucket, key, %error, "transient download failure, will retry"
                    );
                }
                transient
            },
        )
        .await
    }

    async fn download_once(&self, bucket: &str, key: &str) -> ObjectStoreResult<Vec<u8>> {
        let response = self
            .client
            .get(self.object_url(bucket, key))
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        match response.status() {
            status if status.is_success() => {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| self.transport_error(&e))?;
                Ok(bytes.to_vec())
            }
            StatusCode::NOT_FOUND => Err(ObjectStoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }),
            status => Err(Self::status_error(status, response).await),
        }
    }

    /// List object keys under a prefix.
    ///
    /// A prefix that matches nothing yields an empty vector.
    pub async fn list(&self, bucket: &str, prefix: &str) -> ObjectStoreResult<Vec<String>> {
        let response = self
            .client
            .get(self.bucket_url(bucket))
            .query(&[("list-type", "2"), ("prefix", prefix)])
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(status, response).await);
        }

        let body = response.text().await.map_err(|e| self.transport_error(&e))?;
        if !body.contains("ListBucketResult") {
            return Err(ObjectStoreError::InvalidResponse {
                message: "missing ListBucketResult element".to_string(),
            });
        }

        let keys: Vec<String> = LIST_KEY_REGEX
            .captures_iter(&body)
            .map(|capture| capture[1].to_string())
            .collect();
        debug!(bucket, prefix, count = keys.len(), "listed objects");
        Ok(keys)
    }

    /// Delete a single object.
    pub async fn delete(&self, bucket: &str, key: &str) -> ObjectStoreResult<()> {
        let response = self
            .client
            .delete(self.object_url(bucket, key))
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        if status.is_success() {
            debug!(bucket, key, "object deleted");
            Ok(())
        } else {
            Err(Self::status_error(status, response).await)
        }
    }
}
