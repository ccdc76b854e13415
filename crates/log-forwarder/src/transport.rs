// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! HTTP transport used by the delivery engine.
//!
//! The delivery engine only sees the [`Transport`] trait. [`HttpTransport`]
//! is the production implementation backed by `reqwest`:
//!
//! - **HTTP/1.1 only**, matching what the log intake expects
//! - **Connect timeout**: 2s by default, configurable per appender
//! - **Request timeout**: 10s per attempt
//! - **Proxy**: optional HTTPS proxy; an invalid proxy URL falls back to a
//!   direct connection
//!
//! Appenders that do not customise timeout or proxy share one process-wide
//! client and therefore one connection pool.

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use tracing::error;

use crate::constants::{DEFAULT_CONNECT_TIMEOUT, REQUEST_TIMEOUT};
use crate::request::RequestDescriptor;
use crate::settings::DeliverySettings;

static SHARED_CLIENT: OnceCell<reqwest::Client> = OnceCell::new();

/// Status line and body of an intake response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

/// Sends one request and waits for its response.
///
/// Implementations must be safe to call concurrently from several deliveries.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &RequestDescriptor) -> Result<Response, TransportError>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        HttpTransport { client }
    }

    /// Transport over the process-wide client, created on first use.
    #[must_use]
    pub fn shared() -> Self {
        let client = SHARED_CLIENT
            .get_or_init(|| get_client(DEFAULT_CONNECT_TIMEOUT, None))
            .clone();
        HttpTransport { client }
    }

    /// Shared transport when the settings allow it, a dedicated one otherwise.
    #[must_use]
    pub fn for_settings(settings: &DeliverySettings) -> Self {
        if settings.uses_shared_client() {
            return Self::shared();
        }
        HttpTransport {
            client: get_client(settings.connect_timeout(), settings.https_proxy.as_deref()),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<Response, TransportError> {
        let response = self
            .client
            .post(&request.uri)
            .headers(request.headers.clone())
            .body(request.body.clone())
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(Response { status, body })
    }
}

fn get_client(connect_timeout: Duration, https_proxy: Option<&str>) -> reqwest::Client {
    match build_client(connect_timeout, https_proxy) {
        Ok(client) => client,
        Err(e) => {
            error!(
                "LOG FORWARDER | Unable to parse proxy configuration: {}, falling back to direct connection",
                e
            );
            match build_client(connect_timeout, None) {
                Ok(client) => client,
                Err(inner) => {
                    error!(
                        "LOG FORWARDER | Failed to build HTTP client without proxy: {}, using reqwest defaults",
                        inner
                    );
                    reqwest::Client::new()
                }
            }
        }
    }
}

fn build_client(
    connect_timeout: Duration,
    https_proxy: Option<&str>,
) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::Client::builder()
        .use_rustls_tls()
        .http1_only()
        .connect_timeout(connect_timeout)
        .timeout(REQUEST_TIMEOUT);
    if let Some(proxy) = https_proxy {
        builder = builder.proxy(reqwest::Proxy::https(proxy)?);
    }
    builder.build()
}
