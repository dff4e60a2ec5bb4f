// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! HTTP transport seam
//!
//! The dispatcher performs no I/O itself; it assembles an
//! [`HttpRequest`] and hands it to an injected [`HttpTransport`]. The
//! crate ships one production implementation backed by reqwest;
//! anything else (test doubles, browser bridges, socket tunnels) is a
//! matter of implementing the one-method trait.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use thiserror::Error;

/// Overall timeout applied by the reqwest transport when a request
/// carries no timeout of its own.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Wire method; the protocol only ever uses these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

/// A fully assembled agent request, ready for a transport.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Complete URL: base, GET path, and query string already composed
    pub url: String,
    /// Headers in assembly order, Authorization (if any) first
    pub headers: IndexMap<String, String>,
    /// JSON body; present exactly for POST dispatches
    pub body: Option<String>,
    /// Per-request timeout; enforcement is the transport's job
    pub timeout: Option<Duration>,
    /// True when basic-auth credentials were applied; transports that
    /// distinguish credentialed cross-origin requests honor this, the
    /// reqwest transport has no use for it
    pub with_credentials: bool,
}

/// Failures at or below the HTTP exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, TLS, or protocol failure from the HTTP stack
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered outside the 2xx range; the payload is not
    /// a protocol response and is discarded
    #[error("HTTP status {0}")]
    Status(u16),

    /// The payload was not parseable JSON
    #[error("Malformed JSON payload: {0}")]
    MalformedJson(#[from] serde_json::Error),

    /// Escape hatch for custom transport implementations
    #[error("{0}")]
    Other(String),
}

/// The one I/O capability the dispatcher depends on: perform an HTTP
/// exchange and hand back the parsed JSON payload.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn perform(&self, request: HttpRequest) -> Result<Value, TransportError>;
}

/// Production transport backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport with its own connection pool, a default
    /// timeout, and JSON accept headers.
    pub fn new() -> Result<ReqwestTransport, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(concat!("jolokia-client/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;
        Ok(ReqwestTransport { client })
    }

    /// Wrap an existing client, keeping its pool and defaults.
    pub fn with_client(client: reqwest::Client) -> ReqwestTransport {
        ReqwestTransport { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn perform(&self, request: HttpRequest) -> Result<Value, TransportError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                url = %request.url,
                "Agent endpoint returned non-success HTTP status"
            );
            return Err(TransportError::Status(status.as_u16()));
        }

        let payload = response.text().await?;
        Ok(serde_json::from_str(&payload)?)
    }
}
