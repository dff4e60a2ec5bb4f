// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Request dispatcher
//!
//! [`Client`] turns operation descriptors into HTTP exchanges: it
//! merges options, picks GET or POST within the protocol's rules,
//! assembles URL/body/headers, delegates to the transport, and
//! normalizes the payload into [`Response`] values. The convenience
//! verbs (`get`, `set`, `execute`, ...) wrap all of that for the
//! single-request case and unwrap the lone response.
//!
//! Everything up to the transport call is synchronous and
//! side-effect-free; configuration problems and protocol-illegal
//! method combinations fail before any I/O.

use std::fmt;
use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use indexmap::IndexMap;
use serde_json::Value;

use crate::error::JolokiaError;
use crate::options::{MethodPolicy, RequestOptions};
use crate::path::{append_query_params, build_get_path};
use crate::request::{Attribute, InnerPath, Operation, Request, RequestBatch};
use crate::response::Response;
use crate::transport::{HttpMethod, HttpRequest, HttpTransport, ReqwestTransport, TransportError};

struct ClientInner {
    defaults: RequestOptions,
    transport: Arc<dyn HttpTransport>,
}

/// Dispatcher for agent operations.
///
/// Cloning is cheap; clones share the transport and the default
/// options.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl Client {
    /// Client for the agent at `url`, with the reqwest transport and
    /// no further defaults.
    pub fn new(url: impl Into<String>) -> Result<Client, JolokiaError> {
        Client::with_options(RequestOptions::new().url(url))
    }

    /// Client with explicit default options and the reqwest transport.
    pub fn with_options(defaults: RequestOptions) -> Result<Client, JolokiaError> {
        let transport = ReqwestTransport::new()?;
        Ok(Client::with_transport(defaults, Arc::new(transport)))
    }

    /// Client with explicit default options and an injected transport.
    pub fn with_transport(defaults: RequestOptions, transport: Arc<dyn HttpTransport>) -> Client {
        Client { inner: Arc::new(ClientInner { defaults, transport }) }
    }

    /// The client-level default options.
    pub fn options(&self) -> &RequestOptions {
        &self.inner.defaults
    }

    /// Dispatch one descriptor or a bulk sequence.
    ///
    /// Yields one [`Response`] per dispatched descriptor, in request
    /// order; a lone descriptor yields a one-element vector. Agent
    /// statuses are *not* interpreted here — a response with a non-200
    /// status is still an `Ok` element, exactly as the agent sent it.
    /// The merged options' success/error hooks fire before the result
    /// is returned; only failures from the transport boundary onward
    /// reach the error hook.
    pub async fn request(
        &self,
        requests: impl Into<RequestBatch>,
        options: Option<RequestOptions>,
    ) -> Result<Vec<Response>, JolokiaError> {
        let batch = requests.into();
        let merged = match &options {
            Some(per_call) => per_call.merged_over(&self.inner.defaults),
            None => self.inner.defaults.clone(),
        };

        let assembled = assemble(&batch, &merged)?;
        tracing::debug!(
            method = %assembled.method,
            url = %assembled.url,
            "Dispatching agent request"
        );

        let result = match self.inner.transport.perform(assembled).await {
            Ok(payload) => parse_responses(payload),
            Err(error) => Err(JolokiaError::Transport(error)),
        };
        match &result {
            Ok(responses) => {
                if let Some(handler) = &merged.on_success {
                    handler(responses);
                }
            }
            Err(error) => {
                if let Some(handler) = &merged.on_error {
                    handler(error);
                }
            }
        }
        result
    }

    /// Read an attribute (or all attributes, when `attribute` is
    /// `None`) of an MBean.
    pub async fn get(
        &self,
        mbean: &str,
        attribute: Option<Attribute>,
        path: Option<InnerPath>,
        options: Option<RequestOptions>,
    ) -> Result<Value, JolokiaError> {
        let request = Request::new(Operation::Read {
            mbean: mbean.to_string(),
            attribute,
            path,
        });
        first_value(self.request(request, options).await?)
    }

    /// Set an attribute; resolves to the attribute's previous value.
    pub async fn set(
        &self,
        mbean: &str,
        attribute: &str,
        value: Value,
        path: Option<InnerPath>,
        options: Option<RequestOptions>,
    ) -> Result<Value, JolokiaError> {
        let request = Request::new(Operation::Write {
            mbean: mbean.to_string(),
            attribute: attribute.to_string(),
            value,
            path,
        });
        first_value(self.request(request, options).await?)
    }

    /// Invoke an MBean operation; resolves to its return value.
    pub async fn execute(
        &self,
        mbean: &str,
        operation: &str,
        arguments: Vec<Value>,
        options: Option<RequestOptions>,
    ) -> Result<Value, JolokiaError> {
        let request = Request::new(Operation::Exec {
            mbean: mbean.to_string(),
            operation: operation.to_string(),
            arguments,
        });
        first_value(self.request(request, options).await?)
    }

    /// Find MBean names matching an object-name pattern.
    pub async fn search(
        &self,
        pattern: &str,
        options: Option<RequestOptions>,
    ) -> Result<Value, JolokiaError> {
        let request = Request::new(Operation::Search { mbean: pattern.to_string() });
        first_value(self.request(request, options).await?)
    }

    /// Agent version and capability information.
    pub async fn version(&self, options: Option<RequestOptions>) -> Result<Value, JolokiaError> {
        first_value(self.request(Request::new(Operation::Version), options).await?)
    }

    /// List MBean metadata, optionally below an inner path.
    pub async fn list(
        &self,
        path: Option<InnerPath>,
        options: Option<RequestOptions>,
    ) -> Result<Value, JolokiaError> {
        let request = Request::new(Operation::List { path });
        first_value(self.request(request, options).await?)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").field("defaults", &self.inner.defaults).finish()
    }
}

// =============================================================================
// Assembly
// =============================================================================

/// Resolve the effective HTTP method. An unset or `auto` policy derives
/// it from the batch shape; an explicit `get` is still refused when the
/// shape makes GET illegal.
fn resolve_method(
    batch: &RequestBatch,
    policy: Option<MethodPolicy>,
) -> Result<HttpMethod, JolokiaError> {
    let method = match policy {
        None | Some(MethodPolicy::Auto) => {
            if batch.requires_post() {
                HttpMethod::Post
            } else {
                HttpMethod::Get
            }
        }
        Some(MethodPolicy::Get) => HttpMethod::Get,
        Some(MethodPolicy::Post) => HttpMethod::Post,
    };
    if method == HttpMethod::Get {
        refuse_illegal_get(batch)?;
    }
    Ok(method)
}

fn refuse_illegal_get(batch: &RequestBatch) -> Result<(), JolokiaError> {
    let request = match batch {
        RequestBatch::Bulk(_) => return Err(JolokiaError::GetWithBulk),
        RequestBatch::Single(request) => request,
    };
    if let Operation::Read { attribute: Some(attribute), .. } = &request.operation {
        if attribute.is_multiple() {
            return Err(JolokiaError::GetWithMultipleAttributes);
        }
    }
    if request.target.is_some() {
        return Err(JolokiaError::GetWithProxyTarget);
    }
    if request.config.is_some() {
        return Err(JolokiaError::GetWithConfig);
    }
    Ok(())
}

/// Turn a batch plus merged options into a transportable request.
/// Pure; every failure here is a configuration or protocol error
/// raised before any I/O.
fn assemble(batch: &RequestBatch, options: &RequestOptions) -> Result<HttpRequest, JolokiaError> {
    let base = match options.url.as_deref() {
        Some(url) if !url.is_empty() => url,
        _ => return Err(JolokiaError::MissingUrl),
    };
    let method = resolve_method(batch, options.method)?;
    if method == HttpMethod::Post && options.jsonp.unwrap_or(false) {
        return Err(JolokiaError::JsonpWithPost);
    }

    // Exactly one trailing slash on the base, whatever was configured.
    let mut url = format!("{}/", base.trim_end_matches('/'));

    let body = match method {
        HttpMethod::Get => {
            // refuse_illegal_get already rejected bulk batches.
            if let Some(request) = batch.as_single() {
                url.push_str(&build_get_path(request));
            }
            None
        }
        HttpMethod::Post => Some(serde_json::to_string(batch)?),
    };

    // Processing params first, then the caller's own query entries.
    let mut pairs: Vec<(String, String)> = options
        .processing
        .query_pairs()
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();
    if let Some(query) = &options.query {
        pairs.extend(query.iter().map(|(name, value)| (name.clone(), value.clone())));
    }
    let url = append_query_params(&url, &pairs);

    let mut headers = IndexMap::new();
    let mut with_credentials = false;
    if let (Some(username), Some(password)) = (&options.username, &options.password) {
        let credentials = format!("{}:{}", username, password);
        let encoded = STANDARD.encode(credentials.as_bytes());
        headers.insert("Authorization".to_string(), format!("Basic {}", encoded));
        with_credentials = true;
    }
    if let Some(extra) = &options.headers {
        for (name, value) in extra {
            headers.insert(name.clone(), value.clone());
        }
    }

    Ok(HttpRequest {
        method,
        url,
        headers,
        body,
        timeout: options.timeout,
        with_credentials,
    })
}

/// Normalize the transport payload into the response sequence: a bare
/// object wraps into a one-element vector, an array maps element-wise.
fn parse_responses(payload: Value) -> Result<Vec<Response>, JolokiaError> {
    let items = match payload {
        Value::Array(items) => items,
        single => vec![single],
    };
    items
        .into_iter()
        .map(|item| {
            serde_json::from_value::<Response>(item)
                .map_err(|error| JolokiaError::Transport(TransportError::MalformedJson(error)))
        })
        .collect()
}

/// Convenience-verb result policy: the first response's value on
/// status 200, the full response as the failure otherwise.
fn first_value(responses: Vec<Response>) -> Result<Value, JolokiaError> {
    let response = match responses.into_iter().next() {
        Some(response) => response,
        None => return Err(JolokiaError::EmptyResponse),
    };
    if response.is_error() {
        return Err(JolokiaError::Agent(Box::new(response)));
    }
    Ok(response.value.unwrap_or(Value::Null))
}

// =============================================================================
// Tests
// =============================================================================
