// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Request options
//!
//! [`RequestOptions`] is the one configuration object the dispatcher
//! understands. A client holds a defaults instance; each call may pass
//! another instance whose set fields shallow-override the defaults,
//! key by key.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::JolokiaError;
use crate::response::Response;

/// Success hook: called with the normalized response sequence before
/// the dispatch result resolves.
pub type SuccessHandler = Arc<dyn Fn(&[Response]) + Send + Sync>;

/// Error hook: called with the failure before it propagates. Only
/// failures from the transport boundary onward reach this hook;
/// configuration errors fail before dispatch and never do.
pub type ErrorHandler = Arc<dyn Fn(&JolokiaError) + Send + Sync>;

// =============================================================================
// Method policy
// =============================================================================

/// How to pick the HTTP method for a dispatch.
///
/// `Auto` (the default when unset) derives the method from the request
/// shape. An explicit `Get` is still refused when the request shape
/// makes GET protocol-illegal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodPolicy {
    Auto,
    Get,
    Post,
}

impl FromStr for MethodPolicy {
    type Err = JolokiaError;

    fn from_str(value: &str) -> Result<MethodPolicy, JolokiaError> {
        match value.to_ascii_lowercase().as_str() {
            "auto" => Ok(MethodPolicy::Auto),
            "get" => Ok(MethodPolicy::Get),
            "post" => Ok(MethodPolicy::Post),
            _ => Err(JolokiaError::UnsupportedMethod(value.to_string())),
        }
    }
}

impl fmt::Display for MethodPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MethodPolicy::Auto => "auto",
            MethodPolicy::Get => "get",
            MethodPolicy::Post => "post",
        };
        write!(f, "{}", name)
    }
}

// =============================================================================
// Processing parameters
// =============================================================================

/// Agent-side processing parameters.
///
/// The same set travels two ways: as the `config` section of a single
/// descriptor (JSON, camelCase) or extracted from the options into URL
/// query parameters for the whole dispatch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessingParams {
    /// Truncation depth for serialized return values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,
    /// Cap on collection sizes in serialized return values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_collection_size: Option<u32>,
    /// Overall cap on serialized objects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_objects: Option<u32>,
    /// Keep going when reading one attribute of a bulk/multi read fails
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_errors: Option<bool>,
    /// Canonicalize MBean property-list order in returned names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_naming: Option<bool>,
    /// Serialize exception values instead of only their message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serialize_exception: Option<bool>,
    /// Include stack traces in error responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_stack_trace: Option<bool>,
    /// Only answer when the agent state changed since this epoch-seconds
    /// instant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_modified_since: Option<i64>,
}

impl ProcessingParams {
    pub fn new() -> ProcessingParams {
        ProcessingParams::default()
    }

    pub fn max_depth(mut self, depth: u32) -> ProcessingParams {
        self.max_depth = Some(depth);
        self
    }

    pub fn max_collection_size(mut self, size: u32) -> ProcessingParams {
        self.max_collection_size = Some(size);
        self
    }

    pub fn max_objects(mut self, count: u32) -> ProcessingParams {
        self.max_objects = Some(count);
        self
    }

    pub fn ignore_errors(mut self, ignore: bool) -> ProcessingParams {
        self.ignore_errors = Some(ignore);
        self
    }

    pub fn canonical_naming(mut self, canonical: bool) -> ProcessingParams {
        self.canonical_naming = Some(canonical);
        self
    }

    pub fn serialize_exception(mut self, serialize: bool) -> ProcessingParams {
        self.serialize_exception = Some(serialize);
        self
    }

    pub fn include_stack_trace(mut self, include: bool) -> ProcessingParams {
        self.include_stack_trace = Some(include);
        self
    }

    pub fn if_modified_since(mut self, epoch_seconds: i64) -> ProcessingParams {
        self.if_modified_since = Some(epoch_seconds);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == ProcessingParams::default()
    }

    /// Set parameters as `(name, value)` query pairs, in declaration
    /// order, with the protocol's camelCase names.
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(depth) = self.max_depth {
            pairs.push(("maxDepth", depth.to_string()));
        }
        if let Some(size) = self.max_collection_size {
            pairs.push(("maxCollectionSize", size.to_string()));
        }
        if let Some(count) = self.max_objects {
            pairs.push(("maxObjects", count.to_string()));
        }
        if let Some(ignore) = self.ignore_errors {
            pairs.push(("ignoreErrors", ignore.to_string()));
        }
        if let Some(canonical) = self.canonical_naming {
            pairs.push(("canonicalNaming", canonical.to_string()));
        }
        if let Some(serialize) = self.serialize_exception {
            pairs.push(("serializeException", serialize.to_string()));
        }
        if let Some(include) = self.include_stack_trace {
            pairs.push(("includeStackTrace", include.to_string()));
        }
        if let Some(instant) = self.if_modified_since {
            pairs.push(("ifModifiedSince", instant.to_string()));
        }
        pairs
    }

    /// Field-wise merge; a field set here wins over the same field in
    /// `defaults`.
    pub(crate) fn merged_over(&self, defaults: &ProcessingParams) -> ProcessingParams {
        ProcessingParams {
            max_depth: self.max_depth.or(defaults.max_depth),
            max_collection_size: self.max_collection_size.or(defaults.max_collection_size),
            max_objects: self.max_objects.or(defaults.max_objects),
            ignore_errors: self.ignore_errors.or(defaults.ignore_errors),
            canonical_naming: self.canonical_naming.or(defaults.canonical_naming),
            serialize_exception: self.serialize_exception.or(defaults.serialize_exception),
            include_stack_trace: self.include_stack_trace.or(defaults.include_stack_trace),
            if_modified_since: self.if_modified_since.or(defaults.if_modified_since),
        }
    }
}

// =============================================================================
// Request options
// =============================================================================

/// Configuration for one dispatch, or the client-level defaults.
///
/// Every field is optional; unset fields fall back to the client
/// defaults at dispatch time. `headers` and `query` replace wholesale
/// rather than merging entry by entry, matching the shallow merge rule.
#[derive(Clone, Default)]
pub struct RequestOptions {
    /// Base URL of the agent (required by dispatch time)
    pub url: Option<String>,
    /// HTTP method selection; unset means auto-detect
    pub method: Option<MethodPolicy>,
    /// Basic-auth user; only takes effect together with `password`
    pub username: Option<String>,
    /// Basic-auth password; only takes effect together with `username`
    pub password: Option<String>,
    /// Extra HTTP headers; may override the derived Authorization header
    pub headers: Option<IndexMap<String, String>>,
    /// Per-request timeout handed to the transport
    pub timeout: Option<Duration>,
    /// Extra query parameters appended to the agent URL
    pub query: Option<IndexMap<String, String>>,
    /// Ask for JSONP delivery; only meaningful to transports embedded in
    /// a browser page, and illegal together with POST
    pub jsonp: Option<bool>,
    /// Processing parameters applied to the whole dispatch (sent as
    /// query parameters)
    pub processing: ProcessingParams,
    /// Success hook, see [`SuccessHandler`]
    pub on_success: Option<SuccessHandler>,
    /// Error hook, see [`ErrorHandler`]
    pub on_error: Option<ErrorHandler>,
}

impl RequestOptions {
    pub fn new() -> RequestOptions {
        RequestOptions::default()
    }

    pub fn url(mut self, url: impl Into<String>) -> RequestOptions {
        self.url = Some(url.into());
        self
    }

    pub fn method(mut self, method: MethodPolicy) -> RequestOptions {
        self.method = Some(method);
        self
    }

    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> RequestOptions {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> RequestOptions {
        self.headers.get_or_insert_with(IndexMap::new).insert(name.into(), value.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> RequestOptions {
        self.timeout = Some(timeout);
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> RequestOptions {
        self.query.get_or_insert_with(IndexMap::new).insert(name.into(), value.into());
        self
    }

    pub fn jsonp(mut self, jsonp: bool) -> RequestOptions {
        self.jsonp = Some(jsonp);
        self
    }

    pub fn processing(mut self, processing: ProcessingParams) -> RequestOptions {
        self.processing = processing;
        self
    }

    pub fn on_success<F>(mut self, handler: F) -> RequestOptions
    where
        F: Fn(&[Response]) + Send + Sync + 'static,
    {
        self.on_success = Some(Arc::new(handler));
        self
    }

    pub fn on_error<F>(mut self, handler: F) -> RequestOptions
    where
        F: Fn(&JolokiaError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(handler));
        self
    }

    /// Shallow merge: fields set here win, unset fields come from
    /// `defaults`.
    pub(crate) fn merged_over(&self, defaults: &RequestOptions) -> RequestOptions {
        RequestOptions {
            url: self.url.clone().or_else(|| defaults.url.clone()),
            method: self.method.or(defaults.method),
            username: self.username.clone().or_else(|| defaults.username.clone()),
            password: self.password.clone().or_else(|| defaults.password.clone()),
            headers: self.headers.clone().or_else(|| defaults.headers.clone()),
            timeout: self.timeout.or(defaults.timeout),
            query: self.query.clone().or_else(|| defaults.query.clone()),
            jsonp: self.jsonp.or(defaults.jsonp),
            processing: self.processing.merged_over(&defaults.processing),
            on_success: self.on_success.clone().or_else(|| defaults.on_success.clone()),
            on_error: self.on_error.clone().or_else(|| defaults.on_error.clone()),
        }
    }
}

impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("url", &self.url)
            .field("method", &self.method)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("headers", &self.headers)
            .field("timeout", &self.timeout)
            .field("query", &self.query)
            .field("jsonp", &self.jsonp)
            .field("processing", &self.processing)
            .field("on_success", &self.on_success.as_ref().map(|_| "<handler>"))
            .field("on_error", &self.on_error.as_ref().map(|_| "<handler>"))
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
