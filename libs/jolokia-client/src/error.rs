// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Error types for jolokia-client

use thiserror::Error;

use crate::response::Response;
use crate::transport::TransportError;

/// Errors surfaced by the dispatcher and poller.
///
/// Configuration errors and protocol-illegal combinations are raised
/// before any I/O happens; `Transport` and `Agent` arrive through the
/// async failure path after the agent was contacted.
#[derive(Debug, Error)]
pub enum JolokiaError {
    /// No agent URL was configured (neither in the client defaults nor
    /// in the per-call options)
    #[error("Agent URL is missing")]
    MissingUrl,

    /// The method string is not one of get/post/auto
    #[error("Unsupported request method: {0}")]
    UnsupportedMethod(String),

    /// A bulk request cannot be sent as a GET
    #[error("Cannot use GET with bulk requests")]
    GetWithBulk,

    /// A read of multiple attributes cannot be sent as a GET
    #[error("Cannot use GET for reading multiple attributes")]
    GetWithMultipleAttributes,

    /// A proxy-mode request cannot be sent as a GET
    #[error("Cannot use GET with proxy mode")]
    GetWithProxyTarget,

    /// A request carrying its own processing config cannot be sent as
    /// a GET
    #[error("Cannot use GET with request-specific config")]
    GetWithConfig,

    /// JSONP delivery only works for GET requests
    #[error("JSONP is not supported with POST requests")]
    JsonpWithPost,

    /// The request body could not be serialized
    #[error("Failed to encode request body: {0}")]
    BodyEncode(#[from] serde_json::Error),

    /// The HTTP exchange itself failed (network error, non-success
    /// status, unparseable payload)
    #[error("Transport failed: {0}")]
    Transport(#[from] TransportError),

    /// The agent answered, but reported a non-200 status for the
    /// operation; the full response is attached
    #[error("Agent returned status {}: {}", .0.status, .0.error.as_deref().unwrap_or("(no error text)"))]
    Agent(Box<Response>),

    /// The agent answered a single request with an empty response array
    #[error("Agent returned an empty response set")]
    EmptyResponse,

    /// `unregister` was called with an id no registered job has
    #[error("Invalid job ID: {0}")]
    UnknownJob(String),
}

impl JolokiaError {
    /// The agent response attached to an `Agent` error, if that is what
    /// this error is.
    pub fn agent_response(&self) -> Option<&Response> {
        match self {
            JolokiaError::Agent(response) => Some(response),
            _ => None,
        }
    }
}
