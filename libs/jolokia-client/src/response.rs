// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Agent responses

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One agent response, positionally aligned with the dispatched
/// request sequence.
///
/// Deserialization is deliberately lenient: agents across versions add
/// fields, and error responses omit most of them. A missing `status`
/// deserializes as `0`, which counts as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Agent status code for this operation; 200 is the only success
    /// value
    #[serde(default)]
    pub status: u16,
    /// Operation result; absent on errors and for void operations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Agent-side completion time, epoch seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// The descriptor this response answers, as the agent echoed it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<Value>,
    /// Error message for non-200 statuses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Server-side stack trace, when the agent is configured to send one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacktrace: Option<String>,
}

impl Response {
    /// True unless the agent reported status 200. An absent status is
    /// an error.
    pub fn is_error(&self) -> bool {
        self.status != 200
    }
}
