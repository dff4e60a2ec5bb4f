// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Test helpers for jolokia-client integration tests
//!
//! This module provides:
//! - [`MockTransport`], an in-memory [`HttpTransport`] that records every
//!   request it receives and replays scripted agent payloads
//! - Constructors for clients wired to a mock transport

// Allow unused code - these helpers are infrastructure shared across test crates
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use jolokia_client::{Client, HttpRequest, HttpTransport, RequestOptions, TransportError};

/// In-memory transport: records every dispatched request and answers from a
/// scripted reply queue. When the queue is empty it returns a bare
/// `{"status": 200}` payload so polling tests do not have to script every tick.
pub struct MockTransport {
    requests: Mutex<Vec<HttpRequest>>,
    replies: Mutex<VecDeque<Result<Value, TransportError>>>,
    delay: Mutex<Option<Duration>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            replies: Mutex::new(VecDeque::new()),
            delay: Mutex::new(None),
        })
    }

    /// Queue a successful agent payload (single response object or bulk array).
    pub fn push_ok(&self, payload: Value) {
        self.replies.lock().unwrap().push_back(Ok(payload));
    }

    /// Queue a transport-level failure.
    pub fn push_err(&self, error: TransportError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    /// Make every subsequent reply wait this long before resolving.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Everything dispatched so far, in arrival order.
    pub fn recorded(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn perform(&self, request: HttpRequest) -> Result<Value, TransportError> {
        self.requests.lock().unwrap().push(request);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.replies.lock().unwrap().pop_front() {
            Some(reply) => reply,
            None => Ok(json!({"status": 200})),
        }
    }
}

/// Client whose dispatches land on `transport` instead of the network.
pub fn mock_client(transport: &Arc<MockTransport>, defaults: RequestOptions) -> Client {
    let transport: Arc<dyn HttpTransport> = transport.clone();
    Client::with_transport(defaults, transport)
}

/// A single successful read payload, the shape agents return for
/// `java.lang:type=Memory` heap queries.
pub fn heap_payload(used: u64) -> Value {
    json!({
        "status": 200,
        "timestamp": 1_591_176_365,
        "request": {"type": "read", "mbean": "java.lang:type=Memory", "attribute": "HeapMemoryUsage"},
        "value": {"init": 268_435_456, "committed": 514_850_816, "max": 3_817_865_216_u64, "used": used}
    })
}
