// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Jolokia JMX-over-HTTP client
//!
//! This library talks to a Jolokia agent: it turns JMX operation
//! descriptors (read/write an MBean attribute, invoke an operation,
//! search, list, version) into HTTP requests and normalizes the agent's
//! JSON answers back into values or errors. It provides:
//!
//! - A [`Client`] dispatcher with convenience verbs for the six
//!   operations, protocol-correct GET/POST selection, and the agent's
//!   URL escaping rules
//! - A [`Poller`] that re-dispatches registered requests on a shared
//!   timer with start/stop/restart semantics
//! - An [`HttpTransport`] seam so the HTTP stack is injectable; a
//!   reqwest-backed implementation ships as the default
//!
//! # Reading an attribute
//!
//! ```ignore
//! use jolokia_client::Client;
//!
//! let client = Client::new("http://localhost:8778/jolokia")?;
//! let used = client
//!     .get("java.lang:type=Memory", Some("HeapMemoryUsage".into()), Some("used".into()), None)
//!     .await?;
//! println!("heap used: {used}");
//! ```
//!
//! # Bulk requests and proxy mode
//!
//! Anything beyond a simple single read goes through [`Client::request`]
//! with explicit descriptors; the dispatcher switches to POST on its own
//! when the protocol requires it:
//!
//! ```ignore
//! use jolokia_client::{Operation, ProxyTarget, Request};
//!
//! let descriptor = Request::new(Operation::Read {
//!     mbean: "java.lang:type=Memory".to_string(),
//!     attribute: Some("HeapMemoryUsage".into()),
//!     path: None,
//! })
//! .with_target(ProxyTarget::new("service:jmx:rmi:///jndi/rmi://backend:9999/jmxrmi"));
//!
//! let responses = client.request(descriptor, None).await?;
//! ```
//!
//! # Polling
//!
//! ```ignore
//! use std::time::Duration;
//! use jolokia_client::{Operation, Poller, RequestOptions};
//!
//! let poller = Poller::new(client);
//! poller.register(
//!     Operation::Read {
//!         mbean: "java.lang:type=Threading".to_string(),
//!         attribute: Some("ThreadCount".into()),
//!         path: None,
//!     },
//!     RequestOptions::new().on_success(|responses| {
//!         println!("threads: {:?}", responses[0].value);
//!     }),
//! );
//! poller.start(Duration::from_secs(5));
//! ```

pub mod client;
pub mod error;
pub mod options;
pub mod path;
pub mod poller;
pub mod request;
pub mod response;
pub mod transport;

pub use client::Client;
pub use error::JolokiaError;
pub use options::{ErrorHandler, MethodPolicy, ProcessingParams, RequestOptions, SuccessHandler};
pub use path::{escape, value_to_string};
pub use poller::{JobId, Poller};
pub use request::{Attribute, InnerPath, Operation, ProxyTarget, Request, RequestBatch};
pub use response::Response;
pub use transport::{HttpMethod, HttpRequest, HttpTransport, ReqwestTransport, TransportError};
