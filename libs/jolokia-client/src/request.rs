// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Operation descriptors
//!
//! A [`Request`] describes one JMX operation against the agent. Its JSON
//! form is exactly the protocol's POST body: the operation kind is the
//! `type` tag, and the optional `config`/`target` sections sit next to
//! the operation fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::options::ProcessingParams;

// =============================================================================
// Operations
// =============================================================================

/// The JMX operation to perform, tagged on the wire as `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Operation {
    /// Read one attribute, several attributes, or the whole MBean
    Read {
        /// MBean object name, e.g. `java.lang:type=Memory`
        mbean: String,
        /// Attribute(s) to read; absent means every attribute
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attribute: Option<Attribute>,
        /// Path into the returned value
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<InnerPath>,
    },
    /// Set an attribute to a new value
    Write {
        mbean: String,
        attribute: String,
        value: Value,
        /// Path into the attribute for partial updates
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<InnerPath>,
    },
    /// Invoke an MBean operation
    Exec {
        mbean: String,
        /// Operation name, optionally with a signature for overloaded
        /// operations, e.g. `gc` or `loadUsers(int,java.lang.String)`
        operation: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        arguments: Vec<Value>,
    },
    /// Find MBeans matching an object-name pattern
    Search { mbean: String },
    /// List metadata of registered MBeans
    List {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<InnerPath>,
    },
    /// Agent and protocol version information
    Version,
}

impl Operation {
    /// Lower-case operation tag; doubles as the first GET path segment.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Read { .. } => "read",
            Operation::Write { .. } => "write",
            Operation::Exec { .. } => "exec",
            Operation::Search { .. } => "search",
            Operation::List { .. } => "list",
            Operation::Version => "version",
        }
    }
}

/// One descriptor: an operation plus the optional request-scoped
/// sections every operation kind may carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    #[serde(flatten)]
    pub operation: Operation,
    /// Processing parameters scoped to this request (forces POST)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ProcessingParams>,
    /// Proxy-mode target: the agent forwards the operation to this
    /// remote JMX endpoint (forces POST)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<ProxyTarget>,
}

impl Request {
    pub fn new(operation: Operation) -> Request {
        Request { operation, config: None, target: None }
    }

    pub fn with_config(mut self, config: ProcessingParams) -> Request {
        self.config = Some(config);
        self
    }

    pub fn with_target(mut self, target: ProxyTarget) -> Request {
        self.target = Some(target);
        self
    }

    /// True when the protocol only admits this descriptor over POST.
    pub fn requires_post(&self) -> bool {
        if self.config.is_some() || self.target.is_some() {
            return true;
        }
        matches!(
            &self.operation,
            Operation::Read { attribute: Some(attribute), .. } if attribute.is_multiple()
        )
    }
}

/// Remote JMX endpoint for proxy-mode dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyTarget {
    /// JMX service URL of the real target, e.g.
    /// `service:jmx:rmi:///jndi/rmi://host:9999/jmxrmi`
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ProxyTarget {
    pub fn new(url: impl Into<String>) -> ProxyTarget {
        ProxyTarget { url: url.into(), user: None, password: None }
    }
}

// =============================================================================
// One-or-many helpers
// =============================================================================

/// Attribute selector for reads: one attribute name or several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Attribute {
    Single(String),
    Multiple(Vec<String>),
}

impl Attribute {
    /// A multi-attribute read is only expressible as a POST.
    pub fn is_multiple(&self) -> bool {
        matches!(self, Attribute::Multiple(_))
    }

    /// GET path segment form: a scalar name as-is, several names
    /// comma-joined.
    pub(crate) fn as_segment(&self) -> String {
        match self {
            Attribute::Single(name) => name.clone(),
            Attribute::Multiple(names) => names.join(","),
        }
    }
}

impl From<&str> for Attribute {
    fn from(name: &str) -> Attribute {
        Attribute::Single(name.to_string())
    }
}

impl From<String> for Attribute {
    fn from(name: String) -> Attribute {
        Attribute::Single(name)
    }
}

impl From<Vec<String>> for Attribute {
    fn from(names: Vec<String>) -> Attribute {
        Attribute::Multiple(names)
    }
}

impl From<Vec<&str>> for Attribute {
    fn from(names: Vec<&str>) -> Attribute {
        Attribute::Multiple(names.into_iter().map(String::from).collect())
    }
}

/// Path into a value returned by the agent.
///
/// The raw form is used verbatim in GET URLs (minus one leading slash)
/// and must arrive pre-escaped; the segment form is escaped here,
/// segment by segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InnerPath {
    Raw(String),
    Segments(Vec<String>),
}

impl From<&str> for InnerPath {
    fn from(path: &str) -> InnerPath {
        InnerPath::Raw(path.to_string())
    }
}

impl From<String> for InnerPath {
    fn from(path: String) -> InnerPath {
        InnerPath::Raw(path)
    }
}

impl From<Vec<String>> for InnerPath {
    fn from(segments: Vec<String>) -> InnerPath {
        InnerPath::Segments(segments)
    }
}

impl From<Vec<&str>> for InnerPath {
    fn from(segments: Vec<&str>) -> InnerPath {
        InnerPath::Segments(segments.into_iter().map(String::from).collect())
    }
}

// =============================================================================
// Batching
// =============================================================================

/// What one dispatch sends: a lone descriptor or a bulk sequence.
///
/// The distinction is wire-visible. A lone descriptor may go out as a
/// GET and posts as a JSON object; a bulk sequence always posts, as a
/// JSON array, even when it holds a single descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestBatch {
    Single(Request),
    Bulk(Vec<Request>),
}

impl RequestBatch {
    /// True when the protocol only admits this batch over POST.
    pub fn requires_post(&self) -> bool {
        match self {
            RequestBatch::Single(request) => request.requires_post(),
            RequestBatch::Bulk(_) => true,
        }
    }

    /// The lone descriptor, when this is not a bulk batch.
    pub fn as_single(&self) -> Option<&Request> {
        match self {
            RequestBatch::Single(request) => Some(request),
            RequestBatch::Bulk(_) => None,
        }
    }
}

impl From<Request> for RequestBatch {
    fn from(request: Request) -> RequestBatch {
        RequestBatch::Single(request)
    }
}

impl From<Operation> for RequestBatch {
    fn from(operation: Operation) -> RequestBatch {
        RequestBatch::Single(Request::new(operation))
    }
}

impl From<Vec<Request>> for RequestBatch {
    fn from(requests: Vec<Request>) -> RequestBatch {
        RequestBatch::Bulk(requests)
    }
}

// =============================================================================
// Tests
// =============================================================================
