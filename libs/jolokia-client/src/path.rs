// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Protocol text encoding: path-segment escaping, value formatting,
//! and GET path construction.
//!
//! The agent's REST dialect packs MBean names, attributes, and
//! arguments into URL path segments. `!` is the protocol's quote
//! character: reserved characters are `!`-prefixed first, then the
//! segment is percent-encoded. Escaping is strictly per segment;
//! escaping an already-joined path would corrupt the quoting.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;

use crate::request::{InnerPath, Operation, Request};

/// Percent-encode set equivalent to JavaScript's `encodeURIComponent`,
/// which the agent's URL decoding is calibrated against. In particular
/// `!` must pass through unencoded or the quoting above stops working.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Escape one path segment: quote the reserved characters (`!`, `/`,
/// `"`) with `!`, then percent-encode the result.
pub fn escape(segment: &str) -> String {
    let mut quoted = String::with_capacity(segment.len());
    for ch in segment.chars() {
        if matches!(ch, '!' | '/' | '"') {
            quoted.push('!');
        }
        quoted.push(ch);
    }
    utf8_percent_encode(&quoted, URI_COMPONENT).to_string()
}

/// Format a JSON value for use inside a GET path.
///
/// `null` becomes the literal `[null]` and an empty string a pair of
/// double quotes, so both survive as non-empty path segments. Arrays
/// format element-wise and join with `,`. Everything else uses its
/// natural text form (objects as JSON text).
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => "[null]".to_string(),
        Value::String(text) if text.is_empty() => "\"\"".to_string(),
        Value::String(text) => text.clone(),
        Value::Array(items) => {
            items.iter().map(value_to_string).collect::<Vec<_>>().join(",")
        }
        other => other.to_string(),
    }
}

/// Build the GET path for one descriptor: the operation tag followed by
/// the operation's segments, each escaped, then the suffix path.
///
/// The suffix is the one part not escaped here when given in raw form;
/// a raw suffix arrives pre-escaped and only loses a single leading
/// `/`. Segment-form suffixes are escaped per segment. The result never
/// starts with `/` and ends with `/` exactly when the suffix is empty.
pub fn build_get_path(request: &Request) -> String {
    let mut segments: Vec<String> = vec![request.operation.name().to_string()];
    let mut suffix: Option<&InnerPath> = None;

    match &request.operation {
        Operation::Read { mbean, attribute: Some(attribute), path } => {
            segments.push(mbean.clone());
            segments.push(attribute.as_segment());
            suffix = path.as_ref();
        }
        Operation::Read { mbean, attribute: None, .. } => {
            segments.push(mbean.clone());
        }
        Operation::Write { mbean, attribute, value, path } => {
            segments.push(mbean.clone());
            segments.push(attribute.clone());
            segments.push(value_to_string(value));
            suffix = path.as_ref();
        }
        Operation::Exec { mbean, operation, arguments } => {
            segments.push(mbean.clone());
            segments.push(operation.clone());
            segments.extend(arguments.iter().map(value_to_string));
        }
        Operation::Search { mbean } => {
            segments.push(mbean.clone());
        }
        Operation::List { path } => {
            suffix = path.as_ref();
        }
        Operation::Version => {}
    }

    let joined = segments.iter().map(|s| escape(s)).collect::<Vec<_>>().join("/");
    let suffix = match suffix {
        None => String::new(),
        Some(InnerPath::Raw(path)) => path.strip_prefix('/').unwrap_or(path).to_string(),
        Some(InnerPath::Segments(parts)) => {
            parts.iter().map(|s| escape(s)).collect::<Vec<_>>().join("/")
        }
    };
    format!("{}/{}", joined, suffix)
}

/// Append query parameters to a URL. When the URL already carries a
/// `?`, the new parameters slot in right behind it, ahead of the
/// existing query string.
pub(crate) fn append_query_params(url: &str, pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        return url.to_string();
    }
    let encoded = pairs
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("&");
    match url.find('?') {
        Some(index) => format!("{}?{}&{}", &url[..index], encoded, &url[index + 1..]),
        None => format!("{}?{}", url, encoded),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::request::Attribute;
    use serde_json::json;

    #[test]
    fn test_escape_quotes_exclamation_marks() {
        assert_eq!(escape("bean:some!weird!bean!"), "bean%3Asome!!weird!!bean!!");
    }

    #[test]
    fn test_escape_quotes_slashes() {
        assert_eq!(escape("bean:some/weird/bean/"), "bean%3Asome!%2Fweird!%2Fbean!%2F");
    }

    #[test]
    fn test_escape_quotes_double_quotes() {
        assert_eq!(escape(r#"name="x""#), "name%3D!%22x!%22");
    }

    #[test]
    fn test_escape_keeps_uri_component_survivors() {
        // The characters encodeURIComponent leaves alone must survive
        // here too; the agent decodes with the same expectations.
        assert_eq!(escape("a-b_c.d~e*f'g(h)i"), "a-b_c.d~e*f'g(h)i");
        assert_eq!(escape("java.lang:type=*"), "java.lang%3Atype%3D*");
    }

    #[test]
    fn test_value_to_string_null() {
        assert_eq!(value_to_string(&Value::Null), "[null]");
    }

    #[test]
    fn test_value_to_string_empty_string() {
        assert_eq!(value_to_string(&json!("")), "\"\"");
    }

    #[test]
    fn test_value_to_string_array_element_wise() {
        assert_eq!(value_to_string(&json!(["a", "", null])), "a,\"\",[null]");
    }

    #[test]
    fn test_value_to_string_scalars() {
        assert_eq!(value_to_string(&json!(756)), "756");
        assert_eq!(value_to_string(&json!(true)), "true");
        assert_eq!(value_to_string(&json!("all")), "all");
    }

    fn read(mbean: &str, attribute: Option<Attribute>, path: Option<InnerPath>) -> Request {
        Request::new(Operation::Read { mbean: mbean.to_string(), attribute, path })
    }

    #[test]
    fn test_read_path_with_attribute() {
        let request = read("java.lang:type=Memory", Some("used".into()), None);
        assert_eq!(build_get_path(&request), "read/java.lang%3Atype%3DMemory/used/");
    }

    #[test]
    fn test_read_path_without_attribute_ignores_inner_path() {
        let request = read("java.lang:type=Memory", None, Some("some/path".into()));
        assert_eq!(build_get_path(&request), "read/java.lang%3Atype%3DMemory/");
    }

    #[test]
    fn test_read_path_keeps_raw_suffix_verbatim() {
        let request = read("java.lang:type=Memory", Some("used".into()), Some("some/path".into()));
        assert_eq!(build_get_path(&request), "read/java.lang%3Atype%3DMemory/used/some/path");
    }

    #[test]
    fn test_read_path_strips_one_leading_slash_from_raw_suffix() {
        let request = read("java.lang:type=Memory", Some("used".into()), Some("/some/path".into()));
        assert_eq!(build_get_path(&request), "read/java.lang%3Atype%3DMemory/used/some/path");
    }

    #[test]
    fn test_read_path_escapes_segment_suffix() {
        let request = read(
            "java.lang:type=Memory",
            Some("used".into()),
            Some(vec!["with space", "a/b"].into()),
        );
        assert_eq!(
            build_get_path(&request),
            "read/java.lang%3Atype%3DMemory/used/with%20space/a!%2Fb"
        );
    }

    #[test]
    fn test_write_path_formats_value_then_escapes_once() {
        let request = Request::new(Operation::Write {
            mbean: "java.lang:type=Memory".to_string(),
            attribute: "used".to_string(),
            value: json!(756),
            path: None,
        });
        assert_eq!(build_get_path(&request), "write/java.lang%3Atype%3DMemory/used/756/");
    }

    #[test]
    fn test_write_path_escapes_value_segment() {
        // A value containing a slash is 'valueToString'ed first and then
        // escaped exactly once, together with the other segments.
        let request = Request::new(Operation::Write {
            mbean: "java.lang:type=Memory".to_string(),
            attribute: "dir".to_string(),
            value: json!("/tmp/x"),
            path: None,
        });
        assert_eq!(
            build_get_path(&request),
            "write/java.lang%3Atype%3DMemory/dir/!%2Ftmp!%2Fx/"
        );
    }

    #[test]
    fn test_exec_path_appends_formatted_arguments() {
        let request = Request::new(Operation::Exec {
            mbean: "java.lang:type=Memory".to_string(),
            operation: "clear".to_string(),
            arguments: vec![json!("all"), json!("the"), json!("memory")],
        });
        assert_eq!(
            build_get_path(&request),
            "exec/java.lang%3Atype%3DMemory/clear/all/the/memory/"
        );
    }

    #[test]
    fn test_exec_path_joins_array_argument_with_commas() {
        let request = Request::new(Operation::Exec {
            mbean: "java.lang:type=Threading".to_string(),
            operation: "dumpThreads".to_string(),
            arguments: vec![json!([1, 2, 3])],
        });
        assert_eq!(
            build_get_path(&request),
            "exec/java.lang%3Atype%3DThreading/dumpThreads/1%2C2%2C3/"
        );
    }

    #[test]
    fn test_search_path() {
        let request = Request::new(Operation::Search { mbean: "java.lang:type=*".to_string() });
        assert_eq!(build_get_path(&request), "search/java.lang%3Atype%3D*/");
    }

    #[test]
    fn test_list_path_is_type_plus_suffix() {
        let request = Request::new(Operation::List { path: Some("some/path".into()) });
        assert_eq!(build_get_path(&request), "list/some/path");
    }

    #[test]
    fn test_list_path_without_suffix_keeps_trailing_slash() {
        let request = Request::new(Operation::List { path: None });
        assert_eq!(build_get_path(&request), "list/");
    }

    #[test]
    fn test_version_path() {
        let request = Request::new(Operation::Version);
        assert_eq!(build_get_path(&request), "version/");
    }

    #[test]
    fn test_append_query_params_to_plain_url() {
        let url = append_query_params(
            "http://localhost:8778/jolokia/",
            &[("key".to_string(), "value".to_string())],
        );
        assert_eq!(url, "http://localhost:8778/jolokia/?key=value");
    }

    #[test]
    fn test_append_query_params_inserts_after_existing_question_mark() {
        let url = append_query_params(
            "http://localhost:8778/jolokia/?token=abc",
            &[("maxDepth".to_string(), "3".to_string())],
        );
        assert_eq!(url, "http://localhost:8778/jolokia/?maxDepth=3&token=abc");
    }

    #[test]
    fn test_append_no_query_params_is_identity() {
        assert_eq!(append_query_params("http://x/", &[]), "http://x/");
    }
}
