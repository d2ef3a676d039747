//! Transport-neutral description of one REST call.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;

use crate::error::ConfluenceError;

/// RFC 3986 unreserved characters: A-Z a-z 0-9 - . _ ~
const SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Escape a caller-supplied identifier as exactly one path segment.
///
/// # Errors
///
/// Returns [`ConfluenceError::InvalidIdentifier`] for empty, `.` and `..`
/// values, which would address the parent resource instead.
pub(crate) fn path_segment(field: &'static str, value: &str) -> Result<String, ConfluenceError> {
    if matches!(value, "" | "." | "..") {
        return Err(ConfluenceError::InvalidIdentifier {
            field,
            value: value.to_owned(),
        });
    }
    Ok(utf8_percent_encode(value, SEGMENT_ENCODE_SET).to_string())
}

/// HTTP method of a REST call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Whether the call modifies server state.
    pub fn is_write(self) -> bool {
        !matches!(self, Self::Get)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// One REST call relative to the `/rest/api` root.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below the API root, without a leading slash (e.g. `content/123`).
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Post, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Put, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Append a query parameter.
    #[must_use]
    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_owned(), value.to_string()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Value of the first query parameter named `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Sends a single REST call and returns the decoded response document.
///
/// `Ok(None)` means the server answered successfully without a document
/// (empty body or JSON `null`). Implementations perform exactly one call
/// and never retry.
pub trait Transport: Send + Sync {
    /// Send `request`.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the call could not be completed, or
    /// [`ConfluenceError::HttpResponse`] for error statuses.
    fn send(&self, request: &ApiRequest) -> Result<Option<Value>, ConfluenceError>;
}
