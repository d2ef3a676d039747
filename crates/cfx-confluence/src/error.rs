//! Error types for the Confluence gateway.

use tokio::task::JoinError;

/// Error from Confluence gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfluenceError {
    /// HTTP request failed at the transport level (DNS, TLS, timeout, etc).
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] ureq::Error),

    /// Connection-level I/O failure.
    #[error("connection failed: {0}")]
    Connection(#[from] std::io::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// The server answered without a document.
    #[error("{operation} returned no data for {target}")]
    EmptyResponse {
        /// Gateway operation name (e.g. `get_page`).
        operation: &'static str,
        /// Identifiers supplied by the caller.
        target: String,
    },

    /// Normalization requested for an entity type that does not exist.
    #[error("unsupported entity type: {0}")]
    UnsupportedEntity(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Blocking worker panicked or was cancelled.
    #[error("blocking worker failed: {0}")]
    Worker(String),

    /// Caller-supplied identifier cannot address a resource.
    #[error("invalid {field}: {value:?}")]
    InvalidIdentifier {
        /// Argument name (e.g. `page_id`).
        field: &'static str,
        /// Rejected value.
        value: String,
    },
}

impl ConfluenceError {
    /// Whether the failure is worth retrying.
    ///
    /// Only network/connection failures qualify. Status errors are the
    /// remote service's answer, and request-building or client-limit errors
    /// fail identically on every attempt, so both are surfaced as-is.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::HttpRequest(err) => matches!(
                err,
                ureq::Error::Io(_)
                    | ureq::Error::Timeout(_)
                    | ureq::Error::ConnectionFailed
                    | ureq::Error::HostNotFound
                    | ureq::Error::Protocol(_)
            ),
            Self::Connection(_) => true,
            _ => false,
        }
    }

    /// Whether the remote service reported the target as missing.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::HttpResponse { status, .. } => *status == 404,
            Self::EmptyResponse { .. } => true,
            _ => false,
        }
    }
}

impl From<JoinError> for ConfluenceError {
    fn from(err: JoinError) -> Self {
        Self::Worker(err.to_string())
    }
}
