//! Mock transport implementation for testing.
//!
//! Provides [`MockTransport`] for exercising the gateway without a server.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::Value;

use super::request::{ApiRequest, Transport};
use crate::error::ConfluenceError;

/// Scripted outcome of one call.
#[derive(Debug)]
enum Reply {
    Document(Value),
    Empty,
    ConnectionFailure,
    Status { status: u16, body: String },
    Failure(ConfluenceError),
}

impl Reply {
    fn into_result(self) -> Result<Option<Value>, ConfluenceError> {
        match self {
            Self::Document(document) => Ok(Some(document)),
            Self::Empty => Ok(None),
            Self::ConnectionFailure => Err(ConfluenceError::Connection(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))),
            Self::Status { status, body } => Err(ConfluenceError::HttpResponse { status, body }),
            Self::Failure(err) => Err(err),
        }
    }
}

/// Mock transport for testing.
///
/// Replies are consumed in the order they were scripted. Once the script
/// runs out every call answers with an empty body. All requests are
/// recorded for inspection.
///
/// # Example
///
/// ```ignore
/// use cfx_confluence::MockTransport;
///
/// let transport = MockTransport::new()
///     .with_transient_failure()
///     .with_json(serde_json::json!({"id": "1"}));
/// ```
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    /// Create a mock with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, reply: Reply) -> Self {
        self.replies
            .lock()
            .expect("mock replies lock poisoned")
            .push_back(reply);
        self
    }

    /// Answer the next call with `document`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_json(self, document: Value) -> Self {
        self.push(Reply::Document(document))
    }

    /// Answer the next call with an empty body.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_empty(self) -> Self {
        self.push(Reply::Empty)
    }

    /// Fail the next call with a refused connection.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_transient_failure(self) -> Self {
        self.push(Reply::ConnectionFailure)
    }

    /// Fail the next call with an HTTP error status.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_status(self, status: u16, body: impl Into<String>) -> Self {
        self.push(Reply::Status {
            status,
            body: body.into(),
        })
    }

    /// Fail the next call with `error`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_error(self, error: ConfluenceError) -> Self {
        self.push(Reply::Failure(error))
    }

    /// Requests received so far, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .expect("mock requests lock poisoned")
            .clone()
    }

    /// Number of calls received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .expect("mock requests lock poisoned")
            .len()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &ApiRequest) -> Result<Option<Value>, ConfluenceError> {
        self.requests
            .lock()
            .expect("mock requests lock poisoned")
            .push(request.clone());
        let reply = self
            .replies
            .lock()
            .expect("mock replies lock poisoned")
            .pop_front()
            .unwrap_or(Reply::Empty);
        reply.into_result()
    }
}
