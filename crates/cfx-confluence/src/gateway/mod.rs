//! Async Confluence gateway.
//!
//! Every operation builds one or two [`ApiRequest`]s, sends each through the
//! [`RetryPolicy`] on tokio's blocking pool, and normalizes the response into
//! domain entities. A successful response without a document is reported as
//! [`ConfluenceError::EmptyResponse`], except for page deletion.

mod comments;
mod pages;
mod search;

use std::sync::Arc;

use serde_json::Value;
use tracing::{Instrument, Span};

use crate::client::{ApiRequest, ConfluenceClient, Transport, path_segment};
use crate::error::ConfluenceError;
use crate::retry::RetryPolicy;

/// Default page size for child page listings.
pub const DEFAULT_CHILDREN_LIMIT: u32 = 25;
/// Default number of search results.
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;
/// Default page size for space listings.
pub const DEFAULT_SPACES_LIMIT: u32 = 25;
/// Default comment depth (`all` includes replies).
pub const DEFAULT_COMMENT_DEPTH: &str = "all";

/// Resilient async front end to the Confluence REST API.
///
/// Cheap to clone; clones share the transport. Methods take `&self` and are
/// independent of each other, so calls may run concurrently.
#[derive(Clone)]
pub struct ConfluenceGateway {
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
    span: Span,
}

impl ConfluenceGateway {
    /// Create a gateway over `transport` with the default retry policy.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            retry: RetryPolicy::default(),
            span: tracing::info_span!("confluence"),
        }
    }

    /// Create a gateway over a real HTTP client.
    pub fn from_client(client: ConfluenceClient) -> Self {
        Self::new(Arc::new(client))
    }

    /// Replace the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Record all gateway activity under `span`.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Retry policy in use.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Send `request` under the retry policy.
    async fn send(&self, request: ApiRequest) -> Result<Option<Value>, ConfluenceError> {
        let transport = Arc::clone(&self.transport);
        let span = self.span.clone();
        let operation = move || {
            let _entered = span.enter();
            transport.send(&request)
        };

        self.retry
            .execute(operation, ConfluenceError::is_transient)
            .instrument(self.span.clone())
            .await
    }

    /// Send `request` and require a response document.
    async fn fetch(
        &self,
        operation: &'static str,
        target: impl Into<String>,
        request: ApiRequest,
    ) -> Result<Value, ConfluenceError> {
        self.send(request)
            .await?
            .ok_or_else(|| ConfluenceError::EmptyResponse {
                operation,
                target: target.into(),
            })
    }
}

/// `content/{page_id}{suffix}` with the id escaped as a single segment.
fn content_path(page_id: &str, suffix: &str) -> Result<String, ConfluenceError> {
    Ok(format!("content/{}{suffix}", path_segment("page_id", page_id)?))
}

impl std::fmt::Debug for ConfluenceGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfluenceGateway")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
fn mock_gateway(
    transport: crate::client::MockTransport,
) -> (ConfluenceGateway, Arc<crate::client::MockTransport>) {
    let transport = Arc::new(transport);
    let retry = RetryPolicy::new().with_initial_delay(std::time::Duration::from_millis(1));
    let gateway = ConfluenceGateway::new(Arc::clone(&transport) as Arc<dyn Transport>).with_retry(retry);
    (gateway, transport)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::client::MockTransport;

    #[tokio::test]
    async fn test_fetch_empty_body_names_operation() {
        let (gateway, _) = mock_gateway(MockTransport::new().with_empty());
        let err = gateway
            .fetch("get_page", "page_id=1", ApiRequest::get("content/1"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "get_page returned no data for page_id=1");
    }

    #[tokio::test]
    async fn test_send_retries_transient_failures() {
        let (gateway, transport) = mock_gateway(
            MockTransport::new()
                .with_transient_failure()
                .with_transient_failure()
                .with_json(json!({"id": "1"})),
        );
        let document = gateway.send(ApiRequest::get("content/1")).await.unwrap();
        assert_eq!(document, Some(json!({"id": "1"})));
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test]
    async fn test_send_gives_up_after_three_attempts() {
        let (gateway, transport) = mock_gateway(
            MockTransport::new()
                .with_transient_failure()
                .with_transient_failure()
                .with_transient_failure()
                .with_json(json!({"id": "never"})),
        );
        let err = gateway.send(ApiRequest::get("content/1")).await.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test]
    async fn test_status_error_surfaces_unchanged() {
        let (gateway, transport) =
            mock_gateway(MockTransport::new().with_status(403, "forbidden"));
        let err = gateway.send(ApiRequest::get("space")).await.unwrap_err();
        assert!(matches!(
            err,
            ConfluenceError::HttpResponse { status: 403, ref body } if body == "forbidden"
        ));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_request_build_error_not_retried() {
        let (gateway, transport) = mock_gateway(
            MockTransport::new()
                .with_error(ConfluenceError::HttpRequest(ureq::Error::BadUri(
                    "content/a b".to_owned(),
                )))
                .with_json(json!({"id": "never"})),
        );
        let err = gateway.send(ApiRequest::get("content/1")).await.unwrap_err();
        assert!(matches!(err, ConfluenceError::HttpRequest(ureq::Error::BadUri(_))));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_page_id_stays_in_one_segment() {
        let (gateway, transport) = mock_gateway(MockTransport::new().with_json(json!({"results": []})));
        gateway.get_labels("1/../../space").await.unwrap();
        assert_eq!(transport.requests()[0].path, "content/1%2F..%2F..%2Fspace/label");
    }

    #[tokio::test]
    async fn test_dot_segment_page_id_rejected_without_request() {
        let (gateway, transport) = mock_gateway(MockTransport::new());
        let err = gateway.delete_page("..").await.unwrap_err();
        assert!(matches!(
            err,
            ConfluenceError::InvalidIdentifier { field: "page_id", .. }
        ));
        assert_eq!(transport.call_count(), 0);
    }

    #[test]
    fn test_gateway_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<ConfluenceGateway>();
    }
}
