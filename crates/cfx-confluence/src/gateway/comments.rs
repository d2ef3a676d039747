//! Comment and label operations.

use serde_json::{Value, json};
use tracing::info;

use super::{ConfluenceGateway, content_path};
use crate::client::ApiRequest;
use crate::error::ConfluenceError;
use crate::normalize::{FromDocument, normalize_all, normalize_results};
use crate::types::{Comment, GLOBAL_PREFIX, Label};

impl ConfluenceGateway {
    /// Get comments on a page.
    ///
    /// `depth` is passed to the server as-is; `all` includes replies.
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError::EmptyResponse`] when the server sends no
    /// document.
    pub async fn get_comments(
        &self,
        page_id: &str,
        depth: &str,
    ) -> Result<Vec<Comment>, ConfluenceError> {
        info!("Getting comments for page {}", page_id);

        let request = ApiRequest::get(content_path(page_id, "/child/comment")?)
            .param("expand", "body.storage,container")
            .param("depth", depth);
        let document = self
            .fetch("get_comments", format!("page_id={page_id}"), request)
            .await?;
        let comments: Vec<Comment> = normalize_results(&document);
        info!("Found {} comments on page {}", comments.len(), page_id);
        Ok(comments)
    }

    /// Add a storage-format comment to a page.
    ///
    /// Not idempotent: a retried call may leave two identical comments.
    ///
    /// # Errors
    ///
    /// Returns the status error if the page does not exist.
    pub async fn add_comment(&self, page_id: &str, content: &str) -> Result<Comment, ConfluenceError> {
        info!(page_id, "Adding comment");

        let payload = json!({
            "type": "comment",
            "container": {"id": page_id, "type": "page"},
            "body": {"storage": {"value": content, "representation": "storage"}},
        });
        let document = self
            .fetch(
                "add_comment",
                format!("page_id={page_id}"),
                ApiRequest::post("content", payload),
            )
            .await?;
        Ok(Comment::from_document(&document))
    }

    /// Get the labels attached to a page.
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError::EmptyResponse`] when the server sends no
    /// document.
    pub async fn get_labels(&self, page_id: &str) -> Result<Vec<Label>, ConfluenceError> {
        info!(page_id, "Getting labels");

        let document = self
            .fetch(
                "get_labels",
                format!("page_id={page_id}"),
                ApiRequest::get(content_path(page_id, "/label")?),
            )
            .await?;
        Ok(normalize_results(&document))
    }

    /// Attach a global label to a page and return the page's labels.
    ///
    /// # Errors
    ///
    /// Returns the status error if the label name is invalid.
    pub async fn add_label(&self, page_id: &str, label: &str) -> Result<Vec<Label>, ConfluenceError> {
        info!(page_id, label, "Adding label");

        let payload = json!([{"prefix": GLOBAL_PREFIX, "name": label}]);
        let document = self
            .fetch(
                "add_label",
                format!("page_id={page_id} label={label}"),
                ApiRequest::post(content_path(page_id, "/label")?, payload),
            )
            .await?;

        // Older servers answer with a bare array instead of a result page.
        Ok(match &document {
            Value::Array(items) => normalize_all(items),
            _ => normalize_results(&document),
        })
    }
}
