//! Page operations.

use serde_json::{Value, json};
use tracing::info;

use super::{ConfluenceGateway, content_path};
use crate::client::ApiRequest;
use crate::error::ConfluenceError;
use crate::normalize::{FromDocument, normalize_list, normalize_results};
use crate::types::{DeletedPage, NewPage, Page, PageUpdate, Representation};

/// Expansions for page reads with and without the storage body.
const EXPAND_WITH_BODY: &str = "body.storage,version,space";
const EXPAND_WITHOUT_BODY: &str = "version,space";

fn body_payload(content: &str, representation: Representation) -> Value {
    let mut body = serde_json::Map::new();
    body.insert(
        representation.as_str().to_owned(),
        json!({
            "value": content,
            "representation": representation.as_str(),
        }),
    );
    Value::Object(body)
}

impl ConfluenceGateway {
    /// Get a page by ID, optionally with its storage-format body.
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError::EmptyResponse`] when the server sends no
    /// document, or the transport/status error of the last attempt.
    pub async fn get_page(&self, page_id: &str, include_body: bool) -> Result<Page, ConfluenceError> {
        info!(page_id, include_body, "Getting page");

        let expand = if include_body {
            EXPAND_WITH_BODY
        } else {
            EXPAND_WITHOUT_BODY
        };
        let request = ApiRequest::get(content_path(page_id, "")?).param("expand", expand);
        let document = self
            .fetch("get_page", format!("page_id={page_id}"), request)
            .await?;
        Ok(Page::from_document(&document))
    }

    /// Create a page; the result reflects the server's stored state.
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError::HttpResponse`] if the server rejects the
    /// page (duplicate title, unknown space, bad markup).
    pub async fn create_page(&self, page: NewPage) -> Result<Page, ConfluenceError> {
        info!(
            space_key = %page.space_key,
            title = %page.title,
            parent_id = ?page.parent_id,
            "Creating page"
        );

        let mut payload = json!({
            "type": "page",
            "title": page.title,
            "space": {"key": page.space_key},
            "body": body_payload(&page.content, page.representation),
        });
        if let Some(parent_id) = &page.parent_id {
            payload["ancestors"] = json!([{"id": parent_id}]);
        }

        let target = format!("space_key={} title={}", page.space_key, page.title);
        let document = self
            .fetch("create_page", target, ApiRequest::post("content", payload))
            .await?;
        let created = Page::from_document_with(&document, page.representation);
        info!(page_id = %created.id, version = created.version, "Created page");
        Ok(created)
    }

    /// Replace a page's title and content, proposing the next version.
    ///
    /// The version number is read from the server first; the server rejects
    /// the write if another update landed in between.
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError::HttpResponse`] with status 409 on a version
    /// conflict, or any error from reading the current version.
    pub async fn update_page(&self, update: PageUpdate) -> Result<Page, ConfluenceError> {
        let page_id = update.page_id.as_str();
        let target = format!("page_id={page_id}");

        let current = self
            .fetch(
                "update_page",
                target.clone(),
                ApiRequest::get(content_path(page_id, "")?).param("expand", "version"),
            )
            .await?;
        let current_version = Page::from_document(&current).version;
        let next_version = current_version + 1;

        info!(
            page_id,
            from = current_version,
            to = next_version,
            minor_edit = update.minor_edit,
            "Updating page"
        );

        let mut payload = json!({
            "id": page_id,
            "type": "page",
            "title": update.title,
            "body": body_payload(&update.content, update.representation),
            "version": {
                "number": next_version,
                "minorEdit": update.minor_edit,
            },
        });
        if let Some(message) = &update.version_comment {
            payload["version"]["message"] = json!(message);
        }

        let document = self
            .fetch(
                "update_page",
                target,
                ApiRequest::put(content_path(page_id, "")?, payload),
            )
            .await?;
        Ok(Page::from_document_with(&document, update.representation))
    }

    /// Delete a page. An empty success response is expected.
    ///
    /// # Errors
    ///
    /// Returns the status error if the page does not exist or may not be
    /// deleted.
    pub async fn delete_page(&self, page_id: &str) -> Result<DeletedPage, ConfluenceError> {
        info!(page_id, "Deleting page");
        self.send(ApiRequest::delete(content_path(page_id, "")?)).await?;
        Ok(DeletedPage::new(page_id))
    }

    /// Get the direct children of a page.
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError::EmptyResponse`] when the server sends no
    /// document.
    pub async fn get_page_children(
        &self,
        page_id: &str,
        limit: u32,
    ) -> Result<Vec<Page>, ConfluenceError> {
        info!(page_id, limit, "Getting child pages");

        let request = ApiRequest::get(content_path(page_id, "/child/page")?)
            .param("limit", limit)
            .param("expand", EXPAND_WITHOUT_BODY);
        let document = self
            .fetch("get_page_children", format!("page_id={page_id}"), request)
            .await?;
        Ok(normalize_results(&document))
    }

    /// Get the ancestors of a page, root first and direct parent last.
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError::EmptyResponse`] when the server sends no
    /// document.
    pub async fn get_page_ancestors(&self, page_id: &str) -> Result<Vec<Page>, ConfluenceError> {
        info!(page_id, "Getting page ancestors");

        let request = ApiRequest::get(content_path(page_id, "")?).param("expand", "ancestors");
        let document = self
            .fetch("get_page_ancestors", format!("page_id={page_id}"), request)
            .await?;
        Ok(normalize_list(&document, "ancestors"))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::super::mock_gateway;
    use crate::client::{Method, MockTransport};
    use crate::error::ConfluenceError;
    use crate::types::{NewPage, PageUpdate, Representation};

    fn page_document(id: &str, title: &str, version: u64) -> serde_json::Value {
        json!({
            "id": id,
            "title": title,
            "space": {"key": "TEST"},
            "version": {"number": version},
            "body": {"storage": {"value": "<p>Test content</p>"}},
            "_links": {"webui": format!("/pages/{id}")},
        })
    }

    #[tokio::test]
    async fn test_get_page_with_body() {
        let (gateway, transport) =
            mock_gateway(MockTransport::new().with_json(page_document("123", "Test Page", 1)));

        let page = gateway.get_page("123", true).await.unwrap();

        assert_eq!(page.id, "123");
        assert_eq!(page.title, "Test Page");
        assert_eq!(page.content.as_deref(), Some("<p>Test content</p>"));
        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.path, "content/123");
        assert_eq!(request.query_value("expand"), Some("body.storage,version,space"));
    }

    #[tokio::test]
    async fn test_get_page_without_body() {
        let (gateway, transport) =
            mock_gateway(MockTransport::new().with_json(json!({"id": "123", "title": "T"})));

        let page = gateway.get_page("123", false).await.unwrap();

        assert_eq!(page.content, None);
        assert_eq!(transport.requests()[0].query_value("expand"), Some("version,space"));
    }

    #[tokio::test]
    async fn test_get_page_empty_response() {
        let (gateway, _) = mock_gateway(MockTransport::new().with_empty());
        let err = gateway.get_page("404", true).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("page_id=404"));
    }

    #[tokio::test]
    async fn test_create_page_echo() {
        let (gateway, transport) = mock_gateway(MockTransport::new().with_json(json!({
            "id": "1",
            "title": "T",
            "space": {"key": "TEST"},
            "version": {"number": 1},
            "body": {"storage": {"value": "<p>c</p>"}},
        })));

        let page = gateway
            .create_page(NewPage::new("TEST", "T", "<p>c</p>"))
            .await
            .unwrap();

        assert_eq!(page.id, "1");
        assert_eq!(page.version, 1);
        assert_eq!(page.space_key, "TEST");
        assert_eq!(page.content.as_deref(), Some("<p>c</p>"));

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, "content");
        assert_eq!(
            request.body,
            Some(json!({
                "type": "page",
                "title": "T",
                "space": {"key": "TEST"},
                "body": {"storage": {"value": "<p>c</p>", "representation": "storage"}},
            }))
        );
    }

    #[tokio::test]
    async fn test_create_page_with_parent_and_wiki() {
        let (gateway, transport) = mock_gateway(MockTransport::new().with_json(json!({
            "id": "2",
            "body": {"wiki": {"value": "h1. Hi"}},
        })));

        let page = gateway
            .create_page(
                NewPage::new("TEST", "Child", "h1. Hi")
                    .with_parent("100")
                    .with_representation(Representation::Wiki),
            )
            .await
            .unwrap();

        assert_eq!(page.content.as_deref(), Some("h1. Hi"));
        let body = transport.requests()[0].body.clone().unwrap();
        assert_eq!(body["ancestors"], json!([{"id": "100"}]));
        assert_eq!(body["body"]["wiki"]["representation"], json!("wiki"));
    }

    #[tokio::test]
    async fn test_update_page_increments_version() {
        let (gateway, transport) = mock_gateway(
            MockTransport::new()
                .with_json(json!({"id": "123", "version": {"number": 4}}))
                .with_json(page_document("123", "Updated", 5)),
        );

        let page = gateway
            .update_page(
                PageUpdate::new("123", "Updated", "<p>new</p>")
                    .minor_edit(true)
                    .with_version_comment("typo"),
            )
            .await
            .unwrap();

        assert_eq!(page.version, 5);
        assert_eq!(page.title, "Updated");

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].query_value("expand"), Some("version"));
        assert_eq!(requests[1].method, Method::Put);
        assert_eq!(requests[1].path, "content/123");
        let body = requests[1].body.clone().unwrap();
        assert_eq!(
            body["version"],
            json!({"number": 5, "minorEdit": true, "message": "typo"})
        );
        assert_eq!(body["title"], json!("Updated"));
    }

    #[tokio::test]
    async fn test_update_page_conflict_surfaces() {
        let (gateway, transport) = mock_gateway(
            MockTransport::new()
                .with_json(json!({"id": "123", "version": {"number": 4}}))
                .with_status(409, "Version must be incremented"),
        );

        let err = gateway
            .update_page(PageUpdate::new("123", "T", "c"))
            .await
            .unwrap_err();

        assert!(matches!(err, ConfluenceError::HttpResponse { status: 409, .. }));
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_delete_page_empty_body_is_success() {
        let (gateway, transport) = mock_gateway(MockTransport::new().with_empty());

        let deleted = gateway.delete_page("123").await.unwrap();

        assert_eq!(deleted.status, "success");
        assert_eq!(deleted.page_id, "123");
        assert_eq!(transport.requests()[0].method, Method::Delete);
    }

    #[tokio::test]
    async fn test_delete_missing_page() {
        let (gateway, _) = mock_gateway(MockTransport::new().with_status(404, "not found"));
        assert!(gateway.delete_page("9").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_get_page_children() {
        let (gateway, transport) = mock_gateway(MockTransport::new().with_json(json!({
            "results": [
                page_document("11", "Child 1", 1),
                page_document("12", "Child 2", 3),
            ],
            "size": 2,
        })));

        let children = gateway.get_page_children("10", 25).await.unwrap();

        assert_eq!(children.len(), 2);
        assert_eq!(children[1].title, "Child 2");
        assert_eq!(children[1].version, 3);
        let request = &transport.requests()[0];
        assert_eq!(request.path, "content/10/child/page");
        assert_eq!(request.query_value("limit"), Some("25"));
    }

    #[tokio::test]
    async fn test_get_page_ancestors_in_order() {
        let (gateway, _) = mock_gateway(MockTransport::new().with_json(json!({
            "id": "30",
            "ancestors": [
                {"id": "1", "title": "Root"},
                {"id": "20", "title": "Parent"},
            ],
        })));

        let ancestors = gateway.get_page_ancestors("30").await.unwrap();

        let titles: Vec<&str> = ancestors.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["Root", "Parent"]);
    }

    #[tokio::test]
    async fn test_top_level_page_has_no_ancestors() {
        let (gateway, _) = mock_gateway(MockTransport::new().with_json(json!({"id": "1"})));
        assert!(gateway.get_page_ancestors("1").await.unwrap().is_empty());
    }
}
