//! Comment and label tools.

use cfx_confluence::{ConfluenceGateway, DEFAULT_COMMENT_DEPTH};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::envelope::{list, respond, single};
use crate::registry::{RegisteredTool, ToolBuilder, ToolRegistry, ToolResult, parse_args};

pub(crate) fn register(registry: &mut ToolRegistry) {
    registry.register_tool(get_comments_tool());
    registry.register_tool(add_comment_tool());
    registry.register_tool(get_labels_tool());
    registry.register_tool(add_label_tool());
}

fn default_depth() -> String {
    DEFAULT_COMMENT_DEPTH.to_owned()
}

#[derive(Debug, Deserialize)]
struct GetCommentsParams {
    page_id: String,
    #[serde(default = "default_depth")]
    depth: String,
}

fn get_comments_tool() -> RegisteredTool {
    ToolBuilder::new("get_comments")
        .description("Get comments for a Confluence page")
        .input_schema(json!({
            "type": "object",
            "properties": {
                "page_id": {"type": "string", "description": "ID of the page"},
                "depth": {
                    "type": "string",
                    "description": "Comment depth: 'all' (default) or 'root'"
                }
            },
            "required": ["page_id"]
        }))
        .build(get_comments_handler)
}

async fn get_comments_handler(gateway: ConfluenceGateway, arguments: Value) -> ToolResult {
    let params: GetCommentsParams = parse_args("get_comments", arguments)?;
    let result = gateway.get_comments(&params.page_id, &params.depth).await;
    respond("get_comments", result, |comments| list("comments", &comments))
}

#[derive(Debug, Deserialize)]
struct AddCommentParams {
    page_id: String,
    content: String,
}

fn add_comment_tool() -> RegisteredTool {
    ToolBuilder::new("add_comment")
        .description("Add a comment to a Confluence page")
        .input_schema(json!({
            "type": "object",
            "properties": {
                "page_id": {"type": "string", "description": "ID of the page to comment on"},
                "content": {"type": "string", "description": "Comment body in storage format"}
            },
            "required": ["page_id", "content"]
        }))
        .build(add_comment_handler)
}

async fn add_comment_handler(gateway: ConfluenceGateway, arguments: Value) -> ToolResult {
    let params: AddCommentParams = parse_args("add_comment", arguments)?;
    let result = gateway.add_comment(&params.page_id, &params.content).await;
    respond("add_comment", result, |comment| single("comment", &comment))
}

#[derive(Debug, Deserialize)]
struct GetLabelsParams {
    page_id: String,
}

fn get_labels_tool() -> RegisteredTool {
    ToolBuilder::new("get_labels")
        .description("Get labels for a Confluence page")
        .input_schema(json!({
            "type": "object",
            "properties": {
                "page_id": {"type": "string", "description": "ID of the page"}
            },
            "required": ["page_id"]
        }))
        .build(get_labels_handler)
}

async fn get_labels_handler(gateway: ConfluenceGateway, arguments: Value) -> ToolResult {
    let params: GetLabelsParams = parse_args("get_labels", arguments)?;
    let result = gateway.get_labels(&params.page_id).await;
    respond("get_labels", result, |labels| list("labels", &labels))
}

#[derive(Debug, Deserialize)]
struct AddLabelParams {
    page_id: String,
    label: String,
}

fn add_label_tool() -> RegisteredTool {
    ToolBuilder::new("add_label")
        .description("Add a label to a Confluence page")
        .input_schema(json!({
            "type": "object",
            "properties": {
                "page_id": {"type": "string", "description": "ID of the page"},
                "label": {"type": "string", "description": "Label to add"}
            },
            "required": ["page_id", "label"]
        }))
        .build(add_label_handler)
}

async fn add_label_handler(gateway: ConfluenceGateway, arguments: Value) -> ToolResult {
    let params: AddLabelParams = parse_args("add_label", arguments)?;
    let result = gateway.add_label(&params.page_id, &params.label).await;
    respond("add_label", result, |labels| list("labels", &labels))
}

#[cfg(test)]
mod tests {
    use cfx_confluence::MockTransport;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::handlers::tests::registry_with;

    #[tokio::test]
    async fn test_get_comments_default_depth() {
        let (registry, transport) = registry_with(MockTransport::new().with_json(json!({
            "results": [{"id": "c1", "body": {"storage": {"value": "<p>Hi</p>"}}}]
        })));

        let result = registry
            .call("get_comments", json!({"page_id": "123"}))
            .await
            .unwrap();

        assert_eq!(result["count"], json!(1));
        assert_eq!(result["comments"][0]["content"], json!("<p>Hi</p>"));
        assert_eq!(transport.requests()[0].query_value("depth"), Some("all"));
    }

    #[tokio::test]
    async fn test_add_comment_envelope() {
        let (registry, _) = registry_with(MockTransport::new().with_json(json!({
            "id": "c2",
            "container": {"id": "123"},
            "body": {"storage": {"value": "<p>Thanks</p>"}}
        })));

        let result = registry
            .call("add_comment", json!({"page_id": "123", "content": "<p>Thanks</p>"}))
            .await
            .unwrap();

        assert_eq!(result["status"], json!("success"));
        assert_eq!(result["comment"]["id"], json!("c2"));
        assert_eq!(result["comment"]["page_id"], json!("123"));
    }

    #[tokio::test]
    async fn test_get_then_add_label() {
        let (registry, transport) = registry_with(
            MockTransport::new()
                .with_json(json!({"results": [{"id": "1", "name": "docs", "prefix": "global"}]}))
                .with_json(json!({"results": [
                    {"id": "1", "name": "docs", "prefix": "global"},
                    {"id": "2", "name": "api", "prefix": "global"}
                ]})),
        );

        let before = registry.call("get_labels", json!({"page_id": "7"})).await.unwrap();
        let after = registry
            .call("add_label", json!({"page_id": "7", "label": "api"}))
            .await
            .unwrap();

        assert_eq!(before["count"], json!(1));
        assert_eq!(after["count"], json!(2));
        assert_eq!(after["labels"][1]["name"], json!("api"));
        assert_eq!(
            transport.requests()[1].body,
            Some(json!([{"prefix": "global", "name": "api"}]))
        );
    }

    #[tokio::test]
    async fn test_add_label_transport_failure_envelope() {
        let (registry, transport) = registry_with(
            MockTransport::new()
                .with_transient_failure()
                .with_transient_failure()
                .with_transient_failure(),
        );

        let result = registry
            .call("add_label", json!({"page_id": "7", "label": "api"}))
            .await
            .unwrap();

        assert_eq!(result["status"], json!("error"));
        assert_eq!(transport.call_count(), 3);
    }
}
