//! Page tools.

use cfx_confluence::{ConfluenceGateway, DEFAULT_CHILDREN_LIMIT, NewPage, PageUpdate, Representation};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::envelope::{list, respond, single};
use crate::registry::{RegisteredTool, ToolBuilder, ToolRegistry, ToolResult, parse_args};

pub(crate) fn register(registry: &mut ToolRegistry) {
    registry.register_tool(get_page_tool());
    registry.register_tool(create_page_tool());
    registry.register_tool(update_page_tool());
    registry.register_tool(delete_page_tool());
    registry.register_tool(get_page_children_tool());
    registry.register_tool(get_page_ancestors_tool());
}

fn content_format_schema() -> Value {
    json!({
        "type": "string",
        "enum": ["storage", "wiki", "editor", "view", "atlas_doc_format"],
        "description": "Content format: 'storage' for XHTML, 'wiki' for wiki markup (default storage)"
    })
}

fn default_true() -> bool {
    true
}

fn default_children_limit() -> u32 {
    DEFAULT_CHILDREN_LIMIT
}

// get_page

#[derive(Debug, Deserialize)]
struct GetPageParams {
    page_id: String,
    #[serde(default = "default_true")]
    include_body: bool,
}

fn get_page_tool() -> RegisteredTool {
    ToolBuilder::new("get_page")
        .description("Get Confluence page content and metadata by ID")
        .input_schema(json!({
            "type": "object",
            "properties": {
                "page_id": {"type": "string", "description": "The ID of the Confluence page"},
                "include_body": {
                    "type": "boolean",
                    "description": "Whether to include the full page content (default true)"
                }
            },
            "required": ["page_id"]
        }))
        .build(get_page_handler)
}

async fn get_page_handler(gateway: ConfluenceGateway, arguments: Value) -> ToolResult {
    let params: GetPageParams = parse_args("get_page", arguments)?;
    let result = gateway.get_page(&params.page_id, params.include_body).await;
    respond("get_page", result, |page| single("page", &page))
}

// create_page

#[derive(Debug, Deserialize)]
struct CreatePageParams {
    title: String,
    content: String,
    space_key: String,
    parent_id: Option<String>,
    #[serde(default)]
    content_format: Representation,
}

fn create_page_tool() -> RegisteredTool {
    ToolBuilder::new("create_page")
        .description("Create a new Confluence page")
        .input_schema(json!({
            "type": "object",
            "properties": {
                "title": {"type": "string", "description": "Title of the page"},
                "content": {"type": "string", "description": "Content of the page in the given format"},
                "space_key": {"type": "string", "description": "Key of the space to create the page in"},
                "parent_id": {"type": "string", "description": "ID of the parent page"},
                "content_format": content_format_schema()
            },
            "required": ["title", "content", "space_key"]
        }))
        .build(create_page_handler)
}

async fn create_page_handler(gateway: ConfluenceGateway, arguments: Value) -> ToolResult {
    let params: CreatePageParams = parse_args("create_page", arguments)?;
    let mut page = NewPage::new(params.space_key, params.title, params.content)
        .with_representation(params.content_format);
    if let Some(parent_id) = params.parent_id.filter(|id| !id.is_empty()) {
        page = page.with_parent(parent_id);
    }
    let result = gateway.create_page(page).await;
    respond("create_page", result, |page| single("page", &page))
}

// update_page

#[derive(Debug, Deserialize)]
struct UpdatePageParams {
    page_id: String,
    title: String,
    content: String,
    #[serde(default)]
    minor_edit: bool,
    #[serde(default)]
    content_format: Representation,
    version_comment: Option<String>,
}

fn update_page_tool() -> RegisteredTool {
    ToolBuilder::new("update_page")
        .description("Update an existing Confluence page")
        .input_schema(json!({
            "type": "object",
            "properties": {
                "page_id": {"type": "string", "description": "ID of the page to update"},
                "title": {"type": "string", "description": "New title of the page"},
                "content": {"type": "string", "description": "New content of the page"},
                "minor_edit": {"type": "boolean", "description": "Whether this is a minor edit (default false)"},
                "content_format": content_format_schema(),
                "version_comment": {"type": "string", "description": "Comment for this version"}
            },
            "required": ["page_id", "title", "content"]
        }))
        .build(update_page_handler)
}

async fn update_page_handler(gateway: ConfluenceGateway, arguments: Value) -> ToolResult {
    let params: UpdatePageParams = parse_args("update_page", arguments)?;
    let mut update = PageUpdate::new(params.page_id, params.title, params.content)
        .minor_edit(params.minor_edit)
        .with_representation(params.content_format);
    if let Some(comment) = params.version_comment {
        update = update.with_version_comment(comment);
    }
    let result = gateway.update_page(update).await;
    respond("update_page", result, |page| single("page", &page))
}

// delete_page

#[derive(Debug, Deserialize)]
struct PageIdParams {
    page_id: String,
}

fn delete_page_tool() -> RegisteredTool {
    ToolBuilder::new("delete_page")
        .description("Delete a Confluence page")
        .input_schema(page_id_schema("ID of the page to delete"))
        .build(delete_page_handler)
}

fn page_id_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "page_id": {"type": "string", "description": description}
        },
        "required": ["page_id"]
    })
}

async fn delete_page_handler(gateway: ConfluenceGateway, arguments: Value) -> ToolResult {
    let params: PageIdParams = parse_args("delete_page", arguments)?;
    let result = gateway.delete_page(&params.page_id).await;
    respond("delete_page", result, |deleted| Ok(serde_json::to_value(deleted)?))
}

// get_page_children

#[derive(Debug, Deserialize)]
struct ChildrenParams {
    page_id: String,
    #[serde(default = "default_children_limit")]
    limit: u32,
}

fn get_page_children_tool() -> RegisteredTool {
    ToolBuilder::new("get_page_children")
        .description("Get child pages of a Confluence page")
        .input_schema(json!({
            "type": "object",
            "properties": {
                "page_id": {"type": "string", "description": "ID of the parent page"},
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of children to return (default 25)",
                    "minimum": 1
                }
            },
            "required": ["page_id"]
        }))
        .build(get_page_children_handler)
}

async fn get_page_children_handler(gateway: ConfluenceGateway, arguments: Value) -> ToolResult {
    let params: ChildrenParams = parse_args("get_page_children", arguments)?;
    let result = gateway.get_page_children(&params.page_id, params.limit).await;
    respond("get_page_children", result, |pages| list("children", &pages))
}

// get_page_ancestors

fn get_page_ancestors_tool() -> RegisteredTool {
    ToolBuilder::new("get_page_ancestors")
        .description("Get ancestor (parent) pages of a Confluence page, root first")
        .input_schema(page_id_schema("ID of the page"))
        .build(get_page_ancestors_handler)
}

async fn get_page_ancestors_handler(gateway: ConfluenceGateway, arguments: Value) -> ToolResult {
    let params: PageIdParams = parse_args("get_page_ancestors", arguments)?;
    let result = gateway.get_page_ancestors(&params.page_id).await;
    respond("get_page_ancestors", result, |pages| list("ancestors", &pages))
}
