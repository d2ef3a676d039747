//! Search and space tools.

use cfx_confluence::{ConfluenceGateway, DEFAULT_SEARCH_LIMIT, DEFAULT_SPACES_LIMIT};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::envelope::{list, respond};
use crate::registry::{RegisteredTool, ToolBuilder, ToolRegistry, ToolResult, parse_args};

pub(crate) fn register(registry: &mut ToolRegistry) {
    registry.register_tool(search_confluence_tool());
    registry.register_tool(get_spaces_tool());
}

fn default_search_limit() -> u32 {
    DEFAULT_SEARCH_LIMIT
}

fn default_spaces_limit() -> u32 {
    DEFAULT_SPACES_LIMIT
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: String,
    #[serde(default)]
    spaces: Option<Vec<String>>,
    content_type: Option<String>,
    #[serde(default = "default_search_limit")]
    limit: u32,
}

fn search_confluence_tool() -> RegisteredTool {
    ToolBuilder::new("search_confluence")
        .description("Search Confluence content using CQL or text search")
        .input_schema(json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search terms or CQL query (e.g. 'text ~ \"project documentation\"')"
                },
                "spaces": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Space keys to restrict the search to (e.g. [\"DEV\", \"TEAM\"])"
                },
                "content_type": {
                    "type": "string",
                    "description": "Content type filter (e.g. \"page\", \"blogpost\")"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of results to return (default 10)",
                    "minimum": 1
                }
            },
            "required": ["query"]
        }))
        .build(search_confluence_handler)
}

async fn search_confluence_handler(gateway: ConfluenceGateway, arguments: Value) -> ToolResult {
    let params: SearchParams = parse_args("search_confluence", arguments)?;
    let spaces = params.spaces.unwrap_or_default();
    let result = gateway
        .search(
            &params.query,
            &spaces,
            params.content_type.as_deref(),
            params.limit,
        )
        .await;
    respond("search_confluence", result, |results| list("results", &results))
}

#[derive(Debug, Deserialize)]
struct SpacesParams {
    #[serde(default = "default_spaces_limit")]
    limit: u32,
}

fn get_spaces_tool() -> RegisteredTool {
    ToolBuilder::new("get_spaces")
        .description("List available Confluence spaces")
        .input_schema(json!({
            "type": "object",
            "properties": {
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of spaces to return (default 25)",
                    "minimum": 1
                }
            }
        }))
        .build(get_spaces_handler)
}

async fn get_spaces_handler(gateway: ConfluenceGateway, arguments: Value) -> ToolResult {
    let params: SpacesParams = parse_args("get_spaces", arguments)?;
    let result = gateway.get_spaces(params.limit).await;
    respond("get_spaces", result, |spaces| list("spaces", &spaces))
}
