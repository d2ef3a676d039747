//! Named JSON tools over the Confluence gateway.
//!
//! Each tool takes a JSON object of arguments, calls one
//! [`ConfluenceGateway`](cfx_confluence::ConfluenceGateway) operation and
//! returns a result envelope:
//!
//! ```json
//! {"status": "success", "page": {...}}
//! {"status": "success", "results": [...], "count": 2}
//! {"status": "error", "message": "HTTP error: 404 - ..."}
//! ```
//!
//! | Tool | Payload |
//! |------|---------|
//! | `get_page`, `create_page`, `update_page` | `page` |
//! | `delete_page` | `page_id` |
//! | `get_page_children` | `children`, `count` |
//! | `get_page_ancestors` | `ancestors`, `count` |
//! | `search_confluence` | `results`, `count` |
//! | `get_spaces` | `spaces`, `count` |
//! | `get_comments` | `comments`, `count` |
//! | `add_comment` | `comment` |
//! | `get_labels`, `add_label` | `labels`, `count` |

mod envelope;
mod handlers;

pub mod error;
pub use error::ToolError;

mod registry;
pub use registry::{
    RegisteredTool, ToolBuilder, ToolDefinition, ToolFuture, ToolHandler, ToolRegistry, ToolResult,
};
