//! Tool handlers, grouped by Confluence resource.

mod comments;
mod pages;
mod search;

use crate::registry::ToolRegistry;

/// Register every Confluence tool.
pub(crate) fn register_all(registry: &mut ToolRegistry) {
    pages::register(registry);
    search::register(registry);
    comments::register(registry);
}
