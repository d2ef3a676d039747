//! Confluence search result types.

use serde::Serialize;

use super::Timestamp;

/// One hit of a CQL search, in server-ranked order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// Content ID.
    pub id: String,
    /// Content title.
    pub title: String,
    /// Key of the owning space.
    pub space_key: String,
    /// Content type (`page`, `blogpost`, `comment`, ...).
    #[serde(rename = "type")]
    pub content_type: String,
    /// Highlighted excerpt.
    pub excerpt: String,
    /// Web UI path.
    pub url: String,
    /// Creation time.
    pub created: Option<Timestamp>,
    /// Last update time.
    pub updated: Option<Timestamp>,
    /// Rendered body (`view` representation).
    pub content: Option<String>,
}
