//! Confluence comment types.

use serde::Serialize;

use super::{Descriptor, Timestamp};

/// Comment attached to a page.
///
/// Only the immediate parent link is carried; reply trees are not built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    /// Comment ID.
    pub id: String,
    /// ID of the page the comment belongs to.
    pub page_id: String,
    /// Body in storage format (empty, never missing).
    pub content: String,
    /// Creation time.
    pub created: Option<Timestamp>,
    /// Last update time.
    pub updated: Option<Timestamp>,
    /// Author descriptor (empty when absent).
    pub author: Descriptor,
    /// Parent comment for replies.
    pub parent_comment_id: Option<String>,
}
