//! Confluence page types.

use serde::Serialize;

use super::{Descriptor, Representation, Timestamp};

/// Confluence page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// Page ID.
    pub id: String,
    /// Page title.
    pub title: String,
    /// Key of the owning space.
    pub space_key: String,
    /// Server-assigned version number (`0` when the document carried none).
    pub version: u64,
    /// Body content in the requested representation.
    pub content: Option<String>,
    /// Creation time.
    pub created: Option<Timestamp>,
    /// Last update time.
    pub updated: Option<Timestamp>,
    /// Creator descriptor from the page history (empty when absent).
    pub creator: Descriptor,
    /// Web UI path (empty when absent).
    pub url: String,
}

/// Parameters for creating a page.
#[derive(Debug, Clone)]
pub struct NewPage {
    /// Key of the space that will own the page.
    pub space_key: String,
    /// Page title.
    pub title: String,
    /// Body content, already in `representation` format.
    pub content: String,
    /// Parent page; the new page becomes its child.
    pub parent_id: Option<String>,
    /// Format of `content`.
    pub representation: Representation,
}

impl NewPage {
    /// Create page parameters with storage-format content and no parent.
    pub fn new(
        space_key: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            space_key: space_key.into(),
            title: title.into(),
            content: content.into(),
            parent_id: None,
            representation: Representation::default(),
        }
    }

    /// Place the new page under `parent_id`.
    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Set the content representation.
    #[must_use]
    pub fn with_representation(mut self, representation: Representation) -> Self {
        self.representation = representation;
        self
    }
}

/// Parameters for replacing a page's title and content.
///
/// There is no partial update: both title and content are sent in full.
#[derive(Debug, Clone)]
pub struct PageUpdate {
    /// Page to update.
    pub page_id: String,
    /// New title.
    pub title: String,
    /// New body content.
    pub content: String,
    /// Mark the new version as a minor edit (no watcher notifications).
    pub minor_edit: bool,
    /// Format of `content`.
    pub representation: Representation,
    /// Version message.
    pub version_comment: Option<String>,
}

impl PageUpdate {
    /// Create update parameters with storage-format content.
    pub fn new(
        page_id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            page_id: page_id.into(),
            title: title.into(),
            content: content.into(),
            minor_edit: false,
            representation: Representation::default(),
            version_comment: None,
        }
    }

    /// Mark as a minor edit.
    #[must_use]
    pub fn minor_edit(mut self, minor_edit: bool) -> Self {
        self.minor_edit = minor_edit;
        self
    }

    /// Set the content representation.
    #[must_use]
    pub fn with_representation(mut self, representation: Representation) -> Self {
        self.representation = representation;
        self
    }

    /// Attach a version message.
    #[must_use]
    pub fn with_version_comment(mut self, comment: impl Into<String>) -> Self {
        self.version_comment = Some(comment.into());
        self
    }
}

/// Outcome of a page deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletedPage {
    /// Always `"success"`; failures are returned as errors.
    pub status: &'static str,
    /// ID of the deleted page.
    pub page_id: String,
}

impl DeletedPage {
    pub(crate) fn new(page_id: &str) -> Self {
        Self {
            status: "success",
            page_id: page_id.to_owned(),
        }
    }
}
