//! Confluence label types.

use serde::Serialize;

/// Label prefix used when adding labels.
pub(crate) const GLOBAL_PREFIX: &str = "global";

/// Page label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Label {
    /// Label ID.
    pub id: String,
    /// Label name.
    pub name: String,
    /// Namespace prefix.
    pub prefix: String,
    /// Display label.
    pub label: String,
}
