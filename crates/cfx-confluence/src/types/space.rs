//! Confluence space types.

use serde::Serialize;

/// Confluence space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Space {
    /// Numeric space ID.
    pub id: i64,
    /// Short unique key used by every other call.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Space type (`global`, `personal`).
    #[serde(rename = "type")]
    pub space_type: String,
    /// Plain-text description; `None` when the server sent no description at all.
    pub description: Option<String>,
    /// Homepage ID, when the server included a homepage object.
    pub homepage_id: Option<String>,
    /// Space status (`current`, `archived`).
    pub status: String,
}
