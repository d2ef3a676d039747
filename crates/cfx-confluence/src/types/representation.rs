//! Body representation tags.

use serde::{Deserialize, Serialize};

/// Markup format of a content body.
///
/// The tag is passed to the server unchanged and the same tag selects the
/// body when reading a response back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Representation {
    /// Confluence storage format (XHTML).
    #[default]
    Storage,
    /// Legacy wiki markup.
    Wiki,
    /// Editor format.
    Editor,
    /// Rendered HTML.
    View,
    /// Atlassian document format (JSON).
    AtlasDocFormat,
}

impl Representation {
    /// Wire name of the representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Storage => "storage",
            Self::Wiki => "wiki",
            Self::Editor => "editor",
            Self::View => "view",
            Self::AtlasDocFormat => "atlas_doc_format",
        }
    }
}

impl std::fmt::Display for Representation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_storage() {
        assert_eq!(Representation::default(), Representation::Storage);
    }

    #[test]
    fn test_deserialize_wire_names() {
        let wiki: Representation = serde_json::from_str(r#""wiki""#).unwrap();
        let adf: Representation = serde_json::from_str(r#""atlas_doc_format""#).unwrap();
        assert_eq!(wiki, Representation::Wiki);
        assert_eq!(adf.as_str(), "atlas_doc_format");
    }

    #[test]
    fn test_unknown_tag_rejected() {
        assert!(serde_json::from_str::<Representation>(r#""markdown""#).is_err());
    }
}
