//! Normalization of raw Confluence documents into domain entities.
//!
//! Every mapping is total: any JSON value, including `{}`, produces an
//! entity. Each field is extracted independently and falls back to its
//! documented default; malformed fields are logged at `warn` level and never
//! reported to the caller.
//!
//! | Entity | Defaults |
//! |--------|----------|
//! | [`Page`] | `""` strings, version `0`, no body, empty creator |
//! | [`Comment`] | `""` body, no parent |
//! | [`Space`] | id `0`, no description, no homepage |
//! | [`SearchResult`] | `""` strings, no body |
//! | [`Label`] | `""` everywhere |

mod document;
mod timestamp;

use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

pub use timestamp::parse_timestamp;

use crate::error::ConfluenceError;
use crate::types::{Comment, Label, Page, Representation, SearchResult, Space};
use document::Document;
use timestamp::timestamp_at;

/// Entity that can be built from a server document.
pub trait FromDocument: Sized {
    /// Build the entity, defaulting every missing or malformed field.
    fn from_document(document: &Value) -> Self;
}

/// Names of the entities the normalizer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Page,
    Space,
    Comment,
    Label,
    SearchResult,
}

impl FromStr for EntityKind {
    type Err = ConfluenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "page" => Ok(Self::Page),
            "space" => Ok(Self::Space),
            "comment" => Ok(Self::Comment),
            "label" => Ok(Self::Label),
            "search_result" => Ok(Self::SearchResult),
            other => Err(ConfluenceError::UnsupportedEntity(other.to_owned())),
        }
    }
}

/// Any normalized entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entity {
    Page(Page),
    Space(Space),
    Comment(Comment),
    Label(Label),
    SearchResult(SearchResult),
}

/// Normalize `document` into the entity named by `kind`.
///
/// # Errors
///
/// Returns [`ConfluenceError::UnsupportedEntity`] if `kind` names no entity.
pub fn normalize(kind: &str, document: &Value) -> Result<Entity, ConfluenceError> {
    let entity = match kind.parse::<EntityKind>()? {
        EntityKind::Page => Entity::Page(Page::from_document(document)),
        EntityKind::Space => Entity::Space(Space::from_document(document)),
        EntityKind::Comment => Entity::Comment(Comment::from_document(document)),
        EntityKind::Label => Entity::Label(Label::from_document(document)),
        EntityKind::SearchResult => Entity::SearchResult(SearchResult::from_document(document)),
    };
    Ok(entity)
}

/// Normalize every element of an array.
pub(crate) fn normalize_all<T: FromDocument>(items: &[Value]) -> Vec<T> {
    items.iter().map(T::from_document).collect()
}

/// Normalize the `results` array of a paged response.
pub(crate) fn normalize_results<T: FromDocument>(document: &Value) -> Vec<T> {
    normalize_all(Document::new(document).get("results").items())
}

/// Normalize the array stored under `key`.
pub(crate) fn normalize_list<T: FromDocument>(document: &Value, key: &str) -> Vec<T> {
    normalize_all(Document::new(document).get(key).items())
}

impl Page {
    /// Build a page, reading the body in `representation`.
    pub fn from_document_with(document: &Value, representation: Representation) -> Self {
        let doc = Document::new(document);

        let created = timestamp_at(doc.get("created"))
            .or_else(|| timestamp_at(doc.path(&["history", "createdDate"])))
            .resolve("created");
        let updated = timestamp_at(doc.get("lastUpdated"))
            .or_else(|| timestamp_at(doc.path(&["version", "when"])))
            .resolve("lastUpdated");

        Self {
            id: doc.get("id").identifier().resolve_or_default("id"),
            title: doc.get("title").text().resolve_or_default("title"),
            space_key: doc.path(&["space", "key"]).text().resolve_or_default("space.key"),
            version: doc
                .path(&["version", "number"])
                .unsigned()
                .resolve_or_default("version.number"),
            content: doc
                .path(&["body", representation.as_str(), "value"])
                .text()
                .resolve("body.value"),
            created,
            updated,
            creator: doc
                .path(&["history", "createdBy"])
                .object()
                .resolve_or_default("history.createdBy"),
            url: doc.path(&["_links", "webui"]).text().resolve_or_default("_links.webui"),
        }
    }
}

impl FromDocument for Page {
    fn from_document(document: &Value) -> Self {
        Self::from_document_with(document, Representation::Storage)
    }
}

impl FromDocument for Comment {
    fn from_document(document: &Value) -> Self {
        let doc = Document::new(document);

        let parent_comment_id = doc
            .has_object("parent")
            .then(|| doc.path(&["parent", "id"]).identifier().resolve_or_default("parent.id"));

        Self {
            id: doc.get("id").identifier().resolve_or_default("id"),
            page_id: doc
                .path(&["container", "id"])
                .identifier()
                .resolve_or_default("container.id"),
            content: doc
                .path(&["body", "storage", "value"])
                .text()
                .resolve_or_default("body.storage.value"),
            created: timestamp_at(doc.get("created")).resolve("created"),
            updated: timestamp_at(doc.get("lastUpdated"))
                .or_else(|| timestamp_at(doc.path(&["version", "when"])))
                .resolve("lastUpdated"),
            author: doc
                .get("author")
                .object()
                .or_else(|| doc.path(&["history", "createdBy"]).object())
                .resolve_or_default("author"),
            parent_comment_id,
        }
    }
}

impl FromDocument for Space {
    fn from_document(document: &Value) -> Self {
        let doc = Document::new(document);

        // Present-but-empty description is kept as Some("").
        let description = doc.has("description").then(|| {
            doc.path(&["description", "plain", "value"])
                .text()
                .resolve_or_default("description.plain.value")
        });
        let homepage_id = doc
            .has_object("homepage")
            .then(|| doc.path(&["homepage", "id"]).identifier().resolve_or_default("homepage.id"));

        Self {
            id: doc.get("id").integer().resolve_or_default("id"),
            key: doc.get("key").text().resolve_or_default("key"),
            name: doc.get("name").text().resolve_or_default("name"),
            space_type: doc.get("type").text().resolve_or_default("type"),
            description,
            homepage_id,
            status: doc.get("status").text().resolve_or_default("status"),
        }
    }
}

impl FromDocument for SearchResult {
    fn from_document(document: &Value) -> Self {
        let doc = Document::new(document);
        let nested = doc.get("content");
        let field = |path: &[&str]| doc.path(path).or(nested.path(path));

        Self {
            id: field(&["id"]).identifier().resolve_or_default("id"),
            title: field(&["title"]).text().resolve_or_default("title"),
            space_key: field(&["space", "key"]).text().resolve_or_default("space.key"),
            content_type: nested
                .get("type")
                .or(doc.get("type"))
                .text()
                .resolve_or_default("type"),
            excerpt: doc.get("excerpt").text().resolve_or_default("excerpt"),
            url: field(&["_links", "webui"])
                .or(doc.get("url"))
                .text()
                .resolve_or_default("url"),
            created: timestamp_at(field(&["created"]))
                .or_else(|| timestamp_at(field(&["history", "createdDate"])))
                .resolve("created"),
            updated: timestamp_at(doc.get("lastModified"))
                .or_else(|| timestamp_at(field(&["lastUpdated"])))
                .resolve("lastUpdated"),
            content: field(&["body", "view", "value"]).text().resolve("body.view.value"),
        }
    }
}

impl FromDocument for Label {
    fn from_document(document: &Value) -> Self {
        let doc = Document::new(document);
        Self {
            id: doc.get("id").identifier().resolve_or_default("id"),
            name: doc.get("name").text().resolve_or_default("name"),
            prefix: doc.get("prefix").text().resolve_or_default("prefix"),
            label: doc.get("label").text().resolve_or_default("label"),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_complete_page() {
        let document = json!({
            "id": "123456",
            "title": "Test Page",
            "space": {"key": "TEST"},
            "version": {"number": 5},
            "body": {"storage": {"value": "<p>Page content</p>"}},
            "created": "2023-12-01T10:30:00.000Z",
            "lastUpdated": "2023-12-02T15:45:00.000Z",
            "history": {"createdBy": {"displayName": "John Doe"}},
            "_links": {"webui": "/pages/123456"},
        });

        let page = Page::from_document(&document);

        assert_eq!(page.id, "123456");
        assert_eq!(page.title, "Test Page");
        assert_eq!(page.space_key, "TEST");
        assert_eq!(page.version, 5);
        assert_eq!(page.content.as_deref(), Some("<p>Page content</p>"));
        assert!(page.created.is_some());
        assert!(page.updated.is_some());
        assert_eq!(page.creator.get("displayName"), Some(&json!("John Doe")));
        assert_eq!(page.url, "/pages/123456");
    }

    #[test]
    fn test_page_body_follows_representation() {
        let document = json!({
            "body": {
                "storage": {"value": "<p>storage</p>"},
                "wiki": {"value": "h1. wiki"},
            }
        });
        let page = Page::from_document_with(&document, Representation::Wiki);
        assert_eq!(page.content.as_deref(), Some("h1. wiki"));
        let page = Page::from_document_with(&document, Representation::View);
        assert_eq!(page.content, None);
    }

    #[test]
    fn test_page_timestamps_fall_back_to_history() {
        let document = json!({
            "history": {"createdDate": "2024-01-02T03:04:05.000Z"},
            "version": {"number": 2, "when": "2024-02-03T04:05:06.000Z"},
        });
        let page = Page::from_document(&document);
        assert!(page.created.is_some());
        assert!(page.updated.is_some());
    }

    #[test]
    fn test_page_malformed_fields_default() {
        let document = json!({
            "id": 42,
            "title": "Ok",
            "version": {"number": "not-a-number"},
            "created": "invalid-date",
            "history": {"createdBy": "someone"},
        });
        let page = Page::from_document(&document);
        assert_eq!(page.id, "42");
        assert_eq!(page.version, 0);
        assert_eq!(page.created, None);
        assert!(page.creator.is_empty());
    }

    #[test]
    fn test_empty_document_defaults() {
        let empty = json!({});

        let page = Page::from_document(&empty);
        assert_eq!(page.id, "");
        assert_eq!(page.title, "");
        assert_eq!(page.space_key, "");
        assert_eq!(page.version, 0);
        assert_eq!(page.content, None);
        assert_eq!(page.created, None);
        assert_eq!(page.updated, None);
        assert!(page.creator.is_empty());
        assert_eq!(page.url, "");

        let comment = Comment::from_document(&empty);
        assert_eq!(comment.id, "");
        assert_eq!(comment.page_id, "");
        assert_eq!(comment.content, "");
        assert_eq!(comment.parent_comment_id, None);
        assert!(comment.author.is_empty());

        let space = Space::from_document(&empty);
        assert_eq!(space.id, 0);
        assert_eq!(space.key, "");
        assert_eq!(space.space_type, "");
        assert_eq!(space.description, None);
        assert_eq!(space.homepage_id, None);
        assert_eq!(space.status, "");

        let result = SearchResult::from_document(&empty);
        assert_eq!(result.id, "");
        assert_eq!(result.content_type, "");
        assert_eq!(result.excerpt, "");
        assert_eq!(result.url, "");
        assert_eq!(result.content, None);

        assert_eq!(Label::from_document(&empty), Label::default());
    }

    #[test]
    fn test_non_object_document_defaults() {
        let page = Page::from_document(&json!("just a string"));
        assert_eq!(page.id, "");
        let label = Label::from_document(&Value::Null);
        assert_eq!(label, Label::default());
    }

    #[test]
    fn test_complete_comment() {
        let document = json!({
            "id": "comment123",
            "container": {"id": "page456"},
            "body": {"storage": {"value": "<p>Comment content</p>"}},
            "created": "2023-12-01T10:30:00.000Z",
            "lastUpdated": "2023-12-01T11:00:00.000Z",
            "author": {"displayName": "Jane Doe"},
            "parent": {"id": "comment100"},
        });

        let comment = Comment::from_document(&document);

        assert_eq!(comment.id, "comment123");
        assert_eq!(comment.page_id, "page456");
        assert_eq!(comment.content, "<p>Comment content</p>");
        assert!(comment.created.is_some());
        assert!(comment.updated.is_some());
        assert_eq!(comment.author.get("displayName"), Some(&json!("Jane Doe")));
        assert_eq!(comment.parent_comment_id.as_deref(), Some("comment100"));
    }

    #[test]
    fn test_comment_without_parent() {
        let document = json!({
            "id": "comment123",
            "container": {"id": "page456"},
            "body": {"storage": {"value": "Comment content"}},
        });
        assert_eq!(Comment::from_document(&document).parent_comment_id, None);
    }

    #[test]
    fn test_comment_parent_without_id() {
        let document = json!({"parent": {}});
        assert_eq!(
            Comment::from_document(&document).parent_comment_id.as_deref(),
            Some("")
        );
    }

    #[test]
    fn test_complete_space() {
        let document = json!({
            "id": 123,
            "key": "TEST",
            "name": "Test Space",
            "type": "global",
            "description": {"plain": {"value": "Test space description"}},
            "homepage": {"id": "home123"},
            "status": "current",
        });

        let space = Space::from_document(&document);

        assert_eq!(
            space,
            Space {
                id: 123,
                key: "TEST".to_owned(),
                name: "Test Space".to_owned(),
                space_type: "global".to_owned(),
                description: Some("Test space description".to_owned()),
                homepage_id: Some("home123".to_owned()),
                status: "current".to_owned(),
            }
        );
    }

    #[test]
    fn test_space_description_present_but_empty() {
        let document = json!({"key": "TEST", "description": {}});
        assert_eq!(Space::from_document(&document).description.as_deref(), Some(""));
    }

    #[test]
    fn test_space_numeric_homepage_id() {
        let document = json!({"homepage": {"id": 98304}});
        assert_eq!(
            Space::from_document(&document).homepage_id.as_deref(),
            Some("98304")
        );
    }

    #[test]
    fn test_complete_search_result() {
        let document = json!({
            "id": "result123",
            "title": "Search Result",
            "space": {"key": "TEST"},
            "type": "page",
            "excerpt": "This is a search result excerpt",
            "body": {"view": {"value": "<p>Full content</p>"}},
            "created": "2023-12-01T10:30:00.000Z",
            "lastUpdated": "2023-12-02T15:45:00.000Z",
            "_links": {"webui": "/pages/result123"},
        });

        let result = SearchResult::from_document(&document);

        assert_eq!(result.id, "result123");
        assert_eq!(result.title, "Search Result");
        assert_eq!(result.space_key, "TEST");
        assert_eq!(result.content_type, "page");
        assert_eq!(result.excerpt, "This is a search result excerpt");
        assert_eq!(result.content.as_deref(), Some("<p>Full content</p>"));
        assert!(result.created.is_some());
        assert!(result.updated.is_some());
        assert_eq!(result.url, "/pages/result123");
    }

    #[test]
    fn test_search_result_from_search_envelope() {
        let document = json!({
            "title": "Result 1",
            "excerpt": "Test excerpt 1",
            "url": "/spaces/SPACE1/pages/1",
            "entityType": "content",
            "lastModified": "2024-05-01T08:00:00.000Z",
            "content": {
                "id": "result1",
                "type": "page",
                "title": "Result 1",
                "space": {"key": "SPACE1", "name": "Space 1"},
                "body": {"view": {"value": "<p>one</p>"}},
            }
        });

        let result = SearchResult::from_document(&document);

        assert_eq!(result.id, "result1");
        assert_eq!(result.title, "Result 1");
        assert_eq!(result.space_key, "SPACE1");
        assert_eq!(result.content_type, "page");
        assert_eq!(result.url, "/spaces/SPACE1/pages/1");
        assert_eq!(result.content.as_deref(), Some("<p>one</p>"));
        assert!(result.updated.is_some());
    }

    #[test]
    fn test_complete_label() {
        let document = json!({
            "id": "label123",
            "name": "test-label",
            "prefix": "global",
            "label": "test-label-full",
        });
        assert_eq!(
            Label::from_document(&document),
            Label {
                id: "label123".to_owned(),
                name: "test-label".to_owned(),
                prefix: "global".to_owned(),
                label: "test-label-full".to_owned(),
            }
        );
    }

    #[test]
    fn test_normalize_by_kind() {
        let document = json!({"id": "123", "title": "Test Page"});
        let Entity::Page(page) = normalize("page", &document).unwrap() else {
            panic!("expected a page");
        };
        assert_eq!(page.title, "Test Page");

        assert!(matches!(
            normalize("space", &json!({"key": "K"})).unwrap(),
            Entity::Space(_)
        ));
        assert!(matches!(
            normalize("search_result", &json!({})).unwrap(),
            Entity::SearchResult(_)
        ));
    }

    #[test]
    fn test_normalize_unsupported_kind() {
        let err = normalize("attachment", &json!({})).unwrap_err();
        assert!(matches!(err, ConfluenceError::UnsupportedEntity(ref kind) if kind == "attachment"));
        assert!(err.to_string().contains("attachment"));
    }

    #[test]
    fn test_page_round_trip() {
        let original = Page {
            id: "777".to_owned(),
            title: "Round Trip".to_owned(),
            space_key: "RT".to_owned(),
            version: 9,
            content: Some("<p>x</p>".to_owned()),
            created: None,
            updated: None,
            creator: serde_json::Map::new(),
            url: "/pages/777".to_owned(),
        };
        let document = json!({
            "id": original.id,
            "title": original.title,
            "space": {"key": original.space_key},
            "version": {"number": original.version},
            "body": {"storage": {"value": original.content}},
            "_links": {"webui": original.url},
        });

        assert_eq!(Page::from_document(&document), original);
    }

    #[test]
    fn test_list_helpers() {
        let document = json!({
            "results": [{"id": "a"}, {"id": "b"}],
            "ancestors": [{"id": "root"}],
        });
        let results: Vec<Label> = normalize_results(&document);
        let ancestors: Vec<Page> = normalize_list(&document, "ancestors");
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].id, "b");
        assert_eq!(ancestors[0].id, "root");
        assert!(normalize_results::<Page>(&json!({})).is_empty());
    }
}
