//! Confluence domain entities.
//!
//! Every entity is an immutable snapshot built once from a server document
//! by the [`normalize`](crate::normalize) module.

mod comment;
mod label;
mod page;
mod representation;
mod search;
mod space;

pub use comment::Comment;
pub(crate) use label::GLOBAL_PREFIX;
pub use label::Label;
pub use page::{DeletedPage, NewPage, Page, PageUpdate};
pub use representation::Representation;
pub use search::SearchResult;
pub use space::Space;

/// Timestamp type used across entities.
pub type Timestamp = chrono::DateTime<chrono::FixedOffset>;

/// Free-form key/value descriptor (page creator, comment author).
pub type Descriptor = serde_json::Map<String, serde_json::Value>;
