//! Resilient Confluence gateway for cfx.
//!
//! This crate provides:
//! - [`ConfluenceGateway`]: async page, search, space, comment and label
//!   operations with bounded retries
//! - [`ConfluenceClient`]: sync REST transport with Basic or Bearer auth
//! - [`build_cql`]: CQL construction from free text or structured queries
//! - [`normalize`](normalize::normalize): tolerant mapping of server
//!   documents into domain entities
//!
//! # Usage
//!
//! ```ignore
//! use std::time::Duration;
//! use cfx_confluence::{ConfluenceClient, ConfluenceGateway, Credentials, NewPage};
//!
//! let credentials = Credentials::from_parts(Some("user@example.com"), "api-token");
//! let client = ConfluenceClient::new(
//!     "https://example.atlassian.net/wiki",
//!     &credentials,
//!     Duration::from_secs(30),
//! );
//! let gateway = ConfluenceGateway::from_client(client);
//!
//! let page = gateway
//!     .create_page(NewPage::new("DOCS", "Release notes", "<p>Hello</p>"))
//!     .await?;
//! println!("Created {} (v{})", page.id, page.version);
//! ```

// REST transport
mod client;
#[cfg(any(test, feature = "mock"))]
pub use client::MockTransport;
pub use client::{ApiRequest, ConfluenceClient, Credentials, DEFAULT_TIMEOUT_SECS, Method, Transport};

// Gateway
mod gateway;
pub use gateway::{
    ConfluenceGateway, DEFAULT_CHILDREN_LIMIT, DEFAULT_COMMENT_DEPTH, DEFAULT_SEARCH_LIMIT,
    DEFAULT_SPACES_LIMIT,
};

// Normalization
pub mod normalize;

// CQL
mod query;
pub use query::build_cql;

// Retries
pub mod retry;
pub use retry::RetryPolicy;

// Domain types
pub mod types;
pub use types::{
    Comment, DeletedPage, Label, NewPage, Page, PageUpdate, Representation, SearchResult, Space,
};

// Errors
pub mod error;
pub use error::ConfluenceError;
