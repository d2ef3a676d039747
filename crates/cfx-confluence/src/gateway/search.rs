//! Search and space listing.

use tracing::info;

use super::ConfluenceGateway;
use crate::client::ApiRequest;
use crate::error::ConfluenceError;
use crate::normalize::normalize_results;
use crate::query::build_cql;
use crate::types::{SearchResult, Space};

impl ConfluenceGateway {
    /// Search content with free text or CQL.
    ///
    /// See [`build_cql`] for how `query`, `spaces` and `content_type` are
    /// combined.
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError::HttpResponse`] with status 400 for invalid
    /// CQL.
    pub async fn search(
        &self,
        query: &str,
        spaces: &[String],
        content_type: Option<&str>,
        limit: u32,
    ) -> Result<Vec<SearchResult>, ConfluenceError> {
        let cql = build_cql(query, spaces, content_type);
        info!(cql = %cql, limit, "Searching content");

        let request = ApiRequest::get("search")
            .param("cql", &cql)
            .param("limit", limit)
            .param("expand", "content.space,content.body.view");
        let document = self.fetch("search", format!("cql={cql}"), request).await?;
        let results: Vec<SearchResult> = normalize_results(&document);
        info!("Found {} search results", results.len());
        Ok(results)
    }

    /// List spaces visible to the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError::EmptyResponse`] when the server sends no
    /// document.
    pub async fn get_spaces(&self, limit: u32) -> Result<Vec<Space>, ConfluenceError> {
        info!(limit, "Listing spaces");

        let request = ApiRequest::get("space")
            .param("limit", limit)
            .param("expand", "description.plain,homepage");
        let document = self
            .fetch("get_spaces", format!("limit={limit}"), request)
            .await?;
        Ok(normalize_results(&document))
    }
}
