//! CLI command implementations.

pub(crate) mod call;
pub(crate) mod serve;
pub(crate) mod tools;

pub(crate) use call::CallArgs;
pub(crate) use tools::ToolsArgs;

use cfx_config::Config;
use cfx_confluence::{ConfluenceClient, ConfluenceGateway, Credentials, RetryPolicy};
use tracing::info_span;

use crate::error::CliError;

/// Build a gateway from validated configuration.
///
/// # Errors
///
/// Returns an error if the Confluence URL or token is missing.
pub(crate) fn gateway_from_config(config: &Config) -> Result<ConfluenceGateway, CliError> {
    let confluence = config.require_confluence()?;
    let credentials = Credentials::from_parts(confluence.username(), &confluence.api_token);
    let client = ConfluenceClient::new(&confluence.base_url, &credentials, confluence.timeout());

    let retry = RetryPolicy::new()
        .with_max_attempts(config.retry.max_attempts)
        .with_max_elapsed(config.retry.max_elapsed())
        .with_initial_delay(config.retry.initial_delay());

    Ok(ConfluenceGateway::from_client(client)
        .with_retry(retry)
        .with_span(info_span!("confluence", base_url = %confluence.base_url)))
}
