//! CLI error types.

use cfx_config::ConfigError;
use cfx_tools::ToolError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Tool(#[from] ToolError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Tool '{0}' returned an error")]
    ToolFailed(String),

    #[error("{0}")]
    Validation(String),
}
