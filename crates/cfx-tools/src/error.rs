//! Error types for tool dispatch.

/// Error raised before or after a tool reaches Confluence.
///
/// Failures of the remote call itself are not errors at this level; they
/// are reported inside the tool's result envelope.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// No tool is registered under the name.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Arguments do not match the tool's parameters.
    #[error("invalid arguments for {tool}: {message}")]
    InvalidArguments {
        /// Tool name.
        tool: &'static str,
        /// Decoder message.
        message: String,
    },

    /// Result could not be encoded as JSON.
    #[error("failed to encode tool result: {0}")]
    Serialize(#[from] serde_json::Error),
}
