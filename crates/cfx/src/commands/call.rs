//! `cfx call` command implementation.

use cfx_config::Config;
use cfx_tools::{ToolError, ToolRegistry};
use clap::Args;
use serde_json::Value;

use super::gateway_from_config;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the call command.
#[derive(Args)]
pub(crate) struct CallArgs {
    /// Tool name (see `cfx tools`).
    tool: String,

    /// Tool arguments as a JSON object.
    #[arg(short, long, default_value = "{}")]
    args: String,
}

impl CallArgs {
    /// Execute the call command.
    ///
    /// Prints the result envelope on stdout. An error envelope still prints,
    /// then fails the command.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are not a JSON object, the tool is
    /// unknown, or Confluence is not configured.
    pub(crate) async fn execute(self, config: &Config) -> Result<(), CliError> {
        let arguments = parse_arguments(&self.args)?;

        let registry = ToolRegistry::confluence();
        if registry.get_tool(&self.tool).is_none() {
            return Err(ToolError::UnknownTool(self.tool).into());
        }

        let gateway = gateway_from_config(config)?;
        let result = registry.call(&gateway, &self.tool, arguments).await?;
        Output::new().json(&result);

        if result["status"] == "error" {
            return Err(CliError::ToolFailed(self.tool));
        }
        Ok(())
    }
}

fn parse_arguments(raw: &str) -> Result<Value, CliError> {
    let arguments: Value = serde_json::from_str(raw)?;
    if !arguments.is_object() {
        return Err(CliError::Validation(
            "--args must be a JSON object".to_owned(),
        ));
    }
    Ok(arguments)
}
