//! `cfx tools` command implementation.

use cfx_tools::ToolRegistry;
use clap::Args;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the tools command.
#[derive(Args)]
pub(crate) struct ToolsArgs {
    /// Print tool definitions, including argument schemas, as JSON.
    #[arg(long)]
    json: bool,
}

impl ToolsArgs {
    /// Execute the tools command.
    ///
    /// Does not need Confluence credentials.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let definitions = ToolRegistry::confluence().definitions();

        if self.json {
            output.json(&serde_json::to_value(&definitions)?);
            return Ok(());
        }

        for definition in &definitions {
            output.highlight(definition.name);
            output.info(&format!("    {}", definition.description));
        }
        Ok(())
    }
}
