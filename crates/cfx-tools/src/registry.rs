//! Tool registry.
//!
//! Tools are registered with a name, description, JSON Schema for their
//! arguments and an async handler. The gateway is supplied per call, so
//! definitions can be listed without Confluence credentials.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use cfx_confluence::ConfluenceGateway;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::ToolError;

/// Result type for tool execution.
pub type ToolResult = Result<Value, ToolError>;

/// Boxed future for async tool execution.
pub type ToolFuture = Pin<Box<dyn Future<Output = ToolResult> + Send>>;

/// Tool handler function type.
pub type ToolHandler = Arc<dyn Fn(ConfluenceGateway, Value) -> ToolFuture + Send + Sync>;

/// A registered tool with metadata and handler.
pub struct RegisteredTool {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
    pub handler: ToolHandler,
}

/// Public description of a tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Registry of callable tools, in registration order.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
}

impl ToolRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every Confluence tool registered.
    pub fn confluence() -> Self {
        let mut registry = Self::new();
        crate::handlers::register_all(&mut registry);
        registry
    }

    /// Register a tool, replacing any tool with the same name.
    pub fn register_tool(&mut self, tool: RegisteredTool) {
        self.tools.retain(|existing| existing.name != tool.name);
        self.tools.push(tool);
    }

    /// Definitions of all registered tools.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|tool| ToolDefinition {
                name: tool.name,
                description: tool.description,
                input_schema: tool.input_schema.clone(),
            })
            .collect()
    }

    /// Get a tool by name.
    pub fn get_tool(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.iter().find(|tool| tool.name == name)
    }

    /// Get the number of registered tools.
    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    /// Call the tool `name` with JSON `arguments`.
    ///
    /// `null` arguments are treated as an empty object.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::UnknownTool`] for unregistered names and
    /// [`ToolError::InvalidArguments`] when the arguments do not decode.
    /// Confluence failures are returned as error envelopes, not errors.
    pub async fn call(
        &self,
        gateway: &ConfluenceGateway,
        name: &str,
        arguments: Value,
    ) -> ToolResult {
        let tool = self
            .get_tool(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_owned()))?;
        let arguments = match arguments {
            Value::Null => Value::Object(serde_json::Map::new()),
            other => other,
        };

        info!(tool = name, "Calling tool");
        let result = (tool.handler)(gateway.clone(), arguments).await;
        debug!(tool = name, ok = result.is_ok(), "Tool finished");
        result
    }
}

/// Decode tool arguments into a parameter struct.
pub(crate) fn parse_args<P: DeserializeOwned>(tool: &'static str, arguments: Value) -> Result<P, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments {
        tool,
        message: e.to_string(),
    })
}

/// Builder for registering a tool.
pub struct ToolBuilder {
    name: &'static str,
    description: &'static str,
    input_schema: Value,
}

impl ToolBuilder {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            description: "",
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    #[must_use]
    pub fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    #[must_use]
    pub fn input_schema(mut self, schema: Value) -> Self {
        self.input_schema = schema;
        self
    }

    pub fn build<F, Fut>(self, handler: F) -> RegisteredTool
    where
        F: Fn(ConfluenceGateway, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolResult> + Send + 'static,
    {
        RegisteredTool {
            name: self.name,
            description: self.description,
            input_schema: self.input_schema,
            handler: Arc::new(move |gateway, arguments| Box::pin(handler(gateway, arguments))),
        }
    }
}
