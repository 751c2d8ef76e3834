//! Tool handler contract.
//!
//! Every tool in `definitions/` implements [`ToolHandler`]; the registry
//! stores them as trait objects and hands each call the shared
//! [`ToolContext`].

use rmcp::model::{CallToolResult, JsonObject, Tool};
use serde::de::DeserializeOwned;

use super::error::ToolError;
use crate::core::config::Config;
use crate::stac::{StacClient, StacResult};

/// Shared, immutable state handed to every tool call.
#[derive(Debug, Clone)]
pub struct ToolContext {
    client: StacClient,
}

impl ToolContext {
    /// Build the context from the validated configuration.
    pub fn new(config: &Config) -> StacResult<Self> {
        Ok(Self::from_client(StacClient::new(&config.stac)?))
    }

    /// Wrap an existing client.
    pub fn from_client(client: StacClient) -> Self {
        Self { client }
    }

    /// The STAC API client.
    pub fn client(&self) -> &StacClient {
        &self.client
    }
}

/// A registered tool: its definition plus the code that runs it.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// The unique tool name.
    fn name(&self) -> &'static str;

    /// The tool metadata advertised to clients.
    fn definition(&self) -> Tool;

    /// Execute the tool with raw call arguments.
    async fn call(
        &self,
        context: &ToolContext,
        arguments: JsonObject,
    ) -> Result<CallToolResult, ToolError>;
}

/// Deserialize call arguments into a tool's parameter struct.
pub fn parse_arguments<P: DeserializeOwned>(arguments: JsonObject) -> Result<P, ToolError> {
    serde_json::from_value(serde_json::Value::Object(arguments))
        .map_err(|e| ToolError::invalid_arguments(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Params {
        collection_id: String,
    }

    #[test]
    fn test_parse_arguments() {
        let mut args = JsonObject::new();
        args.insert("collection_id".to_string(), "landsat".into());
        let params: Params = parse_arguments(args).unwrap();
        assert_eq!(params.collection_id, "landsat");
    }

    #[test]
    fn test_parse_arguments_missing_field() {
        let err = parse_arguments::<Params>(JsonObject::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid arguments: missing field `collection_id`"
        );
    }
}
