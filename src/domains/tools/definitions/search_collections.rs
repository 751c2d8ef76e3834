//! Collection search tool.
//!
//! Lists the collections published by the STAC API.

use rmcp::model::{CallToolResult, JsonObject, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use super::common::{deserialize_limit, effective_limit, success_result, tool_definition};
use crate::domains::tools::{ToolContext, ToolError, ToolHandler, parse_arguments};
use crate::stac::{Collection, StacClient};

/// Parameters for collection search.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct SearchCollectionsParams {
    /// Natural language query describing the wanted collections.
    #[schemars(description = "Natural language query for collection search")]
    #[serde(default)]
    pub query: Option<String>,

    /// Maximum number of collections to return (default: 10).
    #[schemars(description = "Maximum number of collections to return (default: 10)")]
    #[serde(default, deserialize_with = "deserialize_limit")]
    pub limit: Option<i64>,
}

/// STAC collection search tool.
#[derive(Debug, Clone, Default)]
pub struct SearchCollectionsTool;

impl SearchCollectionsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "search_collections";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Search STAC collections with natural language queries";

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_definition::<SearchCollectionsParams>(Self::NAME, Self::DESCRIPTION)
    }

    /// Execute the tool logic.
    #[instrument(skip_all, fields(limit = ?params.limit))]
    pub async fn execute(
        params: &SearchCollectionsParams,
        client: &StacClient,
    ) -> Result<CallToolResult, ToolError> {
        let limit = effective_limit(params.limit);
        info!("Searching collections (limit {})", limit);
        if let Some(query) = &params.query {
            debug!("Collection query: {}", query);
        }

        let collections = client.search_collections(limit).await?;

        Ok(success_result(format_collections(&collections)))
    }
}

#[async_trait::async_trait]
impl ToolHandler for SearchCollectionsTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn definition(&self) -> Tool {
        Self::to_tool()
    }

    async fn call(
        &self,
        context: &ToolContext,
        arguments: JsonObject,
    ) -> Result<CallToolResult, ToolError> {
        let params: SearchCollectionsParams = parse_arguments(arguments)?;
        Self::execute(&params, context.client()).await
    }
}

fn format_collections(collections: &[Collection]) -> String {
    let mut response = format!("Found {} collections:\n\n", collections.len());
    for collection in collections {
        response.push_str(&format!(
            "**{}** - {}\n",
            collection.id,
            collection.display_title()
        ));
        if let Some(description) = &collection.description {
            response.push_str(&format!("  {}\n", description));
        }
        response.push('\n');
    }
    response
}
