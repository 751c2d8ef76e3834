//! Item details tool.

use rmcp::model::{CallToolResult, JsonObject, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use super::common::{format_numbers, success_result, tool_definition};
use crate::domains::tools::{ToolContext, ToolError, ToolHandler, parse_arguments};
use crate::stac::{Item, StacClient};

/// Parameters for fetching one item.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetItemParams {
    #[schemars(description = "ID of the collection containing the item")]
    pub collection_id: String,

    #[schemars(description = "ID of the item to retrieve")]
    pub item_id: String,
}

/// STAC item details tool.
#[derive(Debug, Clone, Default)]
pub struct GetItemTool;

impl GetItemTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_item";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get detailed information for a specific item";

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_definition::<GetItemParams>(Self::NAME, Self::DESCRIPTION)
    }

    /// Execute the tool logic.
    #[instrument(skip_all, fields(collection_id = %params.collection_id, item_id = %params.item_id))]
    pub async fn execute(
        params: &GetItemParams,
        client: &StacClient,
    ) -> Result<CallToolResult, ToolError> {
        info!(
            "Getting item {} from collection {}",
            params.item_id, params.collection_id
        );

        let item = client
            .get_item(&params.collection_id, &params.item_id)
            .await?;

        Ok(success_result(format_item(&item)))
    }
}

#[async_trait::async_trait]
impl ToolHandler for GetItemTool {
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
        let params: GetItemParams = parse_arguments(arguments)?;
        Self::execute(&params, context.client()).await
    }
}

fn format_item(item: &Item) -> String {
    let properties = &item.properties;

    let mut response = format!("# Item: {}\n\n", item.id);
    if let Some(title) = &properties.title {
        response.push_str(&format!("**Title:** {}\n\n", title));
    }
    if let Some(description) = &properties.description {
        response.push_str(&format!("**Description:** {}\n\n", description));
    }
    if let Some(datetime) = &properties.datetime {
        response.push_str(&format!("**Date:** {}\n\n", datetime));
    }
    if let Some(bbox) = &item.bbox {
        response.push_str(&format!("**Bounding Box:** {}\n\n", format_numbers(bbox)));
    }

    if !item.assets.is_empty() {
        response.push_str("**Assets:**\n");
        for (key, asset) in &item.assets {
            response.push_str(&format!(
                "  - **{}**: {}\n",
                key,
                asset.title.as_deref().unwrap_or(key)
            ));
            if let Some(media_type) = &asset.media_type {
                response.push_str(&format!("    Type: {}\n", media_type));
            }
        }
        response.push('\n');
    }
    response
}
