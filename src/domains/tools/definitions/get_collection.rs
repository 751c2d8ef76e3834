//! Collection details tool.

use rmcp::model::{CallToolResult, JsonObject, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use super::common::{format_numbers, success_result, tool_definition};
use crate::domains::tools::{ToolContext, ToolError, ToolHandler, parse_arguments};
use crate::stac::{Collection, StacClient};

/// Parameters for fetching one collection.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetCollectionParams {
    #[schemars(description = "ID of the collection to retrieve")]
    pub collection_id: String,
}

/// STAC collection details tool.
#[derive(Debug, Clone, Default)]
pub struct GetCollectionTool;

impl GetCollectionTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_collection";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get detailed information for a specific collection";

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_definition::<GetCollectionParams>(Self::NAME, Self::DESCRIPTION)
    }

    /// Execute the tool logic.
    #[instrument(skip_all, fields(collection_id = %params.collection_id))]
    pub async fn execute(
        params: &GetCollectionParams,
        client: &StacClient,
    ) -> Result<CallToolResult, ToolError> {
        info!("Getting collection {}", params.collection_id);

        let collection = client.get_collection(&params.collection_id).await?;

        Ok(success_result(format_collection(&collection)))
    }
}

#[async_trait::async_trait]
impl ToolHandler for GetCollectionTool {
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
        let params: GetCollectionParams = parse_arguments(arguments)?;
        Self::execute(&params, context.client()).await
    }
}

fn format_collection(collection: &Collection) -> String {
    let mut response = format!("# Collection: {}\n\n", collection.id);
    if let Some(title) = &collection.title {
        response.push_str(&format!("**Title:** {}\n\n", title));
    }
    if let Some(description) = &collection.description {
        response.push_str(&format!("**Description:** {}\n\n", description));
    }
    if let Some(license) = &collection.license {
        response.push_str(&format!("**License:** {}\n\n", license));
    }
    if let Some(bbox) = collection.first_bbox() {
        response.push_str(&format!("**Spatial Extent:** {}\n\n", format_numbers(bbox)));
    }
    if let Some(interval) = collection.first_interval() {
        // Open interval ends are shown as "..", as in STAC datetime ranges.
        let start = interval.first().and_then(|b| b.as_deref()).unwrap_or("..");
        let end = interval.get(1).and_then(|b| b.as_deref()).unwrap_or("..");
        response.push_str(&format!("**Temporal Extent:** {} to {}\n\n", start, end));
    }
    response
}

#[cfg(test)]
mod tests {
    use super::super::common::{result_text, test_support::test_context};
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_collection_report() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/collections/sentinel-2-l2a"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "sentinel-2-l2a",
                "type": "Collection",
                "title": "Sentinel-2 Level-2A",
                "description": "Global Sentinel-2 data",
                "license": "proprietary",
                "extent": {
                    "spatial": { "bbox": [[-180, -90, 180, 90]] },
                    "temporal": { "interval": [["2015-06-27T10:25:31Z", null]] }
                }
            })))
            .mount(&server)
            .await;

        let context = test_context(&server.uri());
        let params = GetCollectionParams {
            collection_id: "sentinel-2-l2a".to_string(),
        };
        let result = GetCollectionTool::execute(&params, context.client())
            .await
            .unwrap();

        let text = result_text(&result);
        assert!(text.starts_with("# Collection: sentinel-2-l2a\n\n"));
        assert!(text.contains("**Title:** Sentinel-2 Level-2A\n"));
        assert!(text.contains("**Description:** Global Sentinel-2 data\n"));
        assert!(text.contains("**License:** proprietary\n"));
        assert!(text.contains("**Spatial Extent:** [-180, -90, 180, 90]\n"));
        assert!(text.contains("**Temporal Extent:** 2015-06-27T10:25:31Z to ..\n"));
    }

    #[tokio::test]
    async fn test_minimal_collection() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/collections/bare"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "bare" })))
            .mount(&server)
            .await;

        let context = test_context(&server.uri());
        let params = GetCollectionParams {
            collection_id: "bare".to_string(),
        };
        let result = GetCollectionTool::execute(&params, context.client())
            .await
            .unwrap();

        assert_eq!(result_text(&result), "# Collection: bare\n\n");
    }

    #[tokio::test]
    async fn test_missing_collection() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/collections/x"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let context = test_context(&server.uri());
        let params = GetCollectionParams {
            collection_id: "x".to_string(),
        };
        let err = GetCollectionTool::execute(&params, context.client())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Failed to get collection x"));
    }
}
