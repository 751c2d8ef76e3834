//! Catalog statistics tool.
//!
//! Counts items per collection by running one search per collection, so the
//! unscoped variant costs one request per collection.

use rmcp::model::{CallToolResult, JsonObject, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use super::common::{
    CATALOG_COLLECTION_LIMIT, STATISTICS_ITEM_LIMIT, success_result, tool_definition,
};
use crate::domains::tools::{ToolContext, ToolError, ToolHandler, parse_arguments};
use crate::stac::{Collection, Item, SearchParams, StacClient, StacResult};

/// Parameters for statistics.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetStatisticsParams {
    #[schemars(
        description = "Optional collection ID to get statistics for a specific collection"
    )]
    #[serde(default)]
    pub collection_id: Option<String>,
}

/// STAC catalog statistics tool.
#[derive(Debug, Clone, Default)]
pub struct GetStatisticsTool;

impl GetStatisticsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_statistics";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get statistics for collections and items";

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_definition::<GetStatisticsParams>(Self::NAME, Self::DESCRIPTION)
    }

    /// Execute the tool logic.
    #[instrument(skip_all, fields(collection_id = ?params.collection_id))]
    pub async fn execute(
        params: &GetStatisticsParams,
        client: &StacClient,
    ) -> Result<CallToolResult, ToolError> {
        let report = match &params.collection_id {
            Some(collection_id) => Self::collection_statistics(client, collection_id).await?,
            None => Self::catalog_statistics(client).await?,
        };
        Ok(success_result(report))
    }

    async fn collection_statistics(client: &StacClient, collection_id: &str) -> StacResult<String> {
        info!("Computing statistics for collection {}", collection_id);

        // Fails early when the collection does not exist.
        client.get_collection(collection_id).await?;
        let items = Self::collection_items(client, collection_id).await?;

        let mut response = format!("# Statistics for Collection: {}\n\n", collection_id);
        response.push_str(&format!("**Total Items:** {}\n\n", items.len()));

        if let Some((first, last)) = date_range(&items) {
            response.push_str(&format!("**Date Range:** {} to {}\n\n", first, last));
        }
        Ok(response)
    }

    async fn catalog_statistics(client: &StacClient) -> StacResult<String> {
        info!("Computing catalog statistics");

        let collections = client.search_collections(CATALOG_COLLECTION_LIMIT).await?;

        let mut total_items = 0;
        let mut counts: Vec<(&Collection, Option<usize>)> = Vec::with_capacity(collections.len());
        for collection in &collections {
            match Self::collection_items(client, &collection.id).await {
                Ok(items) => {
                    total_items += items.len();
                    counts.push((collection, Some(items.len())));
                }
                Err(e) => {
                    warn!("Skipping item count for collection {}: {}", collection.id, e);
                    counts.push((collection, None));
                }
            }
        }

        let mut response = String::from("# Overall STAC Statistics\n\n");
        response.push_str(&format!("**Total Collections:** {}\n", collections.len()));
        response.push_str(&format!("**Total Items:** {}\n\n", total_items));

        response.push_str("**Collections:**\n");
        for (collection, count) in counts {
            response.push_str(&format!(
                "  - {}: {}",
                collection.id,
                collection.display_title()
            ));
            if count.is_none() {
                response.push_str(" (item count unavailable)");
            }
            response.push('\n');
        }
        Ok(response)
    }

    async fn collection_items(client: &StacClient, collection_id: &str) -> StacResult<Vec<Item>> {
        let params = SearchParams {
            collections: Some(vec![collection_id.to_string()]),
            limit: Some(STATISTICS_ITEM_LIMIT),
            ..Default::default()
        };
        Ok(client.search_items(&params).await?.features)
    }
}

#[async_trait::async_trait]
impl ToolHandler for GetStatisticsTool {
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
        let params: GetStatisticsParams = parse_arguments(arguments)?;
        Self::execute(&params, context.client()).await
    }
}

/// Earliest and latest item datetime. ISO-8601 strings in the same
/// format sort chronologically as text.
fn date_range(items: &[Item]) -> Option<(&str, &str)> {
    let mut dates: Vec<&str> = items
        .iter()
        .filter_map(|item| item.properties.datetime.as_deref())
        .filter(|d| !d.is_empty())
        .collect();
    dates.sort_unstable();
    Some((*dates.first()?, *dates.last()?))
}

#[cfg(test)]
mod tests {
    use super::super::common::{
        result_text,
        test_support::{item_json, items_json, test_context},
    };
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_items(server: &MockServer, collection_id: &str, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_partial_json(json!({
                "collections": [collection_id],
                "limit": 1000
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_catalog_statistics() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/collections"))
            .and(query_param("limit", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "collections": [
                    { "id": "a", "title": "Collection A" },
                    { "id": "b" }
                ]
            })))
            .mount(&server)
            .await;
        mount_items(&server, "a", items_json("a", 5)).await;
        mount_items(&server, "b", items_json("b", 7)).await;

        let context = test_context(&server.uri());
        let result = GetStatisticsTool::execute(&GetStatisticsParams::default(), context.client())
            .await
            .unwrap();

        let text = result_text(&result);
        assert!(text.contains("**Total Collections:** 2\n"));
        assert!(text.contains("**Total Items:** 12\n"));
        assert!(text.contains("  - a: Collection A\n  - b: b\n"));
    }

    #[tokio::test]
    async fn test_catalog_statistics_skips_failing_collection() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/collections"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "collections": [ { "id": "a" }, { "id": "b" } ]
            })))
            .mount(&server)
            .await;
        mount_items(&server, "a", items_json("a", 4)).await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_partial_json(json!({ "collections": ["b"] })))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let context = test_context(&server.uri());
        let result = GetStatisticsTool::execute(&GetStatisticsParams::default(), context.client())
            .await
            .unwrap();

        let text = result_text(&result);
        assert!(text.contains("**Total Collections:** 2\n"));
        assert!(text.contains("**Total Items:** 4\n"));
        assert!(text.contains("  - b: b (item count unavailable)\n"));
    }

    #[tokio::test]
    async fn test_collection_statistics_date_range() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/collections/landsat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "landsat" })))
            .mount(&server)
            .await;
        mount_items(
            &server,
            "landsat",
            json!({
                "features": [
                    item_json("2", Some("2021-06-01T00:00:00Z")),
                    item_json("1", Some("2020-01-15T00:00:00Z")),
                    item_json("3", None),
                    item_json("4", Some("2023-11-30T12:00:00Z"))
                ]
            }),
        )
        .await;

        let context = test_context(&server.uri());
        let params = GetStatisticsParams {
            collection_id: Some("landsat".to_string()),
        };
        let result = GetStatisticsTool::execute(&params, context.client())
            .await
            .unwrap();

        let text = result_text(&result);
        assert!(text.starts_with("# Statistics for Collection: landsat\n\n"));
        assert!(text.contains("**Total Items:** 4\n"));
        assert!(text.contains("**Date Range:** 2020-01-15T00:00:00Z to 2023-11-30T12:00:00Z\n"));
    }

    #[tokio::test]
    async fn test_collection_statistics_without_dates() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/collections/empty"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "empty" })))
            .mount(&server)
            .await;
        mount_items(&server, "empty", json!({ "features": [] })).await;

        let context = test_context(&server.uri());
        let params = GetStatisticsParams {
            collection_id: Some("empty".to_string()),
        };
        let result = GetStatisticsTool::execute(&params, context.client())
            .await
            .unwrap();

        let text = result_text(&result);
        assert!(text.contains("**Total Items:** 0\n"));
        assert!(!text.contains("Date Range"));
    }

    #[tokio::test]
    async fn test_collection_statistics_unknown_collection() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/collections/ghost"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let context = test_context(&server.uri());
        let params = GetStatisticsParams {
            collection_id: Some("ghost".to_string()),
        };
        let err = GetStatisticsTool::execute(&params, context.client())
            .await
            .unwrap_err();

        assert!(err.to_string().starts_with("Failed to get collection ghost"));
    }
}
