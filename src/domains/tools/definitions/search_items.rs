//! Item search tool.
//!
//! Searches items inside one collection or across the whole catalog. When
//! the API has no working `/search` endpoint, the cross-catalog search falls
//! back to walking every collection's items endpoint.

use rmcp::model::{CallToolResult, JsonObject, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::common::{
    CATALOG_COLLECTION_LIMIT, deserialize_limit, effective_limit, success_result,
    tool_definition,
};
use crate::domains::tools::{ToolContext, ToolError, ToolHandler, parse_arguments};
use crate::stac::{BBox, Item, ItemsQuery, SearchParams, StacClient, StacResult};

/// Parameters for item search.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct SearchItemsParams {
    /// Natural language query describing the wanted items.
    #[schemars(description = "Natural language search query")]
    #[serde(default)]
    pub query: Option<String>,

    /// Restrict the search to one collection.
    #[schemars(description = "Collection ID to search within")]
    #[serde(default)]
    pub collection: Option<String>,

    /// Bounding box as [west, south, east, north].
    #[schemars(description = "Bounding box [west, south, east, north]")]
    #[serde(default)]
    pub bbox: Option<BBox>,

    /// ISO 8601 datetime or range (e.g. "2020-01-01T00:00:00Z/2020-12-31T23:59:59Z").
    #[schemars(description = "ISO 8601 format datetime range")]
    #[serde(default)]
    pub datetime: Option<String>,

    /// Maximum number of items to return (default: 10).
    #[schemars(description = "Maximum number of items to return (default: 10)")]
    #[serde(default, deserialize_with = "deserialize_limit")]
    pub limit: Option<i64>,
}

/// STAC item search tool.
#[derive(Debug, Clone, Default)]
pub struct SearchItemsTool;

impl SearchItemsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "search_items";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Search STAC items with spatial, temporal, and text filters";

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_definition::<SearchItemsParams>(Self::NAME, Self::DESCRIPTION)
    }

    /// Execute the tool logic.
    #[instrument(skip_all, fields(collection = ?params.collection))]
    pub async fn execute(
        params: &SearchItemsParams,
        client: &StacClient,
    ) -> Result<CallToolResult, ToolError> {
        let limit = effective_limit(params.limit);
        info!("Searching items (limit {})", limit);
        if let Some(query) = &params.query {
            debug!("Item query: {}", query);
        }

        let items_query = ItemsQuery {
            limit: Some(limit),
            bbox: params.bbox,
            datetime: params.datetime.clone(),
        };

        let items = match &params.collection {
            Some(collection_id) => {
                client
                    .get_collection_items(collection_id, &items_query)
                    .await?
                    .features
            }
            None => {
                let search = SearchParams {
                    bbox: params.bbox,
                    datetime: params.datetime.clone(),
                    limit: Some(limit),
                    ..Default::default()
                };
                match client.search_items(&search).await {
                    Ok(result) => result.features,
                    Err(e) => {
                        warn!("Item search failed, searching collections one by one: {}", e);
                        Self::search_each_collection(client, &items_query).await?
                    }
                }
            }
        };

        Ok(success_result(format_items(
            &items,
            params.collection.as_deref(),
        )))
    }

    /// Query every collection's items endpoint in turn, skipping failures,
    /// and keep the first `limit` items.
    async fn search_each_collection(
        client: &StacClient,
        query: &ItemsQuery,
    ) -> StacResult<Vec<Item>> {
        let limit = query.limit.unwrap_or_default() as usize;
        let collections = client.search_collections(CATALOG_COLLECTION_LIMIT).await?;

        let mut items = Vec::new();
        for collection in &collections {
            match client.get_collection_items(&collection.id, query).await {
                Ok(result) => items.extend(result.features),
                Err(e) => {
                    warn!("Skipping collection {}: {}", collection.id, e);
                    continue;
                }
            }
        }

        debug!(
            collections = collections.len(),
            found = items.len(),
            "Per-collection item search finished"
        );
        items.truncate(limit);
        Ok(items)
    }
}

#[async_trait::async_trait]
impl ToolHandler for SearchItemsTool {
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
        let params: SearchItemsParams = parse_arguments(arguments)?;
        Self::execute(&params, context.client()).await
    }
}

fn format_items(items: &[Item], collection: Option<&str>) -> String {
    let mut response = format!("Found {} items", items.len());
    if let Some(collection) = collection {
        response.push_str(&format!(" in collection \"{}\"", collection));
    }
    response.push_str(":\n\n");

    for item in items {
        response.push_str(&format!("**{}**\n", item.id));
        if let Some(title) = &item.properties.title {
            response.push_str(&format!("  Title: {}\n", title));
        }
        if let Some(datetime) = &item.properties.datetime {
            response.push_str(&format!("  Date: {}\n", datetime));
        }
        response.push('\n');
    }
    response
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

    #[tokio::test]
    async fn test_search_within_collection() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/collections/sentinel-2-l2a/items"))
            .and(query_param("limit", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "features": [
                    {
                        "id": "S2A_1",
                        "properties": { "datetime": "2023-05-01T10:00:00Z", "title": "Tile 1" }
                    },
                    item_json("S2A_2", None)
                ]
            })))
            .mount(&server)
            .await;

        let context = test_context(&server.uri());
        let params = SearchItemsParams {
            collection: Some("sentinel-2-l2a".to_string()),
            limit: Some(2),
            ..Default::default()
        };
        let result = SearchItemsTool::execute(&params, context.client())
            .await
            .unwrap();

        let text = result_text(&result);
        assert!(text.starts_with("Found 2 items in collection \"sentinel-2-l2a\":"));
        assert!(text.contains("**S2A_1**\n  Title: Tile 1\n  Date: 2023-05-01T10:00:00Z\n"));
        assert!(text.contains("**S2A_2**\n"));
    }

    #[tokio::test]
    async fn test_bbox_is_forwarded_in_order() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_partial_json(json!({
                "bbox": [10.0, 20.0, 30.0, 40.0],
                "limit": 10
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(items_json("hit", 1)))
            .expect(1)
            .mount(&server)
            .await;

        let context = test_context(&server.uri());
        let params: SearchItemsParams =
            serde_json::from_value(json!({ "bbox": [10, 20, 30, 40] })).unwrap();
        let result = SearchItemsTool::execute(&params, context.client())
            .await
            .unwrap();

        assert!(result_text(&result).starts_with("Found 1 items:"));
    }

    #[tokio::test]
    async fn test_bbox_is_forwarded_to_collection_items() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/collections/landsat/items"))
            .and(query_param("bbox", "10,20,30,40"))
            .and(query_param("datetime", "2020-01-01/2020-12-31"))
            .respond_with(ResponseTemplate::new(200).set_body_json(items_json("l", 1)))
            .expect(1)
            .mount(&server)
            .await;

        let context = test_context(&server.uri());
        let params = SearchItemsParams {
            collection: Some("landsat".to_string()),
            bbox: Some([10.0, 20.0, 30.0, 40.0]),
            datetime: Some("2020-01-01/2020-12-31".to_string()),
            ..Default::default()
        };
        let result = SearchItemsTool::execute(&params, context.client())
            .await
            .unwrap();

        assert!(result_text(&result).contains("**l-0**"));
    }

    #[tokio::test]
    async fn test_fallback_skips_failing_collections() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/collections"))
            .and(query_param("limit", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "collections": [ { "id": "broken" }, { "id": "good" } ]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/collections/broken/items"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/collections/good/items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(items_json("good", 3)))
            .mount(&server)
            .await;

        let context = test_context(&server.uri());
        let result = SearchItemsTool::execute(&SearchItemsParams::default(), context.client())
            .await
            .unwrap();

        let text = result_text(&result);
        assert!(text.starts_with("Found 3 items:"));
        for id in ["good-0", "good-1", "good-2"] {
            assert!(text.contains(&format!("**{}**", id)));
        }
    }

    #[tokio::test]
    async fn test_fallback_truncates_to_limit() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(405))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/collections"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "collections": [ { "id": "a" }, { "id": "b" } ]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/collections/a/items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(items_json("a", 2)))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/collections/b/items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(items_json("b", 2)))
            .mount(&server)
            .await;

        let context = test_context(&server.uri());
        let params = SearchItemsParams {
            limit: Some(3),
            ..Default::default()
        };
        let result = SearchItemsTool::execute(&params, context.client())
            .await
            .unwrap();

        let text = result_text(&result);
        assert!(text.starts_with("Found 3 items:"));
        assert!(text.contains("**b-0**"));
        assert!(!text.contains("**b-1**"));
    }

    #[tokio::test]
    async fn test_fallback_fails_when_collections_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/collections"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let context = test_context(&server.uri());
        let err = SearchItemsTool::execute(&SearchItemsParams::default(), context.client())
            .await
            .unwrap_err();

        assert!(err.to_string().starts_with("Failed to search collections"));
    }

    #[tokio::test]
    async fn test_search_caps_oversized_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_partial_json(json!({ "limit": 2 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(items_json("s", 5)))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/collections/naip/items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(items_json("n", 5)))
            .mount(&server)
            .await;

        let context = test_context(&server.uri());

        let params: SearchItemsParams = serde_json::from_value(json!({ "limit": 2.0 })).unwrap();
        let result = SearchItemsTool::execute(&params, context.client())
            .await
            .unwrap();
        assert!(result_text(&result).starts_with("Found 2 items:"));

        let params = SearchItemsParams {
            collection: Some("naip".to_string()),
            limit: Some(2),
            ..Default::default()
        };
        let result = SearchItemsTool::execute(&params, context.client())
            .await
            .unwrap();
        let text = result_text(&result);
        assert!(text.starts_with("Found 2 items in collection \"naip\":"));
        assert!(!text.contains("**n-2**"));
    }

    #[test]
    fn test_bbox_must_have_four_values() {
        let parsed = serde_json::from_value::<SearchItemsParams>(json!({ "bbox": [1, 2, 3] }));
        assert!(parsed.is_err());
    }
}
