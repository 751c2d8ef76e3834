//! HTTP client for the STAC API.
//!
//! All calls go through [`StacClient`], which turns transport and response
//! failures into [`StacError`] values carrying the failed operation.

use reqwest::{Client, RequestBuilder, header};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, error};
use url::Url;

use super::error::{StacError, StacErrorKind, StacResult};
use super::types::{
    Collection, CollectionList, Conformance, Item, ItemCollection, ItemsQuery, SearchParams,
};
use crate::core::config::StacConfig;

/// Client for a STAC API server.
///
/// Cheap to clone: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct StacClient {
    client: Client,
    base_url: Url,
}

impl StacClient {
    /// Create a client from the STAC section of the configuration.
    pub fn new(config: &StacConfig) -> StacResult<Self> {
        let context = "Failed to create STAC client";

        let base_url = Url::parse(&config.api_url)
            .map_err(|e| StacError::new(context, StacErrorKind::request(e.to_string())))?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| StacError::new(context, StacErrorKind::request(e.to_string())))?;

        debug!(base_url = %base_url, timeout_ms = config.timeout_ms, "StacClient initialized");

        Ok(Self { client, base_url })
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ========================================================================
    // Collections
    // ========================================================================

    /// List up to `limit` collections (`GET /collections`).
    pub async fn search_collections(&self, limit: u32) -> StacResult<Vec<Collection>> {
        debug!(limit, "Searching collections");

        let mut list: CollectionList = self
            .get_with_query(&["collections"], &[("limit", limit)])
            .await
            .map_err(|kind| StacError::new("Failed to search collections", kind))?;

        // Some servers ignore `limit` on /collections.
        list.collections.truncate(limit as usize);

        debug!(count = list.collections.len(), "Collections search successful");
        Ok(list.collections)
    }

    /// Fetch one collection (`GET /collections/{id}`).
    pub async fn get_collection(&self, collection_id: &str) -> StacResult<Collection> {
        self.get(&["collections", collection_id])
            .await
            .map_err(|kind| {
                StacError::new(format!("Failed to get collection {}", collection_id), kind)
            })
    }

    /// Create a collection (`POST /collections`).
    pub async fn create_collection(&self, collection: &Collection) -> StacResult<Collection> {
        debug!(collection_id = %collection.id, "Creating collection");

        self.post(&["collections"], collection)
            .await
            .map_err(|kind| StacError::new("Failed to create collection", kind))
    }

    // ========================================================================
    // Items
    // ========================================================================

    /// Cross-collection item search (`POST /search`).
    pub async fn search_items(&self, params: &SearchParams) -> StacResult<ItemCollection> {
        debug!(?params, "Searching items");

        let mut result: ItemCollection = self
            .post(&["search"], params)
            .await
            .map_err(|kind| StacError::new("Failed to search items", kind))?;

        cap_features(&mut result, params.limit);
        Ok(result)
    }

    /// Items of one collection (`GET /collections/{id}/items`).
    pub async fn get_collection_items(
        &self,
        collection_id: &str,
        query: &ItemsQuery,
    ) -> StacResult<ItemCollection> {
        debug!(collection_id, ?query, "Getting collection items");

        let mut result: ItemCollection = self
            .get_with_query(&["collections", collection_id, "items"], query)
            .await
            .map_err(|kind| {
                StacError::new(
                    format!("Failed to get items from collection {}", collection_id),
                    kind,
                )
            })?;

        cap_features(&mut result, query.limit);
        Ok(result)
    }

    /// Fetch one item (`GET /collections/{id}/items/{item_id}`).
    pub async fn get_item(&self, collection_id: &str, item_id: &str) -> StacResult<Item> {
        self.get(&["collections", collection_id, "items", item_id])
            .await
            .map_err(|kind| {
                StacError::new(
                    format!(
                        "Failed to get item {} from collection {}",
                        item_id, collection_id
                    ),
                    kind,
                )
            })
    }

    /// Add an item to a collection (`POST /collections/{id}/items`).
    pub async fn add_item(&self, collection_id: &str, item: &Item) -> StacResult<Item> {
        debug!(collection_id, item_id = %item.id, "Adding item");

        self.post(&["collections", collection_id, "items"], item)
            .await
            .map_err(|kind| {
                StacError::new(
                    format!("Failed to add item to collection {}", collection_id),
                    kind,
                )
            })
    }

    // ========================================================================
    // Service
    // ========================================================================

    /// Whether the API root answers with a success status. Never fails.
    pub async fn health_check(&self) -> bool {
        match self.client.get(self.base_url.clone()).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Health check failed: {}", e);
                false
            }
        }
    }

    /// Conformance classes implemented by the API (`GET /conformance`).
    pub async fn get_conformance(&self) -> StacResult<Conformance> {
        self.get(&["conformance"])
            .await
            .map_err(|kind| StacError::new("Failed to get conformance", kind))
    }

    // ========================================================================
    // Request plumbing
    // ========================================================================

    /// Build an endpoint URL by appending percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, StacErrorKind> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                StacErrorKind::request(format!("{} cannot be used as a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, StacErrorKind> {
        let url = self.endpoint(segments)?;
        debug!(url = %url, "GET request");

        self.execute(self.client.get(url)).await
    }

    async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        query: &Q,
    ) -> Result<T, StacErrorKind> {
        let mut url = self.endpoint(segments)?;
        let encoded =
            serde_urlencoded::to_string(query).map_err(|e| StacErrorKind::request(e.to_string()))?;
        if !encoded.is_empty() {
            url.set_query(Some(&encoded));
        }
        debug!(url = %url, "GET request with query");

        self.execute(self.client.get(url)).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, StacErrorKind> {
        let url = self.endpoint(segments)?;
        debug!(url = %url, "POST request");

        self.execute(self.client.post(url).json(body)).await
    }

    /// Send a request and decode a successful JSON response.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, StacErrorKind> {
        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let kind = StacErrorKind::api(status, &body);
            error!(code = status.as_u16(), "STAC API error response: {}", kind);
            return Err(kind);
        }

        response.json::<T>().await.map_err(|e| {
            error!("Failed to decode STAC API response: {}", e);
            StacErrorKind::decode(e.to_string())
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> StacErrorKind {
        if err.is_builder() {
            error!("Request error: {}", err);
            StacErrorKind::request(err.to_string())
        } else {
            error!(base_url = %self.base_url, "Network error connecting to STAC API: {}", err);
            StacErrorKind::network(self.base_url.as_str().trim_end_matches('/'))
        }
    }
}

/// Drop features past the requested limit; the server may return more.
fn cap_features(result: &mut ItemCollection, limit: Option<u32>) {
    if let Some(limit) = limit {
        result.features.truncate(limit as usize);
    }
}
