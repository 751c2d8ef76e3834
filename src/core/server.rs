//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating tool listing and calls to the [`ToolRegistry`].
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool
//! and registered in `domains/tools/registry.rs`. Adding a tool does not
//! require modifying this file.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::config::Config;
use crate::domains::tools::{ToolContext, ToolRegistry};

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp. Cloning is
/// cheap: configuration and registry are shared.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Registered STAC tools.
    registry: Arc<ToolRegistry>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration and tool context.
    pub fn new(config: Config, context: ToolContext) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(ToolRegistry::new(Arc::new(context))),
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the tool registry.
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// List all available tools.
    pub fn list_tools(&self) -> Vec<Tool> {
        self.registry.list_definitions()
    }

    /// Call a tool by name. Failures are reported inside the result.
    pub async fn call_tool(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        self.registry
            .dispatch(name, arguments.unwrap_or_default())
            .await
    }

    /// Check that the configured STAC API answers and log what it conforms to.
    ///
    /// Only logs: an unreachable API at startup does not stop the server.
    pub async fn probe_upstream(&self) -> bool {
        let client = self.registry.context().client();

        if !client.health_check().await {
            warn!(
                "STAC API at {} is not reachable; tool calls will fail until it is",
                self.config.stac.api_url
            );
            return false;
        }

        match client.get_conformance().await {
            Ok(conformance) => info!(
                "STAC API at {} is reachable ({} conformance classes)",
                self.config.stac.api_url,
                conformance.conforms_to.len()
            ),
            Err(e) => info!(
                "STAC API at {} is reachable; conformance unavailable: {}",
                self.config.stac.api_url, e
            ),
        }
        true
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "This server exposes a STAC (SpatioTemporal Asset Catalog) API. Use the tools \
                 to search collections and items, inspect them, and summarize the catalog."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        info!("Listing tools");
        Ok(ListToolsResult {
            tools: self.list_tools(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        info!("Calling tool: {}", request.name);
        Ok(McpServer::call_tool(self, &request.name, request.arguments).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::StacConfig;
    use crate::stac::StacClient;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_server(base_url: &str) -> McpServer {
        let mut config = Config::default();
        config.stac.api_url = base_url.to_string();
        let client = StacClient::new(&StacConfig {
            api_url: base_url.to_string(),
            timeout_ms: 5_000,
        })
        .unwrap();
        McpServer::new(config, ToolContext::from_client(client))
    }

    #[test]
    fn test_server_info() {
        let server = test_server("http://localhost:8080");
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
        assert_eq!(info.server_info.name, server.name());
    }

    #[test]
    fn test_lists_five_tools() {
        let server = test_server("http://localhost:8080");
        assert_eq!(server.list_tools().len(), 5);
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let server = test_server("http://localhost:8080");
        let result = server.call_tool("nope", None).await;
        assert_eq!(result.is_error, Some(true));
    }

    #[tokio::test]
    async fn test_probe_upstream() {
        let mock = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&mock)
            .await;
        Mock::given(method("GET"))
            .and(path("/conformance"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "conformsTo": ["https://api.stacspec.org/v1.0.0/core"]
            })))
            .mount(&mock)
            .await;

        assert!(test_server(&mock.uri()).probe_upstream().await);
    }

    #[tokio::test]
    async fn test_probe_unreachable_upstream() {
        assert!(!test_server("http://127.0.0.1:1").probe_upstream().await);
    }
}
