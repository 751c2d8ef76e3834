//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools, in advertised order
//! - Dispatch of tool calls by name for every transport
//! - Tool metadata for listing

use std::sync::Arc;

use rmcp::model::{CallToolResult, JsonObject, Tool};
use tracing::{debug, error, warn};

use super::definitions::common::error_result;
use super::definitions::{
    GetCollectionTool, GetItemTool, GetStatisticsTool, SearchCollectionsTool, SearchItemsTool,
};
use super::{ToolContext, ToolError, ToolHandler};

/// Tool registry - manages all available tools.
///
/// This is the single source of truth for the tool set: both the rmcp
/// handler and the HTTP transport list and call tools through it.
pub struct ToolRegistry {
    context: Arc<ToolContext>,
    tools: Vec<Box<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// Create a registry holding every STAC tool.
    pub fn new(context: Arc<ToolContext>) -> Self {
        let tools: Vec<Box<dyn ToolHandler>> = vec![
            Box::new(SearchCollectionsTool),
            Box::new(SearchItemsTool),
            Box::new(GetCollectionTool),
            Box::new(GetItemTool),
            Box::new(GetStatisticsTool),
        ];
        Self { context, tools }
    }

    /// The context shared by every tool call.
    pub fn context(&self) -> &ToolContext {
        &self.context
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    /// Get all tools as Tool models (metadata).
    pub fn list_definitions(&self) -> Vec<Tool> {
        self.tools.iter().map(|tool| tool.definition()).collect()
    }

    /// Find a tool by name.
    pub fn lookup(&self, name: &str) -> Option<&dyn ToolHandler> {
        self.tools
            .iter()
            .find(|tool| tool.name() == name)
            .map(|tool| tool.as_ref())
    }

    /// Dispatch a tool call to the matching handler.
    ///
    /// Never fails: unknown tools, bad arguments and upstream errors all
    /// come back as an error-flagged result.
    pub async fn dispatch(&self, name: &str, arguments: JsonObject) -> CallToolResult {
        debug!("Dispatching tool call: {}", name);

        let outcome = match self.lookup(name) {
            Some(tool) => tool.call(&self.context, arguments).await,
            None => Err(ToolError::unknown_tool(name)),
        };

        match outcome {
            Ok(result) => {
                debug!("Tool {} completed", name);
                result
            }
            Err(e) => {
                match &e {
                    ToolError::Stac(_) => error!("Tool {} failed: {}", name, e),
                    _ => warn!("Tool {} rejected: {}", name, e),
                }
                error_result(format!("Error executing {}: {}", name, e))
            }
        }
    }
}
