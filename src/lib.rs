//! STAC MCP Server Library
//!
//! A Model Context Protocol (MCP) server that lets AI agents explore a
//! SpatioTemporal Asset Catalog (STAC) API through five tools:
//! `search_collections`, `get_collection`, `search_items`, `get_item` and
//! `get_statistics`.
//!
//! # Architecture
//!
//! - **core**: Configuration, error handling, the MCP handler and transports
//! - **domains::tools**: The STAC tools, their registry and dispatch
//! - **stac**: Typed STAC data model and the async HTTP client
//!
//! # Example
//!
//! ```rust,no_run
//! use stac_mcp_server::core::{Config, McpServer, TransportService};
//! use stac_mcp_server::domains::tools::ToolContext;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     config.validate()?;
//!     let context = ToolContext::new(&config)?;
//!     let transport = TransportService::new(config.transport.clone());
//!     transport.run(McpServer::new(config, context)).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;
pub mod stac;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
