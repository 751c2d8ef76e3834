//! Tools domain module.
//!
//! Tools are the functions MCP clients call to query the STAC catalog.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `handlers.rs` - The [`ToolHandler`] trait and shared [`ToolContext`]
//! - `registry.rs` - Central tool registry and dispatch
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `my_tool.rs`)
//! 2. Define params, `execute()` and the [`ToolHandler`] impl
//! 3. Export in `definitions/mod.rs`
//! 4. Register it in `ToolRegistry::new`

pub mod definitions;
mod error;
mod handlers;
mod registry;

pub use error::ToolError;
pub use handlers::*;
pub use registry::ToolRegistry;
