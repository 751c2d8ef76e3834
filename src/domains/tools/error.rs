//! Tool-specific error types.

use thiserror::Error;

use crate::stac::StacError;

/// Errors that can occur during tool operations.
///
/// The dispatcher renders every variant into an error-flagged tool result,
/// so the display text is what the calling agent reads.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool is registered under the requested name.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Invalid arguments were provided to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The STAC API call behind the tool failed.
    #[error(transparent)]
    Stac(#[from] StacError),
}

impl ToolError {
    /// Create a new "unknown tool" error.
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }
}
