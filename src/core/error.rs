//! Error types and handling for the MCP server.
//!
//! This module defines the unified error type for server startup and
//! lifecycle. Tool failures never reach it: the tool registry turns them
//! into error-flagged tool results.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// The STAC API client could not be built.
    #[error("STAC error: {0}")]
    Stac(#[from] crate::stac::StacError),

    /// Error originating from the transport layer.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),

    /// Configuration-related errors. Fatal at startup.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
