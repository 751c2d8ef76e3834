//! Domains module containing the server's business logic.
//!
//! The only domain is `tools`: the STAC operations exposed to MCP clients.

pub mod tools;
