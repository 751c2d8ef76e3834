//! STAC API adapter.
//!
//! - `types.rs` - STAC documents (collections, items, search requests)
//! - `client.rs` - HTTP client for the STAC API endpoints
//! - `error.rs` - Error taxonomy shared by all client operations

mod client;
mod error;
pub mod types;

pub use client::StacClient;
pub use error::{StacError, StacErrorKind, StacResult};
pub use types::{
    BBox, Collection, Conformance, Item, ItemCollection, ItemsQuery, SearchParams,
};
