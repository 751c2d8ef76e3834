//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file.

pub mod common;
mod get_collection;
mod get_item;
mod get_statistics;
mod search_collections;
mod search_items;

pub use get_collection::{GetCollectionParams, GetCollectionTool};
pub use get_item::{GetItemParams, GetItemTool};
pub use get_statistics::{GetStatisticsParams, GetStatisticsTool};
pub use search_collections::{SearchCollectionsParams, SearchCollectionsTool};
pub use search_items::{SearchItemsParams, SearchItemsTool};
