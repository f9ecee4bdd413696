//! graphlens-core: Shared types and configuration for the graphlens explorer.
//!
//! This crate provides the canonical graph representation exchanged between
//! the query layer and the renderer:
//! - GraphData (nodes + links) with append-and-deduplicate primitives
//! - Schema descriptors for the remote store's type system
//! - Expansion bookkeeping keys
//! - Configuration management

pub mod config;
pub mod types;

pub use config::ExploreConfig;
pub use types::{
    Direction, ExpansionKey, ExpansionState, GraphData, GraphLink, GraphNode, Schema,
};
