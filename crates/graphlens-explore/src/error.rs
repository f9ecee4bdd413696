//! Error types for the graphlens-explore crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExploreError {
    #[error("query endpoint error: {0}")]
    Api(#[from] graphlens_client::ApiError),

    #[error("node type {label:?} is not present in the schema")]
    SchemaMismatch { label: String },

    #[error("node type {label:?} declares no primary key")]
    MissingPrimaryKey { label: String },

    #[error("node {node_id:?} has no value for key property {property:?}")]
    MissingKeyProperty { node_id: String, property: String },

    #[error("node {node_id:?} is not in the current graph")]
    NodeNotFound { node_id: String },

    #[error("node {node_id:?} already has an expansion in flight")]
    ExpansionPending { node_id: String },

    #[error(transparent)]
    UnsafeIdentifier(#[from] graphlens_client::queries::UnsafeIdentifier),
}

pub type Result<T> = std::result::Result<T, ExploreError>;
