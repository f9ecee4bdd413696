//! Schema introspection and per-session caching.
//!
//! The remote store's type system is enumerated once: all tables, then each
//! table's properties (with the primary-key flag), then each relationship
//! table's endpoint connectivity. The result is immutable for the session
//! lifetime; there is no invalidation mechanism.

use serde_json::Value;
use tokio::sync::OnceCell;

use graphlens_client::queries;
use graphlens_client::{ApiClient, ApiError};
use graphlens_core::types::{ConnectivityPair, NodeTypeDef, PropertyDef, RelTypeDef, Schema};

use crate::error::Result;

/// Caches the store schema for the life of a session.
///
/// Concurrent callers asking before the schema is ready share a single
/// in-flight introspection instead of each issuing the full multi-request
/// sequence. A failed build leaves the cache empty so the next caller
/// retries.
pub struct SchemaCache {
    client: ApiClient,
    reserved_prefix: String,
    cell: OnceCell<Schema>,
}

impl SchemaCache {
    pub fn new(client: ApiClient, reserved_prefix: String) -> Self {
        Self {
            client,
            reserved_prefix,
            cell: OnceCell::new(),
        }
    }

    /// Get the cached schema, introspecting on first use.
    pub async fn get(&self) -> Result<&Schema> {
        self.cell
            .get_or_try_init(|| introspect(&self.client, &self.reserved_prefix))
            .await
    }
}

async fn introspect(client: &ApiClient, reserved_prefix: &str) -> Result<Schema> {
    let tables = client.execute(&queries::list_tables().text).await?;

    let mut node_types = Vec::new();
    let mut rel_types = Vec::new();
    let mut partial = false;

    for row in &tables.data {
        let Some(name) = row.get("name").and_then(Value::as_str) else {
            continue;
        };
        if !reserved_prefix.is_empty() && name.starts_with(reserved_prefix) {
            continue;
        }
        let kind = row.get("type").and_then(Value::as_str).unwrap_or_default();

        // Partial-failure policy: a table that cannot be described is
        // skipped, not fatal. Typed expansion is simply unavailable for
        // nodes of that type.
        let properties = match fetch_properties(client, name).await {
            Ok(props) => props,
            Err(e) => {
                tracing::warn!(table = name, error = %e, "skipping table: property introspection failed");
                partial = true;
                continue;
            }
        };

        match kind {
            "NODE" => node_types.push(NodeTypeDef {
                name: name.to_string(),
                properties,
            }),
            "REL" => match fetch_connectivity(client, name).await {
                Ok(connectivity) => rel_types.push(RelTypeDef {
                    name: name.to_string(),
                    properties,
                    connectivity,
                }),
                Err(e) => {
                    tracing::warn!(table = name, error = %e, "skipping relationship: connectivity introspection failed");
                    partial = true;
                }
            },
            _ => {}
        }
    }

    tracing::info!(
        node_types = node_types.len(),
        rel_types = rel_types.len(),
        partial,
        "schema introspected"
    );

    Ok(Schema {
        node_types,
        rel_types,
        partial,
    })
}

async fn fetch_properties(client: &ApiClient, table: &str) -> std::result::Result<Vec<PropertyDef>, ApiError> {
    let response = client.execute(&queries::table_info(table).text).await?;
    let properties = response
        .data
        .iter()
        .filter_map(|row| {
            Some(PropertyDef {
                name: row.get("name")?.as_str()?.to_string(),
                declared_type: row
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                is_primary_key: row
                    .get("primary key")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            })
        })
        .collect();
    Ok(properties)
}

async fn fetch_connectivity(
    client: &ApiClient,
    table: &str,
) -> std::result::Result<Vec<ConnectivityPair>, ApiError> {
    let response = client
        .execute(&queries::table_connectivity(table).text)
        .await?;
    let connectivity = response
        .data
        .iter()
        .filter_map(|row| {
            Some(ConnectivityPair {
                source: row.get("source table name")?.as_str()?.to_string(),
                dest: row.get("destination table name")?.as_str()?.to_string(),
            })
        })
        .collect();
    Ok(connectivity)
}
