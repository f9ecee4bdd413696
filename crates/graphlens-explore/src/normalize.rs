//! Result normalization: tabular query rows into the canonical graph.
//!
//! A cell is a *node object* when it carries the store's identity marker
//! (`_id`) and a type tag (`_label`) but no endpoint markers; it is a
//! *relationship object* when it carries both endpoint markers (`_src`,
//! `_dst`) and a type tag. Everything else is ignored. Malformed cells are
//! skipped, never raised.

use std::collections::HashMap;

use serde_json::{Map, Value};

use graphlens_core::types::{GraphData, GraphLink, GraphNode};

use crate::display;

/// Ordered natural-key candidates per type. The first present property wins;
/// entities without one fall back to the store's internal identity.
const NATURAL_KEYS: &[(&str, &[&str])] = &[("Verse", &["verse_key"]), ("Topic", &["topic_id"])];

/// Non-fatal outcome counters for one normalization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Relationship cells dropped because an endpoint was not present in
    /// the normalized node set. Tolerated by design: a query's columns need
    /// not all belong to one connected subgraph.
    pub dropped_links: usize,
}

/// The store's internal identity reference for a row cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct StoreRef {
    table: i64,
    offset: i64,
}

fn store_ref(value: Option<&Value>) -> Option<StoreRef> {
    let obj = value?.as_object()?;
    Some(StoreRef {
        table: obj.get("table").and_then(Value::as_i64).unwrap_or(0),
        offset: obj.get("offset").and_then(Value::as_i64)?,
    })
}

fn is_node_object(obj: &Map<String, Value>) -> bool {
    obj.contains_key("_id")
        && obj.contains_key("_label")
        && !obj.contains_key("_src")
        && !obj.contains_key("_dst")
}

fn is_rel_object(obj: &Map<String, Value>) -> bool {
    obj.contains_key("_src") && obj.contains_key("_dst") && obj.contains_key("_label")
}

/// Render a scalar value for use inside ids and display names.
pub(crate) fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Compute the deterministic node id for a cell.
///
/// Well-known types use their natural key so the same underlying entity
/// always maps to the same id across fetches; everything else composes the
/// type name with the store's internal identity.
fn node_id(label: &str, props: &Map<String, Value>, internal: StoreRef) -> String {
    if let Some((_, candidates)) = NATURAL_KEYS.iter().find(|(l, _)| *l == label) {
        for key in *candidates {
            if let Some(v) = props.get(*key).filter(|v| !v.is_null()) {
                return format!("{label}-{}", scalar_string(v));
            }
        }
    }
    format!("{label}-{}-{}", internal.offset, internal.table)
}

/// Convert tabular rows into a node/link graph.
///
/// Pure: the same rows always produce the same graph. Node ids dedupe with
/// first occurrence winning; relationships whose endpoints both resolve
/// against the row's node set become links, the rest are dropped and
/// counted in the report. No relationship objects means a node-only graph;
/// edges are never fabricated between nodes that merely share a row.
pub fn normalize_rows(rows: &[Map<String, Value>]) -> (GraphData, NormalizeReport) {
    let mut graph = GraphData::default();
    let mut report = NormalizeReport::default();
    let mut by_internal: HashMap<StoreRef, String> = HashMap::new();

    // First pass: collect nodes.
    for row in rows {
        for value in row.values() {
            let Some(obj) = value.as_object() else {
                continue;
            };
            if !is_node_object(obj) {
                continue;
            }
            let Some(label) = obj.get("_label").and_then(Value::as_str) else {
                continue;
            };
            let Some(internal) = store_ref(obj.get("_id")) else {
                continue;
            };

            let id = node_id(label, obj, internal);
            by_internal.entry(internal).or_insert_with(|| id.clone());

            graph.insert_node(GraphNode {
                id,
                label: label.to_string(),
                name: display::node_display_name(label, obj),
                color: display::node_color(label),
                val: display::node_weight(label),
                properties: obj.clone(),
            });
        }
    }

    // Second pass: resolve relationships against the node set.
    for row in rows {
        for value in row.values() {
            let Some(obj) = value.as_object() else {
                continue;
            };
            if !is_rel_object(obj) {
                continue;
            }
            let Some(rel_type) = obj.get("_label").and_then(Value::as_str) else {
                continue;
            };
            let (Some(src), Some(dst)) = (store_ref(obj.get("_src")), store_ref(obj.get("_dst")))
            else {
                continue;
            };

            match (by_internal.get(&src), by_internal.get(&dst)) {
                (Some(source), Some(target)) => {
                    graph.insert_link(GraphLink {
                        source: source.clone(),
                        target: target.clone(),
                        rel_type: rel_type.to_string(),
                        properties: obj.clone(),
                    });
                }
                _ => {
                    report.dropped_links += 1;
                    tracing::debug!(rel = rel_type, "dropping relationship with unresolved endpoint");
                }
            }
        }
    }

    (graph, report)
}
