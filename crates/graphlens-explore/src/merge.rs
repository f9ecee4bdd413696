//! Fragment merging into the accumulated graph.
//!
//! Merging is append-only: existing entries always win, counts never
//! decrease, and a fragment is only merged after its query and
//! normalization fully succeeded — there are no partial merges.

use graphlens_core::types::GraphData;

/// What one merge actually added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MergeStats {
    pub nodes_added: usize,
    pub links_added: usize,
}

/// Fold a freshly normalized fragment into the accumulated graph.
///
/// Nodes dedupe by id; links dedupe by their directed
/// (source, target, type) triple.
pub fn merge_fragment(graph: &mut GraphData, fragment: GraphData) -> MergeStats {
    let mut stats = MergeStats::default();
    for node in fragment.nodes {
        if graph.insert_node(node) {
            stats.nodes_added += 1;
        }
    }
    for link in fragment.links {
        if graph.insert_link(link) {
            stats.links_added += 1;
        }
    }
    stats
}
