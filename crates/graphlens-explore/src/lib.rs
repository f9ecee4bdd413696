//! graphlens-explore: schema introspection, result normalization, and the
//! incremental node-expansion engine for the graph explorer.
//!
//! The presentation layer drives one [`ExploreSession`] per graph view:
//! `run_query` renders the initial result, `expand` pulls in a node's
//! neighbors, and `current_graph` reads the accumulated state. Layout,
//! physics, and gesture handling live entirely in the renderer.

pub mod display;
pub mod error;
pub mod merge;
pub mod normalize;
pub mod planner;
pub mod schema;

pub use error::ExploreError;
pub use merge::MergeStats;

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use graphlens_client::{ApiClient, ApiConfig};
use graphlens_core::types::{Direction, ExpansionKey, ExpansionState, GraphData, GraphNode, Schema};
use graphlens_core::ExploreConfig;

use crate::error::Result;
use crate::schema::SchemaCache;

/// Outcome of an [`ExploreSession::expand`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpandOutcome {
    /// Fresh data was fetched and folded into the graph.
    Merged(MergeStats),
    /// This (node, relationship, direction) combination was already
    /// fetched; no remote call was made.
    AlreadyExpanded,
    /// A new base query superseded the view while the fetch was in flight;
    /// the late result was discarded, nothing was merged.
    Superseded,
}

/// Mutable per-view state, guarded so expansion tasks never race.
#[derive(Debug, Default)]
struct ViewState {
    graph: GraphData,
    expansion: ExpansionState,
    /// Node ids with an expansion currently in flight.
    pending: HashSet<String>,
    /// Bumped by every base query; expansions planned under an older epoch
    /// discard their results instead of merging into the new view.
    epoch: u64,
}

/// One graph-view session.
///
/// Owns exactly one accumulated graph, one schema cache, and one expansion
/// state; none of them are shared across sessions. The graph grows
/// monotonically: successful expansions only append.
pub struct ExploreSession {
    client: ApiClient,
    schema: SchemaCache,
    config: ExploreConfig,
    state: Mutex<ViewState>,
}

impl ExploreSession {
    pub fn new(config: ExploreConfig) -> Result<Self> {
        let client = ApiClient::new(&ApiConfig {
            base_url: config.endpoint.clone(),
            timeout_secs: config.request_timeout_secs,
        })?;
        Ok(Self {
            schema: SchemaCache::new(client.clone(), config.reserved_prefix.clone()),
            client,
            config,
            state: Mutex::new(ViewState::default()),
        })
    }

    /// Run a base query and make its normalized result the current graph.
    ///
    /// Resets the expansion state, releases pending marks, and supersedes
    /// any expansion still in flight: a late result from the previous view
    /// is discarded, never merged.
    pub async fn run_query(&self, query: &str) -> Result<GraphData> {
        let response = self.client.execute(query).await?;
        let (graph, report) = normalize::normalize_rows(&response.data);
        if report.dropped_links > 0 {
            tracing::debug!(
                dropped = report.dropped_links,
                "base query contained unresolved relationship endpoints"
            );
        }
        tracing::info!(
            nodes = graph.node_count(),
            links = graph.link_count(),
            elapsed_ms = response.execution_time_ms,
            "base query rendered"
        );

        let mut view = self.view();
        view.epoch += 1;
        // Marks held by superseded expansions would otherwise block the
        // fresh view until the stale fetches drain; their results are
        // discarded by the epoch check regardless.
        view.pending.clear();
        view.expansion = ExpansionState::default();
        view.graph = graph;
        Ok(view.graph.clone())
    }

    /// Fetch the neighbors of `node_id` and merge them into the graph.
    ///
    /// Idempotent per (node, relationship type, direction): a combination
    /// already recorded performs zero remote calls. A node with an
    /// expansion already in flight is rejected rather than raced. On any
    /// failure nothing is merged and the expansion state is untouched, so
    /// the operation can simply be retried. The in-flight mark is released
    /// on every exit path, including a caller dropping the future
    /// mid-fetch.
    pub async fn expand(
        &self,
        node_id: &str,
        rel_type: Option<&str>,
        direction: Direction,
    ) -> Result<ExpandOutcome> {
        let key = ExpansionKey {
            node_id: node_id.to_string(),
            rel_type: rel_type.map(str::to_string),
            direction,
        };

        let (node, planned_epoch) = {
            let mut view = self.view();
            if view.expansion.contains(&key) {
                tracing::debug!(node = node_id, "expansion already fetched, skipping remote call");
                return Ok(ExpandOutcome::AlreadyExpanded);
            }
            let node = view
                .graph
                .node(node_id)
                .cloned()
                .ok_or_else(|| ExploreError::NodeNotFound {
                    node_id: node_id.to_string(),
                })?;
            if !view.pending.insert(node_id.to_string()) {
                return Err(ExploreError::ExpansionPending {
                    node_id: node_id.to_string(),
                });
            }
            (node, view.epoch)
        };
        // Dropped on every exit from this point on, awaits included.
        let _pending = PendingGuard {
            session: self,
            node_id: node_id.to_string(),
            epoch: planned_epoch,
        };

        let fetched = self.fetch_neighbors(&node, rel_type, direction).await;

        let mut view = self.view();
        let fragment = fetched?;

        if view.epoch != planned_epoch {
            tracing::debug!(node = node_id, "discarding expansion result for a superseded view");
            return Ok(ExpandOutcome::Superseded);
        }

        let stats = merge::merge_fragment(&mut view.graph, fragment);
        view.expansion.record(key);
        tracing::info!(
            node = node_id,
            nodes_added = stats.nodes_added,
            links_added = stats.links_added,
            "expansion merged"
        );
        Ok(ExpandOutcome::Merged(stats))
    }

    /// Snapshot of the accumulated graph.
    pub fn current_graph(&self) -> GraphData {
        self.view().graph.clone()
    }

    /// The cached schema, introspecting on first use.
    pub async fn schema(&self) -> Result<&Schema> {
        self.schema.get().await
    }

    /// Snapshot of the expansion bookkeeping.
    pub fn expansion_state(&self) -> ExpansionState {
        self.view().expansion.clone()
    }

    async fn fetch_neighbors(
        &self,
        node: &GraphNode,
        rel_type: Option<&str>,
        direction: Direction,
    ) -> Result<GraphData> {
        let schema = self.schema.get().await?;
        let planned = planner::plan_expansion(
            schema,
            node,
            rel_type,
            direction,
            self.config.expansion_limit,
        )?;

        let response = self
            .client
            .execute_with_params(&planned.query.text, planned.query.params)
            .await?;

        let (fragment, report) = normalize::normalize_rows(&response.data);
        if report.dropped_links > 0 {
            tracing::debug!(
                node = %planned.key.node_id,
                dropped = report.dropped_links,
                "expansion contained unresolved relationship endpoints"
            );
        }
        Ok(fragment)
    }

    fn view(&self) -> MutexGuard<'_, ViewState> {
        // Poisoning only matters if a holder panicked mid-update; the state
        // is still structurally valid, so recover the guard.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Releases a node's in-flight mark when the owning expansion ends,
/// whether it completed, failed, or was dropped mid-fetch.
struct PendingGuard<'a> {
    session: &'a ExploreSession,
    node_id: String,
    epoch: u64,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let mut view = self.session.view();
        // An epoch bump means run_query already cleared the marks; the
        // entry under this node id, if any, belongs to the newer view.
        if view.epoch == self.epoch {
            view.pending.remove(&self.node_id);
        }
    }
}
