//! Canonical graph, schema, and expansion-state types.
//!
//! These are the types the renderer consumes. Node ids are deterministic
//! strings computed during normalization, stable across fetches of the same
//! underlying entity.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Graph ─────────────────────────────────────────────────────────

/// A visual/logical vertex representing one entity instance from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Deterministic id: natural key when the type has one, otherwise the
    /// store's internal identity.
    pub id: String,
    /// Entity type name.
    pub label: String,
    /// Derived display name.
    pub name: String,
    /// Derived color, keyed by type.
    pub color: String,
    /// Relative visual weight.
    pub val: f64,
    /// Raw properties as returned by the store.
    pub properties: Map<String, Value>,
}

/// A connection between two nodes, identified by its directed
/// (source, target, type) triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub rel_type: String,
    pub properties: Map<String, Value>,
}

/// The accumulated node/link graph for one view session.
///
/// Mutated only by append-and-deduplicate operations; entries are never
/// rewritten or pruned for the life of the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl GraphData {
    /// Append a node unless one with the same id is already present.
    /// First occurrence wins; returns whether the node was added.
    pub fn insert_node(&mut self, node: GraphNode) -> bool {
        if self.nodes.iter().any(|n| n.id == node.id) {
            return false;
        }
        self.nodes.push(node);
        true
    }

    /// Append a link unless the same directed (source, target, type) triple
    /// is already present. Parallel edges of one type between the same
    /// ordered pair collapse into a single link.
    pub fn insert_link(&mut self, link: GraphLink) -> bool {
        if self.links.iter().any(|l| {
            l.source == link.source && l.target == link.target && l.rel_type == link.rel_type
        }) {
            return false;
        }
        self.links.push(link);
        true
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }
}

// ── Schema ────────────────────────────────────────────────────────

/// One property of an entity or relationship type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDef {
    pub name: String,
    /// Type name as declared by the store (e.g. "STRING", "INT64").
    pub declared_type: String,
    pub is_primary_key: bool,
}

/// An entity type with its declared properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTypeDef {
    pub name: String,
    pub properties: Vec<PropertyDef>,
}

impl NodeTypeDef {
    /// The declared primary-key property, if the type has one.
    pub fn primary_key(&self) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.is_primary_key)
    }
}

/// An allowed (source type, destination type) pair for a relationship type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectivityPair {
    pub source: String,
    pub dest: String,
}

/// A relationship type with its properties and endpoint connectivity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelTypeDef {
    pub name: String,
    pub properties: Vec<PropertyDef>,
    pub connectivity: Vec<ConnectivityPair>,
}

/// The remote store's type system, fetched once per session and immutable
/// for the session lifetime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub node_types: Vec<NodeTypeDef>,
    pub rel_types: Vec<RelTypeDef>,
    /// True when at least one table failed introspection and was skipped.
    pub partial: bool,
}

impl Schema {
    pub fn node_type(&self, name: &str) -> Option<&NodeTypeDef> {
        self.node_types.iter().find(|t| t.name == name)
    }

    pub fn rel_type(&self, name: &str) -> Option<&RelTypeDef> {
        self.rel_types.iter().find(|t| t.name == name)
    }
}

// ── Expansion ─────────────────────────────────────────────────────

/// Direction of a neighbor expansion relative to the selected node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Incoming,
    Outgoing,
    #[default]
    Both,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Incoming => write!(f, "incoming"),
            Direction::Outgoing => write!(f, "outgoing"),
            Direction::Both => write!(f, "both"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown direction {0:?} (expected incoming, outgoing, or both)")]
pub struct ParseDirectionError(String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "incoming" | "in" => Ok(Direction::Incoming),
            "outgoing" | "out" => Ok(Direction::Outgoing),
            "both" => Ok(Direction::Both),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

/// Canonical key for one expansion operation.
///
/// Expanding the same node through relationship X and through relationship Y
/// are different operations and must not collapse into one state bit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpansionKey {
    pub node_id: String,
    /// None means all relationship types.
    pub rel_type: Option<String>,
    pub direction: Direction,
}

/// The set of expansions already fetched for a session.
///
/// Makes repeated expansion requests idempotent: a key recorded here means
/// the identical request performs zero remote calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpansionState {
    fetched: HashSet<ExpansionKey>,
}

impl ExpansionState {
    pub fn contains(&self, key: &ExpansionKey) -> bool {
        self.fetched.contains(key)
    }

    /// Record a completed expansion. Only called after a successful merge.
    pub fn record(&mut self, key: ExpansionKey) {
        self.fetched.insert(key);
    }

    pub fn len(&self) -> usize {
        self.fetched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fetched.is_empty()
    }
}
