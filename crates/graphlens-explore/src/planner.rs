//! Expansion planning: resolve a node against the schema and build the
//! neighbor-discovery query to run next.

use graphlens_client::queries::{self, QuerySpec};
use graphlens_core::types::{Direction, ExpansionKey, GraphNode, Schema};

use crate::error::{ExploreError, Result};

/// A planned expansion: the query to run plus the state key the caller
/// records only after the fetch and merge succeed.
#[derive(Debug, Clone)]
pub struct PlannedExpansion {
    pub query: QuerySpec,
    pub key: ExpansionKey,
}

/// Build the neighbor-discovery query for `node`.
///
/// The node's type must exist in the schema and declare a primary key, and
/// the node must carry a value for it — the primary key is how the store is
/// asked for this exact entity. `rel_type = None` expands across all
/// relationship types.
pub fn plan_expansion(
    schema: &Schema,
    node: &GraphNode,
    rel_type: Option<&str>,
    direction: Direction,
    limit: u32,
) -> Result<PlannedExpansion> {
    let node_type = schema
        .node_type(&node.label)
        .ok_or_else(|| ExploreError::SchemaMismatch {
            label: node.label.clone(),
        })?;

    let pk = node_type
        .primary_key()
        .ok_or_else(|| ExploreError::MissingPrimaryKey {
            label: node.label.clone(),
        })?;

    let value = node
        .properties
        .get(&pk.name)
        .filter(|v| !v.is_null())
        .ok_or_else(|| ExploreError::MissingKeyProperty {
            node_id: node.id.clone(),
            property: pk.name.clone(),
        })?;

    let pk_value = queries::coerce_key_value(&pk.declared_type, value);
    let query = queries::neighbors(&node.label, &pk.name, pk_value, rel_type, direction, limit)?;

    Ok(PlannedExpansion {
        query,
        key: ExpansionKey {
            node_id: node.id.clone(),
            rel_type: rel_type.map(str::to_string),
            direction,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphlens_core::types::{NodeTypeDef, PropertyDef};
    use serde_json::json;

    fn schema_with(types: Vec<NodeTypeDef>) -> Schema {
        Schema {
            node_types: types,
            rel_types: vec![],
            partial: false,
        }
    }

    fn verse_type() -> NodeTypeDef {
        NodeTypeDef {
            name: "Verse".to_string(),
            properties: vec![PropertyDef {
                name: "verse_key".to_string(),
                declared_type: "STRING".to_string(),
                is_primary_key: true,
            }],
        }
    }

    fn verse_node(key: &str) -> GraphNode {
        GraphNode {
            id: format!("Verse-{key}"),
            label: "Verse".to_string(),
            name: key.to_string(),
            color: "#4299E1".to_string(),
            val: 0.8,
            properties: json!({ "verse_key": key }).as_object().cloned().unwrap(),
        }
    }

    #[test]
    fn test_plan_builds_query_and_key() {
        let schema = schema_with(vec![verse_type()]);
        let node = verse_node("2:255");

        let planned = plan_expansion(
            &schema,
            &node,
            Some("HAS_TOPIC"),
            Direction::Outgoing,
            20,
        )
        .unwrap();

        assert_eq!(
            planned.query.text,
            "MATCH (n:Verse)-[r:HAS_TOPIC]->(m) WHERE n.verse_key = $pk RETURN n, r, m LIMIT 20"
        );
        assert_eq!(
            planned.query.params.as_ref().and_then(|p| p.get("pk")),
            Some(&json!("2:255"))
        );
        assert_eq!(planned.key.node_id, "Verse-2:255");
        assert_eq!(planned.key.rel_type.as_deref(), Some("HAS_TOPIC"));
        assert_eq!(planned.key.direction, Direction::Outgoing);
    }

    #[test]
    fn test_unknown_type_is_schema_mismatch() {
        // Schema has no entry for "Verse": the planner must fail cleanly,
        // not crash, even though the node came from a live result.
        let schema = schema_with(vec![]);
        let node = verse_node("2:255");

        let err =
            plan_expansion(&schema, &node, Some("HAS_TOPIC"), Direction::Outgoing, 20).unwrap_err();
        assert!(matches!(err, ExploreError::SchemaMismatch { ref label } if label == "Verse"));
    }

    #[test]
    fn test_type_without_primary_key() {
        let mut no_pk = verse_type();
        no_pk.properties[0].is_primary_key = false;
        let schema = schema_with(vec![no_pk]);

        let err = plan_expansion(&schema, &verse_node("1:1"), None, Direction::Both, 20)
            .unwrap_err();
        assert!(matches!(err, ExploreError::MissingPrimaryKey { .. }));
    }

    #[test]
    fn test_node_missing_key_property() {
        let schema = schema_with(vec![verse_type()]);
        let mut node = verse_node("1:1");
        node.properties.clear();

        let err = plan_expansion(&schema, &node, None, Direction::Both, 20).unwrap_err();
        assert!(matches!(err, ExploreError::MissingKeyProperty { .. }));
    }

    #[test]
    fn test_numeric_key_binds_as_number() {
        let schema = schema_with(vec![NodeTypeDef {
            name: "Topic".to_string(),
            properties: vec![PropertyDef {
                name: "topic_id".to_string(),
                declared_type: "INT64".to_string(),
                is_primary_key: true,
            }],
        }]);
        let node = GraphNode {
            id: "Topic-7".to_string(),
            label: "Topic".to_string(),
            name: "Mercy".to_string(),
            color: "#F6AD55".to_string(),
            val: 1.2,
            properties: json!({ "topic_id": 7 }).as_object().cloned().unwrap(),
        };

        let planned = plan_expansion(&schema, &node, None, Direction::Both, 20).unwrap();
        assert_eq!(
            planned.query.params.as_ref().and_then(|p| p.get("pk")),
            Some(&json!(7))
        );
        assert!(planned.query.text.contains("(n:Topic)-[r]-(m)"));
    }
}
