//! Query text construction for schema introspection and neighbor expansion.
//!
//! Values are bound as parameters wherever the endpoint supports them.
//! The few places that must interpolate text — table names in CALL
//! procedures, schema-sourced identifiers in MATCH patterns — go through
//! the validation and escaping helpers here, never ad-hoc formatting at
//! call sites.

use graphlens_core::types::Direction;
use serde_json::{Map, Value};

/// A fully planned query: text plus bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub text: String,
    pub params: Option<Map<String, Value>>,
}

impl QuerySpec {
    fn literal(text: String) -> Self {
        Self { text, params: None }
    }
}

/// An identifier that failed the safety check and was refused.
#[derive(Debug, thiserror::Error)]
#[error("unsafe identifier in query construction: {0:?}")]
pub struct UnsafeIdentifier(pub String);

// ── Schema introspection ──────────────────────────────────────────

/// Enumerate all tables (entity and relationship types).
pub fn list_tables() -> QuerySpec {
    QuerySpec::literal("CALL show_tables() RETURN *".to_string())
}

/// Describe one table's properties, including the primary-key flag.
pub fn table_info(table: &str) -> QuerySpec {
    QuerySpec::literal(format!(
        "CALL TABLE_INFO('{}') RETURN *",
        escape_single_quoted(table)
    ))
}

/// Describe one relationship table's endpoint connectivity.
pub fn table_connectivity(table: &str) -> QuerySpec {
    QuerySpec::literal(format!(
        "CALL SHOW_CONNECTION('{}') RETURN *",
        escape_single_quoted(table)
    ))
}

// ── Neighbor expansion ────────────────────────────────────────────

/// Build the neighbor-discovery query for one node.
///
/// `label`, `pk_name`, and `rel_type` are schema-sourced identifiers and are
/// rejected if they are not identifier-safe; the key value is bound as the
/// `$pk` parameter and never interpolated into the text. `rel_type = None`
/// matches all relationship types.
pub fn neighbors(
    label: &str,
    pk_name: &str,
    pk_value: Value,
    rel_type: Option<&str>,
    direction: Direction,
    limit: u32,
) -> Result<QuerySpec, UnsafeIdentifier> {
    check_identifier(label)?;
    check_identifier(pk_name)?;

    let rel = match rel_type {
        Some(t) => {
            check_identifier(t)?;
            format!(":{t}")
        }
        None => String::new(),
    };

    let pattern = match direction {
        Direction::Outgoing => format!("(n:{label})-[r{rel}]->(m)"),
        Direction::Incoming => format!("(n:{label})<-[r{rel}]-(m)"),
        Direction::Both => format!("(n:{label})-[r{rel}]-(m)"),
    };

    let text = format!("MATCH {pattern} WHERE n.{pk_name} = $pk RETURN n, r, m LIMIT {limit}");

    let mut params = Map::new();
    params.insert("pk".to_string(), pk_value);

    Ok(QuerySpec {
        text,
        params: Some(params),
    })
}

/// Coerce a stored property value into the parameter form the declared
/// column type expects: textual columns bind strings, everything else is
/// passed through as stored.
pub fn coerce_key_value(declared_type: &str, value: &Value) -> Value {
    if is_textual_type(declared_type) {
        match value {
            Value::String(_) => value.clone(),
            other => Value::String(other.to_string()),
        }
    } else {
        value.clone()
    }
}

/// Whether a declared column type holds text.
pub fn is_textual_type(declared_type: &str) -> bool {
    let lower = declared_type.to_ascii_lowercase();
    lower.contains("string") || lower.contains("varchar") || lower.contains("char")
}

fn check_identifier(s: &str) -> Result<(), UnsafeIdentifier> {
    let safe = !s.is_empty()
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !s.starts_with(|c: char| c.is_ascii_digit());
    if safe {
        Ok(())
    } else {
        Err(UnsafeIdentifier(s.to_string()))
    }
}

fn escape_single_quoted(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}
