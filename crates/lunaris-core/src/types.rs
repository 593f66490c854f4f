//! Core types for LunarisDB

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A value read from or bound to SQLite.
///
/// Variants follow SQLite's storage classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// NULL value
    Null,
    /// 64-bit signed integer
    Int64(i64),
    /// 64-bit floating point
    Float64(f64),
    /// UTF-8 string
    String(String),
    /// Binary data
    Bytes(Vec<u8>),
}

impl Value {
    /// Check if the value is NULL
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get as a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as i64
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            Value::String(s) => s.parse::<i64>().ok(),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Int64(v) => write!(f, "{}", v),
            Value::Float64(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "{}", v),
            Value::Bytes(v) => write!(f, "<{} bytes>", v.len()),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

/// A row from a query result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    /// Column values
    pub values: Vec<Value>,
    /// Column names
    #[serde(skip)]
    columns: Vec<String>,
}

impl Row {
    /// Create a new row
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { values, columns }
    }

    /// Get a value by column index
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Get a value by column name
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get column names
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

/// Column metadata for a result set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ColumnMeta {
    /// Column name as reported by the statement
    pub name: String,
    /// Declared type from the schema, or `DYNAMIC` for expressions
    pub data_type: String,
    /// Column ordinal position (0-based)
    pub ordinal: usize,
}

/// Rows returned by a statement that produces a result description
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    /// Unique query ID
    pub id: Uuid,
    /// Column metadata, in positional order
    pub columns: Vec<ColumnMeta>,
    /// Result rows
    pub rows: Vec<Row>,
    /// Execution time in milliseconds
    pub execution_time_ms: u64,
}

impl QueryResult {
    /// Create a new empty query result
    pub fn empty() -> Self {
        Self {
            id: Uuid::new_v4(),
            columns: Vec::new(),
            rows: Vec::new(),
            execution_time_ms: 0,
        }
    }

    /// Column names in positional order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Check if the result has rows
    pub fn has_rows(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Acknowledgment for statements that produce no result description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatementResult {
    /// Rows inserted, updated or deleted
    pub affected_rows: u64,
    /// Whether any statement contained CREATE, DROP or ALTER
    pub schema_changed: bool,
    /// Number of non-empty statements that were executed
    pub statement_count: usize,
}

/// Outcome of executing SQL text
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExecuteResult {
    /// A single statement that returned rows
    Query(QueryResult),
    /// A statement or script that returned no rows
    Statement(StatementResult),
}

impl ExecuteResult {
    /// Whether the caller should refresh any cached schema view
    pub fn schema_changed(&self) -> bool {
        match self {
            ExecuteResult::Query(_) => false,
            ExecuteResult::Statement(s) => s.schema_changed,
        }
    }

    /// The row set, if the statement produced one
    pub fn as_query(&self) -> Option<&QueryResult> {
        match self {
            ExecuteResult::Query(q) => Some(q),
            ExecuteResult::Statement(_) => None,
        }
    }

    /// The acknowledgment, if the statement produced no rows
    pub fn as_statement(&self) -> Option<&StatementResult> {
        match self {
            ExecuteResult::Query(_) => None,
            ExecuteResult::Statement(s) => Some(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_lookup_by_name() {
        let row = Row::new(
            vec!["id".into(), "name".into()],
            vec![Value::Int64(7), Value::from("ada")],
        );
        assert_eq!(row.get_by_name("name"), Some(&Value::String("ada".into())));
        assert_eq!(row.get_by_name("missing"), None);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Int64(1).to_string(), "1");
        assert_eq!(Value::Float64(2.5).to_string(), "2.5");
        assert_eq!(Value::Bytes(vec![0, 1, 2]).to_string(), "<3 bytes>");
    }

    #[test]
    fn test_value_serializes_untagged() {
        let json = serde_json::to_string(&vec![Value::Null, Value::Int64(3), Value::from("x")])
            .unwrap();
        assert_eq!(json, r#"[null,3,"x"]"#);
    }

    #[test]
    fn test_execute_result_accessors() {
        let ack = ExecuteResult::Statement(StatementResult {
            affected_rows: 0,
            schema_changed: true,
            statement_count: 2,
        });
        assert!(ack.schema_changed());
        assert!(ack.as_query().is_none());

        let rows = ExecuteResult::Query(QueryResult::empty());
        assert!(!rows.schema_changed());
        assert_eq!(rows.as_query().map(|q| q.row_count()), Some(0));
    }
}
