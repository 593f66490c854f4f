//! Result grid model

use lunaris_core::{ExecuteResult, Value};
use serde::Serialize;

/// Header shown when a statement returned no rows
pub const NO_RESULTS_PLACEHOLDER: &str = "No results";
/// Header shown after a failed execution
pub const ERROR_PLACEHOLDER: &str = "Error";

/// Column headers and display strings for every cell
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultGrid {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultGrid {
    /// Grid for a successful execution
    pub fn from_result(result: &ExecuteResult) -> Self {
        match result {
            ExecuteResult::Query(query) => Self {
                columns: query.columns.iter().map(|c| c.name.clone()).collect(),
                rows: query
                    .rows
                    .iter()
                    .map(|row| row.values.iter().map(Value::to_string).collect())
                    .collect(),
            },
            ExecuteResult::Statement(_) => Self::placeholder(NO_RESULTS_PLACEHOLDER),
        }
    }

    /// Grid replacing the previous one after a failed execution
    pub fn error() -> Self {
        Self::placeholder(ERROR_PLACEHOLDER)
    }

    fn placeholder(header: &str) -> Self {
        Self {
            columns: vec![header.to_string()],
            rows: Vec::new(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the grid shows a placeholder instead of data
    pub fn is_placeholder(&self) -> bool {
        self.rows.is_empty()
            && matches!(self.columns.as_slice(), [c] if c == NO_RESULTS_PLACEHOLDER || c == ERROR_PLACEHOLDER)
    }
}
