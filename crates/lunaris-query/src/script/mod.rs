//! Script splitting and statement classification
//!
//! Input from an editor is either one statement or a `;`-separated script.
//! Splitting is aware of string literals, quoted identifiers, comments and
//! trigger bodies, so a `;` inside any of those never ends a statement.

mod classify;
mod splitter;

pub use classify::{is_schema_changing, is_transaction_control, requires_commit};
pub use splitter::split_statements;

/// How a piece of SQL text should be executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptPlan {
    /// Nothing but whitespace and comments
    Empty,
    /// Exactly one statement, without its trailing `;`
    Single(String),
    /// Two or more statements, run as one script
    Script(Vec<String>),
}

impl ScriptPlan {
    /// Split `sql` and decide how it runs
    pub fn parse(sql: &str) -> Self {
        let mut statements = split_statements(sql);
        match statements.len() {
            0 => ScriptPlan::Empty,
            1 => ScriptPlan::Single(statements.remove(0)),
            _ => ScriptPlan::Script(statements),
        }
    }

    /// The statements in source order
    pub fn statements(&self) -> &[String] {
        match self {
            ScriptPlan::Empty => &[],
            ScriptPlan::Single(stmt) => std::slice::from_ref(stmt),
            ScriptPlan::Script(stmts) => stmts,
        }
    }

    /// Number of statements
    pub fn len(&self) -> usize {
        self.statements().len()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ScriptPlan::Empty)
    }

    /// Whether any statement creates, drops or alters schema objects
    pub fn is_schema_changing(&self) -> bool {
        self.statements().iter().any(|s| is_schema_changing(s))
    }

    /// Whether any statement manages its own transaction
    pub fn controls_transaction(&self) -> bool {
        self.statements().iter().any(|s| is_transaction_control(s))
    }
}
