//! Diagram model and DOT emission

use lunaris_core::{ColumnInfo, ForeignKeyEdge, LunarisError, Result, SchemaInspector};
use std::fmt::Write;

/// Layout direction used when none is configured: parents above children
pub const DEFAULT_RANK_DIR: &str = "BT";

/// One table node
#[derive(Debug, Clone, PartialEq)]
pub struct ErdTable {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
}

/// Tables and foreign keys of one database
#[derive(Debug, Clone, PartialEq)]
pub struct ErdGraph {
    pub rank_dir: String,
    pub tables: Vec<ErdTable>,
    pub edges: Vec<ForeignKeyEdge>,
}

impl ErdGraph {
    /// Read every user table with its columns and foreign keys.
    ///
    /// Fails with [`LunarisError::Erd`] when the database has no tables.
    pub fn from_inspector<I: SchemaInspector + ?Sized>(inspector: &I) -> Result<Self> {
        let names = inspector.table_names()?;
        if names.is_empty() {
            return Err(LunarisError::Erd(
                "The database has no tables to draw".into(),
            ));
        }

        let mut tables = Vec::with_capacity(names.len());
        let mut edges = Vec::new();
        for name in names {
            let columns = inspector.columns_for(&name)?;
            edges.extend(inspector.foreign_keys_for(&name)?);
            tables.push(ErdTable { name, columns });
        }

        tracing::debug!(
            tables = tables.len(),
            edges = edges.len(),
            "ERD graph built"
        );
        Ok(Self {
            rank_dir: DEFAULT_RANK_DIR.to_string(),
            tables,
            edges,
        })
    }

    pub fn with_rank_dir(mut self, rank_dir: impl Into<String>) -> Self {
        self.rank_dir = rank_dir.into();
        self
    }

    /// Graphviz DOT text: one record node per table with a port per
    /// column, one edge per foreign key between those ports.
    pub fn to_dot(&self) -> String {
        let mut dot = String::new();
        dot.push_str("// ERD Diagram\ndigraph {\n");
        let _ = writeln!(dot, "\trankdir={}", quote_id(&self.rank_dir));

        for table in &self.tables {
            let mut label = escape_record(&table.name);
            label.push('|');
            for column in &table.columns {
                let field = escape_record(&column.name);
                let _ = write!(label, "<{}> {} : {}", field, field, escape_record(&column.declared_type));
                if column.is_primary_key {
                    label.push_str(" PK");
                }
                label.push_str("\\l");
            }
            let _ = writeln!(
                dot,
                "\t{} [label=\"{{{}}}\" shape=record]",
                quote_id(&table.name),
                label.replace('"', "\\\"")
            );
        }

        for edge in &self.edges {
            let _ = writeln!(
                dot,
                "\t{}:{} -> {}:{} [label={} arrowhead=normal color=blue]",
                quote_id(&edge.from_table),
                quote_id(&edge.from_column),
                quote_id(&edge.to_table),
                quote_id(&edge.to_column),
                quote_id(&format!("{} -> {}", edge.from_column, edge.to_column)),
            );
        }

        dot.push_str("}\n");
        dot
    }
}

/// Double-quoted DOT identifier
fn quote_id(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Escape the characters that structure a record label
fn escape_record(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '{' | '}' | '|' | '<' | '>' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
