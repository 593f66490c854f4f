//! Schema inspection trait and catalog types

use crate::Result;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Schema inspection interface
///
/// Every call reads the current catalog; implementations never cache, so
/// callers re-invoke after a schema-changing execution.
pub trait SchemaInspector {
    /// List tables, views, triggers and indexes, ordered by kind then name.
    /// Engine-internal objects are excluded.
    fn list_objects(&self) -> Result<Vec<SchemaObject>>;

    /// Get columns for a table or view, in declaration order
    fn columns_for(&self, table: &str) -> Result<Vec<ColumnInfo>>;

    /// Get declared foreign keys for a table
    fn foreign_keys_for(&self, table: &str) -> Result<Vec<ForeignKeyEdge>>;

    /// Names of user tables, in catalog order
    fn table_names(&self) -> Result<Vec<String>> {
        Ok(self
            .list_objects()?
            .into_iter()
            .filter(|o| o.kind == ObjectKind::Table)
            .map(|o| o.name)
            .collect())
    }
}

/// Kind of catalog object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Table,
    View,
    Trigger,
    Index,
}

impl ObjectKind {
    /// Sort rank used by the object listing: tables first, indexes last
    pub fn rank(self) -> u8 {
        match self {
            ObjectKind::Table => 1,
            ObjectKind::View => 2,
            ObjectKind::Trigger => 3,
            ObjectKind::Index => 4,
        }
    }

    /// Catalog spelling (`sqlite_master.type`)
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Table => "table",
            ObjectKind::View => "view",
            ObjectKind::Trigger => "trigger",
            ObjectKind::Index => "index",
        }
    }

    /// Parse the catalog spelling
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "table" => Some(ObjectKind::Table),
            "view" => Some(ObjectKind::View),
            "trigger" => Some(ObjectKind::Trigger),
            "index" => Some(ObjectKind::Index),
            _ => None,
        }
    }

    /// Tables and views can be browsed with a SELECT
    pub fn is_browsable(self) -> bool {
        matches!(self, ObjectKind::Table | ObjectKind::View)
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog entry as shown in the object tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaObject {
    pub name: String,
    pub kind: ObjectKind,
    /// Number of indexes on the table; always 0 for other kinds
    pub index_count: u32,
}

impl SchemaObject {
    pub fn new(name: impl Into<String>, kind: ObjectKind, index_count: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            index_count,
        }
    }
}

impl Ord for SchemaObject {
    fn cmp(&self, other: &Self) -> Ordering {
        self.kind
            .rank()
            .cmp(&other.kind.rank())
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for SchemaObject {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Column metadata from table introspection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ColumnInfo {
    pub name: String,
    /// Declared type, empty when the column has none
    pub declared_type: String,
    pub is_primary_key: bool,
    /// Ordinal position (0-based)
    pub ordinal: usize,
    pub nullable: bool,
    /// Default value expression
    pub default_value: Option<String>,
    /// 1-based position within a composite primary key
    pub primary_key_position: Option<u32>,
}

/// Foreign key action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ForeignKeyAction {
    #[default]
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl ForeignKeyAction {
    pub fn parse(action: &str) -> Self {
        match action.to_uppercase().as_str() {
            "CASCADE" => ForeignKeyAction::Cascade,
            "SET NULL" => ForeignKeyAction::SetNull,
            "SET DEFAULT" => ForeignKeyAction::SetDefault,
            "RESTRICT" => ForeignKeyAction::Restrict,
            _ => ForeignKeyAction::NoAction,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ForeignKeyAction::NoAction => "NO ACTION",
            ForeignKeyAction::Restrict => "RESTRICT",
            ForeignKeyAction::Cascade => "CASCADE",
            ForeignKeyAction::SetNull => "SET NULL",
            ForeignKeyAction::SetDefault => "SET DEFAULT",
        }
    }
}

/// One column pair of a declared foreign key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyEdge {
    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
    pub on_update: ForeignKeyAction,
    pub on_delete: ForeignKeyAction,
}
