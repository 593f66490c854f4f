//! LunarisDB Core - shared types for the SQLite browser
//!
//! This crate provides the types every other Lunaris crate depends on:
//!
//! - `LunarisError` - the error taxonomy surfaced to the user
//! - `Value`, `Row`, `QueryResult`, `StatementResult` - execution results
//! - `SchemaObject`, `ColumnInfo`, `ForeignKeyEdge` - catalog metadata
//! - `SchemaInspector` - trait for schema inspection
//! - `FileKind` - the file-selection contract shared by open/save flows

mod error;
mod files;
mod schema;
mod types;

pub use error::*;
pub use files::*;
pub use schema::*;
pub use types::*;
