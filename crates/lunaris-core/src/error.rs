//! Error types for LunarisDB

use thiserror::Error;

/// Core error type for LunarisDB operations
#[derive(Error, Debug)]
pub enum LunarisError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("No database connection")]
    NoConnection,

    #[error("Query error: {0}")]
    Query(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("ERD error: {0}")]
    Erd(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LunarisError {
    /// Short category name, used as the notification title and in logs
    pub fn kind(&self) -> &'static str {
        match self {
            LunarisError::Connection(_) => "connection",
            LunarisError::NoConnection => "no_connection",
            LunarisError::Query(_) => "query",
            LunarisError::Export(_) => "export",
            LunarisError::Erd(_) => "erd",
            LunarisError::Schema(_) => "schema",
            LunarisError::NotFound(_) => "not_found",
            LunarisError::Configuration(_) => "configuration",
            LunarisError::Io(_) => "io",
            LunarisError::Serialization(_) => "serialization",
        }
    }
}

/// Result type alias for LunarisDB operations
pub type Result<T> = std::result::Result<T, LunarisError>;
