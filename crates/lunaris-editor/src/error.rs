use std::path::PathBuf;
use thiserror::Error;

use crate::EditorId;

/// Errors raised by editor state changes
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Please enter a valid SQL query.")]
    BlankQuery,

    #[error("Cannot remove the last editor.")]
    LastEditor,

    #[error("No editor with id {0}")]
    UnknownEditor(EditorId),

    #[error("Unsupported file type: {}", .0.display())]
    UnsupportedFile(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, EditorError>;
