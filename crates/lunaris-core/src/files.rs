//! File-selection contract shared by open and save flows
//!
//! The host toolkit owns the actual pickers. These helpers describe which
//! extensions each picker accepts and normalise the paths a "save" picker
//! returns, since those carry no extension guarantee.

use std::path::{Path, PathBuf};

/// Kind of file a picker selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// An SQLite database file
    Database,
    /// SQL text to load into an editor
    SqlScript,
    /// A rendered entity-relationship diagram
    Erd,
}

impl FileKind {
    /// Extensions accepted by the picker, without the leading dot
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            FileKind::Database => &["db", "sqlite3"],
            FileKind::SqlScript => &["sql", "txt"],
            FileKind::Erd => &["png", "pdf"],
        }
    }

    /// Whether `path` has one of the accepted extensions (case-insensitive)
    pub fn accepts(self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions()
                    .iter()
                    .any(|allowed| ext.eq_ignore_ascii_case(allowed))
            })
    }
}

/// Replace whatever extension `path` has with `extension`.
///
/// `new_database` and `new_database.sqlite` both become `new_database.db`
/// for `extension = "db"`.
pub fn normalize_save_path(path: &Path, extension: &str) -> PathBuf {
    path.with_extension(extension)
}

/// Final path component as a display string
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_picker_extensions() {
        assert!(FileKind::Database.accepts(Path::new("/tmp/shop.db")));
        assert!(FileKind::Database.accepts(Path::new("/tmp/shop.SQLITE3")));
        assert!(!FileKind::Database.accepts(Path::new("/tmp/shop.sql")));
        assert!(!FileKind::Database.accepts(Path::new("/tmp/shop")));
    }

    #[test]
    fn test_script_picker_extensions() {
        assert!(FileKind::SqlScript.accepts(Path::new("seed.sql")));
        assert!(FileKind::SqlScript.accepts(Path::new("notes.txt")));
        assert!(!FileKind::SqlScript.accepts(Path::new("seed.db")));
    }

    #[test]
    fn test_normalize_save_path_replaces_extension() {
        assert_eq!(
            normalize_save_path(Path::new("/tmp/new_database"), "db"),
            PathBuf::from("/tmp/new_database.db")
        );
        assert_eq!(
            normalize_save_path(Path::new("/tmp/dump.txt"), "sql"),
            PathBuf::from("/tmp/dump.sql")
        );
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("/a/b/shop.db")), "shop.db");
    }
}
