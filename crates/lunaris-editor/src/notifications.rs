//! User-facing notifications

use lunaris_core::{LunarisError, display_name};
use serde::Serialize;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

/// A transient message shown after a user action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn connected(path: &Path) -> Self {
        Self::success(format!("Connected to database: {}", display_name(path)))
    }

    pub fn created(path: &Path) -> Self {
        Self::success(format!("Database created at: {}", display_name(path)))
    }

    pub fn disconnected() -> Self {
        Self::info("Disconnected from database")
    }

    pub fn rows_retrieved(count: usize) -> Self {
        Self::success(format!("Query executed successfully. {} rows retrieved.", count))
    }

    pub fn statement_executed(affected_rows: u64) -> Self {
        Self::success(format!(
            "Query executed successfully. {} rows affected.",
            affected_rows
        ))
    }

    pub fn script_executed(statement_count: usize) -> Self {
        Self::success(format!(
            "SQL script executed successfully ({} statements)",
            statement_count
        ))
    }

    pub fn exported(path: &Path) -> Self {
        Self::success(format!("Database exported to {}", display_name(path)))
    }

    pub fn erd_saved(path: &Path) -> Self {
        Self::success(format!("ERD saved to: {}", display_name(path)))
    }

    /// Notification for a failed operation
    pub fn from_error(err: &dyn std::error::Error) -> Self {
        Self::error(err.to_string())
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

impl From<&LunarisError> for Notification {
    fn from(err: &LunarisError) -> Self {
        match err {
            LunarisError::NoConnection => Self::error("Connect to a database first"),
            other => Self::from_error(other),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EditorError;

    #[test]
    fn test_success_messages_use_file_name() {
        let n = Notification::connected(Path::new("/data/shop.db"));
        assert_eq!(n.level, NotificationLevel::Success);
        assert_eq!(n.message, "Connected to database: shop.db");
        assert_eq!(
            Notification::erd_saved(Path::new("/tmp/erd.png")).message,
            "ERD saved to: erd.png"
        );
    }

    #[test]
    fn test_errors_become_error_notifications() {
        let n = Notification::from(&LunarisError::Query("no such table: t".into()));
        assert!(n.is_error());
        assert_eq!(n.message, "Query error: no such table: t");

        let n = Notification::from(&LunarisError::NoConnection);
        assert_eq!(n.message, "Connect to a database first");

        let n = Notification::from_error(&EditorError::BlankQuery);
        assert_eq!(n.to_string(), "Please enter a valid SQL query.");
    }

    #[test]
    fn test_row_count_message() {
        assert_eq!(
            Notification::rows_retrieved(3).message,
            "Query executed successfully. 3 rows retrieved."
        );
    }
}
