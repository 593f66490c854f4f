//! LunarisDB Settings
//!
//! Settings live in a TOML file with one table per area:
//!
//! ```toml
//! [session]
//! enforce_foreign_keys = true
//! busy_timeout_ms = 5000
//! wrap_scripts_in_transaction = false
//!
//! [editor]
//! browse_row_limit = 100
//!
//! [erd]
//! rank_dir = "BT"
//! default_format = "png"
//!
//! [logging]
//! json_logs = false
//! ```
//!
//! A missing file, table or key falls back to its default. Unknown keys
//! are ignored.

use anyhow::{Context, Result};
use lunaris_driver_sqlite::SessionOptions;
use lunaris_erd::ErdFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

mod settings_file;

pub use settings_file::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub session: SessionSettings,
    pub editor: EditorSettings,
    pub erd: ErdSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Load from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&settings_file()?)
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;
        Self::parse(&content).with_context(|| format!("Failed to parse settings in {:?}", path))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub enforce_foreign_keys: bool,
    pub busy_timeout_ms: u64,
    pub wrap_scripts_in_transaction: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            enforce_foreign_keys: true,
            busy_timeout_ms: 5000,
            wrap_scripts_in_transaction: false,
        }
    }
}

impl SessionSettings {
    pub fn to_options(&self) -> SessionOptions {
        SessionOptions {
            enforce_foreign_keys: self.enforce_foreign_keys,
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
            wrap_scripts_in_transaction: self.wrap_scripts_in_transaction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Row limit of the query run when a table is opened from the tree
    pub browse_row_limit: u32,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            browse_row_limit: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErdSettings {
    /// Graphviz `dot` binary; looked up on `PATH` when unset
    pub dot_binary: Option<PathBuf>,
    pub rank_dir: String,
    pub default_format: ErdFormat,
}

impl Default for ErdSettings {
    fn default() -> Self {
        Self {
            dot_binary: None,
            rank_dir: "BT".to_string(),
            default_format: ErdFormat::Png,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is unset
    pub filter: Option<String>,
    pub json_logs: bool,
}
