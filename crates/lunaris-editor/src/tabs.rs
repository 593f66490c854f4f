//! Multi-tab SQL editor state

use lunaris_core::{FileKind, display_name};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::{EditorError, Result};

/// Stable identifier of an editor tab; never reused within one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EditorId(pub usize);

impl fmt::Display for EditorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorTab {
    pub id: EditorId,
    pub title: String,
    pub text: String,
    /// File the text was loaded from, if any
    pub file_path: Option<PathBuf>,
}

/// Ordered editor tabs with exactly one active tab
#[derive(Debug, Clone)]
pub struct EditorTabs {
    tabs: Vec<EditorTab>,
    active: usize,
    next_id: usize,
}

impl EditorTabs {
    /// Start with a single empty editor, "SQL Editor 1"
    pub fn new() -> Self {
        let mut tabs = Self {
            tabs: Vec::new(),
            active: 0,
            next_id: 0,
        };
        tabs.add_editor();
        tabs
    }

    /// Append an empty editor and make it active
    pub fn add_editor(&mut self) -> EditorId {
        let id = self.allocate_id();
        self.push(EditorTab {
            id,
            title: format!("SQL Editor {}", id.0 + 1),
            text: String::new(),
            file_path: None,
        })
    }

    /// Load an `.sql` or `.txt` file into a new active editor titled with
    /// the file name
    pub fn open_file(&mut self, path: &Path) -> Result<EditorId> {
        if !FileKind::SqlScript.accepts(path) {
            return Err(EditorError::UnsupportedFile(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| EditorError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let id = self.allocate_id();
        tracing::debug!(%id, path = %path.display(), "opened file in editor");
        Ok(self.push(EditorTab {
            id,
            title: display_name(path),
            text,
            file_path: Some(path.to_path_buf()),
        }))
    }

    /// Close an editor. The last remaining editor cannot be closed.
    pub fn remove_editor(&mut self, id: EditorId) -> Result<()> {
        if self.tabs.len() <= 1 {
            return Err(EditorError::LastEditor);
        }
        let index = self
            .position(id)
            .ok_or(EditorError::UnknownEditor(id))?;

        self.tabs.remove(index);
        self.active = index.min(self.tabs.len() - 1);
        Ok(())
    }

    /// Activate the tab at `index`; out-of-range indexes are ignored
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.tabs.len() {
            self.active = index;
            true
        } else {
            false
        }
    }

    pub fn active(&self) -> &EditorTab {
        &self.tabs[self.active]
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Replace the active editor's text
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.tabs[self.active].text = text.into();
    }

    /// The active editor's text, ready to execute
    pub fn query_text(&self) -> Result<&str> {
        let text = self.active().text.as_str();
        if text.trim().is_empty() {
            return Err(EditorError::BlankQuery);
        }
        Ok(text)
    }

    pub fn get(&self, id: EditorId) -> Option<&EditorTab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn tabs(&self) -> &[EditorTab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    fn allocate_id(&mut self) -> EditorId {
        let id = EditorId(self.next_id);
        self.next_id += 1;
        id
    }

    fn push(&mut self, tab: EditorTab) -> EditorId {
        let id = tab.id;
        self.tabs.push(tab);
        self.active = self.tabs.len() - 1;
        id
    }

    fn position(&self, id: EditorId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }
}

impl Default for EditorTabs {
    fn default() -> Self {
        Self::new()
    }
}
