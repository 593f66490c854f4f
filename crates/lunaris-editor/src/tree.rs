//! Database object tree

use lunaris_core::{ObjectKind, SchemaObject};
use lunaris_query::browse_sql;
use serde::Serialize;

/// One object in the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEntry {
    pub name: String,
    pub kind: ObjectKind,
    /// "`N idx`" for tables with indexes
    pub badge: Option<String>,
}

impl TreeEntry {
    /// Query run when the entry is opened; only tables and views open
    pub fn browse_sql(&self, limit: u32) -> Option<String> {
        self.kind
            .is_browsable()
            .then(|| browse_sql(&self.name, limit))
    }
}

/// Objects of one kind, in name order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeGroup {
    pub kind: ObjectKind,
    pub entries: Vec<TreeEntry>,
}

impl TreeGroup {
    pub fn heading(&self) -> &'static str {
        match self.kind {
            ObjectKind::Table => "Tables",
            ObjectKind::View => "Views",
            ObjectKind::Trigger => "Triggers",
            ObjectKind::Index => "Indexes",
        }
    }
}

/// The database structure panel: groups in table, view, trigger, index
/// order with a separator between consecutive groups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ObjectTree {
    pub groups: Vec<TreeGroup>,
}

impl ObjectTree {
    /// Group an object listing. The listing is expected in catalog order;
    /// it is re-sorted so the grouping holds regardless.
    pub fn from_objects(objects: &[SchemaObject]) -> Self {
        let mut sorted = objects.to_vec();
        sorted.sort();

        let mut groups: Vec<TreeGroup> = Vec::new();
        for object in sorted {
            let entry = TreeEntry {
                badge: (object.kind == ObjectKind::Table && object.index_count > 0)
                    .then(|| format!("{} idx", object.index_count)),
                name: object.name,
                kind: object.kind,
            };
            match groups.last_mut() {
                Some(group) if group.kind == entry.kind => group.entries.push(entry),
                _ => groups.push(TreeGroup {
                    kind: entry.kind,
                    entries: vec![entry],
                }),
            }
        }
        Self { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Find an entry by name
    pub fn find(&self, name: &str) -> Option<&TreeEntry> {
        self.groups
            .iter()
            .flat_map(|g| g.entries.iter())
            .find(|e| e.name == name)
    }

    /// Plain-text rendering, one entry per line and a blank separator
    /// between groups
    pub fn render_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                lines.push(String::new());
            }
            lines.push(format!("{}:", group.heading()));
            for entry in &group.entries {
                match &entry.badge {
                    Some(badge) => lines.push(format!("  {} [{}]", entry.name, badge)),
                    None => lines.push(format!("  {}", entry.name)),
                }
            }
        }
        lines
    }
}
