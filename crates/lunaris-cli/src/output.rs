//! Rendering of command results as terminal tables or JSON

use clap::ValueEnum;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use lunaris_core::{ColumnInfo, ExecuteResult, ForeignKeyEdge};
use lunaris_editor::{Notification, ObjectTree, ResultGrid};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// A command result that can be printed in either format
pub trait Outputable: Serialize {
    fn to_table(&self) -> String;

    fn format(&self, format: OutputFormat) -> anyhow::Result<String> {
        match format {
            OutputFormat::Table => Ok(self.to_table()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

impl Outputable for ObjectTree {
    fn to_table(&self) -> String {
        if self.is_empty() {
            return "No objects".to_string();
        }
        self.render_lines().join("\n")
    }
}

impl Outputable for ResultGrid {
    fn to_table(&self) -> String {
        let mut grid = table(self.columns.iter().map(String::as_str).collect());
        for row in &self.rows {
            grid.add_row(row);
        }
        grid.to_string()
    }
}

/// Typed values in JSON, the display grid in tables
impl Outputable for ExecuteResult {
    fn to_table(&self) -> String {
        ResultGrid::from_result(self).to_table()
    }
}

/// Columns of one table
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ColumnListing(pub Vec<ColumnInfo>);

impl Outputable for ColumnListing {
    fn to_table(&self) -> String {
        let mut grid = table(vec!["#", "Name", "Type", "PK", "Nullable", "Default"]);
        for column in &self.0 {
            grid.add_row(vec![
                column.ordinal.to_string(),
                column.name.clone(),
                column.declared_type.clone(),
                column
                    .primary_key_position
                    .map(|p| p.to_string())
                    .unwrap_or_default(),
                if column.nullable { "YES" } else { "NO" }.to_string(),
                column.default_value.clone().unwrap_or_default(),
            ]);
        }
        grid.to_string()
    }
}

/// Foreign keys declared by one table
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ForeignKeyListing(pub Vec<ForeignKeyEdge>);

impl Outputable for ForeignKeyListing {
    fn to_table(&self) -> String {
        if self.0.is_empty() {
            return "No foreign keys".to_string();
        }
        let mut grid = table(vec!["Column", "References", "On update", "On delete"]);
        for edge in &self.0 {
            grid.add_row(vec![
                edge.from_column.clone(),
                format!("{}({})", edge.to_table, edge.to_column),
                edge.on_update.as_str().to_string(),
                edge.on_delete.as_str().to_string(),
            ]);
        }
        grid.to_string()
    }
}

impl Outputable for Notification {
    fn to_table(&self) -> String {
        self.message.clone()
    }
}
