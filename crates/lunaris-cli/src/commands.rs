//! Subcommands and their execution

use anyhow::Result;
use clap::Subcommand;
use lunaris_core::{ExecuteResult, LunarisError, normalize_save_path};
use lunaris_driver_sqlite::SessionWorker;
use lunaris_editor::{EditorTabs, Notification, ObjectTree};
use lunaris_erd::{ErdFormat, ErdGenerator, GraphvizRenderer, resolve_output_path};
use lunaris_settings::Settings;
use std::path::PathBuf;

use crate::output::{ColumnListing, ForeignKeyListing, OutputFormat, Outputable};

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List tables, views, triggers and indexes
    Objects,

    /// Show the columns of a table
    Columns {
        /// Table name
        table: String,
    },

    /// Show the foreign keys declared by a table
    ForeignKeys {
        /// Table name
        table: String,
    },

    /// Execute SQL text: one statement or a `;`-separated script
    Query {
        /// SQL to execute
        sql: String,
    },

    /// Execute the SQL in a `.sql` or `.txt` file
    Run {
        /// Script file
        file: PathBuf,
    },

    /// Show the first rows of a table or view
    Browse {
        /// Table or view name
        name: String,

        /// Maximum rows to show [default: editor.browse_row_limit]
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Create a new database file and connect to it
    Create {
        /// Database path; the extension is replaced with `.db`
        path: PathBuf,
    },

    /// Dump the connected database as SQL
    Export {
        /// Dump path; the extension is replaced with `.sql`
        destination: PathBuf,
    },

    /// Render an entity-relationship diagram with Graphviz
    Erd {
        /// Diagram path; `.png` and `.pdf` decide the format
        output: PathBuf,

        /// Format when the path has no `.png`/`.pdf` extension [default: erd.default_format]
        #[arg(long, value_parser = parse_erd_format)]
        format: Option<ErdFormat>,
    },
}

fn parse_erd_format(s: &str) -> std::result::Result<ErdFormat, String> {
    ErdFormat::parse(s).ok_or_else(|| format!("unknown diagram format '{}' (expected png or pdf)", s))
}

/// State shared by every command of one invocation
pub struct Context {
    pub worker: SessionWorker,
    pub settings: Settings,
    pub format: OutputFormat,
}

impl Context {
    /// Print a command result on stdout
    fn emit<T: Outputable>(&self, value: &T) -> Result<()> {
        println!("{}", value.format(self.format)?);
        Ok(())
    }

    /// Print a side note on stderr, keeping stdout for results
    fn notify(&self, notification: &Notification) {
        eprintln!("{}", notification);
    }
}

impl Command {
    #[tracing::instrument(skip_all, fields(command = self.name()))]
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        match self {
            Command::Objects => {
                let objects = ctx.worker.list_objects().await?;
                ctx.emit(&ObjectTree::from_objects(&objects))
            }
            Command::Columns { table } => {
                let columns = ctx.worker.columns_for(table).await?;
                ctx.emit(&ColumnListing(columns))
            }
            Command::ForeignKeys { table } => {
                let edges = ctx.worker.foreign_keys_for(table).await?;
                ctx.emit(&ForeignKeyListing(edges))
            }
            Command::Query { sql } => {
                let mut tabs = EditorTabs::new();
                tabs.set_text(sql);
                run_editor(ctx, &tabs).await
            }
            Command::Run { file } => {
                let mut tabs = EditorTabs::new();
                tabs.open_file(&file)?;
                run_editor(ctx, &tabs).await
            }
            Command::Browse { name, limit } => {
                let limit = limit.unwrap_or(ctx.settings.editor.browse_row_limit);
                let tree = ObjectTree::from_objects(&ctx.worker.list_objects().await?);
                let entry = tree
                    .find(&name)
                    .ok_or_else(|| LunarisError::NotFound(format!("No such object: {}", name)))?;
                let sql = entry.browse_sql(limit).ok_or_else(|| {
                    LunarisError::NotFound(format!(
                        "{} is a {} and has no rows to browse",
                        name,
                        entry.kind.as_str()
                    ))
                })?;
                execute_sql(ctx, sql).await
            }
            Command::Create { path } => {
                let path = normalize_save_path(&path, "db");
                ctx.worker.create(path.clone()).await?;
                ctx.emit(&Notification::created(&path))
            }
            Command::Export { destination } => {
                let destination = normalize_save_path(&destination, "sql");
                let summary = ctx.worker.export_to_sql(destination.clone()).await?;
                tracing::info!(
                    statements = summary.statements,
                    tables = summary.tables,
                    "export finished"
                );
                ctx.emit(&Notification::exported(&destination))
            }
            Command::Erd { output, format } => {
                let erd = &ctx.settings.erd;
                let (output, format) =
                    resolve_output_path(&output, format.unwrap_or(erd.default_format));
                let renderer = match &erd.dot_binary {
                    Some(binary) => GraphvizRenderer::new(binary),
                    None => GraphvizRenderer::detect()?,
                };
                let generator = ErdGenerator::new(renderer).with_rank_dir(erd.rank_dir.clone());
                tracing::debug!(
                    dot = %generator.renderer().binary().display(),
                    "rendering diagram"
                );
                let saved = ctx
                    .worker
                    .run(move |session| generator.generate(session, &output, format))
                    .await?;
                ctx.emit(&Notification::erd_saved(&saved))
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Command::Objects => "objects",
            Command::Columns { .. } => "columns",
            Command::ForeignKeys { .. } => "foreign-keys",
            Command::Query { .. } => "query",
            Command::Run { .. } => "run",
            Command::Browse { .. } => "browse",
            Command::Create { .. } => "create",
            Command::Export { .. } => "export",
            Command::Erd { .. } => "erd",
        }
    }
}

/// Execute the active editor's text
async fn run_editor(ctx: &Context, tabs: &EditorTabs) -> Result<()> {
    let sql = tabs.query_text()?.to_string();
    execute_sql(ctx, sql).await
}

async fn execute_sql(ctx: &Context, sql: String) -> Result<()> {
    let result = ctx.worker.execute(sql).await?;
    if result.schema_changed() {
        tracing::info!("schema changed");
    }
    ctx.emit(&result)?;
    ctx.notify(&outcome(&result));
    Ok(())
}

/// Notification describing a successful execution
fn outcome(result: &ExecuteResult) -> Notification {
    match result {
        ExecuteResult::Query(query) => Notification::rows_retrieved(query.rows.len()),
        ExecuteResult::Statement(ack) if ack.statement_count > 1 => {
            Notification::script_executed(ack.statement_count)
        }
        ExecuteResult::Statement(ack) => Notification::statement_executed(ack.affected_rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lunaris_core::StatementResult;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_outcome_for_script_counts_statements() {
        let result = ExecuteResult::Statement(StatementResult {
            affected_rows: 4,
            schema_changed: true,
            statement_count: 3,
        });
        assert_eq!(outcome(&result), Notification::script_executed(3));
    }

    #[test]
    fn test_outcome_for_single_statement_counts_rows() {
        let result = ExecuteResult::Statement(StatementResult {
            affected_rows: 2,
            schema_changed: false,
            statement_count: 1,
        });
        assert_eq!(outcome(&result), Notification::statement_executed(2));
    }

    #[test]
    fn test_erd_format_argument() {
        assert_eq!(parse_erd_format("PDF"), Ok(ErdFormat::Pdf));
        assert!(parse_erd_format("svg").is_err());
    }
}
