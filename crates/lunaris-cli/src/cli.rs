//! `lunaris`: browse, query and export SQLite databases from the terminal

mod commands;
mod logging;
mod output;

use anyhow::Result;
use clap::Parser;
use lunaris_core::{FileKind, LunarisError};
use lunaris_driver_sqlite::SessionWorker;
use lunaris_editor::{EditorError, Notification};
use lunaris_settings::Settings;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::commands::{Command, Context};
use crate::logging::LoggingConfig;
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "lunaris", author, version, about, long_about = None)]
pub struct Args {
    /// SQLite database to connect to
    #[arg(long, global = true, env = "LUNARIS_DB")]
    pub db: Option<PathBuf>,

    /// Settings file [default: <config dir>/lunaris/settings.toml]
    #[arg(long, global = true, env = "LUNARIS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    /// Log more; repeat for debug output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("{}", notification_for(&err));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let settings = match &args.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    let _log_guard = logging::init(&LoggingConfig::for_cli(args.verbose, &settings.logging))?;

    let worker = SessionWorker::spawn(settings.session.to_options())?;
    if let Some(db) = &args.db {
        if !FileKind::Database.accepts(db) {
            tracing::warn!(path = %db.display(), "unexpected database file extension");
        }
        worker.connect(db.clone()).await?;
        tracing::info!("{}", Notification::connected(db));
    }

    let ctx = Context {
        worker,
        settings,
        format: args.format,
    };
    args.command.execute(&ctx).await
}

/// Error notification for a failed command
fn notification_for(err: &anyhow::Error) -> Notification {
    if let Some(err) = err.downcast_ref::<LunarisError>() {
        Notification::from(err)
    } else if let Some(err) = err.downcast_ref::<EditorError>() {
        Notification::from_error(err)
    } else {
        Notification::error(format!("{:#}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use lunaris_erd::ErdFormat;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "lunaris", "browse", "orders", "--limit", "5", "--db", "shop.db", "--format", "json",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.db, Some(PathBuf::from("shop.db")));
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.verbose, 2);
        assert_eq!(
            args.command,
            Command::Browse {
                name: "orders".into(),
                limit: Some(5),
            }
        );
    }

    #[test]
    fn test_erd_format_flag() {
        let args = Args::try_parse_from(["lunaris", "erd", "out", "--format", "pdf"]).unwrap();
        assert_eq!(
            args.command,
            Command::Erd {
                output: PathBuf::from("out"),
                format: Some(ErdFormat::Pdf),
            }
        );
        assert!(Args::try_parse_from(["lunaris", "erd", "out", "--format", "gif"]).is_err());
    }

    #[test]
    fn test_foreign_keys_command_name() {
        let args = Args::try_parse_from(["lunaris", "foreign-keys", "orders"]).unwrap();
        assert_eq!(
            args.command,
            Command::ForeignKeys {
                table: "orders".into()
            }
        );
    }

    #[test]
    fn test_error_notifications() {
        let err = anyhow::Error::new(LunarisError::NoConnection);
        assert_eq!(
            notification_for(&err),
            Notification::error("Connect to a database first")
        );

        let err = anyhow::Error::new(EditorError::BlankQuery);
        assert_eq!(
            notification_for(&err).message,
            "Please enter a valid SQL query."
        );

        let err = anyhow::anyhow!("inner").context("outer");
        assert_eq!(notification_for(&err).message, "outer: inner");
    }
}
