//! Logging setup for the `lunaris` binary
//!
//! Console output goes to stderr so that command results on stdout stay
//! machine-readable. JSON logs are written to a daily rolling file in the
//! data directory when enabled. `RUST_LOG` takes precedence over the
//! configured filter.

use lunaris_settings::LoggingSettings;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const LOG_FILE_PREFIX: &str = "lunaris.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Directory of the rolling JSON log files
    pub log_dir: PathBuf,

    /// Write JSON logs to `log_dir`
    pub enable_json_logs: bool,

    /// Write human-readable logs to stderr
    pub enable_console_logs: bool,

    /// Include file and line of each event
    pub include_location: bool,

    /// Report span open and close events
    pub enable_spans: bool,

    /// Filter used when `RUST_LOG` is unset
    pub default_filter: String,
}

impl LoggingConfig {
    /// Quiet console, warnings only
    pub fn production() -> Self {
        Self {
            log_dir: default_log_dir(),
            enable_json_logs: false,
            enable_console_logs: true,
            include_location: false,
            enable_spans: false,
            default_filter: "warn".to_string(),
        }
    }

    /// Verbose console with locations and span timings
    pub fn development() -> Self {
        Self {
            log_dir: default_log_dir(),
            enable_json_logs: false,
            enable_console_logs: true,
            include_location: true,
            enable_spans: true,
            default_filter: "info,lunaris=debug".to_string(),
        }
    }

    /// Console only, never touches the file system
    #[allow(dead_code)]
    pub fn testing() -> Self {
        Self {
            log_dir: std::env::temp_dir().join("lunaris-tests"),
            enable_json_logs: false,
            enable_console_logs: true,
            include_location: true,
            enable_spans: true,
            default_filter: "debug".to_string(),
        }
    }

    /// Configuration for one CLI run.
    ///
    /// Without `-v` the production preset is kept. `-v` raises every
    /// `lunaris*` target to `info` and `-vv` switches to the development
    /// preset. A filter from the settings file replaces the preset's filter.
    pub fn for_cli(verbose: u8, settings: &LoggingSettings) -> Self {
        let mut config = match verbose {
            0 => Self::production(),
            1 => Self {
                default_filter: "warn,lunaris=info".to_string(),
                ..Self::production()
            },
            _ => Self::development(),
        };
        if let Some(filter) = &settings.filter {
            config.default_filter = filter.clone();
        }
        config.enable_json_logs = settings.json_logs;
        config
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_filter))
    }
}

fn default_log_dir() -> PathBuf {
    lunaris_settings::logs_dir().unwrap_or_else(|_| PathBuf::from("logs"))
}

/// Install the global subscriber.
///
/// With JSON logs enabled the returned guard flushes the log file when
/// dropped; keep it alive until the command finishes.
pub fn init(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let span_events = if config.enable_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let mut layers = Vec::new();
    let mut guard = None;

    if config.enable_console_logs {
        let console = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_span_events(span_events.clone());
        let console = if config.include_location {
            console.pretty().with_filter(config.env_filter()).boxed()
        } else {
            console.compact().with_filter(config.env_filter()).boxed()
        };
        layers.push(console);
    }

    if config.enable_json_logs {
        std::fs::create_dir_all(&config.log_dir)?;
        let file_appender = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_PREFIX);
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(worker_guard);

        let json = fmt::layer()
            .with_target(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(span_events)
            .with_ansi(false)
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(non_blocking)
            .with_filter(config.env_filter())
            .boxed();
        layers.push(json);
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    tracing::debug!(
        log_dir = %config.log_dir.display(),
        json_enabled = config.enable_json_logs,
        console_enabled = config.enable_console_logs,
        "logging initialized"
    );
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_config() {
        let config = LoggingConfig::production();
        assert!(config.enable_console_logs);
        assert!(!config.enable_json_logs);
        assert!(!config.include_location);
        assert_eq!(config.default_filter, "warn");
    }

    #[test]
    fn test_development_config() {
        let config = LoggingConfig::development();
        assert!(config.include_location);
        assert!(config.enable_spans);
        assert!(config.default_filter.contains("lunaris=debug"));
    }

    #[test]
    fn test_testing_config() {
        let config = LoggingConfig::testing();
        assert!(!config.enable_json_logs);
        assert_eq!(config.default_filter, "debug");
    }

    #[test]
    fn test_verbosity_levels() {
        let settings = LoggingSettings::default();
        assert_eq!(LoggingConfig::for_cli(0, &settings), LoggingConfig::production());
        assert_eq!(
            LoggingConfig::for_cli(1, &settings).default_filter,
            "warn,lunaris=info"
        );
        assert_eq!(LoggingConfig::for_cli(3, &settings), LoggingConfig::development());
    }

    // The only test that installs the global subscriber
    #[test]
    fn test_json_logs_flushed_when_guard_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            log_dir: dir.path().join("logs"),
            enable_json_logs: true,
            enable_console_logs: false,
            default_filter: "warn".to_string(),
            ..LoggingConfig::testing()
        };

        let guard = init(&config).unwrap();
        assert!(guard.is_some());
        tracing::warn!(marker = "flush-check", "written through the worker");
        drop(guard);

        let contents: String = std::fs::read_dir(&config.log_dir)
            .unwrap()
            .map(|entry| std::fs::read_to_string(entry.unwrap().path()).unwrap())
            .collect();
        assert!(contents.contains("flush-check"));
    }

    #[test]
    fn test_settings_override_filter_and_json() {
        let settings = LoggingSettings {
            filter: Some("trace".into()),
            json_logs: true,
        };
        let config = LoggingConfig::for_cli(0, &settings);
        assert_eq!(config.default_filter, "trace");
        assert!(config.enable_json_logs);
    }
}
