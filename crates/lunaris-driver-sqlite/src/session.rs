//! SQLite session
//!
//! A [`Session`] owns at most one open handle to one database file. The
//! handle is bound to the thread that opened it; the first operation from
//! any other thread closes it and reopens the same file for the caller.
//! Every transition (connect, create, disconnect, rebind) happens under a
//! single mutex, so two transitions never interleave.

use lunaris_core::{
    ColumnInfo, ExecuteResult, ForeignKeyEdge, LunarisError, Result, SchemaInspector,
    SchemaObject,
};
use parking_lot::Mutex;
use rusqlite::{Connection as RusqliteConnection, OpenFlags};
use std::path::{Path, PathBuf};
use std::thread::{self, ThreadId};
use std::time::Duration;
use tokio::sync::broadcast;

use crate::dump::{self, ExportSummary};
use crate::{executor, inspector};

const STATUS_CHANNEL_CAPACITY: usize = 16;

/// Session behaviour that comes from user settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Run `PRAGMA foreign_keys = ON` on every handle
    pub enforce_foreign_keys: bool,
    /// How long a statement waits on a locked database before failing
    pub busy_timeout: Duration,
    /// Run multi-statement scripts inside one transaction
    pub wrap_scripts_in_transaction: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            enforce_foreign_keys: true,
            busy_timeout: Duration::from_millis(5000),
            wrap_scripts_in_transaction: false,
        }
    }
}

/// Connection state broadcast to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected { path: PathBuf },
    Disconnected,
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenMode {
    Existing,
    Create,
}

/// The open handle and the thread it belongs to
struct Bound {
    path: PathBuf,
    conn: RusqliteConnection,
    owner: ThreadId,
}

/// A connection to one SQLite database file
pub struct Session {
    state: Mutex<Option<Bound>>,
    options: SessionOptions,
    status: broadcast::Sender<ConnectionStatus>,
}

impl Session {
    /// Create a disconnected session
    pub fn new(options: SessionOptions) -> Self {
        let (status, _) = broadcast::channel(STATUS_CHANNEL_CAPACITY);
        Self {
            state: Mutex::new(None),
            options,
            status,
        }
    }

    /// Receive one [`ConnectionStatus`] per successful connect, create or
    /// disconnect.
    pub fn subscribe(&self) -> broadcast::Receiver<ConnectionStatus> {
        self.status.subscribe()
    }

    /// Current connection state
    pub fn status(&self) -> ConnectionStatus {
        match self.path() {
            Some(path) => ConnectionStatus::Connected { path },
            None => ConnectionStatus::Disconnected,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state.lock().is_some()
    }

    /// Path of the open database file
    pub fn path(&self) -> Option<PathBuf> {
        self.state.lock().as_ref().map(|b| b.path.clone())
    }

    /// Thread the open handle is bound to
    pub fn owner_thread(&self) -> Option<ThreadId> {
        self.state.lock().as_ref().map(|b| b.owner)
    }

    /// Open an existing database file.
    ///
    /// Any previously open handle is closed first. On failure the session
    /// is left as it was.
    #[tracing::instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn connect(&self, path: impl AsRef<Path>) -> Result<()> {
        self.bind(path.as_ref(), OpenMode::Existing)
    }

    /// Open a database file, creating it if absent
    #[tracing::instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn create(&self, path: impl AsRef<Path>) -> Result<()> {
        self.bind(path.as_ref(), OpenMode::Create)
    }

    /// Close the open handle.
    ///
    /// Returns `false` without notifying anyone when already disconnected.
    #[tracing::instrument(skip(self))]
    pub fn disconnect(&self) -> bool {
        let mut state = self.state.lock();
        let Some(bound) = state.take() else {
            tracing::debug!("disconnect requested with no open database");
            return false;
        };
        close_quietly(bound.conn);
        drop(state);

        tracing::info!(path = %bound.path.display(), "SQLite session disconnected");
        self.notify(ConnectionStatus::Disconnected);
        true
    }

    /// Execute a statement or a `;`-separated script
    #[tracing::instrument(skip(self, sql), fields(sql_preview = %sql.chars().take(100).collect::<String>()))]
    pub fn execute(&self, sql: &str) -> Result<ExecuteResult> {
        let options = &self.options;
        self.with_connection(|conn| {
            let outcome = executor::execute(conn, sql, options.wrap_scripts_in_transaction);
            if outcome.is_err() {
                executor::rollback_pending(conn);
            }
            // Scripts such as SQL dumps switch foreign keys off
            let may_have_changed_pragma = match &outcome {
                Ok(result) => result.as_statement().is_some_and(|s| s.statement_count > 1),
                Err(_) => true,
            };
            if options.enforce_foreign_keys && may_have_changed_pragma {
                set_foreign_keys(conn, true)?;
            }
            outcome
        })
    }

    /// Write the whole database as SQL text to `destination`
    #[tracing::instrument(skip(self, destination), fields(destination = %destination.as_ref().display()))]
    pub fn export_to_sql(&self, destination: impl AsRef<Path>) -> Result<ExportSummary> {
        let source = self.path().ok_or(LunarisError::NoConnection)?;
        dump::export_database(&source, destination.as_ref())
    }

    /// Run `f` with the handle, rebinding it to the calling thread first
    /// if another thread opened it.
    fn with_connection<T>(
        &self,
        f: impl FnOnce(&mut RusqliteConnection) -> Result<T>,
    ) -> Result<T> {
        let mut state = self.state.lock();
        let bound = state.as_mut().ok_or(LunarisError::NoConnection)?;

        let current = thread::current().id();
        if bound.owner != current {
            self.rebind(bound, current)?;
        }
        f(&mut bound.conn)
    }

    fn rebind(&self, bound: &mut Bound, thread: ThreadId) -> Result<()> {
        tracing::debug!(
            path = %bound.path.display(),
            from = ?bound.owner,
            to = ?thread,
            "rebinding SQLite handle to calling thread"
        );
        let fresh = open_connection(&bound.path, OpenMode::Existing, &self.options)?;
        let stale = std::mem::replace(&mut bound.conn, fresh);
        close_quietly(stale);
        bound.owner = thread;
        Ok(())
    }

    fn bind(&self, path: &Path, mode: OpenMode) -> Result<()> {
        let path = expand_path(path)?;

        let mut state = self.state.lock();
        let conn = open_connection(&path, mode, &self.options)?;
        if let Some(previous) = state.take() {
            tracing::debug!(previous = %previous.path.display(), "closing previous database");
            close_quietly(previous.conn);
        }
        *state = Some(Bound {
            path: path.clone(),
            conn,
            owner: thread::current().id(),
        });
        drop(state);

        tracing::info!(path = %path.display(), ?mode, "SQLite session connected");
        self.notify(ConnectionStatus::Connected { path });
        Ok(())
    }

    fn notify(&self, status: ConnectionStatus) {
        // No subscribers is not an error
        let _ = self.status.send(status);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

impl SchemaInspector for Session {
    fn list_objects(&self) -> Result<Vec<SchemaObject>> {
        self.with_connection(|conn| inspector::list_objects(conn))
    }

    fn columns_for(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        self.with_connection(|conn| inspector::columns_for(conn, table))
    }

    fn foreign_keys_for(&self, table: &str) -> Result<Vec<ForeignKeyEdge>> {
        self.with_connection(|conn| inspector::foreign_keys_for(conn, table))
    }
}

fn open_connection(
    path: &Path,
    mode: OpenMode,
    options: &SessionOptions,
) -> Result<RusqliteConnection> {
    let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;

    match mode {
        OpenMode::Existing => {
            if !is_engine_path(path) && !path.exists() {
                return Err(LunarisError::Connection(format!(
                    "Database file does not exist: {}",
                    path.display()
                )));
            }
        }
        OpenMode::Create => {
            flags |= OpenFlags::SQLITE_OPEN_CREATE;
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
                && !parent.exists()
            {
                return Err(LunarisError::Connection(format!(
                    "Parent directory does not exist: {}",
                    parent.display()
                )));
            }
        }
    }

    let conn = RusqliteConnection::open_with_flags(path, flags).map_err(|e| {
        LunarisError::Connection(format!(
            "Failed to open SQLite database at '{}': {}",
            path.display(),
            e
        ))
    })?;

    // SQLite opens lazily; reading the catalog rejects files that are not databases
    conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
        row.get::<_, i64>(0)
    })
    .map_err(|e| {
        LunarisError::Connection(format!(
            "'{}' is not a valid SQLite database: {}",
            path.display(),
            e
        ))
    })?;

    conn.busy_timeout(options.busy_timeout)
        .map_err(|e| LunarisError::Connection(format!("Failed to set busy timeout: {}", e)))?;
    set_foreign_keys(&conn, options.enforce_foreign_keys)?;

    Ok(conn)
}

fn set_foreign_keys(conn: &RusqliteConnection, enabled: bool) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", if enabled { "ON" } else { "OFF" })
        .map_err(|e| LunarisError::Connection(format!("Failed to set foreign keys: {}", e)))
}

fn close_quietly(conn: RusqliteConnection) {
    if let Err((_, e)) = conn.close() {
        tracing::warn!(error = %e, "failed to close SQLite handle");
    }
}

/// In-memory databases and `file:` URIs are resolved by the engine itself
fn is_engine_path(path: &Path) -> bool {
    let raw = path.to_string_lossy();
    raw == ":memory:" || raw.starts_with("file:")
}

/// Expand `~/` and make relative paths absolute, so a rebind after the
/// working directory changes still opens the same file.
fn expand_path(path: &Path) -> Result<PathBuf> {
    if is_engine_path(path) {
        return Ok(path.to_path_buf());
    }
    let raw = path.to_string_lossy();

    let expanded = if let Ok(rest) = path.strip_prefix("~") {
        let home = dirs::home_dir().ok_or_else(|| {
            LunarisError::Configuration("Unable to determine HOME directory".into())
        })?;
        home.join(rest)
    } else if raw.starts_with('~') {
        return Err(LunarisError::Configuration(
            "User-specific home directories (~user) are not supported".into(),
        ));
    } else {
        path.to_path_buf()
    };

    std::path::absolute(&expanded).map_err(LunarisError::Io)
}
