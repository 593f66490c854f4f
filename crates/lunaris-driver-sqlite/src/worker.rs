//! Single-owner session thread
//!
//! [`SessionWorker`] keeps a [`Session`] on one dedicated thread and feeds it
//! jobs over a channel. Since every call runs on that thread, the handle is
//! never rebound. Async callers await one-shot replies instead of blocking.

use lunaris_core::{
    ColumnInfo, ExecuteResult, ForeignKeyEdge, LunarisError, Result, SchemaInspector,
    SchemaObject,
};
use std::path::PathBuf;
use std::thread::JoinHandle;
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::dump::ExportSummary;
use crate::session::{ConnectionStatus, Session, SessionOptions};

type Job = Box<dyn FnOnce(&Session) + Send>;

const THREAD_NAME: &str = "lunaris-session";

/// Handle to a session running on its own thread
pub struct SessionWorker {
    sender: Option<mpsc::UnboundedSender<Job>>,
    thread: Option<JoinHandle<()>>,
}

impl SessionWorker {
    /// Start the session thread
    pub fn spawn(options: SessionOptions) -> Result<Self> {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Job>();

        let thread = std::thread::Builder::new()
            .name(THREAD_NAME.into())
            .spawn(move || {
                let session = Session::new(options);
                tracing::debug!("session worker started");
                while let Some(job) = receiver.blocking_recv() {
                    job(&session);
                }
                session.disconnect();
                tracing::debug!("session worker stopped");
            })?;

        Ok(Self {
            sender: Some(sender),
            thread: Some(thread),
        })
    }

    /// Run `f` against the session on its thread and await the result
    pub async fn run<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Session) -> Result<T> + Send + 'static,
    {
        let (reply, response) = oneshot::channel();
        let job: Job = Box::new(move |session| {
            // The caller may have given up waiting
            let _ = reply.send(f(session));
        });

        self.sender
            .as_ref()
            .ok_or_else(stopped)?
            .send(job)
            .map_err(|_| stopped())?;
        response.await.map_err(|_| stopped())?
    }

    pub async fn connect(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        self.run(move |s| s.connect(&path)).await
    }

    pub async fn create(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        self.run(move |s| s.create(&path)).await
    }

    pub async fn disconnect(&self) -> Result<bool> {
        self.run(|s| Ok(s.disconnect())).await
    }

    pub async fn execute(&self, sql: impl Into<String>) -> Result<ExecuteResult> {
        let sql = sql.into();
        self.run(move |s| s.execute(&sql)).await
    }

    pub async fn list_objects(&self) -> Result<Vec<SchemaObject>> {
        self.run(|s| s.list_objects()).await
    }

    pub async fn columns_for(&self, table: impl Into<String>) -> Result<Vec<ColumnInfo>> {
        let table = table.into();
        self.run(move |s| s.columns_for(&table)).await
    }

    pub async fn foreign_keys_for(&self, table: impl Into<String>) -> Result<Vec<ForeignKeyEdge>> {
        let table = table.into();
        self.run(move |s| s.foreign_keys_for(&table)).await
    }

    pub async fn export_to_sql(&self, destination: impl Into<PathBuf>) -> Result<ExportSummary> {
        let destination = destination.into();
        self.run(move |s| s.export_to_sql(&destination)).await
    }

    pub async fn path(&self) -> Result<Option<PathBuf>> {
        self.run(|s| Ok(s.path())).await
    }

    pub async fn is_connected(&self) -> Result<bool> {
        self.run(|s| Ok(s.is_connected())).await
    }

    pub async fn subscribe(&self) -> Result<broadcast::Receiver<ConnectionStatus>> {
        self.run(|s| Ok(s.subscribe())).await
    }
}

impl Drop for SessionWorker {
    fn drop(&mut self) {
        // Closing the channel ends the job loop
        self.sender.take();
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            tracing::warn!("session worker thread panicked");
        }
    }
}

fn stopped() -> LunarisError {
    LunarisError::Connection("Session worker has stopped".into())
}
