//! SQLite session and data access for LunarisDB

mod convert;
mod dump;
mod executor;
mod inspector;
mod session;
mod worker;

pub use dump::{ExportSummary, dump_database, export_database};
pub use session::{ConnectionStatus, Session, SessionOptions};
pub use worker::SessionWorker;
