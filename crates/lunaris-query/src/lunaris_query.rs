//! LunarisDB Query - SQL text handling
//!
//! Everything here works on SQL text alone and never touches a connection:
//!
//! - [`ScriptPlan`] splits editor input into statements
//! - [`is_schema_changing`], [`is_transaction_control`] and
//!   [`requires_commit`] classify statements
//! - [`browse_sql`] builds the query behind "open table" in the object tree

mod browse;
pub mod script;

pub use browse::{browse_sql, quote_identifier};
pub use script::{
    ScriptPlan, is_schema_changing, is_transaction_control, requires_commit, split_statements,
};
