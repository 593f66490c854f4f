//! Statement and script execution

use lunaris_core::{
    ColumnMeta, ExecuteResult, LunarisError, QueryResult, Result, Row, StatementResult,
};
use lunaris_query::{ScriptPlan, requires_commit};
use rusqlite::Connection as RusqliteConnection;
use std::time::Instant;

use crate::convert::{query_error, row_value};

/// Execute editor input against `conn`.
///
/// One statement yields its rows, or an acknowledgment when it has no
/// result columns. Two or more run as a script and always yield an
/// acknowledgment.
pub(crate) fn execute(
    conn: &mut RusqliteConnection,
    sql: &str,
    wrap_scripts: bool,
) -> Result<ExecuteResult> {
    let plan = ScriptPlan::parse(sql);
    let schema_changed = plan.is_schema_changing();
    // SQLite has no nested transactions; such scripts run as written
    let controls_transaction = plan.controls_transaction();

    match plan {
        ScriptPlan::Empty => {
            tracing::debug!("no statements to execute");
            Ok(ExecuteResult::Statement(StatementResult::default()))
        }
        ScriptPlan::Single(stmt) => execute_single(conn, &stmt, schema_changed),
        ScriptPlan::Script(stmts) => {
            if wrap_scripts && controls_transaction {
                tracing::debug!("script manages its own transaction, not wrapping");
            }
            let affected_rows =
                execute_script(conn, &stmts, wrap_scripts && !controls_transaction)?;
            tracing::debug!(
                statement_count = stmts.len(),
                affected_rows,
                schema_changed,
                "script executed"
            );
            Ok(ExecuteResult::Statement(StatementResult {
                affected_rows,
                schema_changed,
                statement_count: stmts.len(),
            }))
        }
    }
}

fn execute_single(
    conn: &RusqliteConnection,
    sql: &str,
    schema_changed: bool,
) -> Result<ExecuteResult> {
    let start_time = Instant::now();
    let changes_before = total_changes(conn)?;

    let mut stmt = conn.prepare(sql).map_err(query_error)?;

    if stmt.column_count() > 0 {
        let column_names: Vec<String> = stmt.column_names().iter().map(|n| n.to_string()).collect();
        let columns: Vec<ColumnMeta> = stmt
            .columns()
            .iter()
            .enumerate()
            .map(|(ordinal, col)| ColumnMeta {
                name: col.name().to_string(),
                data_type: col.decl_type().unwrap_or("DYNAMIC").to_string(),
                ordinal,
            })
            .collect();

        let mut rows = Vec::new();
        let mut query_rows = stmt.query([]).map_err(query_error)?;
        while let Some(row) = query_rows.next().map_err(query_error)? {
            let mut values = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                values.push(row_value(row, i)?);
            }
            rows.push(Row::new(column_names.clone(), values));
        }
        drop(query_rows);
        drop(stmt);

        // Statements such as INSERT ... RETURNING write and return rows
        if requires_commit(sql) {
            commit_pending(conn)?;
        }

        let execution_time_ms = start_time.elapsed().as_millis() as u64;
        tracing::debug!(
            row_count = rows.len(),
            execution_time_ms,
            "query executed successfully"
        );
        return Ok(ExecuteResult::Query(QueryResult {
            id: uuid::Uuid::new_v4(),
            columns,
            rows,
            execution_time_ms,
        }));
    }

    stmt.raw_execute().map_err(query_error)?;
    drop(stmt);

    if requires_commit(sql) {
        commit_pending(conn)?;
    }

    let affected_rows = total_changes(conn)?.saturating_sub(changes_before);
    tracing::debug!(affected_rows, schema_changed, "statement executed");
    Ok(ExecuteResult::Statement(StatementResult {
        affected_rows,
        schema_changed,
        statement_count: 1,
    }))
}

/// Run `statements` in order, stopping at the first failure.
///
/// Without `wrap` the statements that ran before a failure stay applied.
fn execute_script(
    conn: &mut RusqliteConnection,
    statements: &[String],
    wrap: bool,
) -> Result<u64> {
    let changes_before = total_changes(conn)?;

    if wrap {
        let tx = conn.transaction().map_err(|e| {
            LunarisError::Query(format!("Failed to begin transaction: {}", e))
        })?;
        for stmt in statements {
            // Dropping `tx` on error rolls the script back
            tx.execute_batch(stmt).map_err(query_error)?;
        }
        tx.commit().map_err(|e| {
            LunarisError::Query(format!("Failed to commit transaction: {}", e))
        })?;
    } else {
        for stmt in statements {
            conn.execute_batch(stmt).map_err(query_error)?;
        }
        commit_pending(conn)?;
    }

    Ok(total_changes(conn)?.saturating_sub(changes_before))
}

/// Roll back a transaction a failed statement left open
pub(crate) fn rollback_pending(conn: &RusqliteConnection) {
    if conn.is_autocommit() {
        return;
    }
    tracing::debug!("rolling back open transaction");
    if let Err(e) = conn.execute_batch("ROLLBACK") {
        tracing::warn!(error = %e, "failed to roll back open transaction");
    }
}

/// Commit an explicit transaction the statement left open
fn commit_pending(conn: &RusqliteConnection) -> Result<()> {
    if conn.is_autocommit() {
        return Ok(());
    }
    tracing::debug!("committing open transaction");
    conn.execute_batch("COMMIT")
        .map_err(|e| LunarisError::Query(format!("Failed to commit: {}", e)))
}

fn total_changes(conn: &RusqliteConnection) -> Result<u64> {
    conn.query_row("SELECT total_changes()", [], |row| row.get::<_, i64>(0))
        .map(|n| n.max(0) as u64)
        .map_err(query_error)
}
