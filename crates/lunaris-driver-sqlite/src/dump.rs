//! SQL text dump of a whole database
//!
//! The output is the engine's logical dump: a `BEGIN TRANSACTION;` /
//! `COMMIT;` bracket around table DDL, one `INSERT` per row, then index,
//! trigger and view DDL. Replaying it into an empty database recreates the
//! same schema and rows.

use lunaris_core::{LunarisError, Result};
use rusqlite::{Connection as RusqliteConnection, OpenFlags};
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Counts reported after a successful export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    /// Lines written, one statement each
    pub statements: u64,
    /// User tables whose schema and rows were dumped
    pub tables: usize,
}

/// Dump the database at `source` to `destination`.
///
/// The dump is written to a temporary file beside `destination` and moved
/// into place only once complete, so a failure never leaves a truncated
/// file behind.
#[tracing::instrument(skip_all, fields(source = %source.display(), destination = %destination.display()))]
pub fn export_database(source: &Path, destination: &Path) -> Result<ExportSummary> {
    if !source.exists() {
        return Err(LunarisError::Export(format!(
            "Database not found: {}",
            source.display()
        )));
    }

    let conn = RusqliteConnection::open_with_flags(
        source,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|e| LunarisError::Export(format!("Failed to open {}: {}", source.display(), e)))?;

    let parent = match destination.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| {
        LunarisError::Export(format!("Cannot write to {}: {}", parent.display(), e))
    })?;

    let summary = {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        let summary = dump_database(&conn, |line| {
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
            Ok(())
        })?;
        writer.flush().map_err(export_io)?;
        summary
    };
    tmp.as_file().sync_all().map_err(export_io)?;

    tmp.persist(destination).map_err(|e| {
        LunarisError::Export(format!(
            "Cannot write to {}: {}",
            destination.display(),
            e.error
        ))
    })?;

    tracing::info!(
        statements = summary.statements,
        tables = summary.tables,
        "database exported"
    );
    Ok(summary)
}

/// Produce the dump of `conn` line by line through `emit`
pub fn dump_database(
    conn: &RusqliteConnection,
    mut emit: impl FnMut(&str) -> std::io::Result<()>,
) -> Result<ExportSummary> {
    let mut summary = ExportSummary::default();
    let mut line = |text: &str| -> Result<()> {
        emit(text).map_err(export_io)?;
        summary.statements += 1;
        Ok(())
    };

    line("PRAGMA foreign_keys=OFF;")?;
    line("BEGIN TRANSACTION;")?;

    let tables = catalog(
        conn,
        "SELECT name, sql FROM sqlite_master
         WHERE sql NOT NULL AND type == 'table'
         ORDER BY name",
    )?;

    let mut writable_schema = false;
    let mut sequence = Vec::new();
    let mut dumped_tables = 0;

    for (name, sql) in &tables {
        if name == "sqlite_sequence" {
            sequence.push("DELETE FROM \"sqlite_sequence\";".to_string());
            sequence.extend(sequence_inserts(conn)?);
            continue;
        } else if name == "sqlite_stat1" {
            line("ANALYZE \"sqlite_master\";")?;
        } else if name.starts_with("sqlite_") {
            continue;
        } else if sql.starts_with("CREATE VIRTUAL TABLE") {
            if !writable_schema {
                writable_schema = true;
                line("PRAGMA writable_schema=ON;")?;
            }
            line(&format!(
                "INSERT INTO sqlite_master(type,name,tbl_name,rootpage,sql)VALUES('table','{0}','{0}',0,'{1}');",
                name.replace('\'', "''"),
                sql.replace('\'', "''"),
            ))?;
        } else {
            line(&format!("{};", sql))?;
            dumped_tables += 1;
        }

        for insert in row_inserts(conn, name)? {
            line(&insert)?;
        }
    }

    let others = catalog(
        conn,
        "SELECT name, sql FROM sqlite_master
         WHERE sql NOT NULL AND type IN ('index', 'trigger', 'view')",
    )?;
    for (_, sql) in &others {
        line(&format!("{};", sql))?;
    }

    if writable_schema {
        line("PRAGMA writable_schema=OFF;")?;
    }
    // Sequence rows go last so the replayed inserts cannot bump them
    for stmt in &sequence {
        line(stmt)?;
    }
    line("COMMIT;")?;

    summary.tables = dumped_tables;
    Ok(summary)
}

fn catalog(conn: &RusqliteConnection, sql: &str) -> Result<Vec<(String, String)>> {
    let mut stmt = conn.prepare(sql).map_err(read_error)?;
    stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .map_err(read_error)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(read_error)
}

/// `INSERT` statements for every row of `table`, values rendered by the
/// engine's `quote()`
fn row_inserts(conn: &RusqliteConnection, table: &str) -> Result<Vec<String>> {
    let ident = table.replace('"', "\"\"");
    // The table name also appears inside the generated string literal
    let literal_ident = ident.replace('\'', "''");

    let mut info = conn
        .prepare("SELECT name FROM pragma_table_info(?1)")
        .map_err(read_error)?;
    let columns = info
        .query_map([table], |row| row.get::<_, String>(0))
        .map_err(read_error)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(read_error)?;
    if columns.is_empty() {
        return Ok(Vec::new());
    }

    let values = columns
        .iter()
        .map(|c| format!("quote(\"{}\")", c.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(" || ',' || ");
    let sql = format!(
        "SELECT 'INSERT INTO \"{0}\" VALUES(' || {1} || ');' FROM \"{2}\"",
        literal_ident, values, ident
    );

    let mut stmt = conn.prepare(&sql).map_err(read_error)?;
    stmt.query_map([], |row| row.get::<_, String>(0))
        .map_err(read_error)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(read_error)
}

fn sequence_inserts(conn: &RusqliteConnection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT name, seq FROM \"sqlite_sequence\"")
        .map_err(read_error)?;
    stmt.query_map([], |row| {
        let name: String = row.get(0)?;
        let seq: i64 = row.get(1)?;
        Ok(format!(
            "INSERT INTO \"sqlite_sequence\" VALUES('{}',{});",
            name.replace('\'', "''"),
            seq
        ))
    })
    .map_err(read_error)?
    .collect::<rusqlite::Result<Vec<_>>>()
    .map_err(read_error)
}

fn read_error(e: rusqlite::Error) -> LunarisError {
    LunarisError::Export(format!("Failed to read database: {}", e))
}

fn export_io(e: std::io::Error) -> LunarisError {
    LunarisError::Export(e.to_string())
}
