//! Catalog queries behind [`SchemaInspector`](lunaris_core::SchemaInspector)

use lunaris_core::{
    ColumnInfo, ForeignKeyAction, ForeignKeyEdge, LunarisError, ObjectKind, Result,
    SchemaObject,
};
use rusqlite::Connection as RusqliteConnection;

use crate::convert::query_error;

/// User objects with a per-table index count, tables first, then views,
/// triggers and indexes, each group by name.
const LIST_OBJECTS_QUERY: &str = r#"
SELECT
    m.name AS object_name,
    m.type AS object_type,
    CASE
        WHEN m.type = 'table' THEN (
            SELECT COUNT(*)
            FROM sqlite_master i
            WHERE i.type = 'index' AND i.tbl_name = m.name
        )
        ELSE 0
    END AS index_count
FROM sqlite_master m
WHERE m.type IN ('table', 'view', 'trigger', 'index') AND m.name NOT LIKE 'sqlite_%'
ORDER BY
    CASE m.type
        WHEN 'table' THEN 1
        WHEN 'view' THEN 2
        WHEN 'trigger' THEN 3
        WHEN 'index' THEN 4
        ELSE 5
    END,
    m.name
"#;

const COLUMNS_QUERY: &str = r#"
SELECT
    p.cid AS ordinal,
    p.name AS column_name,
    p.type AS data_type,
    p."notnull" AS not_null,
    p."dflt_value" AS default_value,
    p.pk AS primary_key
FROM pragma_table_info(?1) p
ORDER BY p.cid
"#;

const FOREIGN_KEYS_QUERY: &str = r#"
SELECT
    f.seq AS key_position,
    f."from" AS column_name,
    f."table" AS references_table,
    f."to" AS references_column,
    f.on_update AS on_update,
    f.on_delete AS on_delete
FROM pragma_foreign_key_list(?1) f
ORDER BY f.id, f.seq
"#;

const PRIMARY_KEY_QUERY: &str = r#"
SELECT p.name AS column_name
FROM pragma_table_info(?1) p
WHERE p.pk > 0
ORDER BY p.pk
"#;

#[tracing::instrument(skip(conn))]
pub(crate) fn list_objects(conn: &RusqliteConnection) -> Result<Vec<SchemaObject>> {
    let mut stmt = conn.prepare(LIST_OBJECTS_QUERY).map_err(query_error)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>("object_name")?,
                row.get::<_, String>("object_type")?,
                row.get::<_, i64>("index_count")?,
            ))
        })
        .map_err(query_error)?;

    let mut objects = Vec::new();
    for row in rows {
        let (name, kind, index_count) = row.map_err(query_error)?;
        let Some(kind) = ObjectKind::parse(&kind) else {
            continue;
        };
        objects.push(SchemaObject::new(name, kind, index_count.max(0) as u32));
    }

    tracing::debug!(object_count = objects.len(), "catalog listed");
    Ok(objects)
}

#[tracing::instrument(skip(conn))]
pub(crate) fn columns_for(conn: &RusqliteConnection, table: &str) -> Result<Vec<ColumnInfo>> {
    let mut stmt = conn.prepare(COLUMNS_QUERY).map_err(query_error)?;
    let rows = stmt
        .query_map([table], |row| {
            let pk: i64 = row.get("primary_key")?;
            Ok(ColumnInfo {
                ordinal: row.get::<_, i64>("ordinal")?.max(0) as usize,
                name: row.get("column_name")?,
                declared_type: row.get::<_, Option<String>>("data_type")?.unwrap_or_default(),
                nullable: row.get::<_, i64>("not_null")? == 0,
                default_value: row.get("default_value")?,
                is_primary_key: pk > 0,
                primary_key_position: (pk > 0).then_some(pk as u32),
            })
        })
        .map_err(query_error)?;

    let columns = rows
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(query_error)?;

    // Every table and view has at least one column
    if columns.is_empty() {
        return Err(LunarisError::NotFound(format!("No such table: {}", table)));
    }
    Ok(columns)
}

#[tracing::instrument(skip(conn))]
pub(crate) fn foreign_keys_for(
    conn: &RusqliteConnection,
    table: &str,
) -> Result<Vec<ForeignKeyEdge>> {
    let mut stmt = conn.prepare(FOREIGN_KEYS_QUERY).map_err(query_error)?;
    let rows = stmt
        .query_map([table], |row| {
            Ok((
                row.get::<_, i64>("key_position")?,
                row.get::<_, String>("references_table")?,
                row.get::<_, String>("column_name")?,
                row.get::<_, Option<String>>("references_column")?,
                row.get::<_, String>("on_update")?,
                row.get::<_, String>("on_delete")?,
            ))
        })
        .map_err(query_error)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(query_error)?;

    let mut edges = Vec::with_capacity(rows.len());
    for (seq, to_table, from_column, to_column, on_update, on_delete) in rows {
        let to_column = match to_column {
            Some(column) => column,
            None => implicit_target_column(conn, &to_table, seq.max(0) as usize)?,
        };
        edges.push(ForeignKeyEdge {
            from_table: table.to_string(),
            from_column,
            to_table,
            to_column,
            on_update: ForeignKeyAction::parse(&on_update),
            on_delete: ForeignKeyAction::parse(&on_delete),
        });
    }

    tracing::trace!(table, edge_count = edges.len(), "foreign keys read");
    Ok(edges)
}

/// `REFERENCES parent` without a column list points at the parent's
/// primary key; key column `position` pairs with the child column.
fn implicit_target_column(
    conn: &RusqliteConnection,
    to_table: &str,
    position: usize,
) -> Result<String> {
    let mut stmt = conn.prepare(PRIMARY_KEY_QUERY).map_err(query_error)?;
    let keys = stmt
        .query_map([to_table], |row| row.get::<_, String>("column_name"))
        .map_err(query_error)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(query_error)?;

    Ok(keys
        .into_iter()
        .nth(position)
        .unwrap_or_else(|| "rowid".to_string()))
}
