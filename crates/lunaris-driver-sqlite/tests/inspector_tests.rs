//! Catalog inspection through a session

mod common;

use common::{connected_session, shop_session};
use lunaris_core::{
    ForeignKeyAction, ForeignKeyEdge, LunarisError, ObjectKind, SchemaInspector, SchemaObject,
};
use pretty_assertions::assert_eq;

#[test]
fn test_objects_grouped_by_kind_then_name() {
    let (_scratch, session) = connected_session();
    session
        .execute("CREATE TABLE zeta(a); CREATE TABLE alpha(b); CREATE VIEW v1 AS SELECT 1")
        .unwrap();

    let objects = session.list_objects().unwrap();
    assert_eq!(
        objects,
        vec![
            SchemaObject::new("alpha", ObjectKind::Table, 0),
            SchemaObject::new("zeta", ObjectKind::Table, 0),
            SchemaObject::new("v1", ObjectKind::View, 0),
        ]
    );
}

#[test]
fn test_full_ordering_with_triggers_and_indexes() {
    let (_scratch, session) = shop_session();
    session
        .execute("CREATE TRIGGER trg AFTER DELETE ON customers BEGIN SELECT 1; END")
        .unwrap();

    let kinds: Vec<_> = session
        .list_objects()
        .unwrap()
        .into_iter()
        .map(|o| (o.kind, o.name))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (ObjectKind::Table, "customers".to_string()),
            (ObjectKind::Table, "orders".to_string()),
            (ObjectKind::View, "big_orders".to_string()),
            (ObjectKind::Trigger, "trg".to_string()),
            (ObjectKind::Index, "idx_orders_customer".to_string()),
        ]
    );
}

#[test]
fn test_internal_objects_excluded() {
    let (_scratch, session) = connected_session();
    session
        .execute("CREATE TABLE t(id INTEGER PRIMARY KEY AUTOINCREMENT, code TEXT UNIQUE); INSERT INTO t(code) VALUES ('a')")
        .unwrap();

    let objects = session.list_objects().unwrap();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].name, "t");
    // The automatic index on `code` still counts toward the table
    assert_eq!(objects[0].index_count, 1);
}

#[test]
fn test_index_count_per_table() {
    let (_scratch, session) = shop_session();
    session
        .execute("CREATE INDEX idx_orders_total ON orders(total)")
        .unwrap();

    let objects = session.list_objects().unwrap();
    let count = |name: &str| {
        objects
            .iter()
            .find(|o| o.name == name)
            .map(|o| o.index_count)
    };
    assert_eq!(count("orders"), Some(2));
    assert_eq!(count("customers"), Some(0));
    assert_eq!(count("big_orders"), Some(0));
}

#[test]
fn test_listing_reflects_schema_changes() {
    let (_scratch, session) = shop_session();
    assert_eq!(session.table_names().unwrap(), vec!["customers", "orders"]);

    session.execute("DROP VIEW big_orders; DROP TABLE orders").unwrap();
    assert_eq!(session.table_names().unwrap(), vec!["customers"]);
}

#[test]
fn test_columns_in_declaration_order() {
    let (_scratch, session) = shop_session();
    let columns = session.columns_for("customers").unwrap();

    let summary: Vec<_> = columns
        .iter()
        .map(|c| (c.name.as_str(), c.declared_type.as_str(), c.is_primary_key))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("id", "INTEGER", true),
            ("name", "TEXT", false),
            ("email", "TEXT", false),
        ]
    );
    assert!(!columns[1].nullable);
    assert_eq!(columns[2].default_value.as_deref(), Some("'none'"));
    assert_eq!(columns[0].primary_key_position, Some(1));
}

#[test]
fn test_composite_primary_key_positions() {
    let (_scratch, session) = connected_session();
    session
        .execute("CREATE TABLE pairs(b TEXT, a TEXT, untyped, PRIMARY KEY (a, b))")
        .unwrap();

    let columns = session.columns_for("pairs").unwrap();
    assert_eq!(columns[0].primary_key_position, Some(2));
    assert_eq!(columns[1].primary_key_position, Some(1));
    assert_eq!(columns[2].declared_type, "");
    assert!(!columns[2].is_primary_key);
}

#[test]
fn test_columns_for_view() {
    let (_scratch, session) = shop_session();
    let names: Vec<_> = session
        .columns_for("big_orders")
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["id", "customer_id", "total"]);
}

#[test]
fn test_columns_for_unknown_table() {
    let (_scratch, session) = shop_session();
    assert!(matches!(
        session.columns_for("nope"),
        Err(LunarisError::NotFound(_))
    ));
}

#[test]
fn test_foreign_key_edge() {
    let (_scratch, session) = shop_session();
    let edges = session.foreign_keys_for("orders").unwrap();
    assert_eq!(
        edges,
        vec![ForeignKeyEdge {
            from_table: "orders".into(),
            from_column: "customer_id".into(),
            to_table: "customers".into(),
            to_column: "id".into(),
            on_update: ForeignKeyAction::NoAction,
            on_delete: ForeignKeyAction::Cascade,
        }]
    );
    assert!(session.foreign_keys_for("customers").unwrap().is_empty());
}

#[test]
fn test_implicit_foreign_key_target_resolves_to_primary_key() {
    let (_scratch, session) = connected_session();
    session
        .execute("CREATE TABLE parent(code TEXT PRIMARY KEY); CREATE TABLE child(p REFERENCES parent)")
        .unwrap();

    let edges = session.foreign_keys_for("child").unwrap();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].to_column, "code");
}
