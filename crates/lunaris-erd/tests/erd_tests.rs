//! ERD generation against real and mock schemas

use lunaris_core::{
    ColumnInfo, ForeignKeyEdge, LunarisError, ObjectKind, Result, SchemaInspector, SchemaObject,
};
use lunaris_driver_sqlite::Session;
use lunaris_erd::{ErdFormat, ErdGenerator, ErdRenderer};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::path::Path;

/// Records the DOT it is given and writes a placeholder diagram plus an
/// accessory file, the way Graphviz may leave a `.dot` next to its output.
#[derive(Default)]
struct RecordingRenderer {
    calls: Mutex<Vec<(String, ErdFormat)>>,
    fail: bool,
}

impl ErdRenderer for RecordingRenderer {
    fn render(&self, dot: &str, format: ErdFormat, output: &Path) -> Result<()> {
        self.calls.lock().push((dot.to_string(), format));
        if self.fail {
            return Err(LunarisError::Erd("renderer exploded".into()));
        }
        std::fs::write(output.with_extension("dot"), dot)?;
        std::fs::write(output, b"diagram")?;
        Ok(())
    }
}

/// Inspector answering from fixed data
struct MockInspector {
    objects: Vec<SchemaObject>,
}

impl SchemaInspector for MockInspector {
    fn list_objects(&self) -> Result<Vec<SchemaObject>> {
        Ok(self.objects.clone())
    }

    fn columns_for(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        Ok(vec![ColumnInfo {
            name: format!("{table}_id"),
            declared_type: "INTEGER".into(),
            is_primary_key: true,
            ..Default::default()
        }])
    }

    fn foreign_keys_for(&self, _table: &str) -> Result<Vec<ForeignKeyEdge>> {
        Ok(Vec::new())
    }
}

fn shop_session(dir: &Path) -> Session {
    let session = Session::default();
    session.create(dir.join("shop.db")).unwrap();
    session
        .execute(indoc::indoc! {"
            CREATE TABLE customers(id INTEGER PRIMARY KEY, name TEXT);
            CREATE TABLE orders(
                id INTEGER PRIMARY KEY,
                customer_id INTEGER REFERENCES customers(id)
            );
            CREATE VIEW recent AS SELECT * FROM orders;
        "})
        .unwrap();
    session
}

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_foreign_key_becomes_single_labelled_edge() {
    let dir = tempfile::tempdir().unwrap();
    let session = shop_session(dir.path());
    let generator = ErdGenerator::new(RecordingRenderer::default());

    let output = dir.path().join("shop.png");
    let saved = generator
        .generate(&session, &output, ErdFormat::Png)
        .unwrap();
    assert_eq!(saved, output);

    let calls = generator.renderer().calls.lock();
    let (dot, format) = &calls[0];
    assert_eq!(*format, ErdFormat::Png);

    let edges: Vec<_> = dot.lines().filter(|l| l.contains("->") && l.contains("arrowhead")).collect();
    assert_eq!(edges.len(), 1);
    assert!(edges[0].contains(r#""orders":"customer_id" -> "customers":"id""#));
    assert!(edges[0].contains("customer_id") && edges[0].contains("label=\"customer_id -> id\""));

    // Views are not drawn
    assert!(!dot.contains("recent"));
    assert!(dot.contains("<id> id : INTEGER PK\\l"));
}

#[test]
fn test_only_final_file_reaches_destination() {
    let dir = tempfile::tempdir().unwrap();
    let session = shop_session(dir.path());
    let out_dir = dir.path().join("out");
    std::fs::create_dir(&out_dir).unwrap();

    let generator = ErdGenerator::new(RecordingRenderer::default());
    generator
        .generate(&session, &out_dir.join("erd.pdf"), ErdFormat::Pdf)
        .unwrap();

    assert_eq!(dir_entries(&out_dir), vec!["erd.pdf"]);
    assert_eq!(std::fs::read(out_dir.join("erd.pdf")).unwrap(), b"diagram");
}

#[test]
fn test_render_failure_leaves_destination_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let session = shop_session(dir.path());
    let out_dir = dir.path().join("out");
    std::fs::create_dir(&out_dir).unwrap();

    let generator = ErdGenerator::new(RecordingRenderer {
        fail: true,
        ..Default::default()
    });
    let err = generator
        .generate(&session, &out_dir.join("erd.png"), ErdFormat::Png)
        .unwrap_err();

    assert!(matches!(err, LunarisError::Erd(_)));
    assert!(dir_entries(&out_dir).is_empty());
}

#[test]
fn test_empty_database_is_erd_error() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::default();
    session.create(dir.path().join("empty.db")).unwrap();

    let generator = ErdGenerator::new(RecordingRenderer::default());
    let err = generator
        .generate(&session, &dir.path().join("erd.png"), ErdFormat::Png)
        .unwrap_err();
    assert!(matches!(err, LunarisError::Erd(_)));
    assert!(generator.renderer().calls.lock().is_empty());
}

#[test]
fn test_missing_destination_directory_is_erd_error() {
    let dir = tempfile::tempdir().unwrap();
    let session = shop_session(dir.path());
    let generator = ErdGenerator::new(RecordingRenderer::default());

    let err = generator
        .generate(&session, &dir.path().join("nope/erd.png"), ErdFormat::Png)
        .unwrap_err();
    assert!(matches!(err, LunarisError::Erd(_)));
}

#[test]
fn test_mock_inspector_and_rank_dir() {
    let dir = tempfile::tempdir().unwrap();
    let inspector = MockInspector {
        objects: vec![
            SchemaObject::new("a", ObjectKind::Table, 0),
            SchemaObject::new("v", ObjectKind::View, 0),
            SchemaObject::new("b", ObjectKind::Table, 1),
        ],
    };
    let generator = ErdGenerator::new(RecordingRenderer::default()).with_rank_dir("LR");
    generator
        .generate(&inspector, &dir.path().join("erd.png"), ErdFormat::Png)
        .unwrap();

    let calls = generator.renderer().calls.lock();
    let dot = &calls[0].0;
    assert!(dot.contains("rankdir=\"LR\""));
    assert!(dot.contains("<a_id> a_id : INTEGER PK"));
    assert!(dot.contains("<b_id> b_id : INTEGER PK"));
    assert!(!dot.contains("v_id"));
}

#[test]
fn test_graphviz_render_when_installed() {
    let Ok(renderer) = lunaris_erd::GraphvizRenderer::detect() else {
        eprintln!("skipping: Graphviz not installed");
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let session = shop_session(dir.path());
    let (output, format) = lunaris_erd::resolve_output_path(&dir.path().join("shop"), ErdFormat::Png);

    ErdGenerator::new(renderer)
        .generate(&session, &output, format)
        .unwrap();

    let bytes = std::fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"\x89PNG"));
}
