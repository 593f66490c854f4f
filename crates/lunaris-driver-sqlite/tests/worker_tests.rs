//! Session worker thread

mod common;

use common::{SHOP_SCHEMA, Scratch};
use lunaris_core::{LunarisError, ObjectKind};
use lunaris_driver_sqlite::{ConnectionStatus, SessionOptions, SessionWorker};

#[tokio::test]
async fn test_worker_round_trip() {
    let scratch = Scratch::new();
    let worker = SessionWorker::spawn(SessionOptions::default()).unwrap();
    let mut status = worker.subscribe().await.unwrap();

    worker.create(&scratch.db_path).await.unwrap();
    assert!(status.recv().await.unwrap().is_connected());
    assert_eq!(worker.path().await.unwrap(), Some(scratch.db_path.clone()));

    let seeded = worker.execute(SHOP_SCHEMA).await.unwrap();
    assert!(seeded.schema_changed());

    let objects = worker.list_objects().await.unwrap();
    assert_eq!(objects[0].kind, ObjectKind::Table);
    assert_eq!(worker.columns_for("orders").await.unwrap().len(), 3);
    assert_eq!(worker.foreign_keys_for("orders").await.unwrap().len(), 1);

    let summary = worker.export_to_sql(scratch.path("out.sql")).await.unwrap();
    assert_eq!(summary.tables, 2);

    assert!(worker.disconnect().await.unwrap());
    assert_eq!(status.recv().await.unwrap(), ConnectionStatus::Disconnected);
    assert!(!worker.is_connected().await.unwrap());
}

#[tokio::test]
async fn test_worker_errors_are_returned() {
    let worker = SessionWorker::spawn(SessionOptions::default()).unwrap();
    assert!(matches!(
        worker.execute("SELECT 1").await,
        Err(LunarisError::NoConnection)
    ));
    assert!(!worker.disconnect().await.unwrap());
}

#[tokio::test]
async fn test_worker_runs_jobs_on_one_thread() {
    let scratch = Scratch::new();
    let worker = SessionWorker::spawn(SessionOptions::default()).unwrap();
    worker.create(&scratch.db_path).await.unwrap();

    let names = worker
        .run(|session| {
            session.execute("SELECT 1")?;
            Ok((
                std::thread::current().name().map(str::to_string),
                session.owner_thread() == Some(std::thread::current().id()),
            ))
        })
        .await
        .unwrap();
    assert_eq!(names.0.as_deref(), Some("lunaris-session"));
    assert!(names.1);
}
