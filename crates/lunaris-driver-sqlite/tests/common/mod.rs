//! Common test utilities

#![allow(dead_code)]

use lunaris_driver_sqlite::{Session, SessionOptions};
use std::path::PathBuf;
use tempfile::TempDir;

/// A scratch directory holding one database file
pub struct Scratch {
    pub dir: TempDir,
    pub db_path: PathBuf,
}

impl Scratch {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let db_path = dir.path().join("test.db");
        Self { dir, db_path }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// A session connected to a new, empty database
pub fn connected_session() -> (Scratch, Session) {
    connected_session_with(SessionOptions::default())
}

pub fn connected_session_with(options: SessionOptions) -> (Scratch, Session) {
    let scratch = Scratch::new();
    let session = Session::new(options);
    session.create(&scratch.db_path).expect("create database");
    (scratch, session)
}

/// Orders and customers, linked by `orders.customer_id`
pub const SHOP_SCHEMA: &str = "
    CREATE TABLE customers (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT DEFAULT 'none'
    );
    CREATE TABLE orders (
        id INTEGER PRIMARY KEY,
        customer_id INTEGER REFERENCES customers(id) ON DELETE CASCADE,
        total REAL
    );
    CREATE INDEX idx_orders_customer ON orders(customer_id);
    CREATE VIEW big_orders AS SELECT * FROM orders WHERE total > 100;
    INSERT INTO customers VALUES (1, 'Ada', 'ada@example.com'), (2, 'Linus', NULL);
    INSERT INTO orders VALUES (10, 1, 250.0), (11, 2, 12.5);
";

pub fn shop_session() -> (Scratch, Session) {
    let (scratch, session) = connected_session();
    session.execute(SHOP_SCHEMA).expect("seed shop schema");
    (scratch, session)
}
