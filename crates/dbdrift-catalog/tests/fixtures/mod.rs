//! Test fixtures for connector integration tests
//!
//! Two small SQLite schemas that differ in every way the SQLite connector can
//! observe: an added and a removed table, column type and nullability
//! changes, a new index and a trigger whose body changed.

use std::path::{Path, PathBuf};

/// Schema of the "production" database
pub const SOURCE_DDL: &str = "
    CREATE TABLE emp (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        dept_id INTEGER,
        salary REAL
    );
    CREATE TABLE dept (id INTEGER PRIMARY KEY, title TEXT);
    CREATE TABLE audit_log (id INTEGER PRIMARY KEY, message TEXT);
    CREATE TABLE legacy (code TEXT);
    CREATE INDEX emp_dept_idx ON emp (dept_id);
    CREATE VIEW emp_names AS SELECT id, name FROM emp;
    CREATE TRIGGER emp_audit
        AFTER UPDATE ON emp
    BEGIN
        INSERT INTO audit_log (message) VALUES ('updated');
    END;
";

/// Schema of the "staging" database
pub const TARGET_DDL: &str = "
    CREATE TABLE emp (
        id INTEGER PRIMARY KEY,
        name TEXT,
        dept_id INTEGER,
        salary NUMERIC,
        hired_at TEXT
    );
    CREATE TABLE dept (id INTEGER PRIMARY KEY, title TEXT);
    CREATE TABLE audit_log (id INTEGER PRIMARY KEY, message TEXT);
    CREATE TABLE project (id INTEGER PRIMARY KEY, emp_id INTEGER NOT NULL);
    CREATE INDEX emp_dept_idx ON emp (dept_id);
    CREATE INDEX emp_name_idx ON emp (name, lower(name));
    CREATE VIEW emp_names AS SELECT id, name FROM emp;
    CREATE TRIGGER emp_audit AFTER UPDATE ON emp
    BEGIN
        INSERT INTO audit_log (message) VALUES ('emp updated');
    END;
";

/// Create a SQLite database at `dir/file_name` from `ddl`
pub fn create_database(dir: &Path, file_name: &str, ddl: &str) -> PathBuf {
    let path = dir.join(file_name);
    let conn = rusqlite::Connection::open(&path).expect("create database");
    conn.execute_batch(ddl).expect("apply ddl");
    path
}

/// `sqlite://` connection string for a database file
pub fn connection_string(path: &Path) -> String {
    format!("sqlite://{}", path.display())
}
