//! SQLite connector reading `sqlite_master` and the table-valued pragmas
//!
//! The database is opened read-only. Supported categories are tables, views,
//! indexes and triggers; every object lives in the `main` schema, so
//! qualified names are `main.<name>`. Internal `sqlite_%` objects (including
//! automatic indexes) are skipped.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let connector = SqliteConnector::new("sqlite:///var/lib/app/app.db")?;
//! let snapshot = connector.fetch_schema_structure().await?;
//! ```

use dbdrift_core::{Column, Columns, Nullability, ObjectCategory, SchemaObject, SchemaSnapshot};
use rusqlite::{ErrorCode, OpenFlags, OptionalExtension};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::connector::{push_key_column, ConnectionString, Connector, FetchError};

const SCHEMA: &str = "main";

/// Connector for SQLite database files
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    path: PathBuf,
}

impl SqliteConnector {
    /// Create a connector from `sqlite://<path>`, `sqlite:<path>` or a bare path
    ///
    /// No file is opened until the snapshot is fetched.
    pub fn new(connection: &str) -> Result<Self, FetchError> {
        let conn = ConnectionString::parse(connection);

        match conn.scheme() {
            None | Some("sqlite") | Some("sqlite3") | Some("file") => {}
            Some(other) => {
                return Err(FetchError::InvalidConnectionString(format!(
                    "scheme '{}' is not a SQLite scheme in '{}'",
                    other, conn
                )))
            }
        }

        if conn.rest().is_empty() {
            return Err(FetchError::InvalidConnectionString(format!(
                "missing database path in '{}'",
                conn
            )));
        }

        Ok(Self {
            path: PathBuf::from(conn.rest()),
        })
    }

    /// Database file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl Connector for SqliteConnector {
    fn name(&self) -> &'static str {
        "SQLite"
    }

    async fn fetch_schema_structure(&self) -> Result<SchemaSnapshot, FetchError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_snapshot(&path))
            .await
            .map_err(|e| FetchError::Query(format!("SQLite fetch task failed: {}", e)))?
    }
}

/// One row of `sqlite_master`
struct MasterRow {
    kind: String,
    name: String,
    table: String,
    sql: Option<String>,
}

fn read_snapshot(path: &Path) -> Result<SchemaSnapshot, FetchError> {
    check_readable(path)?;

    let conn = rusqlite::Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|e| map_sqlite_error(path, e))?;

    let rows = master_rows(&conn).map_err(|e| map_sqlite_error(path, e))?;

    let mut builder = SchemaSnapshot::builder()
        .category(ObjectCategory::Tables)
        .category(ObjectCategory::Views)
        .category(ObjectCategory::Indexes)
        .category(ObjectCategory::Triggers);

    // Index columns are typed from their table, so tables are read first
    let mut table_columns: BTreeMap<String, Columns> = BTreeMap::new();

    for row in rows.iter().filter(|r| r.kind == "table") {
        let columns = relation_columns(&conn, &row.name, false).map_err(|e| map_sqlite_error(path, e))?;
        builder.insert(
            ObjectCategory::Tables,
            SchemaObject::relation(qualify(&row.name), None, columns.values().cloned())?,
        )?;
        table_columns.insert(row.name.clone(), columns);
    }

    for row in rows.iter().filter(|r| r.kind == "view") {
        let columns = relation_columns(&conn, &row.name, true).map_err(|e| map_sqlite_error(path, e))?;
        builder.insert(
            ObjectCategory::Views,
            SchemaObject::relation(qualify(&row.name), None, columns.into_values())?,
        )?;
    }

    for row in rows.iter().filter(|r| r.kind == "index") {
        let owner = table_columns.get(&row.table);
        let columns = index_columns(&conn, &row.name, owner).map_err(|e| map_sqlite_error(path, e))?;
        builder.insert(
            ObjectCategory::Indexes,
            SchemaObject::index_like(qualify(&row.name), qualify(&row.table), columns)?,
        )?;
    }

    for row in rows.iter().filter(|r| r.kind == "trigger") {
        let sql = row.sql.as_deref().unwrap_or_default();
        let (definition, body) = split_trigger_sql(sql);
        builder.insert(
            ObjectCategory::Triggers,
            SchemaObject::code_from_body(qualify(&row.name), body, definition),
        )?;
    }

    let snapshot = builder.build();
    tracing::debug!(
        path = %path.display(),
        objects = snapshot.object_count(),
        "fetched SQLite schema"
    );

    Ok(snapshot)
}

fn check_readable(path: &Path) -> Result<(), FetchError> {
    match std::fs::File::open(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(FetchError::Unavailable(format!(
            "database file {} does not exist",
            path.display()
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => Err(FetchError::PermissionDenied(
            format!("cannot read {}: {}", path.display(), e),
        )),
        Err(e) => Err(FetchError::Unavailable(format!(
            "cannot open {}: {}",
            path.display(),
            e
        ))),
    }
}

fn master_rows(conn: &rusqlite::Connection) -> rusqlite::Result<Vec<MasterRow>> {
    let mut stmt = conn.prepare(
        "SELECT type, name, tbl_name, sql
         FROM sqlite_master
         WHERE name NOT LIKE 'sqlite\\_%' ESCAPE '\\'
           AND type IN ('table', 'view', 'index', 'trigger')
         ORDER BY type, name",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(MasterRow {
            kind: row.get(0)?,
            name: row.get(1)?,
            table: row.get(2)?,
            sql: row.get(3)?,
        })
    })?;

    rows.collect()
}

/// Columns of a table or view
///
/// Views never report NOT NULL, so their nullability is unknown. A table
/// column is NOT NULL when declared so, when it is the single `INTEGER`
/// primary key of a rowid table (the rowid alias), or when it is part of
/// the primary key of a `WITHOUT ROWID` table.
fn relation_columns(conn: &rusqlite::Connection, relation: &str, is_view: bool) -> rusqlite::Result<Columns> {
    let mut stmt = conn.prepare(
        "SELECT name, type, \"notnull\", pk FROM pragma_table_info(?1) ORDER BY cid",
    )?;

    let rows = stmt
        .query_map([relation], |row| {
            Ok(TableInfoRow {
                name: row.get(0)?,
                data_type: row.get(1)?,
                not_null: row.get(2)?,
                pk: row.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let without_rowid = !is_view && is_without_rowid(conn, relation)?;
    let pk_columns = rows.iter().filter(|row| row.pk > 0).count();

    let mut columns = Columns::new();
    for row in rows {
        let nullable = if is_view {
            Nullability::Unknown
        } else if row.not_null
            || (row.pk > 0 && without_rowid)
            || (row.pk > 0 && pk_columns == 1 && row.data_type.eq_ignore_ascii_case("INTEGER"))
        {
            Nullability::No
        } else {
            Nullability::Yes
        };

        columns.insert(
            row.name.clone(),
            Column::new(row.name, row.data_type).with_nullability(nullable),
        );
    }
    Ok(columns)
}

/// One row of `pragma_table_info`
struct TableInfoRow {
    name: String,
    data_type: String,
    not_null: bool,
    pk: i64,
}

fn is_without_rowid(conn: &rusqlite::Connection, table: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT wr FROM pragma_table_list WHERE schema = 'main' AND name = ?1",
        [table],
        |row| row.get(0),
    )
    .optional()
    .map(|wr| wr.unwrap_or(false))
}

/// Indexed columns, typed from the owning table when known
///
/// Expression columns have no name and are reported as `expr<seqno>`. A
/// column indexed twice is reported as `<name>#<seqno>` the second time.
fn index_columns(
    conn: &rusqlite::Connection,
    index: &str,
    table: Option<&Columns>,
) -> rusqlite::Result<Vec<Column>> {
    let mut stmt = conn.prepare("SELECT seqno, name FROM pragma_index_info(?1) ORDER BY seqno")?;

    let rows = stmt.query_map([index], |row| {
        let seqno: i64 = row.get(0)?;
        let name: Option<String> = row.get(1)?;
        Ok((seqno, name))
    })?;

    let mut columns = Vec::new();
    for row in rows {
        let (seqno, name) = row?;
        let column = match name {
            Some(name) => table
                .and_then(|cols| cols.get(&name))
                .cloned()
                .unwrap_or_else(|| Column::new(name, "")),
            None => Column::new(format!("expr{}", seqno), "expression"),
        };
        push_key_column(&mut columns, column, seqno);
    }
    Ok(columns)
}

/// Split `CREATE TRIGGER ... BEGIN ... END` into header and body
///
/// The header is whitespace-collapsed; the body starts at the `BEGIN` keyword.
fn split_trigger_sql(sql: &str) -> (String, &str) {
    let (header, body) = match find_keyword(sql, "BEGIN") {
        Some(pos) => (&sql[..pos], &sql[pos..]),
        None => (sql, ""),
    };

    let definition = header.split_whitespace().collect::<Vec<_>>().join(" ");
    (definition, body)
}

/// Byte offset of the first standalone, case-insensitive occurrence of `keyword`
fn find_keyword(sql: &str, keyword: &str) -> Option<usize> {
    let bytes = sql.as_bytes();
    let is_word = |b: u8| b.is_ascii_alphanumeric() || b == b'_';

    (0..bytes.len().saturating_sub(keyword.len() - 1)).find(|&i| {
        bytes[i..i + keyword.len()].eq_ignore_ascii_case(keyword.as_bytes())
            && (i == 0 || !is_word(bytes[i - 1]))
            && bytes.get(i + keyword.len()).map_or(true, |b| !is_word(*b))
    })
}

fn qualify(name: &str) -> String {
    format!("{}.{}", SCHEMA, name)
}

fn map_sqlite_error(path: &Path, err: rusqlite::Error) -> FetchError {
    let context = format!("{}: {}", path.display(), err);

    match &err {
        rusqlite::Error::SqliteFailure(failure, _) => match failure.code {
            ErrorCode::PermissionDenied | ErrorCode::AuthorizationForStatementDenied => {
                FetchError::PermissionDenied(context)
            }
            ErrorCode::CannotOpen
            | ErrorCode::NotADatabase
            | ErrorCode::DatabaseBusy
            | ErrorCode::DatabaseLocked
            | ErrorCode::SystemIoFailure => FetchError::Unavailable(context),
            _ => FetchError::Query(context),
        },
        _ => FetchError::Query(context),
    }
}
