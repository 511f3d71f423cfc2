//! [`Backend`] implementation over a `rusqlite` connection.

use std::path::Path;

use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{Connection, params_from_iter};
use sqlmenu_core::{Backend, CoreError, ExecOutcome, QueryResult, Result, Value};
use tracing::{debug, info};

/// A SQLite database file (or in-memory database) opened for the tools.
///
/// Foreign key enforcement is switched on when the connection is opened.
///
/// # Examples
///
/// ```
/// use sqlmenu_core::{Backend, Value};
/// use sqlmenu_sqlite::SqliteBackend;
///
/// let mut db = SqliteBackend::open_in_memory().unwrap();
/// db.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT);").unwrap();
/// let outcome = db.execute("INSERT INTO t (name) VALUES (?)", &[Value::from("a")]).unwrap();
/// assert_eq!(outcome.last_insert_id, Some(1));
///
/// let result = db.query("SELECT id, name FROM t", &[]).unwrap();
/// assert_eq!(result.columns, vec!["id", "name"]);
/// ```
pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    /// Opens (creating if necessary) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(CoreError::database)?;
        info!(path = %path.display(), "opened sqlite database");
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(CoreError::database)?;
        Self::from_connection(conn)
    }

    /// Wraps an existing connection.
    pub fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(CoreError::database)?;
        Ok(Self { conn })
    }

    /// Closes the connection, reporting any error from SQLite.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, err)| CoreError::database(err))?;
        info!("closed sqlite database");
        Ok(())
    }
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(v) => SqlValue::Integer(*v),
        Value::Real(v) => SqlValue::Real(*v),
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Blob(b) => SqlValue::Blob(b.clone()),
    }
}

fn from_value_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Integer(v),
        ValueRef::Real(v) => Value::Real(v),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
    }
}

impl Backend for SqliteBackend {
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<ExecOutcome> {
        debug!(sql, params = params.len(), "execute");
        let rows = self
            .conn
            .execute(sql, params_from_iter(params.iter().map(to_sql_value)))
            .map_err(CoreError::database)?;
        Ok(ExecOutcome {
            rows_affected: rows as u64,
            last_insert_id: Some(self.conn.last_insert_rowid()),
        })
    }

    fn query(&mut self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        debug!(sql, params = params.len(), "query");
        let mut stmt = self.conn.prepare(sql).map_err(CoreError::database)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let rows = stmt
            .query_map(params_from_iter(params.iter().map(to_sql_value)), |row| {
                (0..width)
                    .map(|i| row.get_ref(i).map(from_value_ref))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })
            .map_err(CoreError::database)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(CoreError::database)?;

        Ok(QueryResult { columns, rows })
    }

    fn execute_batch(&mut self, sql: &str) -> Result<()> {
        debug!(sql, "execute batch");
        self.conn.execute_batch(sql).map_err(CoreError::database)
    }
}
