//! [`Backend`] implementation for MySQL.
//!
//! `sqlx` is async; the stores are not. [`MySqlBackend`] owns a
//! current-thread `tokio` runtime and blocks on each statement, so the
//! menus drive it exactly like the SQLite backend.
//!
//! Column values are decoded by their MySQL type name: integers (signed or
//! unsigned) become [`Value::Integer`], `DECIMAL`/`FLOAT`/`DOUBLE` become
//! [`Value::Real`], dates and times become ISO text, binary types become
//! [`Value::Blob`] and anything else is read as text. An empty result set
//! carries no column names.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sqlmenu_core::{Backend, CoreError, ExecOutcome, QueryResult, Result, Value};
use sqlx::mysql::{MySql, MySqlArguments, MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, Connection, Row, TypeInfo, ValueRef};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info};

use crate::config::ConnectionConfig;
use crate::error::{Result as StoreResult, StoreError};

/// One MySQL connection driven synchronously.
pub struct MySqlBackend {
    runtime: Runtime,
    conn: MySqlConnection,
}

impl MySqlBackend {
    /// Connects using `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ConnectionFailed`] if the server cannot be
    /// reached or rejects the credentials.
    pub fn connect(config: &ConnectionConfig) -> StoreResult<Self> {
        config.validate()?;
        let runtime = Builder::new_current_thread().enable_all().build()?;

        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);

        let conn = runtime
            .block_on(MySqlConnection::connect_with(&options))
            .map_err(|err| StoreError::ConnectionFailed(err.to_string()))?;
        info!(target_db = %config.display_target(), "connected to mysql");
        Ok(Self { runtime, conn })
    }

    /// Closes the connection gracefully.
    pub fn close(self) -> Result<()> {
        let Self { runtime, conn } = self;
        runtime.block_on(conn.close()).map_err(CoreError::database)?;
        info!("closed mysql connection");
        Ok(())
    }
}

fn bind<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: &'q Value,
) -> Query<'q, MySql, MySqlArguments> {
    match value {
        Value::Null => query.bind(None::<i64>),
        Value::Integer(v) => query.bind(*v),
        Value::Real(v) => query.bind(*v),
        Value::Text(s) => query.bind(s.as_str()),
        Value::Blob(b) => query.bind(b.as_slice()),
    }
}

fn build<'q>(sql: &'q str, params: &'q [Value]) -> Query<'q, MySql, MySqlArguments> {
    params.iter().fold(sqlx::query(sql), bind)
}

/// How a column is read, chosen from its MySQL type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Unsigned,
    Signed,
    Boolean,
    Decimal,
    Float,
    Double,
    Date,
    DateTime,
    Timestamp,
    Time,
    Binary,
    Text,
}

impl ColumnKind {
    fn from_type_name(name: &str) -> Self {
        if name.ends_with("UNSIGNED") {
            return Self::Unsigned;
        }
        match name {
            "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => Self::Signed,
            "BOOLEAN" => Self::Boolean,
            "DECIMAL" => Self::Decimal,
            "FLOAT" => Self::Float,
            "DOUBLE" => Self::Double,
            "DATE" => Self::Date,
            "DATETIME" => Self::DateTime,
            "TIMESTAMP" => Self::Timestamp,
            "TIME" => Self::Time,
            "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
                Self::Binary
            }
            _ => Self::Text,
        }
    }
}

fn unsigned_value(v: u64) -> Result<Value> {
    i64::try_from(v)
        .map(Value::Integer)
        .map_err(|_| CoreError::Conversion(format!("unsigned value {v} exceeds i64")))
}

fn decimal_value(d: Decimal) -> Result<Value> {
    d.to_f64()
        .map(Value::Real)
        .ok_or_else(|| CoreError::Conversion(format!("decimal {d} out of range")))
}

fn decode(row: &MySqlRow, index: usize) -> Result<Value> {
    let raw = row.try_get_raw(index).map_err(CoreError::database)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let kind = ColumnKind::from_type_name(raw.type_info().name());

    let value = match kind {
        ColumnKind::Unsigned => unsigned_value(row.try_get(index).map_err(CoreError::database)?)?,
        ColumnKind::Signed => {
            Value::Integer(row.try_get::<i64, _>(index).map_err(CoreError::database)?)
        }
        ColumnKind::Boolean => {
            Value::Integer(row.try_get::<bool, _>(index).map_err(CoreError::database)? as i64)
        }
        ColumnKind::Decimal => decimal_value(row.try_get(index).map_err(CoreError::database)?)?,
        ColumnKind::Float => Value::Real(f64::from(
            row.try_get::<f32, _>(index).map_err(CoreError::database)?,
        )),
        ColumnKind::Double => {
            Value::Real(row.try_get::<f64, _>(index).map_err(CoreError::database)?)
        }
        ColumnKind::Date => {
            let d: chrono::NaiveDate = row.try_get(index).map_err(CoreError::database)?;
            Value::Text(d.to_string())
        }
        ColumnKind::DateTime => {
            let d: chrono::NaiveDateTime = row.try_get(index).map_err(CoreError::database)?;
            Value::Text(d.to_string())
        }
        ColumnKind::Timestamp => {
            let d: chrono::DateTime<chrono::Utc> =
                row.try_get(index).map_err(CoreError::database)?;
            Value::Text(d.naive_utc().to_string())
        }
        ColumnKind::Time => {
            let t: chrono::NaiveTime = row.try_get(index).map_err(CoreError::database)?;
            Value::Text(t.to_string())
        }
        ColumnKind::Binary => {
            Value::Blob(row.try_get::<Vec<u8>, _>(index).map_err(CoreError::database)?)
        }
        ColumnKind::Text => match row.try_get::<String, _>(index) {
            Ok(s) => Value::Text(s),
            Err(_) => Value::Blob(
                row.try_get_unchecked::<Vec<u8>, _>(index)
                    .map_err(CoreError::database)?,
            ),
        },
    };
    Ok(value)
}

impl Backend for MySqlBackend {
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<ExecOutcome> {
        debug!(sql, params = params.len(), "execute");
        let result = self
            .runtime
            .block_on(build(sql, params).execute(&mut self.conn))
            .map_err(CoreError::database)?;
        let last_insert_id = i64::try_from(result.last_insert_id())
            .ok()
            .filter(|id| *id > 0);
        Ok(ExecOutcome {
            rows_affected: result.rows_affected(),
            last_insert_id,
        })
    }

    fn query(&mut self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        debug!(sql, params = params.len(), "query");
        let rows = self
            .runtime
            .block_on(build(sql, params).fetch_all(&mut self.conn))
            .map_err(CoreError::database)?;

        let columns: Vec<String> = rows
            .first()
            .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
            .unwrap_or_default();

        let rows = rows
            .iter()
            .map(|row| (0..row.len()).map(|i| decode(row, i)).collect::<Result<Vec<_>>>())
            .collect::<Result<Vec<_>>>()?;
        Ok(QueryResult { columns, rows })
    }

    fn execute_batch(&mut self, sql: &str) -> Result<()> {
        debug!(sql, "execute batch");
        self.runtime
            .block_on(sqlx::raw_sql(sql).execute(&mut self.conn))
            .map_err(CoreError::database)?;
        Ok(())
    }
}
