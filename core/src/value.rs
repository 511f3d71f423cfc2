//! SQL values and result sets.
//!
//! Backends translate their driver-specific row types into [`Value`] so the
//! tools can render and inspect results without knowing which engine they
//! talk to.

use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, Result};
use crate::validate::ValidationError;

/// Column storage class offered by the table editor.
///
/// # Examples
///
/// ```
/// use sqlmenu_core::SqlType;
///
/// assert_eq!(" text ".parse::<SqlType>().unwrap(), SqlType::Text);
/// assert!("VARCHAR".parse::<SqlType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Integer,
    Text,
    Real,
    Blob,
}

impl SqlType {
    /// The SQL keyword for this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Text => "TEXT",
            Self::Real => "REAL",
            Self::Blob => "BLOB",
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SqlType {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INTEGER" => Ok(Self::Integer),
            "TEXT" => Ok(Self::Text),
            "REAL" => Ok(Self::Real),
            "BLOB" => Ok(Self::Blob),
            _ => Err(ValidationError::UnknownType(s.trim().to_string())),
        }
    }
}

/// A single SQL value as returned by, or bound into, a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Returns `true` for values that should be right-aligned in a grid.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Real(_))
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Real(v) => Some(*v),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Renders the value as display text; `NULL` becomes `None`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// One result row.
pub type Row = Vec<Value>;

/// Rows returned by a query together with their column names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl QueryResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Outcome of a statement that does not return rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOutcome {
    pub rows_affected: u64,
    /// Id generated by the last `INSERT`, when the driver reports one.
    pub last_insert_id: Option<i64>,
}

/// Positional, typed reader over a result row.
///
/// # Examples
///
/// ```
/// use sqlmenu_core::{RowReader, Value};
///
/// let row = vec![Value::Integer(7), Value::Text("Lamp".into()), Value::Real(19.5)];
/// let mut reader = RowReader::new(&row);
/// assert_eq!(reader.i64("id").unwrap(), 7);
/// assert_eq!(reader.text("name").unwrap(), "Lamp");
/// assert_eq!(reader.f64("price").unwrap(), 19.5);
/// ```
pub struct RowReader<'a> {
    row: &'a [Value],
    index: usize,
}

impl<'a> RowReader<'a> {
    pub fn new(row: &'a [Value]) -> Self {
        Self { row, index: 0 }
    }

    fn next(&mut self, column: &str) -> Result<&'a Value> {
        let value = self.row.get(self.index).ok_or_else(|| {
            CoreError::Conversion(format!("missing column '{column}' at index {}", self.index))
        })?;
        self.index += 1;
        Ok(value)
    }

    pub fn i64(&mut self, column: &str) -> Result<i64> {
        let value = self.next(column)?;
        value
            .as_i64()
            .ok_or_else(|| CoreError::Conversion(format!("column '{column}' is not an integer: {value}")))
    }

    pub fn f64(&mut self, column: &str) -> Result<f64> {
        let value = self.next(column)?;
        value
            .as_f64()
            .ok_or_else(|| CoreError::Conversion(format!("column '{column}' is not a number: {value}")))
    }

    pub fn text(&mut self, column: &str) -> Result<String> {
        let value = self.next(column)?;
        value
            .as_text()
            .ok_or_else(|| CoreError::Conversion(format!("column '{column}' is NULL")))
    }

    pub fn opt_text(&mut self, column: &str) -> Result<Option<String>> {
        Ok(self.next(column)?.as_text())
    }
}
