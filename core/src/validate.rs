//! Input validation performed before any SQL reaches the database.
//!
//! Identifiers typed by the user are interpolated into DDL, so they are
//! restricted to a safe character set. Cell values are coerced according to
//! the column's declared type, and `NULL` is refused for `NOT NULL` columns
//! so the user can re-enter the value instead of getting a driver error.
//!
//! # Examples
//!
//! ```
//! use sqlmenu_core::{ColumnInfo, Value, parse_cell, validate_identifier};
//!
//! assert!(validate_identifier("students").is_ok());
//! assert!(validate_identifier("drop table;--").is_err());
//!
//! let age = ColumnInfo::new("age", "INTEGER").not_null();
//! assert_eq!(parse_cell("42", &age).unwrap(), Value::Integer(42));
//! assert!(parse_cell("", &age).is_err());
//! ```

use thiserror::Error;

use crate::value::Value;

/// Input validation errors.
///
/// Each variant describes one way user input was rejected. The `Display`
/// impl is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required name was left empty.
    #[error("{0} cannot be empty")]
    Empty(&'static str),
    /// Identifier contains characters outside `[A-Za-z0-9_]` or starts with a digit.
    #[error("invalid identifier '{0}': use letters, digits and underscores, not starting with a digit")]
    InvalidIdentifier(String),
    /// Column type is not one of INTEGER, TEXT, REAL, BLOB.
    #[error("invalid type '{0}': use INTEGER, TEXT, REAL, or BLOB")]
    UnknownType(String),
    /// Table definition has no columns.
    #[error("table must have at least one column")]
    NoColumns,
    /// Two columns share a name.
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),
    /// A foreign key names a column the table does not define.
    #[error("foreign key column '{0}' is not defined in the table")]
    UnknownForeignKeyColumn(String),
    /// Empty input for a `NOT NULL` column.
    #[error("column '{0}' cannot be NULL")]
    NullNotAllowed(String),
    /// Input could not be coerced to the column's declared type.
    #[error("invalid {expected} value for column '{column}': {input}")]
    InvalidValue {
        column: String,
        expected: String,
        input: String,
    },
}

/// Validates a user-supplied table or column name.
///
/// Names must be non-empty, contain only ASCII alphanumerics and
/// underscores, and must not start with a digit.
pub fn validate_identifier(name: &str) -> Result<(), ValidationError> {
    let Some(first) = name.chars().next() else {
        return Err(ValidationError::Empty("identifier"));
    };
    if first.is_ascii_digit() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::InvalidIdentifier(name.to_string()));
    }
    Ok(())
}

/// Quotes an identifier read back from the database catalog.
///
/// Catalog names were not necessarily created by this tool, so they are
/// quoted rather than validated.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Column metadata used to prompt for and coerce cell values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    /// Declared type as written in the DDL (may be empty in SQLite).
    pub declared_type: String,
    pub not_null: bool,
    pub primary_key: bool,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            not_null: false,
            primary_key: false,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Constraint labels shown next to the prompt, e.g. `NOT NULL PRIMARY KEY`.
    pub fn constraint_labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.not_null {
            labels.push("NOT NULL");
        }
        if self.primary_key {
            labels.push("PRIMARY KEY");
        }
        labels
    }

    /// The prompt text for entering this column's value.
    pub fn prompt(&self) -> String {
        let mut prompt = format!("  {} ({})", self.name, self.declared_type);
        let labels = self.constraint_labels();
        if !labels.is_empty() {
            prompt.push_str(&format!(" [{}]", labels.join(" ")));
        }
        prompt.push_str(": ");
        prompt
    }
}

/// Converts raw console input into a value for `column`.
///
/// Empty input means `NULL`. INTEGER and REAL columns get numeric
/// coercion; every other declared type keeps the input as text.
pub fn parse_cell(input: &str, column: &ColumnInfo) -> Result<Value, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        if column.not_null {
            return Err(ValidationError::NullNotAllowed(column.name.clone()));
        }
        return Ok(Value::Null);
    }

    let invalid = || ValidationError::InvalidValue {
        column: column.name.clone(),
        expected: column.declared_type.clone(),
        input: input.to_string(),
    };

    match column.declared_type.trim().to_ascii_uppercase().as_str() {
        "INTEGER" => input.parse::<i64>().map(Value::Integer).map_err(|_| invalid()),
        "REAL" => input.parse::<f64>().map(Value::Real).map_err(|_| invalid()),
        _ => Ok(Value::Text(input.to_string())),
    }
}
