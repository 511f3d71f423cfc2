//! `CREATE TABLE` statement builder.
//!
//! The table editor collects columns, constraints and foreign keys one
//! prompt at a time into a [`TableDefinition`], then renders the statement
//! with [`TableDefinition::create_sql`] for the user to confirm.
//!
//! # Examples
//!
//! ```
//! use sqlmenu_core::{ColumnDef, Constraint, ForeignKey, SqlType, TableDefinition};
//!
//! let table = TableDefinition::new("enrollments")
//!     .with_column(ColumnDef::new("id", SqlType::Integer).with_constraint(Constraint::PrimaryKey))
//!     .with_column(ColumnDef::new("student_id", SqlType::Integer).with_constraint(Constraint::NotNull))
//!     .with_foreign_key(ForeignKey::new("student_id", "students", "id"));
//!
//! assert_eq!(
//!     table.create_sql().unwrap(),
//!     "CREATE TABLE enrollments (\n  id INTEGER PRIMARY KEY,\n  student_id INTEGER NOT NULL,\n  FOREIGN KEY(student_id) REFERENCES students(id)\n);"
//! );
//! ```

use std::collections::HashSet;
use std::fmt;

use crate::validate::{ValidationError, validate_identifier};
use crate::value::SqlType;

/// Column constraint offered by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Constraint {
    PrimaryKey,
    NotNull,
    Unique,
}

impl Constraint {
    /// All constraints, in the order they are asked for and emitted.
    pub const ALL: [Constraint; 3] = [Self::PrimaryKey, Self::NotNull, Self::Unique];

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::PrimaryKey => "PRIMARY KEY",
            Self::NotNull => "NOT NULL",
            Self::Unique => "UNIQUE",
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A column definition: name, type and constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub sql_type: SqlType,
    pub constraints: Vec<Constraint>,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            constraints: Vec::new(),
        }
    }

    /// Adds a constraint; duplicates are ignored.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        if !self.constraints.contains(&constraint) {
            self.constraints.push(constraint);
            self.constraints.sort();
        }
        self
    }

    /// Renders the column as it appears inside `CREATE TABLE`.
    pub fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.sql_type);
        if !self.constraints.is_empty() {
            let constraints: Vec<&str> = self.constraints.iter().map(|c| c.as_sql()).collect();
            sql.push(' ');
            sql.push_str(&constraints.join(" "));
        }
        sql
    }
}

impl fmt::Display for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

/// A table-level foreign key clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub column: String,
    pub ref_table: String,
    pub ref_column: String,
}

impl ForeignKey {
    pub fn new(
        column: impl Into<String>,
        ref_table: impl Into<String>,
        ref_column: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            ref_table: ref_table.into(),
            ref_column: ref_column.into(),
        }
    }

    pub fn to_sql(&self) -> String {
        format!(
            "FOREIGN KEY({}) REFERENCES {}({})",
            self.column, self.ref_table, self.ref_column
        )
    }
}

impl fmt::Display for ForeignKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

/// A table being assembled by the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl TableDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    pub fn with_column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Checks names, column count, duplicates and foreign key columns.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::Empty("table name"));
        }
        validate_identifier(&self.name)?;
        if self.columns.is_empty() {
            return Err(ValidationError::NoColumns);
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            validate_identifier(&column.name)?;
            if !seen.insert(column.name.to_ascii_lowercase()) {
                return Err(ValidationError::DuplicateColumn(column.name.clone()));
            }
        }

        for fk in &self.foreign_keys {
            validate_identifier(&fk.column)?;
            validate_identifier(&fk.ref_table)?;
            validate_identifier(&fk.ref_column)?;
            if !self.has_column(&fk.column) {
                return Err(ValidationError::UnknownForeignKeyColumn(fk.column.clone()));
            }
        }
        Ok(())
    }

    /// Renders the `CREATE TABLE` statement, one definition per line.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found by [`validate`](Self::validate).
    pub fn create_sql(&self) -> Result<String, ValidationError> {
        self.validate()?;
        let definitions: Vec<String> = self
            .columns
            .iter()
            .map(ColumnDef::to_sql)
            .chain(self.foreign_keys.iter().map(ForeignKey::to_sql))
            .collect();
        Ok(format!(
            "CREATE TABLE {} (\n  {}\n);",
            self.name,
            definitions.join(",\n  ")
        ))
    }
}
