//! Shared building blocks for the sqlmenu interactive database tools.
//!
//! Every tool in the workspace is a menu loop that reads a choice, prompts
//! for values, runs one parameterized statement and prints the result. This
//! crate holds the parts they share:
//!
//! - [`Backend`]: one open connection; implemented for SQLite and MySQL.
//! - [`Value`], [`QueryResult`], [`RowReader`]: engine-neutral results.
//! - [`TableDefinition`]: the `CREATE TABLE` builder behind the editor.
//! - [`parse_cell`], [`validate_identifier`]: input checks done before any
//!   SQL is issued.
//! - [`Console`], [`Menu`]: prompting and menu rendering.
//! - [`render_grid`]: grid-formatted result tables.
//!
//! # Example
//!
//! ```
//! use sqlmenu_core::*;
//!
//! let table = TableDefinition::new("students")
//!     .with_column(ColumnDef::new("id", SqlType::Integer).with_constraint(Constraint::PrimaryKey))
//!     .with_column(ColumnDef::new("name", SqlType::Text).with_constraint(Constraint::NotNull));
//!
//! assert_eq!(
//!     table.create_sql().unwrap(),
//!     "CREATE TABLE students (\n  id INTEGER PRIMARY KEY,\n  name TEXT NOT NULL\n);"
//! );
//! ```

mod backend;
mod console;
mod error;
mod format;
mod menu;
mod table;
mod validate;
mod value;

pub use backend::Backend;
pub use console::Console;
pub use error::{CoreError, Result};
pub use format::{capitalize, money, render_grid};
pub use menu::Menu;
pub use table::{ColumnDef, Constraint, ForeignKey, TableDefinition};
pub use validate::{ColumnInfo, ValidationError, parse_cell, quote_identifier, validate_identifier};
pub use value::{ExecOutcome, QueryResult, Row, RowReader, SqlType, Value};
