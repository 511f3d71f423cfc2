//! Catalog introspection for SQLite databases.
//!
//! The editor discovers everything about a table at runtime: which tables
//! exist (`sqlite_master`), and each table's columns, declared types,
//! `NOT NULL` flags and primary key membership (`PRAGMA table_info`).

use sqlmenu_core::{Backend, ColumnInfo, CoreError, Result, RowReader, quote_identifier};

/// Lists user tables, ordered by name.
///
/// SQLite's internal tables (`sqlite_sequence`, `sqlite_stat1`, ...) are
/// left out.
pub fn list_tables<B: Backend + ?Sized>(backend: &mut B) -> Result<Vec<String>> {
    let result = backend.query(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        &[],
    )?;
    result
        .rows
        .iter()
        .map(|row| RowReader::new(row).text("name"))
        .collect()
}

/// Reads column metadata for `table`.
///
/// # Errors
///
/// Returns [`CoreError::Database`] if the table does not exist.
pub fn table_info<B: Backend + ?Sized>(backend: &mut B, table: &str) -> Result<Vec<ColumnInfo>> {
    let result = backend.query(&format!("PRAGMA table_info({})", quote_identifier(table)), &[])?;
    if result.is_empty() {
        return Err(CoreError::Database(format!("no such table: {table}")));
    }

    // cid, name, type, notnull, dflt_value, pk
    result
        .rows
        .iter()
        .map(|row| {
            let mut reader = RowReader::new(row);
            reader.i64("cid")?;
            let name = reader.text("name")?;
            let declared_type = reader.opt_text("type")?.unwrap_or_default();
            let not_null = reader.i64("notnull")? != 0;
            reader.opt_text("dflt_value")?;
            let primary_key = reader.i64("pk")? > 0;
            Ok(ColumnInfo {
                name,
                declared_type,
                not_null,
                primary_key,
            })
        })
        .collect()
}

/// Returns the first primary key column, if the table has one.
pub fn primary_key_column(columns: &[ColumnInfo]) -> Option<&ColumnInfo> {
    columns.iter().find(|c| c.primary_key)
}
