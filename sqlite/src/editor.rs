//! Interactive SQLite schema and table editor.
//!
//! [`TableEditor`] holds the (optional) open database and exposes the data
//! operations; [`run_editor`] is the numbered-menu session on top of it:
//!
//! 1. connect to or create a database file
//! 2. create a table column by column
//! 3. list tables
//! 4. view a table
//! 5. add a row
//! 6. delete a row by primary key
//! 7. exit

use std::io::{BufRead, Write};
use std::path::Path;

use sqlmenu_core::{
    Backend, ColumnDef, ColumnInfo, Console, Constraint, CoreError, ForeignKey, Menu,
    QueryResult, Result, SqlType, TableDefinition, ValidationError, Value, parse_cell,
    quote_identifier, render_grid, validate_identifier,
};
use tracing::info;

use crate::backend::SqliteBackend;
use crate::schema::{list_tables, primary_key_column, table_info};

const MENU_OPTIONS: [&str; 7] = [
    "Connect to/Create Database",
    "Create Table",
    "List Tables",
    "View Table Data",
    "Add Row",
    "Delete Row",
    "Exit",
];

/// Generic table editor over at most one open SQLite database.
#[derive(Default)]
pub struct TableEditor {
    backend: Option<SqliteBackend>,
}

impl TableEditor {
    /// Creates an editor with no open database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an editor around an already open database.
    pub fn with_backend(backend: SqliteBackend) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.backend.is_some()
    }

    /// Opens `path`, closing any previously open database first.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let backend = SqliteBackend::open(path.as_ref())?;
        self.close()?;
        self.backend = Some(backend);
        Ok(())
    }

    /// Closes the open database. Returns `true` if one was open.
    pub fn close(&mut self) -> Result<bool> {
        match self.backend.take() {
            Some(backend) => {
                backend.close()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn backend(&mut self) -> Result<&mut SqliteBackend> {
        self.backend.as_mut().ok_or(CoreError::NotConnected)
    }

    pub fn tables(&mut self) -> Result<Vec<String>> {
        list_tables(self.backend()?)
    }

    pub fn columns(&mut self, table: &str) -> Result<Vec<ColumnInfo>> {
        table_info(self.backend()?, table)
    }

    /// Executes the `CREATE TABLE` statement for `table`.
    pub fn create_table(&mut self, table: &TableDefinition) -> Result<()> {
        let sql = table.create_sql()?;
        self.backend()?.execute_batch(&sql)?;
        info!(table = %table.name, "created table");
        Ok(())
    }

    /// Reads every row of `table`, with its column names as headers.
    pub fn rows(&mut self, table: &str) -> Result<QueryResult> {
        let columns = self.columns(table)?;
        let mut result = self
            .backend()?
            .query(&format!("SELECT * FROM {}", quote_identifier(table)), &[])?;
        result.columns = columns.into_iter().map(|c| c.name).collect();
        Ok(result)
    }

    /// Inserts one row; `values` are bound positionally to `columns`.
    pub fn insert_row(&mut self, table: &str, columns: &[ColumnInfo], values: &[Value]) -> Result<()> {
        let names: Vec<String> = columns.iter().map(|c| quote_identifier(&c.name)).collect();
        let placeholders = vec!["?"; names.len()].join(",");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_identifier(table),
            names.join(","),
            placeholders
        );
        self.backend()?.execute(&sql, values)?;
        Ok(())
    }

    pub fn row_exists(&mut self, table: &str, key_column: &str, key: &Value) -> Result<bool> {
        let sql = format!(
            "SELECT 1 FROM {} WHERE {} = ?",
            quote_identifier(table),
            quote_identifier(key_column)
        );
        self.backend()?.exists(&sql, std::slice::from_ref(key))
    }

    /// Deletes rows whose `key_column` equals `key`; returns how many were removed.
    pub fn delete_row(&mut self, table: &str, key_column: &str, key: &Value) -> Result<u64> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = ?",
            quote_identifier(table),
            quote_identifier(key_column)
        );
        let outcome = self.backend()?.execute(&sql, std::slice::from_ref(key))?;
        Ok(outcome.rows_affected)
    }
}

/// Runs the editor menu until the user exits or input ends.
pub fn run_editor<R: BufRead, W: Write>(
    editor: &mut TableEditor,
    console: &mut Console<R, W>,
) -> Result<()> {
    let menu = Menu::new("SQLite Database Editor", &MENU_OPTIONS).banner(40);
    loop {
        writeln!(console, "{menu}")?;
        let choice = match console.prompt("\nSelect an option (1-7): ") {
            Ok(choice) => choice,
            Err(CoreError::InputClosed) => break,
            Err(err) => return Err(err),
        };

        let outcome = match choice.as_str() {
            "1" => connect(editor, console),
            "2" => create_table(editor, console),
            "3" => show_tables(editor, console).map(|_| ()),
            "4" => view_table(editor, console),
            "5" => add_row(editor, console),
            "6" => delete_row(editor, console),
            "7" => break,
            _ => writeln!(console, "Invalid choice - please try again").map_err(CoreError::from),
        };

        match outcome {
            Err(CoreError::InputClosed) => break,
            other => {
                console.report("running command", other)?;
            }
        }
    }

    if console.report("closing database", editor.close())? == Some(true) {
        writeln!(console, "Database connection closed")?;
    }
    writeln!(console, "\nGoodbye!")?;
    Ok(())
}

fn ensure_connected<R: BufRead, W: Write>(
    editor: &TableEditor,
    console: &mut Console<R, W>,
) -> Result<bool> {
    if !editor.is_connected() {
        writeln!(console, "Please connect to a database first!")?;
        return Ok(false);
    }
    Ok(true)
}

fn connect<R: BufRead, W: Write>(editor: &mut TableEditor, console: &mut Console<R, W>) -> Result<()> {
    let file = console.prompt_with("Enter database filename (e.g., school.db): ", |raw| {
        if raw.is_empty() {
            Err("Filename cannot be empty!".to_string())
        } else {
            Ok(raw.to_string())
        }
    })?;
    match editor.open(&file) {
        Ok(()) => writeln!(console, "Connected to {file}")?,
        Err(err) => writeln!(console, "Error: {err}")?,
    }
    Ok(())
}

fn create_table<R: BufRead, W: Write>(
    editor: &mut TableEditor,
    console: &mut Console<R, W>,
) -> Result<()> {
    if !ensure_connected(editor, console)? {
        return Ok(());
    }

    writeln!(console, "\nCreate New Table")?;
    let name = console.prompt_with("Table name (e.g., 'students'): ", |raw| {
        if raw.is_empty() {
            return Err("Table name cannot be empty!".to_string());
        }
        validate_identifier(raw).map_err(|e| e.to_string())?;
        Ok(raw.to_string())
    })?;
    let mut table = TableDefinition::new(name);

    writeln!(console, "\nAdd columns (press Enter alone to finish):")?;
    loop {
        writeln!(console, "\nCurrent columns for '{}':", table.name)?;
        for (i, column) in table.columns.iter().enumerate() {
            writeln!(console, "{}. {column}", i + 1)?;
        }

        writeln!(console, "\nAdd new column:")?;
        let column_name = console.prompt("  Column name: ")?;
        if column_name.is_empty() {
            if table.columns.is_empty() {
                writeln!(console, "Table must have at least one column!")?;
                continue;
            }
            break;
        }
        if let Err(err) = validate_identifier(&column_name) {
            writeln!(console, "{err}")?;
            continue;
        }
        if table.has_column(&column_name) {
            writeln!(console, "{}", ValidationError::DuplicateColumn(column_name))?;
            continue;
        }

        writeln!(console, "  Common data types: INTEGER, TEXT, REAL, BLOB")?;
        let sql_type = console.prompt_with("  Data type: ", |raw| {
            raw.parse::<SqlType>()
                .map_err(|_| "Invalid type. Please use INTEGER, TEXT, REAL, or BLOB".to_string())
        })?;

        let mut column = ColumnDef::new(column_name, sql_type);
        writeln!(console, "\n  Add constraints:")?;
        for constraint in Constraint::ALL {
            if console.confirm(&format!("    {constraint}?"))? {
                column = column.with_constraint(constraint);
            }
        }
        table.columns.push(column);
    }

    writeln!(console, "\nAdd foreign keys (press Enter alone to skip):")?;
    loop {
        writeln!(console, "\nCurrent foreign keys:")?;
        for (i, fk) in table.foreign_keys.iter().enumerate() {
            writeln!(console, "{}. {fk}", i + 1)?;
        }

        writeln!(console, "\nAdd new foreign key:")?;
        let column = console.prompt("  Column name: ")?;
        if column.is_empty() {
            break;
        }
        let ref_table = console.prompt("  References table: ")?;
        let ref_column = console.prompt("  References column: ")?;

        let candidate = table
            .clone()
            .with_foreign_key(ForeignKey::new(column, ref_table, ref_column));
        match candidate.validate() {
            Ok(()) => table = candidate,
            Err(err) => writeln!(console, "Invalid foreign key: {err}")?,
        }
    }

    let sql = match table.create_sql() {
        Ok(sql) => sql,
        Err(err) => {
            writeln!(console, "Error: {err}")?;
            return Ok(());
        }
    };
    writeln!(console, "\nSQL to be executed:\n{sql}")?;

    if console.confirm("\nCreate this table?")? {
        if console
            .report("creating table", editor.create_table(&table))?
            .is_some()
        {
            writeln!(console, "Table '{}' created successfully!", table.name)?;
        }
    } else {
        writeln!(console, "Table creation cancelled.")?;
    }
    Ok(())
}

/// Prints the numbered table list and returns it.
fn show_tables<R: BufRead, W: Write>(
    editor: &mut TableEditor,
    console: &mut Console<R, W>,
) -> Result<Vec<String>> {
    if !ensure_connected(editor, console)? {
        return Ok(Vec::new());
    }

    let tables = editor.tables()?;
    if tables.is_empty() {
        writeln!(console, "No tables found in database.")?;
    } else {
        writeln!(console, "\nTables in database:")?;
        for (i, table) in tables.iter().enumerate() {
            writeln!(console, "{}. {table}", i + 1)?;
        }
    }
    Ok(tables)
}

fn select_table<R: BufRead, W: Write>(
    editor: &mut TableEditor,
    console: &mut Console<R, W>,
    purpose: &str,
) -> Result<Option<String>> {
    let tables = show_tables(editor, console)?;
    if tables.is_empty() {
        return Ok(None);
    }

    let raw = console.prompt(&format!("\nEnter table number {purpose}: "))?;
    let selected = raw
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| tables.get(i).cloned());
    if selected.is_none() {
        writeln!(console, "Invalid selection")?;
    }
    Ok(selected)
}

fn print_table<R: BufRead, W: Write>(
    editor: &mut TableEditor,
    console: &mut Console<R, W>,
    table: &str,
) -> Result<()> {
    let Some(result) = console.report("viewing table", editor.rows(table))? else {
        return Ok(());
    };
    if result.is_empty() {
        writeln!(console, "Table '{table}' is empty")?;
    } else {
        writeln!(console, "\nContents of '{table}':")?;
        writeln!(console, "{}", render_grid(&result.columns, &result.rows))?;
    }
    Ok(())
}

fn view_table<R: BufRead, W: Write>(editor: &mut TableEditor, console: &mut Console<R, W>) -> Result<()> {
    if let Some(table) = select_table(editor, console, "to view")? {
        print_table(editor, console, &table)?;
    }
    Ok(())
}

fn add_row<R: BufRead, W: Write>(editor: &mut TableEditor, console: &mut Console<R, W>) -> Result<()> {
    let Some(table) = select_table(editor, console, "to add to")? else {
        return Ok(());
    };
    let Some(columns) = console.report("reading columns", editor.columns(&table))? else {
        return Ok(());
    };

    writeln!(console, "\nAdd row to '{table}':")?;
    let mut values = Vec::with_capacity(columns.len());
    for column in &columns {
        let value = loop {
            let raw = console.prompt(&column.prompt())?;
            match parse_cell(&raw, column) {
                Ok(value) => break value,
                Err(ValidationError::NullNotAllowed(_)) => {
                    writeln!(console, "This column cannot be NULL!")?;
                }
                Err(_) => writeln!(console, "Invalid {} value", column.declared_type)?,
            }
        };
        values.push(value);
    }

    if console
        .report("adding row", editor.insert_row(&table, &columns, &values))?
        .is_some()
    {
        writeln!(console, "Row added successfully!")?;
    }
    Ok(())
}

fn delete_row<R: BufRead, W: Write>(editor: &mut TableEditor, console: &mut Console<R, W>) -> Result<()> {
    let Some(table) = select_table(editor, console, "to delete from")? else {
        return Ok(());
    };
    print_table(editor, console, &table)?;

    let Some(columns) = console.report("reading columns", editor.columns(&table))? else {
        return Ok(());
    };
    let Some(key_column) = primary_key_column(&columns).cloned() else {
        writeln!(console, "No primary key found - cannot safely delete rows")?;
        return Ok(());
    };

    let raw = console.prompt(&format!("\nEnter {} of row to delete: ", key_column.name))?;
    let lookup = ColumnInfo {
        not_null: false,
        ..key_column.clone()
    };
    let key = match parse_cell(&raw, &lookup) {
        Ok(key) => key,
        Err(_) => {
            writeln!(console, "Invalid {} value", key_column.declared_type)?;
            return Ok(());
        }
    };

    let Some(exists) =
        console.report("looking up row", editor.row_exists(&table, &key_column.name, &key))?
    else {
        return Ok(());
    };
    if !exists {
        writeln!(console, "Row not found!")?;
        return Ok(());
    }

    if !console.confirm(&format!("Delete row with {}={raw}?", key_column.name))? {
        writeln!(console, "Deletion cancelled")?;
        return Ok(());
    }

    if console
        .report("deleting row", editor.delete_row(&table, &key_column.name, &key))?
        .is_some()
    {
        writeln!(console, "Row deleted successfully!")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn editor() -> TableEditor {
        let mut backend = SqliteBackend::open_in_memory().unwrap();
        backend
            .execute_batch(
                "CREATE TABLE students (id INTEGER PRIMARY KEY, name TEXT NOT NULL, gpa REAL);
                 CREATE TABLE notes (body TEXT);",
            )
            .unwrap();
        TableEditor::with_backend(backend)
    }

    fn session(editor: &mut TableEditor, input: &str) -> String {
        let mut console = Console::new(Cursor::new(input.to_string()), Vec::new());
        run_editor(editor, &mut console).unwrap();
        String::from_utf8(console.into_output()).unwrap()
    }

    #[test]
    fn test_operations_require_connection() {
        let mut editor = TableEditor::new();
        assert!(matches!(editor.tables(), Err(CoreError::NotConnected)));
        let out = session(&mut editor, "3\n7\n");
        assert!(out.contains("Please connect to a database first!"));
    }

    #[test]
    fn test_insert_and_read_rows() {
        let mut editor = editor();
        let columns = editor.columns("students").unwrap();
        editor
            .insert_row(
                "students",
                &columns,
                &[Value::Null, Value::from("Ada"), Value::Real(3.9)],
            )
            .unwrap();
        let rows = editor.rows("students").unwrap();
        assert_eq!(rows.columns, vec!["id", "name", "gpa"]);
        assert_eq!(
            rows.rows,
            vec![vec![Value::Integer(1), Value::from("Ada"), Value::Real(3.9)]]
        );
    }

    #[test]
    fn test_delete_missing_row_affects_nothing() {
        let mut editor = editor();
        assert!(!editor.row_exists("students", "id", &Value::Integer(42)).unwrap());
        assert_eq!(editor.delete_row("students", "id", &Value::Integer(42)).unwrap(), 0);
    }

    #[test]
    fn test_invalid_menu_choice() {
        let mut editor = editor();
        let out = session(&mut editor, "9\n7\n");
        assert!(out.contains("Invalid choice - please try again"));
        assert!(out.contains("Goodbye!"));
    }

    #[test]
    fn test_table_selection_out_of_range() {
        let mut editor = editor();
        let out = session(&mut editor, "4\n0\n4\n3\n7\n");
        assert_eq!(out.matches("Invalid selection").count(), 2);
    }

    #[test]
    fn test_delete_requires_primary_key() {
        let mut editor = editor();
        // tables are listed by name: notes, students
        let out = session(&mut editor, "6\n1\n7\n");
        assert!(out.contains("Table 'notes' is empty"));
        assert!(out.contains("No primary key found - cannot safely delete rows"));
    }
}
