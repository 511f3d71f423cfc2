//! Integration tests for the sqlmenu-sqlite crate.

use std::io::Cursor;
use std::path::Path;

use sqlmenu_core::{Backend, Console, Value};
use sqlmenu_sqlite::{
    CatalogTable, MovieCatalog, NewActor, NewDirector, SqliteBackend, TableEditor, run_catalog,
    run_editor,
};
use tempfile::TempDir;

/// Runs a scripted editor session and returns everything it printed.
fn editor_session(editor: &mut TableEditor, input: &str) -> String {
    let mut console = Console::new(Cursor::new(input.to_string()), Vec::new());
    run_editor(editor, &mut console).unwrap();
    String::from_utf8(console.into_output()).unwrap()
}

fn catalog_session(path: &Path, input: &str) -> String {
    let catalog = MovieCatalog::open(path).unwrap();
    let mut console = Console::new(Cursor::new(input.to_string()), Vec::new());
    run_catalog(catalog, &mut console).unwrap();
    String::from_utf8(console.into_output()).unwrap()
}

fn seeded_catalog(path: &Path) {
    let mut catalog = MovieCatalog::open(path).unwrap();
    catalog.init_schema().unwrap();
    catalog
        .add_director(&NewDirector {
            name: "Greta Gerwig".into(),
            year_of_birth: 1983,
        })
        .unwrap();
    catalog
        .add_actor(&NewActor {
            name: "Saoirse Ronan".into(),
            year_of_birth: 1994,
            hotness: 90,
        })
        .unwrap();
    catalog.close().unwrap();
}

#[test]
fn test_editor_creates_table_through_menu() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("school.db");

    // connect, then create students(id INTEGER PRIMARY KEY, name TEXT NOT NULL)
    let script = format!(
        "1\n{}\n2\nstudents\nid\nINTEGER\ny\nn\nn\nname\ntext\nn\ny\nn\n\n\ny\n3\n7\n",
        db_path.display()
    );
    let mut editor = TableEditor::new();
    let out = editor_session(&mut editor, &script);

    assert!(out.contains(&format!("Connected to {}", db_path.display())));
    assert!(out.contains(
        "CREATE TABLE students (\n  id INTEGER PRIMARY KEY,\n  name TEXT NOT NULL\n);"
    ));
    assert!(out.contains("Table 'students' created successfully!"));
    assert!(out.contains("1. students"));
    assert!(out.contains("Database connection closed"));
    assert!(out.ends_with("\nGoodbye!\n"));

    let mut db = SqliteBackend::open(&db_path).unwrap();
    let result = db.query("SELECT name FROM sqlite_master WHERE type = 'table'", &[]).unwrap();
    assert_eq!(result.rows, vec![vec![Value::from("students")]]);
}

#[test]
fn test_editor_rejects_null_for_not_null_column() {
    let mut db = SqliteBackend::open_in_memory().unwrap();
    db.execute_batch("CREATE TABLE students (id INTEGER PRIMARY KEY, name TEXT NOT NULL);")
        .unwrap();
    let mut editor = TableEditor::with_backend(db);

    // id left NULL (auto rowid), name empty once, then "Ada"
    let out = editor_session(&mut editor, "5\n1\n\n\nAda\n4\n1\n7\n");

    assert!(out.contains("This column cannot be NULL!"));
    assert!(out.contains("Row added successfully!"));
    assert!(out.contains("Contents of 'students':"));
    assert!(out.contains("Ada"));
}

#[test]
fn test_editor_reports_missing_row() {
    let mut db = SqliteBackend::open_in_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE students (id INTEGER PRIMARY KEY, name TEXT);
         INSERT INTO students (name) VALUES ('Ada');",
    )
    .unwrap();
    let mut editor = TableEditor::with_backend(db);

    let out = editor_session(&mut editor, "6\n1\n42\n6\n1\n1\ny\n7\n");

    assert!(out.contains("Row not found!"));
    assert!(out.contains("Delete row with id=1? (y/n): "));
    assert!(out.contains("Row deleted successfully!"));
    assert!(!editor.is_connected());
}

#[test]
fn test_editor_shows_empty_table() {
    let mut db = SqliteBackend::open_in_memory().unwrap();
    db.execute_batch("CREATE TABLE notes (body TEXT);").unwrap();
    let mut editor = TableEditor::with_backend(db);

    let out = editor_session(&mut editor, "4\n1\n6\n1\n7\n");

    assert!(out.contains("Table 'notes' is empty"));
    assert!(out.contains("No primary key found - cannot safely delete rows"));
}

#[test]
fn test_editor_stops_at_end_of_input() {
    let mut editor = TableEditor::new();
    let out = editor_session(&mut editor, "9\n");
    assert!(out.contains("Invalid choice - please try again"));
    assert!(out.ends_with("\nGoodbye!\n"));
}

#[test]
fn test_catalog_adds_movie_after_retrying_ids() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("leffat2.db");
    seeded_catalog(&db_path);

    let out = catalog_session(&db_path, "2\n3\nLady Bird\n2017\n5\n1\n7\n1\n1\n3\n3\n");

    assert!(out.contains("Invalid director ID. Please try again."));
    assert!(out.contains("Invalid actor ID. Please try again."));
    assert!(out.contains("Movie added successfully!"));
    assert!(out.contains("Movies Table:"));
    assert!(out.contains("Lady Bird"));
    assert!(out.contains("Greta Gerwig"));
    assert!(out.contains("Saoirse Ronan"));
}

#[test]
fn test_catalog_empty_and_invalid_choices() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("leffat2.db");
    let mut catalog = MovieCatalog::open(&db_path).unwrap();
    catalog.init_schema().unwrap();
    catalog.close().unwrap();

    let out = catalog_session(&db_path, "1\n2\n1\n9\n2\n3\n8\n3\n");

    assert!(out.contains("Directors table is empty"));
    assert!(out.contains("Invalid choice."));
    assert!(out.contains("No directors yet. Add a director first."));
    assert!(out.contains("Invalid choice. Please try again."));
    assert!(out.ends_with("\nGoodbye!\n"));
}

#[test]
fn test_catalog_rejects_hotness_out_of_range() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("leffat2.db");
    seeded_catalog(&db_path);

    let out = catalog_session(&db_path, "2\n1\nTom\n1980\n150\n50\n3\n");

    assert!(out.contains("Hotness must be a number between 1 and 100."));
    assert!(out.contains("Actor added successfully!"));

    let mut catalog = MovieCatalog::open(&db_path).unwrap();
    assert_eq!(catalog.table(CatalogTable::Actors).unwrap().len(), 2);
}
