//! SQLite tools: a generic table editor and a movie catalog.
//!
//! Both tools talk to the database through [`SqliteBackend`], which
//! implements [`sqlmenu_core::Backend`] on top of `rusqlite`.
//!
//! # Architecture
//!
//! - **`backend`**: the `rusqlite` connection wrapper
//! - **`schema`**: table and column discovery (`sqlite_master`, `PRAGMA table_info`)
//! - **`editor`**: the menu-driven editor for arbitrary tables
//! - **`movies`**: the actors / directors / movies catalog
//!
//! # Quick start: editor
//!
//! ```no_run
//! use sqlmenu_core::Console;
//! use sqlmenu_sqlite::{TableEditor, run_editor};
//!
//! let mut console = Console::stdio();
//! run_editor(&mut TableEditor::new(), &mut console).unwrap();
//! ```
//!
//! # Quick start: catalog
//!
//! ```no_run
//! use sqlmenu_sqlite::{CatalogTable, DEFAULT_DB_FILE, MovieCatalog};
//!
//! let mut catalog = MovieCatalog::open(DEFAULT_DB_FILE).unwrap();
//! catalog.init_schema().unwrap();
//! let movies = catalog.table(CatalogTable::Movies).unwrap();
//! println!("{} movies", movies.len());
//! ```

mod backend;
mod editor;
mod movies;
mod schema;

pub use backend::SqliteBackend;
pub use editor::{TableEditor, run_editor};
pub use movies::{
    CatalogTable, DEFAULT_DB_FILE, MovieCatalog, NewActor, NewDirector, NewMovie, display_table,
    run_catalog,
};
pub use schema::{list_tables, primary_key_column, table_info};
