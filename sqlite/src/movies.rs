//! Movie catalog: actors, directors and the movies that link them.
//!
//! Each movie references one director and one lead actor. Listing the
//! movies table resolves those ids to names; ids that point nowhere (rows
//! written while foreign keys were not enforced) are shown as
//! `Unknown Director (ID:n)` / `Unknown Actor (ID:n)`.

use std::io::{BufRead, Write};
use std::path::Path;

use sqlmenu_core::{
    Backend, Console, CoreError, Menu, QueryResult, Result, Value, capitalize,
    render_grid,
};
use tracing::info;

use crate::backend::SqliteBackend;

/// Database file used when none is given.
pub const DEFAULT_DB_FILE: &str = "leffat2.db";

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS actors (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    year_of_birth INTEGER,
    hotness INTEGER CHECK (hotness BETWEEN 1 AND 100)
);

CREATE TABLE IF NOT EXISTS directors (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    year_of_birth INTEGER
);

CREATE TABLE IF NOT EXISTS movies (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    year_of_release INTEGER,
    director_id INTEGER REFERENCES directors(id),
    actor_id INTEGER REFERENCES actors(id)
);
"#;

const MOVIES_SQL: &str = "
SELECT m.id, m.name, m.year_of_release,
       COALESCE(d.name, 'Unknown Director (ID:' || COALESCE(m.director_id, 'None') || ')'),
       COALESCE(a.name, 'Unknown Actor (ID:' || COALESCE(m.actor_id, 'None') || ')')
FROM movies m
LEFT JOIN directors d ON d.id = m.director_id
LEFT JOIN actors a ON a.id = m.actor_id
ORDER BY m.id";

const MOVIE_HEADERS: [&str; 5] = ["ID", "Movie Title", "Year", "Director", "Actor"];

/// The three catalog tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogTable {
    Actors,
    Directors,
    Movies,
}

impl CatalogTable {
    pub fn name(self) -> &'static str {
        match self {
            Self::Actors => "actors",
            Self::Directors => "directors",
            Self::Movies => "movies",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActor {
    pub name: String,
    pub year_of_birth: i64,
    /// Score from 1 to 100.
    pub hotness: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDirector {
    pub name: String,
    pub year_of_birth: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovie {
    pub name: String,
    pub year_of_release: i64,
    pub director_id: i64,
    pub actor_id: i64,
}

/// A movie catalog stored in one SQLite database.
pub struct MovieCatalog {
    backend: SqliteBackend,
}

impl MovieCatalog {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_backend(SqliteBackend::open(path)?))
    }

    pub fn from_backend(backend: SqliteBackend) -> Self {
        Self { backend }
    }

    /// Creates the catalog tables if they do not exist yet.
    pub fn init_schema(&mut self) -> Result<()> {
        self.backend.execute_batch(SCHEMA_SQL)?;
        info!("movie catalog schema ready");
        Ok(())
    }

    /// Returns the rows of `table` with display headers.
    pub fn table(&mut self, table: CatalogTable) -> Result<QueryResult> {
        match table {
            CatalogTable::Movies => {
                let mut result = self.backend.query(MOVIES_SQL, &[])?;
                result.columns = MOVIE_HEADERS.iter().map(|h| h.to_string()).collect();
                Ok(result)
            }
            other => self
                .backend
                .query(&format!("SELECT * FROM {} ORDER BY id", other.name()), &[]),
        }
    }

    /// `(id, name)` pairs for the picker shown when adding a movie.
    pub fn directors(&mut self) -> Result<QueryResult> {
        self.backend.query("SELECT id, name FROM directors ORDER BY id", &[])
    }

    pub fn actors(&mut self) -> Result<QueryResult> {
        self.backend.query("SELECT id, name FROM actors ORDER BY id", &[])
    }

    pub fn director_exists(&mut self, id: i64) -> Result<bool> {
        self.backend
            .exists("SELECT id FROM directors WHERE id = ?", &[Value::Integer(id)])
    }

    pub fn actor_exists(&mut self, id: i64) -> Result<bool> {
        self.backend
            .exists("SELECT id FROM actors WHERE id = ?", &[Value::Integer(id)])
    }

    pub fn add_actor(&mut self, actor: &NewActor) -> Result<i64> {
        let outcome = self.backend.execute(
            "INSERT INTO actors (name, year_of_birth, hotness) VALUES (?, ?, ?)",
            &[
                Value::from(actor.name.as_str()),
                Value::Integer(actor.year_of_birth),
                Value::Integer(actor.hotness),
            ],
        )?;
        inserted_id(outcome.last_insert_id)
    }

    pub fn add_director(&mut self, director: &NewDirector) -> Result<i64> {
        let outcome = self.backend.execute(
            "INSERT INTO directors (name, year_of_birth) VALUES (?, ?)",
            &[
                Value::from(director.name.as_str()),
                Value::Integer(director.year_of_birth),
            ],
        )?;
        inserted_id(outcome.last_insert_id)
    }

    pub fn add_movie(&mut self, movie: &NewMovie) -> Result<i64> {
        let outcome = self.backend.execute(
            "INSERT INTO movies (name, year_of_release, director_id, actor_id) VALUES (?, ?, ?, ?)",
            &[
                Value::from(movie.name.as_str()),
                Value::Integer(movie.year_of_release),
                Value::Integer(movie.director_id),
                Value::Integer(movie.actor_id),
            ],
        )?;
        inserted_id(outcome.last_insert_id)
    }

    pub fn close(self) -> Result<()> {
        self.backend.close()
    }

    /// Access to the underlying backend, e.g. for seeding.
    pub fn backend_mut(&mut self) -> &mut SqliteBackend {
        &mut self.backend
    }
}

fn inserted_id(id: Option<i64>) -> Result<i64> {
    id.ok_or_else(|| CoreError::Database("driver did not report an inserted id".to_string()))
}

/// Runs the catalog menu until the user exits or input ends.
pub fn run_catalog<R: BufRead, W: Write>(
    mut catalog: MovieCatalog,
    console: &mut Console<R, W>,
) -> Result<()> {
    let main_menu = Menu::new(
        "Movie Database Management System",
        &["View Tables", "Add Data", "Exit"],
    );
    let view_menu = Menu::new("View Tables:", &["Actors", "Directors", "Movies"]);
    let add_menu = Menu::new("Add Data:", &["Add Actor", "Add Director", "Add Movie"]);

    loop {
        writeln!(console, "{main_menu}")?;
        let choice = match console.prompt("Select an option (1-3): ") {
            Ok(choice) => choice,
            Err(CoreError::InputClosed) => break,
            Err(err) => return Err(err),
        };

        let outcome = match choice.as_str() {
            "1" => {
                writeln!(console, "{view_menu}")?;
                match console.prompt("Select table to view (1-3): ") {
                    Ok(sub) => match sub.as_str() {
                        "1" => display_table(&mut catalog, console, CatalogTable::Actors),
                        "2" => display_table(&mut catalog, console, CatalogTable::Directors),
                        "3" => display_table(&mut catalog, console, CatalogTable::Movies),
                        _ => writeln!(console, "Invalid choice.").map_err(CoreError::from),
                    },
                    Err(err) => Err(err),
                }
            }
            "2" => {
                writeln!(console, "{add_menu}")?;
                match console.prompt("Select what to add (1-3): ") {
                    Ok(sub) => match sub.as_str() {
                        "1" => add_actor(&mut catalog, console),
                        "2" => add_director(&mut catalog, console),
                        "3" => add_movie(&mut catalog, console),
                        _ => writeln!(console, "Invalid choice.").map_err(CoreError::from),
                    },
                    Err(err) => Err(err),
                }
            }
            "3" => break,
            _ => writeln!(console, "Invalid choice. Please try again.").map_err(CoreError::from),
        };

        match outcome {
            Err(CoreError::InputClosed) => break,
            other => {
                console.report("running command", other)?;
            }
        }
    }

    console.report("closing database", catalog.close())?;
    writeln!(console, "\nGoodbye!")?;
    Ok(())
}

/// Prints one catalog table as a grid, or a note that it is empty.
pub fn display_table<R: BufRead, W: Write>(
    catalog: &mut MovieCatalog,
    console: &mut Console<R, W>,
    table: CatalogTable,
) -> Result<()> {
    let title = capitalize(table.name());
    let Some(result) =
        console.report(&format!("displaying {}", table.name()), catalog.table(table))?
    else {
        return Ok(());
    };

    if result.is_empty() {
        writeln!(console, "\n{title} table is empty")?;
    } else {
        writeln!(console, "\n{title} Table:")?;
        writeln!(console, "{}", render_grid(&result.columns, &result.rows))?;
    }
    Ok(())
}

fn non_empty(raw: &str) -> std::result::Result<String, String> {
    if raw.is_empty() {
        Err("Name cannot be empty.".to_string())
    } else {
        Ok(raw.to_string())
    }
}

fn year(raw: &str) -> std::result::Result<i64, String> {
    raw.parse()
        .map_err(|_| "Please enter a valid year.".to_string())
}

fn add_actor<R: BufRead, W: Write>(catalog: &mut MovieCatalog, console: &mut Console<R, W>) -> Result<()> {
    writeln!(console, "\nAdd New Actor")?;
    let name = console.prompt_with("Name: ", non_empty)?;
    let year_of_birth = console.prompt_with("Year of birth: ", year)?;
    let hotness = console.prompt_with("Hotness score (1-100): ", |raw| match raw.parse::<i64>() {
        Ok(score) if (1..=100).contains(&score) => Ok(score),
        _ => Err("Hotness must be a number between 1 and 100.".to_string()),
    })?;

    let actor = NewActor {
        name,
        year_of_birth,
        hotness,
    };
    if console.report("adding actor", catalog.add_actor(&actor))?.is_some() {
        writeln!(console, "Actor added successfully!")?;
    }
    Ok(())
}

fn add_director<R: BufRead, W: Write>(
    catalog: &mut MovieCatalog,
    console: &mut Console<R, W>,
) -> Result<()> {
    writeln!(console, "\nAdd New Director")?;
    let name = console.prompt_with("Name: ", non_empty)?;
    let year_of_birth = console.prompt_with("Year of birth: ", year)?;

    let director = NewDirector {
        name,
        year_of_birth,
    };
    if console
        .report("adding director", catalog.add_director(&director))?
        .is_some()
    {
        writeln!(console, "Director added successfully!")?;
    }
    Ok(())
}

fn add_movie<R: BufRead, W: Write>(catalog: &mut MovieCatalog, console: &mut Console<R, W>) -> Result<()> {
    writeln!(console, "\nAdd New Movie")?;

    let directors = catalog.directors()?;
    let actors = catalog.actors()?;
    if directors.is_empty() {
        writeln!(console, "No directors yet. Add a director first.")?;
        return Ok(());
    }
    if actors.is_empty() {
        writeln!(console, "No actors yet. Add an actor first.")?;
        return Ok(());
    }

    writeln!(console, "\nAvailable Directors:")?;
    writeln!(console, "{}", render_grid(&["ID", "Name"], &directors.rows))?;
    writeln!(console, "\nAvailable Actors:")?;
    writeln!(console, "{}", render_grid(&["ID", "Name"], &actors.rows))?;

    let name = console.prompt_with("\nMovie Title: ", non_empty)?;
    let year_of_release = console.prompt_with("Release Year: ", year)?;

    let director_id = loop {
        let id: i64 = console.prompt_number("Director ID: ")?;
        if catalog.director_exists(id)? {
            break id;
        }
        writeln!(console, "Invalid director ID. Please try again.")?;
    };
    let actor_id = loop {
        let id: i64 = console.prompt_number("Actor ID: ")?;
        if catalog.actor_exists(id)? {
            break id;
        }
        writeln!(console, "Invalid actor ID. Please try again.")?;
    };

    let movie = NewMovie {
        name,
        year_of_release,
        director_id,
        actor_id,
    };
    if console.report("adding movie", catalog.add_movie(&movie))?.is_some() {
        writeln!(console, "Movie added successfully!")?;
    }
    Ok(())
}
