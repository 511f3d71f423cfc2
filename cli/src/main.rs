use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sqlmenu_core::{Backend, Console};
use sqlmenu_sqlite::{DEFAULT_DB_FILE, MovieCatalog, SqliteBackend, TableEditor, run_catalog, run_editor};
use sqlmenu_store::{
    ConfigOverrides, ConnectionConfig, Dialect, MySqlBackend, OnlineStore, SalesStore,
    StoreVariant, init_schema, run_basic_store, run_sales_store,
};
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// CLI-specific store variant enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum CliStoreVariant {
    Basic,
    Sales,
}

impl From<CliStoreVariant> for StoreVariant {
    fn from(variant: CliStoreVariant) -> Self {
        match variant {
            CliStoreVariant::Basic => Self::Basic,
            CliStoreVariant::Sales => Self::Sales,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "sqlmenu")]
#[command(version, about = "Interactive menu-driven database managers")]
struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create, inspect and edit tables in any SQLite database.
    Editor(EditorArgs),
    /// Manage the actors / directors / movies catalog.
    Movies(MoviesArgs),
    /// Manage products, customers and orders of the online store.
    Store(StoreArgs),
}

#[derive(Debug, Args)]
struct EditorArgs {
    /// Database file to open at startup (otherwise use menu option 1).
    #[arg(long)]
    db: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct MoviesArgs {
    /// Catalog database file.
    #[arg(long, default_value = DEFAULT_DB_FILE)]
    db: PathBuf,
    /// Create the catalog tables if they are missing.
    #[arg(long)]
    init_schema: bool,
}

#[derive(Debug, Args)]
struct StoreArgs {
    /// Which store the database holds.
    #[arg(long, value_enum, default_value = "basic")]
    variant: CliStoreVariant,
    /// YAML file with connection settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// MySQL host (overrides the config file).
    #[arg(long)]
    host: Option<String>,
    /// MySQL port (overrides the config file).
    #[arg(long)]
    port: Option<u16>,
    /// MySQL user (overrides the config file).
    #[arg(long)]
    user: Option<String>,
    /// MySQL password (overrides the config file).
    #[arg(long)]
    password: Option<String>,
    /// MySQL database name (overrides the config file).
    #[arg(long)]
    database: Option<String>,
    /// Use this SQLite file instead of a MySQL server.
    #[arg(long, conflicts_with_all = ["config", "host", "port", "user", "password", "database"])]
    sqlite: Option<PathBuf>,
    /// Create the store tables if they are missing.
    #[arg(long)]
    init_schema: bool,
}

impl StoreArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Editor(args) => run_editor_command(args),
        Command::Movies(args) => run_movies(args),
        Command::Store(args) => run_store(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Installs the stderr log subscriber; menus own stdout.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

fn run_editor_command(args: EditorArgs) -> Result<(), String> {
    let mut editor = TableEditor::new();
    if let Some(db) = &args.db {
        editor
            .open(db)
            .map_err(|e| format!("Failed to open database '{}': {e}", db.display()))?;
        println!("Connected to {}", db.display());
    }

    let mut console = Console::stdio();
    run_editor(&mut editor, &mut console).map_err(|e| e.to_string())
}

fn run_movies(args: MoviesArgs) -> Result<(), String> {
    let mut catalog = MovieCatalog::open(&args.db)
        .map_err(|e| format!("Failed to open database '{}': {e}", args.db.display()))?;
    if args.init_schema {
        catalog
            .init_schema()
            .map_err(|e| format!("Failed to create catalog tables: {e}"))?;
    }

    let mut console = Console::stdio();
    run_catalog(catalog, &mut console).map_err(|e| e.to_string())
}

fn run_store(args: StoreArgs) -> Result<(), String> {
    let variant = StoreVariant::from(args.variant);

    if let Some(path) = &args.sqlite {
        let backend = SqliteBackend::open(path)
            .map_err(|e| format!("Failed to open database '{}': {e}", path.display()))?;
        println!("Connected to SQLite database {}", path.display());
        let backend = run_store_session(backend, variant, Dialect::Sqlite, args.init_schema)?;
        backend.close().map_err(|e| e.to_string())?;
        println!("SQLite connection is closed");
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => ConnectionConfig::load(path)
            .map_err(|e| format!("Failed to load config '{}': {e}", path.display()))?,
        None => ConnectionConfig::default(),
    }
    .with_overrides(args.overrides());
    debug!(target_db = %config.display_target(), %variant, "connecting");

    let backend = MySqlBackend::connect(&config).map_err(|e| e.to_string())?;
    println!("Connected to MySQL database");
    let backend = run_store_session(backend, variant, Dialect::MySql, args.init_schema)?;
    backend.close().map_err(|e| e.to_string())?;
    println!("MySQL connection is closed");
    Ok(())
}

/// Runs one store menu session and hands the backend back for closing.
fn run_store_session<B: Backend>(
    mut backend: B,
    variant: StoreVariant,
    dialect: Dialect,
    create_tables: bool,
) -> Result<B, String> {
    if create_tables {
        init_schema(&mut backend, variant, dialect)
            .map_err(|e| format!("Failed to create store tables: {e}"))?;
    }

    let mut console = Console::stdio();
    match variant {
        StoreVariant::Basic => {
            let mut store = OnlineStore::new(backend);
            run_basic_store(&mut store, &mut console).map_err(|e| e.to_string())?;
            Ok(store.into_inner())
        }
        StoreVariant::Sales => {
            let mut store = SalesStore::new(backend);
            run_sales_store(&mut store, &mut console).map_err(|e| e.to_string())?;
            Ok(store.into_inner())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_store_defaults_to_basic_variant() {
        let cli = Cli::try_parse_from(["sqlmenu", "store"]).unwrap();
        let Command::Store(args) = cli.command else {
            panic!("expected store command");
        };
        assert_eq!(StoreVariant::from(args.variant), StoreVariant::Basic);
        assert_eq!(args.overrides(), ConfigOverrides::default());
    }

    #[test]
    fn test_store_overrides_collected() {
        let cli = Cli::try_parse_from([
            "sqlmenu", "store", "--variant", "sales", "--host", "db", "--port", "3307", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Command::Store(args) = cli.command else {
            panic!("expected store command");
        };
        assert_eq!(StoreVariant::from(args.variant), StoreVariant::Sales);
        let config = ConnectionConfig::default().with_overrides(args.overrides());
        assert_eq!(config.display_target(), "root@db:3307/online_store");
    }

    #[test]
    fn test_sqlite_conflicts_with_mysql_flags() {
        assert!(Cli::try_parse_from(["sqlmenu", "store", "--sqlite", "x.db", "--host", "db"]).is_err());
    }

    #[test]
    fn test_movies_default_db() {
        let cli = Cli::try_parse_from(["sqlmenu", "movies"]).unwrap();
        let Command::Movies(args) = cli.command else {
            panic!("expected movies command");
        };
        assert_eq!(args.db, PathBuf::from(DEFAULT_DB_FILE));
        assert!(!args.init_schema);
    }
}
