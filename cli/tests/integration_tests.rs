use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

/// Helper to create a temp directory that is cleaned up on drop.
struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("sqlmenu_cli_test_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).expect("failed to create temp dir");
        Self { path }
    }

    fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Runs `sqlmenu` with `args`, feeding `input` on stdin.
fn run_with_input(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_sqlmenu"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run sqlmenu");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("failed to write stdin");
    child.wait_with_output().expect("failed to wait for sqlmenu")
}

// ---------------------------------------------------------------------------
// Editor tests
// ---------------------------------------------------------------------------

#[test]
fn editor_creates_and_fills_table() {
    let dir = TempDir::new("editor_create");
    let db = dir.join("school.db");

    let input = concat!(
        "2\nstudents\n",
        "id\nINTEGER\ny\nn\nn\n",
        "name\nTEXT\nn\ny\nn\n",
        "\n\ny\n",
        "5\n1\n\nAda\n",
        "4\n1\n",
        "7\n",
    );
    let out = run_with_input(&["editor", "--db", db.to_str().unwrap()], input);

    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains(&format!("Connected to {}", db.display())));
    assert!(stdout.contains("Table 'students' created successfully!"));
    assert!(stdout.contains("Row added successfully!"));
    assert!(stdout.contains("| Ada "), "stdout: {stdout}");
    assert!(stdout.contains("Goodbye!"));
    assert!(out.stderr.is_empty(), "menus should not log at the default level");
}

#[test]
fn editor_without_database_asks_to_connect() {
    let out = run_with_input(&["editor"], "3\n7\n");
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Please connect to a database first!"));
}

#[test]
fn editor_exits_cleanly_on_end_of_input() {
    let out = run_with_input(&["editor"], "");
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).ends_with("Goodbye!\n"));
}

// ---------------------------------------------------------------------------
// Movies tests
// ---------------------------------------------------------------------------

#[test]
fn movies_init_schema_and_add_director() {
    let dir = TempDir::new("movies_director");
    let db = dir.join("leffat2.db");

    let out = run_with_input(
        &["movies", "--db", db.to_str().unwrap(), "--init-schema"],
        "2\n2\nAgnès Varda\n1928\n1\n2\n3\n",
    );

    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Director added successfully!"));
    assert!(stdout.contains("Directors Table:"));
    assert!(stdout.contains("Agnès Varda"));
}

#[test]
fn movies_verbose_logs_to_stderr() {
    let dir = TempDir::new("movies_verbose");
    let db = dir.join("leffat2.db");

    let out = run_with_input(
        &["--verbose", "movies", "--db", db.to_str().unwrap(), "--init-schema"],
        "3\n",
    );

    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("movie catalog schema ready"), "stderr: {stderr}");
    assert!(!String::from_utf8_lossy(&out.stdout).contains("schema ready"));
}

// ---------------------------------------------------------------------------
// Store tests
// ---------------------------------------------------------------------------

#[test]
fn store_sales_variant_on_sqlite() {
    let dir = TempDir::new("store_sales");
    let db = dir.join("online_store.db");

    let input = concat!(
        "1\n1\nLamp\n19.50\nDesk lamp\n",
        "2\n1\nAda\nada@example.com\n1 Loop Rd\n",
        "3\n1\nSam\nSeller\non_call\n",
        "4\n1\n1\n1\n2024-05-04\n",
        "4\n2\n1\n1\n2\n",
        "4\n4\n",
        "6\n",
    );
    let out = run_with_input(
        &[
            "store",
            "--variant",
            "sales",
            "--sqlite",
            db.to_str().unwrap(),
            "--init-schema",
        ],
        input,
    );

    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Order created successfully. Order ID: 1"));
    assert!(stdout.contains(
        "Order ID: 1, Customer: Ada, Salesperson: Sam Seller, Date: 2024-05-04, Total: $39.00"
    ));
    assert!(stdout.contains("Exiting..."));
    assert!(stdout.ends_with("SQLite connection is closed\n"));
}

#[test]
fn store_rejects_missing_config_file() {
    let dir = TempDir::new("store_config");
    let config = dir.join("missing.yml");

    let out = run_with_input(&["store", "--config", config.to_str().unwrap()], "");

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.starts_with("error: Failed to load config"), "stderr: {stderr}");
}

#[test]
fn store_rejects_invalid_config_values() {
    let dir = TempDir::new("store_config_invalid");
    let config = dir.join("store.yml");
    fs::write(&config, "database: \"\"\n").expect("failed to write config");

    let out = run_with_input(&["store", "--config", config.to_str().unwrap()], "");

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("invalid configuration: database cannot be empty"), "stderr: {stderr}");
}

#[test]
fn store_unknown_variant_is_usage_error() {
    let out = run_with_input(&["store", "--variant", "deluxe"], "");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("deluxe"));
}
