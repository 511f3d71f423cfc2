//! Integration tests for the sqlmenu-store crate.
//!
//! The stores run against SQLite here; the SQL they issue is the same they
//! send to MySQL.

use std::io::Cursor;

use sqlmenu_core::{Backend, Console};
use sqlmenu_sqlite::SqliteBackend;
use sqlmenu_store::{
    Dialect, OnlineStore, SalesStore, StoreVariant, init_schema, run_basic_store, run_sales_store,
};
use tempfile::TempDir;

fn backend(dir: &TempDir, variant: StoreVariant) -> SqliteBackend {
    let mut db = SqliteBackend::open(dir.path().join("online_store.db")).unwrap();
    init_schema(&mut db, variant, Dialect::Sqlite).unwrap();
    db
}

fn basic_session(store: &mut OnlineStore<SqliteBackend>, input: &str) -> String {
    let mut console = Console::new(Cursor::new(input.to_string()), Vec::new());
    run_basic_store(store, &mut console).unwrap();
    String::from_utf8(console.into_output()).unwrap()
}

fn sales_session(store: &mut SalesStore<SqliteBackend>, input: &str) -> String {
    let mut console = Console::new(Cursor::new(input.to_string()), Vec::new());
    run_sales_store(store, &mut console).unwrap();
    String::from_utf8(console.into_output()).unwrap()
}

#[test]
fn test_basic_store_full_order_flow() {
    let dir = TempDir::new().unwrap();
    let mut store = OnlineStore::new(backend(&dir, StoreVariant::Basic));

    let script = concat!(
        // product: Lamp 19.50
        "1\n1\nLamp\n19.50\nDesk lamp\n",
        // customer: Ada
        "2\n1\nAda\nada@example.com\n1 Loop Rd\n",
        // order: bad quantity and date first
        "3\n1\n1\n1\n0\n2\n2024-13-01\n2024-03-01\n",
        // view orders, special queries by customer and product
        "3\n3\n",
        "4\n1\n1\n",
        "4\n2\n1\n",
        "5\n",
    );
    let out = basic_session(&mut store, script);

    assert!(out.contains("\nOnline Store Database Management System\n1. Manage Products\n"));
    assert!(out.contains("Product added successfully"));
    assert!(out.contains("Customer added successfully"));
    assert!(out.contains("Quantity must be a positive whole number."));
    assert!(out.contains("Please enter the date as YYYY-MM-DD."));
    assert!(out.contains("Order added successfully"));
    assert!(out.contains(
        "\nOrders:\nOrder ID: 1, Customer: Ada, Product: Lamp, Quantity: 2, Unit Price: $19.50, Total: $39.00, Date: 2024-03-01\n"
    ));
    assert!(out.contains(
        "\nOrders for Customer ID 1:\nOrder ID: 1, Product: Lamp, Quantity: 2, Unit Price: $19.50, Total: $39.00, Date: 2024-03-01\n"
    ));
    assert!(out.contains(
        "\nOrders for Product ID 1:\nOrder ID: 1, Customer: Ada, Quantity: 2, Unit Price: $19.50, Total: $39.00, Date: 2024-03-01\n"
    ));
    assert!(out.ends_with("Exiting...\n"));
}

#[test]
fn test_basic_store_reports_driver_errors_and_continues() {
    let dir = TempDir::new().unwrap();
    let mut store = OnlineStore::new(backend(&dir, StoreVariant::Basic));

    // order for customer/product that do not exist, then delete a missing order
    let out = basic_session(&mut store, "3\n1\n5\n6\n1\n2024-01-01\n3\n2\n77\n9\n");

    assert!(out.contains("Error adding order: database error: FOREIGN KEY constraint failed"));
    assert!(out.contains("Order with ID 77 not found."));
    assert!(out.contains("Invalid choice. Please try again."));
    assert!(!out.contains("Exiting..."));
}

#[test]
fn test_basic_store_product_in_use_cannot_be_deleted() {
    let dir = TempDir::new().unwrap();
    let mut db = backend(&dir, StoreVariant::Basic);
    db.execute_batch(
        "INSERT INTO products (name, price, description) VALUES ('Lamp', 19.5, '');
         INSERT INTO customers (name, email, address) VALUES ('Ada', '', '');
         INSERT INTO orders (customer_id, product_id, quantity, order_date) VALUES (1, 1, 1, '2024-01-01');",
    )
    .unwrap();
    let mut store = OnlineStore::new(db);

    let out = basic_session(&mut store, "1\n2\n1\n1\n3\n5\n");

    assert!(out.contains("Error deleting product: database error:"));
    assert!(out.contains("\nProducts:\nID: 1, Name: Lamp, Price: $19.50, Description: \n"));
}

#[test]
fn test_sales_store_order_lifecycle() {
    let dir = TempDir::new().unwrap();
    let mut store = SalesStore::new(backend(&dir, StoreVariant::Sales));

    let script = concat!(
        "1\n1\nLamp\n19.50\nDesk lamp\n",
        "1\n1\nPen\n2\nBallpoint\n",
        "2\n1\nAda\nada@example.com\n1 Loop Rd\n",
        // salesperson with a rejected employment type first
        "3\n1\nSam\nSeller\ncontractor\npayroll\n",
        "3\n3\n",
        // create order, add two items
        "4\n1\n1\n1\n2024-05-04\n",
        "4\n2\n1\n1\n1\n",
        "4\n2\n1\n2\n2\n",
        "4\n4\n",
        "4\n5\n1\n",
        "4\n5\n2\n",
        "5\n1\n1\n",
        "5\n2\n1\n",
        "5\n3\n2\n",
        "6\n",
    );
    let out = sales_session(&mut store, script);

    assert!(out.contains("Employment type must be payroll or on_call."));
    assert!(out.contains("Salesperson added successfully"));
    assert!(out.contains("\nSalespeople:\nID: 1, Name: Sam Seller, Employment Type: payroll\n"));
    assert!(out.contains("Order created successfully. Order ID: 1"));
    assert_eq!(out.matches("Product added to order successfully").count(), 2);
    assert!(out.contains(
        "\nOrders Summary:\nOrder ID: 1, Customer: Ada, Salesperson: Sam Seller, Date: 2024-05-04, Total: $23.50\n"
    ));
    assert!(out.contains("\nOrder Details - ID: 1\nCustomer: Ada\nEmail: ada@example.com\n"));
    assert!(out.contains("Salesperson: Sam Seller (payroll)\nOrder Date: 2024-05-04\n"));
    assert!(out.contains("\nOrder Total: $23.50\n"));
    assert!(out.contains("Order with ID 2 not found."));
    assert!(out.contains(
        "\nOrders for Customer ID 1:\nOrder ID: 1, Date: 2024-05-04, Products: 2, Total: $23.50\n"
    ));
    assert!(out.contains(
        "\nOrders handled by Salesperson ID 1:\nOrder ID: 1, Customer: Ada, Date: 2024-05-04, Products: 2, Total: $23.50\n"
    ));
    assert!(out.contains(
        "\nOrders containing Product ID 2:\nOrder ID: 1, Customer: Ada, Date: 2024-05-04, Quantity: 2, Unit Price: $2.00, Total: $4.00\n"
    ));
    assert!(out.ends_with("Exiting...\n"));
}

#[test]
fn test_sales_store_delete_order_and_empty_reports() {
    let dir = TempDir::new().unwrap();
    let mut db = backend(&dir, StoreVariant::Sales);
    db.execute_batch(
        "INSERT INTO products (name, price, description) VALUES ('Lamp', 19.5, '');
         INSERT INTO customers (name, email, address) VALUES ('Ada', '', '');
         INSERT INTO salespeople (first_name, last_name, employment_type) VALUES ('Sam', 'Seller', 'on_call');
         INSERT INTO orders (customer_id, salesperson_id, order_date) VALUES (1, 1, '2024-05-01');
         INSERT INTO order_items (order_id, product_id, quantity) VALUES (1, 1, 3);",
    )
    .unwrap();
    let mut store = SalesStore::new(db);

    let out = sales_session(&mut store, "4\n3\n1\n4\n3\n1\n5\n3\n1\n6\n");

    assert!(out.contains("Order deleted successfully"));
    assert!(out.contains("Order with ID 1 not found."));
    assert!(out.contains("\nOrders containing Product ID 1:\nNo orders found.\n"));

    let items = store
        .backend_mut()
        .query("SELECT COUNT(*) FROM order_items", &[])
        .unwrap();
    assert_eq!(items.rows[0][0].as_i64(), Some(0));
}
