//! Bootstrap DDL for the store tables.
//!
//! The stores expect their tables to exist. These statements create them
//! (`IF NOT EXISTS`) for either MySQL or SQLite; the two variants share
//! `products` and `customers` but disagree on `orders`, so one database
//! holds one variant.

use std::fmt;

use sqlmenu_core::{Backend, Result};
use tracing::info;

/// Which store the database holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreVariant {
    /// Each order carries a single product and quantity.
    #[default]
    Basic,
    /// Orders carry line items and are handled by a salesperson.
    Sales,
}

impl StoreVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Sales => "sales",
        }
    }
}

impl fmt::Display for StoreVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SQL dialect the DDL is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    MySql,
    Sqlite,
}

impl Dialect {
    fn id_column(self) -> &'static str {
        match self {
            Self::MySql => "id INT AUTO_INCREMENT PRIMARY KEY",
            Self::Sqlite => "id INTEGER PRIMARY KEY AUTOINCREMENT",
        }
    }

    fn money(self) -> &'static str {
        match self {
            Self::MySql => "DECIMAL(10, 2)",
            Self::Sqlite => "REAL",
        }
    }

    fn text(self, len: u16) -> String {
        match self {
            Self::MySql => format!("VARCHAR({len})"),
            Self::Sqlite => "TEXT".to_string(),
        }
    }

    fn long_text(self) -> &'static str {
        "TEXT"
    }

    fn date(self) -> &'static str {
        match self {
            Self::MySql => "DATE",
            Self::Sqlite => "TEXT",
        }
    }

    fn employment_type(self) -> &'static str {
        match self {
            Self::MySql => "ENUM('payroll', 'on_call') NOT NULL",
            Self::Sqlite => "TEXT NOT NULL CHECK (employment_type IN ('payroll', 'on_call'))",
        }
    }

    fn int(self) -> &'static str {
        match self {
            Self::MySql => "INT",
            Self::Sqlite => "INTEGER",
        }
    }
}

/// Returns the `CREATE TABLE` statements for `variant`, parents first.
///
/// # Examples
///
/// ```
/// use sqlmenu_store::{Dialect, StoreVariant, schema_sql};
///
/// let ddl = schema_sql(StoreVariant::Sales, Dialect::MySql);
/// assert_eq!(ddl.len(), 5);
/// assert!(ddl[2].contains("ENUM('payroll', 'on_call')"));
/// ```
pub fn schema_sql(variant: StoreVariant, dialect: Dialect) -> Vec<String> {
    let id = dialect.id_column();
    let int = dialect.int();

    let mut statements = vec![
        format!(
            "CREATE TABLE IF NOT EXISTS products (\n  {id},\n  name {} NOT NULL,\n  price {} NOT NULL,\n  description {}\n)",
            dialect.text(255),
            dialect.money(),
            dialect.long_text()
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS customers (\n  {id},\n  name {} NOT NULL,\n  email {},\n  address {}\n)",
            dialect.text(255),
            dialect.text(255),
            dialect.long_text()
        ),
    ];

    match variant {
        StoreVariant::Basic => statements.push(format!(
            "CREATE TABLE IF NOT EXISTS orders (\n  {id},\n  customer_id {int} NOT NULL,\n  product_id {int} NOT NULL,\n  quantity {int} NOT NULL,\n  order_date {} NOT NULL,\n  FOREIGN KEY (customer_id) REFERENCES customers(id),\n  FOREIGN KEY (product_id) REFERENCES products(id)\n)",
            dialect.date()
        )),
        StoreVariant::Sales => {
            statements.push(format!(
                "CREATE TABLE IF NOT EXISTS salespeople (\n  {id},\n  first_name {} NOT NULL,\n  last_name {} NOT NULL,\n  employment_type {}\n)",
                dialect.text(100),
                dialect.text(100),
                dialect.employment_type()
            ));
            statements.push(format!(
                "CREATE TABLE IF NOT EXISTS orders (\n  {id},\n  customer_id {int} NOT NULL,\n  salesperson_id {int} NOT NULL,\n  order_date {} NOT NULL,\n  FOREIGN KEY (customer_id) REFERENCES customers(id),\n  FOREIGN KEY (salesperson_id) REFERENCES salespeople(id)\n)",
                dialect.date()
            ));
            statements.push(format!(
                "CREATE TABLE IF NOT EXISTS order_items (\n  {id},\n  order_id {int} NOT NULL,\n  product_id {int} NOT NULL,\n  quantity {int} NOT NULL,\n  FOREIGN KEY (order_id) REFERENCES orders(id),\n  FOREIGN KEY (product_id) REFERENCES products(id)\n)"
            ));
        }
    }
    statements
}

/// Creates any missing store tables.
pub fn init_schema<B: Backend + ?Sized>(
    backend: &mut B,
    variant: StoreVariant,
    dialect: Dialect,
) -> Result<()> {
    for statement in schema_sql(variant, dialect) {
        backend.execute_batch(&statement)?;
    }
    info!(%variant, ?dialect, "store schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_schema_tables() {
        let ddl = schema_sql(StoreVariant::Basic, Dialect::Sqlite);
        assert_eq!(ddl.len(), 3);
        assert!(ddl[2].contains("product_id INTEGER NOT NULL"));
        assert!(!ddl.iter().any(|s| s.contains("salespeople (")));
    }

    #[test]
    fn test_sales_schema_orders_have_no_product() {
        let ddl = schema_sql(StoreVariant::Sales, Dialect::Sqlite);
        let orders = ddl.iter().find(|s| s.contains("EXISTS orders (")).unwrap();
        assert!(!orders.contains("product_id"));
        assert!(ddl.last().unwrap().contains("EXISTS order_items ("));
    }

    #[test]
    fn test_mysql_dialect_types() {
        let ddl = schema_sql(StoreVariant::Basic, Dialect::MySql);
        assert!(ddl[0].starts_with(
            "CREATE TABLE IF NOT EXISTS products (\n  id INT AUTO_INCREMENT PRIMARY KEY,"
        ));
        assert!(ddl[0].contains("price DECIMAL(10, 2) NOT NULL"));
        assert!(ddl[2].contains("order_date DATE NOT NULL"));
    }

    #[test]
    fn test_variant_names() {
        assert_eq!(StoreVariant::Sales.to_string(), "sales");
        assert_eq!(StoreVariant::default().to_string(), "basic");
    }
}
