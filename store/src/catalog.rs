//! Product and customer records, shared by both store variants.

use std::io::{BufRead, Write};

use chrono::NaiveDate;
use sqlmenu_core::{Backend, Console, CoreError, Menu, Result, ValidationError, Value};
use tracing::info;

use crate::model::{Customer, NewCustomer, NewProduct, Product, parse_order_date};

pub(crate) const CHOICE_PROMPT: &str = "Enter your choice: ";

pub(crate) fn inserted_id(id: Option<i64>) -> Result<i64> {
    id.ok_or_else(|| CoreError::Database("driver did not report an inserted id".to_string()))
}

/// Inserts a product and returns its id.
///
/// # Errors
///
/// Returns [`CoreError::Validation`] for a negative or non-finite price.
pub fn add_product<B: Backend + ?Sized>(backend: &mut B, product: &NewProduct) -> Result<i64> {
    if !product.price.is_finite() || product.price < 0.0 {
        return Err(ValidationError::InvalidValue {
            column: "price".to_string(),
            expected: "non-negative".to_string(),
            input: product.price.to_string(),
        }
        .into());
    }
    let outcome = backend.execute(
        "INSERT INTO products (name, price, description) VALUES (?, ?, ?)",
        &[
            Value::from(product.name.as_str()),
            Value::Real(product.price),
            Value::from(product.description.as_str()),
        ],
    )?;
    let id = inserted_id(outcome.last_insert_id)?;
    info!(id, name = %product.name, "added product");
    Ok(id)
}

/// Deletes a product; `false` if no product has that id.
pub fn delete_product<B: Backend + ?Sized>(backend: &mut B, id: i64) -> Result<bool> {
    let outcome = backend.execute("DELETE FROM products WHERE id = ?", &[Value::Integer(id)])?;
    Ok(outcome.rows_affected > 0)
}

pub fn products<B: Backend + ?Sized>(backend: &mut B) -> Result<Vec<Product>> {
    backend
        .query(
            "SELECT id, name, price, description FROM products ORDER BY id",
            &[],
        )?
        .rows
        .iter()
        .map(|row| Product::from_row(row))
        .collect()
}

pub fn add_customer<B: Backend + ?Sized>(backend: &mut B, customer: &NewCustomer) -> Result<i64> {
    let outcome = backend.execute(
        "INSERT INTO customers (name, email, address) VALUES (?, ?, ?)",
        &[
            Value::from(customer.name.as_str()),
            Value::from(customer.email.as_str()),
            Value::from(customer.address.as_str()),
        ],
    )?;
    let id = inserted_id(outcome.last_insert_id)?;
    info!(id, name = %customer.name, "added customer");
    Ok(id)
}

/// Deletes a customer; `false` if no customer has that id.
pub fn delete_customer<B: Backend + ?Sized>(backend: &mut B, id: i64) -> Result<bool> {
    let outcome = backend.execute("DELETE FROM customers WHERE id = ?", &[Value::Integer(id)])?;
    Ok(outcome.rows_affected > 0)
}

pub fn customers<B: Backend + ?Sized>(backend: &mut B) -> Result<Vec<Customer>> {
    backend
        .query(
            "SELECT id, name, email, address FROM customers ORDER BY id",
            &[],
        )?
        .rows
        .iter()
        .map(|row| Customer::from_row(row))
        .collect()
}

// Prompts shared by the store menus.

pub(crate) fn prompt_name<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    message: &str,
) -> Result<String> {
    console.prompt_with(message, |raw| {
        if raw.is_empty() {
            Err("Name cannot be empty.".to_string())
        } else {
            Ok(raw.to_string())
        }
    })
}

pub(crate) fn prompt_price<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<f64> {
    console.prompt_with("Enter product price: ", |raw| match raw.parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err("Please enter a valid price (0 or more).".to_string()),
    })
}

pub(crate) fn prompt_quantity<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<i64> {
    console.prompt_with("Enter quantity: ", |raw| match raw.parse::<i64>() {
        Ok(quantity) if quantity > 0 => Ok(quantity),
        _ => Err("Quantity must be a positive whole number.".to_string()),
    })
}

pub(crate) fn prompt_date<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<NaiveDate> {
    console.prompt_with("Enter order date (YYYY-MM-DD): ", |raw| {
        parse_order_date(raw).map_err(|_| "Please enter the date as YYYY-MM-DD.".to_string())
    })
}

/// Product management submenu.
pub fn manage_products<B, R, W>(backend: &mut B, console: &mut Console<R, W>) -> Result<()>
where
    B: Backend + ?Sized,
    R: BufRead,
    W: Write,
{
    let menu = Menu::new(
        "Product Management",
        &["Add Product", "Delete Product", "View Products"],
    );
    writeln!(console, "{menu}")?;
    match console.prompt(CHOICE_PROMPT)?.as_str() {
        "1" => {
            let product = NewProduct {
                name: prompt_name(console, "Enter product name: ")?,
                price: prompt_price(console)?,
                description: console.prompt("Enter product description: ")?,
            };
            if console
                .report("adding product", add_product(backend, &product))?
                .is_some()
            {
                writeln!(console, "Product added successfully")?;
            }
        }
        "2" => {
            let id: i64 = console.prompt_number("Enter product ID to delete: ")?;
            match console.report("deleting product", delete_product(backend, id))? {
                Some(true) => writeln!(console, "Product deleted successfully")?,
                Some(false) => writeln!(console, "Product with ID {id} not found.")?,
                None => {}
            }
        }
        "3" => {
            if let Some(products) = console.report("viewing products", products(backend))? {
                writeln!(console, "\nProducts:")?;
                for product in products {
                    writeln!(console, "{product}")?;
                }
            }
        }
        _ => writeln!(console, "Invalid choice.")?,
    }
    Ok(())
}

/// Customer management submenu.
pub fn manage_customers<B, R, W>(backend: &mut B, console: &mut Console<R, W>) -> Result<()>
where
    B: Backend + ?Sized,
    R: BufRead,
    W: Write,
{
    let menu = Menu::new(
        "Customer Management",
        &["Add Customer", "Delete Customer", "View Customers"],
    );
    writeln!(console, "{menu}")?;
    match console.prompt(CHOICE_PROMPT)?.as_str() {
        "1" => {
            let customer = NewCustomer {
                name: prompt_name(console, "Enter customer name: ")?,
                email: console.prompt("Enter customer email: ")?,
                address: console.prompt("Enter customer address: ")?,
            };
            if console
                .report("adding customer", add_customer(backend, &customer))?
                .is_some()
            {
                writeln!(console, "Customer added successfully")?;
            }
        }
        "2" => {
            let id: i64 = console.prompt_number("Enter customer ID to delete: ")?;
            match console.report("deleting customer", delete_customer(backend, id))? {
                Some(true) => writeln!(console, "Customer deleted successfully")?,
                Some(false) => writeln!(console, "Customer with ID {id} not found.")?,
                None => {}
            }
        }
        "3" => {
            if let Some(customers) = console.report("viewing customers", customers(backend))? {
                writeln!(console, "\nCustomers:")?;
                for customer in customers {
                    writeln!(console, "{customer}")?;
                }
            }
        }
        _ => writeln!(console, "Invalid choice.")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Dialect, StoreVariant, init_schema};
    use sqlmenu_sqlite::SqliteBackend;
    use std::io::Cursor;

    fn db() -> SqliteBackend {
        let mut db = SqliteBackend::open_in_memory().unwrap();
        init_schema(&mut db, StoreVariant::Basic, Dialect::Sqlite).unwrap();
        db
    }

    fn lamp() -> NewProduct {
        NewProduct {
            name: "Lamp".into(),
            price: 19.5,
            description: "Desk lamp".into(),
        }
    }

    #[test]
    fn test_add_and_list_products() {
        let mut db = db();
        let id = add_product(&mut db, &lamp()).unwrap();
        let products = products(&mut db).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, id);
        assert_eq!(products[0].price, 19.5);
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut db = db();
        let product = NewProduct {
            price: -1.0,
            ..lamp()
        };
        assert!(matches!(
            add_product(&mut db, &product),
            Err(CoreError::Validation(ValidationError::InvalidValue { .. }))
        ));
        assert!(products(&mut db).unwrap().is_empty());
    }

    #[test]
    fn test_delete_missing_customer_is_false() {
        let mut db = db();
        assert!(!delete_customer(&mut db, 99).unwrap());
    }

    #[test]
    fn test_product_menu_reprompts_price_and_reports_missing_id() {
        let mut db = db();
        let mut console = Console::new(
            Cursor::new("1\nLamp\n-3\nabc\n12.5\nBright\n".to_string()),
            Vec::new(),
        );
        manage_products(&mut db, &mut console).unwrap();

        let mut console = Console::new(Cursor::new("2\n42\n".to_string()), console.into_output());
        manage_products(&mut db, &mut console).unwrap();

        let out = String::from_utf8(console.into_output()).unwrap();
        assert!(out.contains("\nProduct Management\n1. Add Product\n2. Delete Product\n3. View Products\n"));
        assert_eq!(out.matches("Please enter a valid price (0 or more).").count(), 2);
        assert!(out.contains("Product added successfully"));
        assert!(out.contains("Product with ID 42 not found."));
    }

    #[test]
    fn test_customer_menu_lists_customers() {
        let mut db = db();
        add_customer(
            &mut db,
            &NewCustomer {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                address: "1 Loop Rd".into(),
            },
        )
        .unwrap();
        let mut console = Console::new(Cursor::new("3\n".to_string()), Vec::new());
        manage_customers(&mut db, &mut console).unwrap();
        let out = String::from_utf8(console.into_output()).unwrap();
        assert!(out.contains("\nCustomers:\nID: 1, Name: Ada, Email: ada@example.com, Address: 1 Loop Rd\n"));
    }
}
