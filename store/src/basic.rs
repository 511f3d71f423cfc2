//! The basic online store: each order is one product in some quantity.

use std::fmt;
use std::io::{BufRead, Write};

use chrono::NaiveDate;
use sqlmenu_core::{Backend, Console, CoreError, Menu, Result, RowReader, ValidationError, Value, money};
use tracing::info;

use crate::catalog::{
    CHOICE_PROMPT, inserted_id, manage_customers, manage_products, prompt_date, prompt_quantity,
};
use crate::model::date_value;

/// One order as listed by the menus.
///
/// `customer` and `product` are left out of listings already filtered by
/// that customer or product.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub id: i64,
    pub customer: Option<String>,
    pub product: Option<String>,
    pub quantity: i64,
    pub unit_price: f64,
    pub total: f64,
    pub order_date: String,
}

impl fmt::Display for OrderLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Order ID: {}", self.id)?;
        if let Some(customer) = &self.customer {
            write!(f, ", Customer: {customer}")?;
        }
        if let Some(product) = &self.product {
            write!(f, ", Product: {product}")?;
        }
        write!(
            f,
            ", Quantity: {}, Unit Price: {}, Total: {}, Date: {}",
            self.quantity,
            money(self.unit_price),
            money(self.total),
            self.order_date
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub customer_id: i64,
    pub product_id: i64,
    /// Must be positive.
    pub quantity: i64,
    pub order_date: NaiveDate,
}

const ORDERS_SQL: &str = "
SELECT o.id, c.name, p.name, o.quantity, p.price, o.quantity * p.price, o.order_date
FROM orders o
JOIN customers c ON o.customer_id = c.id
JOIN products p ON o.product_id = p.id
ORDER BY o.id";

const ORDERS_BY_CUSTOMER_SQL: &str = "
SELECT o.id, p.name, o.quantity, p.price, o.quantity * p.price, o.order_date
FROM orders o
JOIN products p ON o.product_id = p.id
WHERE o.customer_id = ?
ORDER BY o.id";

const ORDERS_BY_PRODUCT_SQL: &str = "
SELECT o.id, c.name, o.quantity, p.price, o.quantity * p.price, o.order_date
FROM orders o
JOIN customers c ON o.customer_id = c.id
JOIN products p ON o.product_id = p.id
WHERE o.product_id = ?
ORDER BY o.id";

/// The basic store over one backend connection.
pub struct OnlineStore<B> {
    backend: B,
}

impl<B: Backend> OnlineStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_inner(self) -> B {
        self.backend
    }

    /// Records an order and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] for a quantity below 1, or a
    /// database error if the customer or product does not exist.
    pub fn add_order(&mut self, order: &NewOrder) -> Result<i64> {
        if order.quantity <= 0 {
            return Err(ValidationError::InvalidValue {
                column: "quantity".to_string(),
                expected: "positive".to_string(),
                input: order.quantity.to_string(),
            }
            .into());
        }
        let outcome = self.backend.execute(
            "INSERT INTO orders (customer_id, product_id, quantity, order_date) VALUES (?, ?, ?, ?)",
            &[
                Value::Integer(order.customer_id),
                Value::Integer(order.product_id),
                Value::Integer(order.quantity),
                date_value(order.order_date),
            ],
        )?;
        let id = inserted_id(outcome.last_insert_id)?;
        info!(id, customer_id = order.customer_id, "added order");
        Ok(id)
    }

    /// Deletes an order; `false` if no order has that id.
    pub fn delete_order(&mut self, id: i64) -> Result<bool> {
        let outcome = self
            .backend
            .execute("DELETE FROM orders WHERE id = ?", &[Value::Integer(id)])?;
        Ok(outcome.rows_affected > 0)
    }

    /// Every order with customer and product names and the line total.
    pub fn orders(&mut self) -> Result<Vec<OrderLine>> {
        let result = self.backend.query(ORDERS_SQL, &[])?;
        result
            .rows
            .iter()
            .map(|row| read_line(row, true, true))
            .collect()
    }

    pub fn orders_by_customer(&mut self, customer_id: i64) -> Result<Vec<OrderLine>> {
        let result = self
            .backend
            .query(ORDERS_BY_CUSTOMER_SQL, &[Value::Integer(customer_id)])?;
        result
            .rows
            .iter()
            .map(|row| read_line(row, false, true))
            .collect()
    }

    pub fn orders_by_product(&mut self, product_id: i64) -> Result<Vec<OrderLine>> {
        let result = self
            .backend
            .query(ORDERS_BY_PRODUCT_SQL, &[Value::Integer(product_id)])?;
        result
            .rows
            .iter()
            .map(|row| read_line(row, true, false))
            .collect()
    }
}

fn read_line(row: &[Value], with_customer: bool, with_product: bool) -> Result<OrderLine> {
    let mut r = RowReader::new(row);
    let id = r.i64("id")?;
    let customer = if with_customer { Some(r.text("customer")?) } else { None };
    let product = if with_product { Some(r.text("product")?) } else { None };
    Ok(OrderLine {
        id,
        customer,
        product,
        quantity: r.i64("quantity")?,
        unit_price: r.f64("price")?,
        total: r.f64("total")?,
        order_date: r.text("order_date")?,
    })
}

fn print_lines<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    heading: &str,
    lines: &[OrderLine],
) -> Result<()> {
    writeln!(console, "\n{heading}:")?;
    if lines.is_empty() {
        writeln!(console, "No orders found.")?;
    }
    for line in lines {
        writeln!(console, "{line}")?;
    }
    Ok(())
}

/// Runs the basic store menu until the user exits or input ends.
pub fn run_basic_store<B, R, W>(store: &mut OnlineStore<B>, console: &mut Console<R, W>) -> Result<()>
where
    B: Backend,
    R: BufRead,
    W: Write,
{
    let menu = Menu::new(
        "Online Store Database Management System",
        &[
            "Manage Products",
            "Manage Customers",
            "Manage Orders",
            "Special Queries",
            "Exit",
        ],
    );

    loop {
        writeln!(console, "{menu}")?;
        let choice = match console.prompt(CHOICE_PROMPT) {
            Ok(choice) => choice,
            Err(CoreError::InputClosed) => break,
            Err(err) => return Err(err),
        };

        let outcome = match choice.as_str() {
            "1" => manage_products(&mut store.backend, console),
            "2" => manage_customers(&mut store.backend, console),
            "3" => manage_orders(store, console),
            "4" => special_queries(store, console),
            "5" => {
                writeln!(console, "Exiting...")?;
                break;
            }
            _ => writeln!(console, "Invalid choice. Please try again.").map_err(CoreError::from),
        };

        match outcome {
            Err(CoreError::InputClosed) => break,
            other => {
                console.report("running command", other)?;
            }
        }
    }
    Ok(())
}

fn manage_orders<B: Backend, R: BufRead, W: Write>(
    store: &mut OnlineStore<B>,
    console: &mut Console<R, W>,
) -> Result<()> {
    let menu = Menu::new("Order Management", &["Add Order", "Delete Order", "View Orders"]);
    writeln!(console, "{menu}")?;
    match console.prompt(CHOICE_PROMPT)?.as_str() {
        "1" => {
            let order = NewOrder {
                customer_id: console.prompt_number("Enter customer ID: ")?,
                product_id: console.prompt_number("Enter product ID: ")?,
                quantity: prompt_quantity(console)?,
                order_date: prompt_date(console)?,
            };
            if console.report("adding order", store.add_order(&order))?.is_some() {
                writeln!(console, "Order added successfully")?;
            }
        }
        "2" => {
            let id: i64 = console.prompt_number("Enter order ID to delete: ")?;
            match console.report("deleting order", store.delete_order(id))? {
                Some(true) => writeln!(console, "Order deleted successfully")?,
                Some(false) => writeln!(console, "Order with ID {id} not found.")?,
                None => {}
            }
        }
        "3" => {
            if let Some(lines) = console.report("viewing orders", store.orders())? {
                print_lines(console, "Orders", &lines)?;
            }
        }
        _ => writeln!(console, "Invalid choice.")?,
    }
    Ok(())
}

fn special_queries<B: Backend, R: BufRead, W: Write>(
    store: &mut OnlineStore<B>,
    console: &mut Console<R, W>,
) -> Result<()> {
    let menu = Menu::new(
        "Special Queries",
        &[
            "List all orders from a specific customer",
            "List all orders that contain a specific product",
        ],
    );
    writeln!(console, "{menu}")?;
    match console.prompt(CHOICE_PROMPT)?.as_str() {
        "1" => {
            let id: i64 = console.prompt_number("Enter customer ID: ")?;
            if let Some(lines) =
                console.report("listing orders by customer", store.orders_by_customer(id))?
            {
                print_lines(console, &format!("Orders for Customer ID {id}"), &lines)?;
            }
        }
        "2" => {
            let id: i64 = console.prompt_number("Enter product ID: ")?;
            if let Some(lines) =
                console.report("listing orders by product", store.orders_by_product(id))?
            {
                print_lines(console, &format!("Orders for Product ID {id}"), &lines)?;
            }
        }
        _ => writeln!(console, "Invalid choice.")?,
    }
    Ok(())
}
