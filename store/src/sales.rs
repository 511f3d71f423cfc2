//! The sales store: orders are handled by a salesperson and hold any number
//! of product lines (`order_items`).

use std::fmt;
use std::io::{BufRead, Write};

use chrono::NaiveDate;
use sqlmenu_core::{Backend, Console, CoreError, Menu, Result, RowReader, ValidationError, Value, money};
use tracing::info;

use crate::catalog::{
    CHOICE_PROMPT, inserted_id, manage_customers, manage_products, prompt_date, prompt_name,
    prompt_quantity,
};
use crate::model::{EmploymentType, NewSalesperson, Salesperson, date_value};

/// One row of the orders summary.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    pub id: i64,
    pub customer: String,
    pub salesperson: String,
    pub order_date: String,
    pub total: f64,
}

impl fmt::Display for OrderSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order ID: {}, Customer: {}, Salesperson: {}, Date: {}, Total: {}",
            self.id,
            self.customer,
            self.salesperson,
            self.order_date,
            money(self.total)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemLine {
    pub product: String,
    pub price: f64,
    pub quantity: i64,
    pub total: f64,
}

impl fmt::Display for OrderItemLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "  Product: {}, Price: {}, Quantity: {}, Total: {}",
            self.product,
            money(self.price),
            self.quantity,
            money(self.total)
        )
    }
}

/// Header and item lines of one order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetails {
    pub id: i64,
    pub customer: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub salesperson: String,
    pub employment_type: String,
    pub order_date: String,
    pub items: Vec<OrderItemLine>,
}

impl OrderDetails {
    pub fn total(&self) -> f64 {
        self.items.iter().map(|item| item.total).sum()
    }
}

impl fmt::Display for OrderDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nOrder Details - ID: {}", self.id)?;
        writeln!(f, "Customer: {}", self.customer)?;
        writeln!(f, "Email: {}", self.email.as_deref().unwrap_or_default())?;
        writeln!(f, "Address: {}", self.address.as_deref().unwrap_or_default())?;
        writeln!(f, "Salesperson: {} ({})", self.salesperson, self.employment_type)?;
        writeln!(f, "Order Date: {}", self.order_date)?;
        writeln!(f, "\nOrder Items:")?;
        for item in &self.items {
            writeln!(f, "{item}")?;
        }
        write!(f, "\nOrder Total: {}", money(self.total()))
    }
}

/// Per-order totals for the customer and salesperson reports.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderReport {
    pub id: i64,
    /// Present in the salesperson report only.
    pub customer: Option<String>,
    pub order_date: String,
    pub product_count: i64,
    pub total: f64,
}

impl fmt::Display for OrderReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Order ID: {}", self.id)?;
        if let Some(customer) = &self.customer {
            write!(f, ", Customer: {customer}")?;
        }
        write!(
            f,
            ", Date: {}, Products: {}, Total: {}",
            self.order_date,
            self.product_count,
            money(self.total)
        )
    }
}

/// An order line for the product report.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductOrderLine {
    pub id: i64,
    pub customer: String,
    pub order_date: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub total: f64,
}

impl fmt::Display for ProductOrderLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order ID: {}, Customer: {}, Date: {}, Quantity: {}, Unit Price: {}, Total: {}",
            self.id,
            self.customer,
            self.order_date,
            self.quantity,
            money(self.unit_price),
            money(self.total)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSalesOrder {
    pub customer_id: i64,
    pub salesperson_id: i64,
    pub order_date: NaiveDate,
}

// Orders without items still appear in the summary, with a zero total.
const SUMMARY_SQL: &str = "
SELECT o.id, c.name, s.first_name, s.last_name, o.order_date,
       COALESCE(SUM(oi.quantity * p.price), 0)
FROM orders o
JOIN customers c ON o.customer_id = c.id
JOIN salespeople s ON o.salesperson_id = s.id
LEFT JOIN order_items oi ON oi.order_id = o.id
LEFT JOIN products p ON oi.product_id = p.id
GROUP BY o.id, c.name, s.first_name, s.last_name, o.order_date
ORDER BY o.order_date DESC, o.id DESC";

const DETAILS_HEADER_SQL: &str = "
SELECT o.id, c.name, c.email, c.address, s.first_name, s.last_name,
       s.employment_type, o.order_date
FROM orders o
JOIN customers c ON o.customer_id = c.id
JOIN salespeople s ON o.salesperson_id = s.id
WHERE o.id = ?";

const DETAILS_ITEMS_SQL: &str = "
SELECT p.name, p.price, oi.quantity, p.price * oi.quantity
FROM order_items oi
JOIN products p ON oi.product_id = p.id
WHERE oi.order_id = ?
ORDER BY oi.id";

const BY_CUSTOMER_SQL: &str = "
SELECT o.id, o.order_date, COUNT(oi.product_id), SUM(oi.quantity * p.price)
FROM orders o
JOIN order_items oi ON o.id = oi.order_id
JOIN products p ON oi.product_id = p.id
WHERE o.customer_id = ?
GROUP BY o.id, o.order_date
ORDER BY o.order_date DESC, o.id DESC";

const BY_SALESPERSON_SQL: &str = "
SELECT o.id, c.name, o.order_date, COUNT(oi.product_id), SUM(oi.quantity * p.price)
FROM orders o
JOIN customers c ON o.customer_id = c.id
JOIN order_items oi ON o.id = oi.order_id
JOIN products p ON oi.product_id = p.id
WHERE o.salesperson_id = ?
GROUP BY o.id, c.name, o.order_date
ORDER BY o.order_date DESC, o.id DESC";

const BY_PRODUCT_SQL: &str = "
SELECT o.id, c.name, o.order_date, oi.quantity, p.price, oi.quantity * p.price
FROM orders o
JOIN customers c ON o.customer_id = c.id
JOIN order_items oi ON o.id = oi.order_id
JOIN products p ON oi.product_id = p.id
WHERE oi.product_id = ?
ORDER BY o.order_date DESC, o.id DESC";

/// The sales store over one backend connection.
pub struct SalesStore<B> {
    backend: B,
}

impl<B: Backend> SalesStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_inner(self) -> B {
        self.backend
    }

    pub fn add_salesperson(&mut self, salesperson: &NewSalesperson) -> Result<i64> {
        let outcome = self.backend.execute(
            "INSERT INTO salespeople (first_name, last_name, employment_type) VALUES (?, ?, ?)",
            &[
                Value::from(salesperson.first_name.as_str()),
                Value::from(salesperson.last_name.as_str()),
                Value::from(salesperson.employment_type.as_str()),
            ],
        )?;
        let id = inserted_id(outcome.last_insert_id)?;
        info!(id, employment_type = %salesperson.employment_type, "added salesperson");
        Ok(id)
    }

    /// Deletes a salesperson; `false` if no salesperson has that id.
    pub fn delete_salesperson(&mut self, id: i64) -> Result<bool> {
        let outcome = self
            .backend
            .execute("DELETE FROM salespeople WHERE id = ?", &[Value::Integer(id)])?;
        Ok(outcome.rows_affected > 0)
    }

    pub fn salespeople(&mut self) -> Result<Vec<Salesperson>> {
        self.backend
            .query(
                "SELECT id, first_name, last_name, employment_type FROM salespeople ORDER BY id",
                &[],
            )?
            .rows
            .iter()
            .map(|row| Salesperson::from_row(row))
            .collect()
    }

    /// Creates an empty order and returns its id.
    pub fn create_order(&mut self, order: &NewSalesOrder) -> Result<i64> {
        let outcome = self.backend.execute(
            "INSERT INTO orders (customer_id, salesperson_id, order_date) VALUES (?, ?, ?)",
            &[
                Value::Integer(order.customer_id),
                Value::Integer(order.salesperson_id),
                date_value(order.order_date),
            ],
        )?;
        let id = inserted_id(outcome.last_insert_id)?;
        info!(id, salesperson_id = order.salesperson_id, "created order");
        Ok(id)
    }

    /// Adds a product line to an existing order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] for a quantity below 1, or a
    /// database error if the order or product does not exist.
    pub fn add_order_item(&mut self, order_id: i64, product_id: i64, quantity: i64) -> Result<i64> {
        if quantity <= 0 {
            return Err(ValidationError::InvalidValue {
                column: "quantity".to_string(),
                expected: "positive".to_string(),
                input: quantity.to_string(),
            }
            .into());
        }
        let outcome = self.backend.execute(
            "INSERT INTO order_items (order_id, product_id, quantity) VALUES (?, ?, ?)",
            &[
                Value::Integer(order_id),
                Value::Integer(product_id),
                Value::Integer(quantity),
            ],
        )?;
        inserted_id(outcome.last_insert_id)
    }

    /// Deletes an order's items, then the order; `false` if no order has that id.
    pub fn delete_order(&mut self, id: i64) -> Result<bool> {
        let key = [Value::Integer(id)];
        self.backend
            .execute("DELETE FROM order_items WHERE order_id = ?", &key)?;
        let outcome = self.backend.execute("DELETE FROM orders WHERE id = ?", &key)?;
        Ok(outcome.rows_affected > 0)
    }

    /// All orders, newest first.
    pub fn order_summaries(&mut self) -> Result<Vec<OrderSummary>> {
        let result = self.backend.query(SUMMARY_SQL, &[])?;
        result
            .rows
            .iter()
            .map(|row| {
                let mut r = RowReader::new(row);
                Ok(OrderSummary {
                    id: r.i64("id")?,
                    customer: r.text("customer")?,
                    salesperson: full_name(r.text("first_name")?, r.text("last_name")?),
                    order_date: r.text("order_date")?,
                    total: r.f64("total")?,
                })
            })
            .collect()
    }

    /// Header and items of order `id`, or `None` if it does not exist.
    pub fn order_details(&mut self, id: i64) -> Result<Option<OrderDetails>> {
        let key = [Value::Integer(id)];
        let Some(header) = self.backend.query_row(DETAILS_HEADER_SQL, &key)? else {
            return Ok(None);
        };

        let items = self
            .backend
            .query(DETAILS_ITEMS_SQL, &key)?
            .rows
            .iter()
            .map(|row| {
                let mut r = RowReader::new(row);
                Ok(OrderItemLine {
                    product: r.text("product")?,
                    price: r.f64("price")?,
                    quantity: r.i64("quantity")?,
                    total: r.f64("total")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut r = RowReader::new(&header);
        Ok(Some(OrderDetails {
            id: r.i64("id")?,
            customer: r.text("customer")?,
            email: r.opt_text("email")?,
            address: r.opt_text("address")?,
            salesperson: full_name(r.text("first_name")?, r.text("last_name")?),
            employment_type: r.text("employment_type")?,
            order_date: r.text("order_date")?,
            items,
        }))
    }

    pub fn orders_by_customer(&mut self, customer_id: i64) -> Result<Vec<OrderReport>> {
        let result = self
            .backend
            .query(BY_CUSTOMER_SQL, &[Value::Integer(customer_id)])?;
        result
            .rows
            .iter()
            .map(|row| {
                let mut r = RowReader::new(row);
                Ok(OrderReport {
                    id: r.i64("id")?,
                    customer: None,
                    order_date: r.text("order_date")?,
                    product_count: r.i64("product_count")?,
                    total: r.f64("total")?,
                })
            })
            .collect()
    }

    pub fn orders_by_salesperson(&mut self, salesperson_id: i64) -> Result<Vec<OrderReport>> {
        let result = self
            .backend
            .query(BY_SALESPERSON_SQL, &[Value::Integer(salesperson_id)])?;
        result
            .rows
            .iter()
            .map(|row| {
                let mut r = RowReader::new(row);
                Ok(OrderReport {
                    id: r.i64("id")?,
                    customer: Some(r.text("customer")?),
                    order_date: r.text("order_date")?,
                    product_count: r.i64("product_count")?,
                    total: r.f64("total")?,
                })
            })
            .collect()
    }

    pub fn orders_by_product(&mut self, product_id: i64) -> Result<Vec<ProductOrderLine>> {
        let result = self
            .backend
            .query(BY_PRODUCT_SQL, &[Value::Integer(product_id)])?;
        result
            .rows
            .iter()
            .map(|row| {
                let mut r = RowReader::new(row);
                Ok(ProductOrderLine {
                    id: r.i64("id")?,
                    customer: r.text("customer")?,
                    order_date: r.text("order_date")?,
                    quantity: r.i64("quantity")?,
                    unit_price: r.f64("price")?,
                    total: r.f64("total")?,
                })
            })
            .collect()
    }
}

fn full_name(first: String, last: String) -> String {
    format!("{first} {last}")
}

fn print_all<R, W, T>(console: &mut Console<R, W>, heading: &str, rows: &[T]) -> Result<()>
where
    R: BufRead,
    W: Write,
    T: fmt::Display,
{
    writeln!(console, "\n{heading}:")?;
    if rows.is_empty() {
        writeln!(console, "No orders found.")?;
    }
    for row in rows {
        writeln!(console, "{row}")?;
    }
    Ok(())
}

/// Runs the sales store menu until the user exits or input ends.
pub fn run_sales_store<B, R, W>(store: &mut SalesStore<B>, console: &mut Console<R, W>) -> Result<()>
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
            "Manage Salespeople",
            "Manage Orders",
            "View Reports",
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
            "3" => manage_salespeople(store, console),
            "4" => manage_orders(store, console),
            "5" => reports(store, console),
            "6" => {
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

fn manage_salespeople<B: Backend, R: BufRead, W: Write>(
    store: &mut SalesStore<B>,
    console: &mut Console<R, W>,
) -> Result<()> {
    let menu = Menu::new(
        "Salesperson Management",
        &["Add Salesperson", "Delete Salesperson", "View Salespeople"],
    );
    writeln!(console, "{menu}")?;
    match console.prompt(CHOICE_PROMPT)?.as_str() {
        "1" => {
            let salesperson = NewSalesperson {
                first_name: prompt_name(console, "Enter salesperson first name: ")?,
                last_name: prompt_name(console, "Enter salesperson last name: ")?,
                employment_type: console.prompt_with(
                    "Enter employment type (payroll/on_call): ",
                    |raw| {
                        raw.parse::<EmploymentType>()
                            .map_err(|_| "Employment type must be payroll or on_call.".to_string())
                    },
                )?,
            };
            if console
                .report("adding salesperson", store.add_salesperson(&salesperson))?
                .is_some()
            {
                writeln!(console, "Salesperson added successfully")?;
            }
        }
        "2" => {
            let id: i64 = console.prompt_number("Enter salesperson ID to delete: ")?;
            match console.report("deleting salesperson", store.delete_salesperson(id))? {
                Some(true) => writeln!(console, "Salesperson deleted successfully")?,
                Some(false) => writeln!(console, "Salesperson with ID {id} not found.")?,
                None => {}
            }
        }
        "3" => {
            if let Some(salespeople) = console.report("viewing salespeople", store.salespeople())? {
                writeln!(console, "\nSalespeople:")?;
                for salesperson in salespeople {
                    writeln!(console, "{salesperson}")?;
                }
            }
        }
        _ => writeln!(console, "Invalid choice.")?,
    }
    Ok(())
}

fn manage_orders<B: Backend, R: BufRead, W: Write>(
    store: &mut SalesStore<B>,
    console: &mut Console<R, W>,
) -> Result<()> {
    let menu = Menu::new(
        "Order Management",
        &[
            "Create New Order",
            "Add Product to Order",
            "Delete Order",
            "View Orders Summary",
            "View Order Details",
        ],
    );
    writeln!(console, "{menu}")?;
    match console.prompt(CHOICE_PROMPT)?.as_str() {
        "1" => {
            let order = NewSalesOrder {
                customer_id: console.prompt_number("Enter customer ID: ")?,
                salesperson_id: console.prompt_number("Enter salesperson ID: ")?,
                order_date: prompt_date(console)?,
            };
            if let Some(id) = console.report("creating order", store.create_order(&order))? {
                writeln!(console, "Order created successfully. Order ID: {id}")?;
            }
        }
        "2" => {
            let order_id: i64 = console.prompt_number("Enter order ID: ")?;
            let product_id: i64 = console.prompt_number("Enter product ID: ")?;
            let quantity = prompt_quantity(console)?;
            if console
                .report(
                    "adding product to order",
                    store.add_order_item(order_id, product_id, quantity),
                )?
                .is_some()
            {
                writeln!(console, "Product added to order successfully")?;
            }
        }
        "3" => {
            let id: i64 = console.prompt_number("Enter order ID to delete: ")?;
            match console.report("deleting order", store.delete_order(id))? {
                Some(true) => writeln!(console, "Order deleted successfully")?,
                Some(false) => writeln!(console, "Order with ID {id} not found.")?,
                None => {}
            }
        }
        "4" => {
            if let Some(summaries) = console.report("viewing orders", store.order_summaries())? {
                print_all(console, "Orders Summary", &summaries)?;
            }
        }
        "5" => {
            let id: i64 = console.prompt_number("Enter order ID to view details: ")?;
            match console.report("viewing order details", store.order_details(id))? {
                Some(Some(details)) => writeln!(console, "{details}")?,
                Some(None) => writeln!(console, "Order with ID {id} not found.")?,
                None => {}
            }
        }
        _ => writeln!(console, "Invalid choice.")?,
    }
    Ok(())
}

fn reports<B: Backend, R: BufRead, W: Write>(
    store: &mut SalesStore<B>,
    console: &mut Console<R, W>,
) -> Result<()> {
    let menu = Menu::new(
        "Reports & Special Queries",
        &["Orders by Customer", "Orders by Salesperson", "Orders by Product"],
    );
    writeln!(console, "{menu}")?;
    match console.prompt(CHOICE_PROMPT)?.as_str() {
        "1" => {
            let id: i64 = console.prompt_number("Enter customer ID: ")?;
            if let Some(rows) =
                console.report("listing orders by customer", store.orders_by_customer(id))?
            {
                print_all(console, &format!("Orders for Customer ID {id}"), &rows)?;
            }
        }
        "2" => {
            let id: i64 = console.prompt_number("Enter salesperson ID: ")?;
            if let Some(rows) = console.report(
                "listing orders by salesperson",
                store.orders_by_salesperson(id),
            )? {
                print_all(
                    console,
                    &format!("Orders handled by Salesperson ID {id}"),
                    &rows,
                )?;
            }
        }
        "3" => {
            let id: i64 = console.prompt_number("Enter product ID: ")?;
            if let Some(rows) =
                console.report("listing orders by product", store.orders_by_product(id))?
            {
                print_all(console, &format!("Orders containing Product ID {id}"), &rows)?;
            }
        }
        _ => writeln!(console, "Invalid choice.")?,
    }
    Ok(())
}
