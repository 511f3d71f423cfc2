//! Online store order management.
//!
//! Two store variants share product and customer management:
//!
//! - [`OnlineStore`]: each order is one product in some quantity, with
//!   special queries by customer and by product.
//! - [`SalesStore`]: orders are handled by a salesperson and hold any
//!   number of items; adds order details and per-customer, per-salesperson
//!   and per-product reports.
//!
//! Both are generic over [`sqlmenu_core::Backend`]. In production they run on
//! [`MySqlBackend`] (feature `mysql`, on by default); any other backend that
//! speaks `?` placeholders works too.
//!
//! # Quick start
//!
//! ```no_run
//! # #[cfg(feature = "mysql")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use sqlmenu_core::Console;
//! use sqlmenu_store::{ConnectionConfig, MySqlBackend, OnlineStore, run_basic_store};
//!
//! let backend = MySqlBackend::connect(&ConnectionConfig::default())?;
//! let mut store = OnlineStore::new(backend);
//! run_basic_store(&mut store, &mut Console::stdio())?;
//! store.into_inner().close()?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "mysql"))]
//! # fn main() {}
//! ```

mod basic;
mod catalog;
mod config;
mod error;
mod model;
#[cfg(feature = "mysql")]
mod mysql;
mod sales;
mod schema;

pub use basic::{NewOrder, OnlineStore, OrderLine, run_basic_store};
pub use catalog::{
    add_customer, add_product, customers, delete_customer, delete_product, manage_customers,
    manage_products, products,
};
pub use config::{ConfigOverrides, ConnectionConfig};
pub use error::{Result, StoreError};
pub use model::{
    Customer, DATE_FORMAT, EmploymentType, NewCustomer, NewProduct, NewSalesperson, Product,
    Salesperson, parse_order_date,
};
#[cfg(feature = "mysql")]
pub use mysql::MySqlBackend;
pub use sales::{
    NewSalesOrder, OrderDetails, OrderItemLine, OrderReport, OrderSummary, ProductOrderLine,
    SalesStore, run_sales_store,
};
pub use schema::{Dialect, StoreVariant, init_schema, schema_sql};
