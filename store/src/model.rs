//! Records read from and written to the store tables.
//!
//! `Display` impls produce the one-line listings shown by the menus.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use sqlmenu_core::{Result, RowReader, ValidationError, Value, money};

/// Accepted order date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` order date.
///
/// # Examples
///
/// ```
/// use sqlmenu_store::parse_order_date;
///
/// assert!(parse_order_date("2024-02-29").is_ok());
/// assert!(parse_order_date("2023-02-29").is_err());
/// assert!(parse_order_date("29.2.2024").is_err());
/// ```
pub fn parse_order_date(input: &str) -> std::result::Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|_| ValidationError::InvalidValue {
        column: "order_date".to_string(),
        expected: "YYYY-MM-DD date".to_string(),
        input: input.to_string(),
    })
}

pub(crate) fn date_value(date: NaiveDate) -> Value {
    Value::Text(date.format(DATE_FORMAT).to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
}

impl Product {
    pub(crate) fn from_row(row: &[Value]) -> Result<Self> {
        let mut r = RowReader::new(row);
        Ok(Self {
            id: r.i64("id")?,
            name: r.text("name")?,
            price: r.f64("price")?,
            description: r.opt_text("description")?,
        })
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Name: {}, Price: {}, Description: {}",
            self.id,
            self.name,
            money(self.price),
            self.description.as_deref().unwrap_or_default()
        )
    }
}

/// Input for a new product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    /// Must not be negative.
    pub price: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl Customer {
    pub(crate) fn from_row(row: &[Value]) -> Result<Self> {
        let mut r = RowReader::new(row);
        Ok(Self {
            id: r.i64("id")?,
            name: r.text("name")?,
            email: r.opt_text("email")?,
            address: r.opt_text("address")?,
        })
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Name: {}, Email: {}, Address: {}",
            self.id,
            self.name,
            self.email.as_deref().unwrap_or_default(),
            self.address.as_deref().unwrap_or_default()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub address: String,
}

/// How a salesperson is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmploymentType {
    Payroll,
    OnCall,
}

impl EmploymentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Payroll => "payroll",
            Self::OnCall => "on_call",
        }
    }
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmploymentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "payroll" => Ok(Self::Payroll),
            "on_call" => Ok(Self::OnCall),
            _ => Err(ValidationError::InvalidValue {
                column: "employment_type".to_string(),
                expected: "payroll or on_call".to_string(),
                input: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Salesperson {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub employment_type: String,
}

impl Salesperson {
    pub(crate) fn from_row(row: &[Value]) -> Result<Self> {
        let mut r = RowReader::new(row);
        Ok(Self {
            id: r.i64("id")?,
            first_name: r.text("first_name")?,
            last_name: r.text("last_name")?,
            employment_type: r.text("employment_type")?,
        })
    }
}

impl fmt::Display for Salesperson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Name: {} {}, Employment Type: {}",
            self.id, self.first_name, self.last_name, self.employment_type
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSalesperson {
    pub first_name: String,
    pub last_name: String,
    pub employment_type: EmploymentType,
}
