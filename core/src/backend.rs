//! The connection seam between the tools and a database driver.

use crate::error::Result;
use crate::value::{ExecOutcome, QueryResult, Value};

/// One open database connection.
///
/// Statements use positional `?` placeholders; `params` are bound in order.
/// Implementations map driver failures to
/// [`CoreError::Database`](crate::CoreError::Database).
pub trait Backend {
    /// Runs a statement that does not return rows.
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<ExecOutcome>;

    /// Runs a query and collects every row.
    fn query(&mut self, sql: &str, params: &[Value]) -> Result<QueryResult>;

    /// Runs several `;`-separated statements without parameters.
    fn execute_batch(&mut self, sql: &str) -> Result<()>;

    /// Returns the first row of a query, if any.
    fn query_row(&mut self, sql: &str, params: &[Value]) -> Result<Option<Vec<Value>>> {
        Ok(self.query(sql, params)?.rows.into_iter().next())
    }

    /// Returns `true` if the query yields at least one row.
    fn exists(&mut self, sql: &str, params: &[Value]) -> Result<bool> {
        Ok(!self.query(sql, params)?.is_empty())
    }
}

impl<B: Backend + ?Sized> Backend for &mut B {
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<ExecOutcome> {
        (**self).execute(sql, params)
    }

    fn query(&mut self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        (**self).query(sql, params)
    }

    fn execute_batch(&mut self, sql: &str) -> Result<()> {
        (**self).execute_batch(sql)
    }
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<ExecOutcome> {
        (**self).execute(sql, params)
    }

    fn query(&mut self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        (**self).query(sql, params)
    }

    fn execute_batch(&mut self, sql: &str) -> Result<()> {
        (**self).execute_batch(sql)
    }
}
