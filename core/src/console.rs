//! Line-oriented console used by every interactive tool.
//!
//! The console is generic over its reader and writer so a whole session can
//! be scripted in tests with a `Cursor` and a `Vec<u8>`.
//!
//! # Examples
//!
//! ```
//! use std::io::Cursor;
//! use sqlmenu_core::Console;
//!
//! let mut console = Console::new(Cursor::new("abc\n42\n"), Vec::new());
//! let n: i64 = console.prompt_number("Quantity: ").unwrap();
//! assert_eq!(n, 42);
//!
//! let out = String::from_utf8(console.into_output()).unwrap();
//! assert!(out.contains("Please enter a valid number."));
//! ```

use std::io::{self, BufRead, StdinLock, Stdout, Write};
use std::str::FromStr;

use tracing::warn;

use crate::error::{CoreError, Result};

/// Prompting console over a reader and a writer.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<StdinLock<'static>, Stdout> {
    /// Console bound to the process's standard input and output.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints `message` without a newline and reads one trimmed line.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InputClosed`] at end of input.
    pub fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Err(CoreError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    /// Asks a yes/no question; only `y` (any case) counts as yes.
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.prompt(&format!("{question} (y/n): "))?;
        Ok(answer.eq_ignore_ascii_case("y"))
    }

    /// Re-prompts until the input parses as `T`.
    pub fn prompt_number<T: FromStr>(&mut self, message: &str) -> Result<T> {
        loop {
            let raw = self.prompt(message)?;
            match raw.parse() {
                Ok(value) => return Ok(value),
                Err(_) => writeln!(self.output, "Please enter a valid number.")?,
            }
        }
    }

    /// Re-prompts until `parse` accepts the input, printing its complaint each time.
    pub fn prompt_with<T, F>(&mut self, message: &str, mut parse: F) -> Result<T>
    where
        F: FnMut(&str) -> std::result::Result<T, String>,
    {
        loop {
            let raw = self.prompt(message)?;
            match parse(&raw) {
                Ok(value) => return Ok(value),
                Err(complaint) => writeln!(self.output, "{complaint}")?,
            }
        }
    }

    /// Prints a non-fatal failure and swallows it.
    ///
    /// Fatal errors (see [`CoreError::is_fatal`]) are returned so the menu
    /// loop can stop; anything else is shown as `Error {action}: {err}`.
    pub fn report<T>(&mut self, action: &str, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_fatal() => Err(err),
            Err(err) => {
                warn!(action, error = %err, "operation failed");
                writeln!(self.output, "Error {action}: {err}")?;
                Ok(None)
            }
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R, W: Write> Write for Console<R, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }
}
