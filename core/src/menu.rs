//! Numbered text menus.

use std::fmt;

/// A titled list of numbered options.
///
/// # Examples
///
/// ```
/// use sqlmenu_core::Menu;
///
/// let menu = Menu::new("Product Management", &["Add Product", "Delete Product"]);
/// assert_eq!(menu.to_string(), "\nProduct Management\n1. Add Product\n2. Delete Product");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Menu<'a> {
    title: &'a str,
    options: &'a [&'a str],
    banner_width: Option<usize>,
}

impl<'a> Menu<'a> {
    pub fn new(title: &'a str, options: &'a [&'a str]) -> Self {
        Self {
            title,
            options,
            banner_width: None,
        }
    }

    /// Frames the menu between `=` rules with the title centered.
    pub fn banner(mut self, width: usize) -> Self {
        self.banner_width = Some(width);
        self
    }
}

impl fmt::Display for Menu<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.banner_width {
            Some(width) => {
                let rule = "=".repeat(width);
                writeln!(f, "\n{rule}")?;
                writeln!(f, "{:^width$}", self.title)?;
                writeln!(f, "{rule}")?;
                for (i, option) in self.options.iter().enumerate() {
                    writeln!(f, "{}. {option}", i + 1)?;
                }
                write!(f, "{rule}")
            }
            None => {
                write!(f, "\n{}", self.title)?;
                for (i, option) in self.options.iter().enumerate() {
                    write!(f, "\n{}. {option}", i + 1)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_menu_centers_title() {
        let menu = Menu::new("Editor", &["Connect", "Exit"]).banner(10);
        assert_eq!(
            menu.to_string(),
            "\n==========\n  Editor  \n==========\n1. Connect\n2. Exit\n=========="
        );
    }

    #[test]
    fn test_plain_menu_numbers_options() {
        let menu = Menu::new("Reports", &["By Customer", "By Product"]);
        assert_eq!(menu.to_string(), "\nReports\n1. By Customer\n2. By Product");
    }
}
