//! Plain-text rendering of query results.

use crate::value::Value;

/// Renders rows as a grid table.
///
/// Numeric cells are right-aligned, everything else left-aligned. Column
/// widths are measured in characters.
///
/// ```text
/// +------+-------+
/// | id   | name  |
/// +======+=======+
/// |    1 | Alice |
/// +------+-------+
/// ```
pub fn render_grid<S: AsRef<str>>(headers: &[S], rows: &[Vec<Value>]) -> String {
    let columns = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(headers.len()))
        .max()
        .unwrap_or(0);

    let cells: Vec<Vec<(String, bool)>> = rows
        .iter()
        .map(|row| {
            (0..columns)
                .map(|i| match row.get(i) {
                    Some(value) => (value.to_string(), value.is_numeric()),
                    None => (String::new(), false),
                })
                .collect()
        })
        .collect();

    let mut widths = vec![0usize; columns];
    for (i, header) in headers.iter().enumerate() {
        widths[i] = widths[i].max(header.as_ref().chars().count());
    }
    for row in &cells {
        for (i, (text, _)) in row.iter().enumerate() {
            widths[i] = widths[i].max(text.chars().count());
        }
    }

    let rule = |fill: char| {
        let mut line = String::from("+");
        for width in &widths {
            line.extend(std::iter::repeat_n(fill, width + 2));
            line.push('+');
        }
        line
    };

    let mut out = Vec::with_capacity(cells.len() * 2 + 3);
    out.push(rule('-'));
    let header_cells: Vec<(String, bool)> = (0..columns)
        .map(|i| {
            let text = headers.get(i).map(|h| h.as_ref().to_string()).unwrap_or_default();
            (text, false)
        })
        .collect();
    out.push(render_line(&header_cells, &widths));
    out.push(rule('='));
    for row in &cells {
        out.push(render_line(row, &widths));
        out.push(rule('-'));
    }
    if cells.is_empty() {
        // Header only: close the grid under the `=` rule.
        out.pop();
        out.push(rule('-'));
    }
    out.join("\n")
}

fn render_line(cells: &[(String, bool)], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for ((text, numeric), width) in cells.iter().zip(widths) {
        let pad = width - text.chars().count();
        line.push(' ');
        if *numeric {
            line.push_str(&" ".repeat(pad));
            line.push_str(text);
        } else {
            line.push_str(text);
            line.push_str(&" ".repeat(pad));
        }
        line.push_str(" |");
    }
    line
}

/// Formats an amount as dollars with two decimals.
pub fn money(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Upper-cases the first character, e.g. `actors` → `Actors`.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
