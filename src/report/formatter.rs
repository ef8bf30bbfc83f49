// HTML formatting utilities for report generation

use crate::stock::Recorder;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Row state class: recorded result passed
pub const CLASS_PASS: &str = "test-pass";
/// Row state class: recorded result failed
pub const CLASS_FAIL: &str = "test-fail";
/// Row state class: required test with no recorded result
pub const CLASS_MISSING_REQUIRED: &str = "test-missing-required";
/// Row state class: optional test with no recorded result
pub const CLASS_MISSING: &str = "test-missing";
/// Label class: key matched neither template nor result
pub const CLASS_ORPHAN: &str = "test-orphan";
/// Label class: required test template
pub const CLASS_REQUIRED: &str = "test-required";
/// Label class: result without a matching template
pub const CLASS_UNTEMPLATED: &str = "test-untemplated";

/// Escape a value for embedding in HTML text or attribute content
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }

    escaped
}

/// Build a `<td>` cell; content must already be escaped
pub fn cell(content: &str, class: Option<&str>) -> String {
    match class {
        Some(class) => format!("<td class=\"{}\">{}</td>", class, content),
        None => format!("<td>{}</td>", content),
    }
}

/// Build a `<td>` cell spanning multiple columns; content must already be
/// escaped
pub fn wide_cell(content: &str, class: Option<&str>, colspan: usize) -> String {
    match class {
        Some(class) => format!(
            "<td class=\"{}\" colspan=\"{}\">{}</td>",
            class, colspan, content
        ),
        None => format!("<td colspan=\"{}\">{}</td>", colspan, content),
    }
}

/// Build a `<tr>` row from pre-built cells
pub fn row(cells: &[String]) -> String {
    format!("<tr>{}</tr>\n", cells.join(""))
}

/// Build an HTML table from header labels and pre-built rows
pub fn build_table(headers: &[&str], rows: &[String]) -> String {
    let mut table = String::new();

    table.push_str("<table>\n<thead>\n<tr>");
    for header in headers {
        table.push_str(&format!("<th>{}</th>", escape_html(header)));
    }
    table.push_str("</tr>\n</thead>\n<tbody>\n");

    for row in rows {
        table.push_str(row);
    }

    table.push_str("</tbody>\n</table>\n");
    table
}

/// Build a section heading
pub fn build_section_header(title: &str, level: u8) -> String {
    format!("<h{level}>{}</h{level}>\n", escape_html(title))
}

/// Format a stock quantity with standard decimal formatting
///
/// Trailing zeros are dropped: `4.0` renders as `4`, `4.50` as `4.5`.
pub fn format_quantity(quantity: Decimal) -> String {
    quantity.normalize().to_string()
}

/// Format a result date with the context's strftime pattern
pub fn format_date(date: &DateTime<Utc>, date_format: &str) -> String {
    date.format(date_format).to_string()
}

/// Format the recording user for display
pub fn format_user(user: &Recorder, display_full_names: bool) -> String {
    escape_html(user.display_name(display_full_names))
}
