//! Output formatting utilities

use std::path::Path;

use console::{style, Style};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", style("→").blue(), message);
}

/// Create a styled header
pub fn header(text: &str) -> String {
    style(text).bold().to_string()
}

/// Create a styled key-value line
pub fn key_value(key: &str, value: &str) -> String {
    format!("  {}: {}", style(key).dim(), value)
}

/// Style for paths
pub fn path_style() -> Style {
    Style::new().cyan()
}

/// A filesystem path in path style
pub fn path(path: &Path) -> String {
    path_style().apply_to(path.display()).to_string()
}

/// Outcome of resolving one config field: the value, or why it failed
pub fn resolution(value: Option<&str>, error: Option<&str>) -> String {
    match (value, error) {
        (Some(value), _) => path_style().apply_to(value).to_string(),
        (None, Some(error)) => style(error).red().to_string(),
        (None, None) => style("pending").dim().to_string(),
    }
}

/// Doctor line for one check
pub fn check_line(name: &str, ok: bool, detail: &str) -> String {
    let (icon, detail) = if ok {
        (style("✓").green().bold(), style(detail).dim())
    } else {
        (style("✗").red().bold(), style(detail))
    };
    format!("  {} {} {}", icon, style(name).bold(), detail)
}
