//! Terminal colorization for unified diffs
//!
//! Applies ANSI escape codes to diff lines using crossterm.

use crossterm::style::{Color, Stylize};

/// Colorize a unified diff
///
/// - File headers: bold
/// - Hunk headers: Cyan
/// - Removed lines: Red
/// - Added lines: Green
/// - Context lines: Default (terminal color)
pub fn colorize_diff(diff: &str) -> String {
    let mut result = String::with_capacity(diff.len() * 2);

    for line in diff.lines() {
        let colored = if line.starts_with("--- ") || line.starts_with("+++ ") {
            format!("{}", line.bold())
        } else if line.starts_with("@@") {
            format!("{}", line.with(Color::Cyan))
        } else if line.starts_with('-') {
            format!("{}", line.with(Color::Red))
        } else if line.starts_with('+') {
            format!("{}", line.with(Color::Green))
        } else {
            line.to_string()
        };
        result.push_str(&colored);
        result.push('\n');
    }

    if !diff.ends_with('\n') && result.ends_with('\n') {
        result.pop();
    }

    result
}
