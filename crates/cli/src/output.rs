//! Output formatting utilities

use std::io::IsTerminal;

use colored::Colorize;

/// Disable colors unless stdout is an interactive terminal
pub fn configure_colors() {
    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}
