//! Terminal output utilities

use console::{style, StyledObject};
use indicatif::{ProgressBar, ProgressStyle};
use nugraph::dependency::ConflictSeverity;

/// Print an error message to stderr
pub fn print_error(message: &str) {
    eprintln!("{}: {}", style("error").red().bold(), message);
}

/// Print a warning message to stderr
pub fn print_warning(message: &str) {
    eprintln!("{}: {}", style("warning").yellow().bold(), message);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{}: {}", style("success").green().bold(), message);
}

/// Style text according to conflict severity
pub fn severity_style<D>(severity: ConflictSeverity, text: D) -> StyledObject<D> {
    match severity {
        ConflictSeverity::Major => style(text).red().bold(),
        ConflictSeverity::Minor => style(text).yellow(),
        ConflictSeverity::Patch => style(text).cyan(),
        ConflictSeverity::None => style(text),
    }
}

/// Create a progress bar with a known length
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let template = ProgressStyle::default_bar()
        .template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-");
    pb.set_style(template);
    pb.set_message(message.to_string());
    pb
}
