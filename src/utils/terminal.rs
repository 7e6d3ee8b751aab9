//! Terminal output utilities

use std::path::Path;

use console::style;

/// Print an error message to stderr
pub fn print_error(message: &str) {
    eprintln!("{}: {}", style("error").red().bold(), message);
}

/// Print a phase banner before a pipeline step
pub fn phase(message: &str) {
    println!("{} {}", style("=>").cyan().bold(), message);
}

/// Print the notice shown when the sentinel short-circuits configure
pub fn skip_notice() {
    println!("Already exists. (use \"-c\" or \"--clean\" to regenerate)");
    println!();
}

/// Print the final output location on success
pub fn output_notice(out_dir: &Path) {
    println!("{} Output: {}", style("=>").green().bold(), out_dir.display());
    println!();
}
