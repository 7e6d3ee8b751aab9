//! CVN CLI - A thin CMake/Ninja build orchestrator
//!
//! Translates a small set of flags into CMake configure and build
//! invocations, keyed by a triplet-based output directory convention.
//!
//! ## Architecture
//!
//! ```text
//! Rust CLI → build/ pipeline → CMake (configure) / CMake --build (build)
//! ```

mod build;
mod cli;
mod error;
mod exec;
mod platform;
mod utils;

use clap::Parser;

use cli::Cli;
use error::CvnError;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = cli.execute() {
        match err.downcast_ref::<CvnError>() {
            Some(cvn_err) => {
                cvn_err.display_with_hints();
                std::process::exit(cvn_err.exit_code());
            }
            None => {
                utils::terminal::print_error(&format!("{:#}", err));
                std::process::exit(1);
            }
        }
    }
}
