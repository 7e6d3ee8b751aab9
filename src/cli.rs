//! CLI argument parsing using clap derive macros

use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::build::{self, BuildContext, BuildOptions};
use crate::platform::{EnvPolicy, Platform};

/// CVN - a thin CMake/Ninja build orchestrator
///
/// Wraps CMake configure and build behind a handful of flags, with output
/// directories keyed by target platform triplet and build mode.
#[derive(Parser, Debug)]
#[command(name = "cvn")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Generate build files
    #[arg(short, long)]
    pub gen: bool,

    /// Build binary
    #[arg(short, long)]
    pub build: bool,

    /// Set release mode (default is debug)
    #[arg(short, long)]
    pub release: bool,

    /// Generate IDE (Visual Studio) project files instead of a Ninja tree
    #[arg(long)]
    pub ide: bool,

    /// Select the v141_xp toolset (IDE path only)
    #[arg(long)]
    pub winxp: bool,

    /// Number of parallel build jobs
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<NonZeroUsize>,

    /// Clear the output directory contents before configure/build
    #[arg(short, long)]
    pub clean: bool,

    /// Create or update a cmake cache entry (repeatable)
    #[arg(short = 'd', long = "cmake-define", value_name = "NAME=VALUE")]
    pub cmake_define: Vec<String>,

    /// Explicitly specify a source directory
    #[arg(short, long, default_value = ".")]
    pub src: PathBuf,

    /// Explicitly specify an output directory root
    #[arg(short, long, default_value = "out.cvn")]
    pub output: PathBuf,

    /// Fail when vcpkg environment variables are unset
    #[arg(long)]
    pub strict_env: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Specific target to build
    pub target: Option<String>,
}

impl Cli {
    /// Execute the parsed invocation
    pub fn execute(self) -> Result<()> {
        // Set up terminal colors
        if self.no_color {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }

        let policy = if self.strict_env {
            EnvPolicy::Strict
        } else {
            EnvPolicy::Lenient
        };
        let platform = Platform::resolve(policy)?;

        if self.verbose {
            eprintln!("Target platform: {}", platform.identifier);
        }

        let options = BuildOptions {
            gen: self.gen,
            build: self.build,
            release: self.release,
            ide: self.ide,
            winxp: self.winxp,
            jobs: self.jobs,
            clean: self.clean,
            defines: self.cmake_define,
            src: self.src,
            output: self.output,
            target: self.target,
            verbose: self.verbose,
        };

        let ctx = BuildContext::new(options, platform);
        build::run(&ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["cvn"]);
        assert_eq!(cli.src, PathBuf::from("."));
        assert_eq!(cli.output, PathBuf::from("out.cvn"));
        assert!(!cli.gen && !cli.build && !cli.release && !cli.clean);
        assert_eq!(cli.jobs, None);
        assert_eq!(cli.target, None);
    }

    #[test]
    fn test_repeatable_defines_preserve_order() {
        let cli = Cli::parse_from(["cvn", "-g", "-d", "FOO=1", "-d", "BAR=2", "-d", "FOO=3"]);
        assert_eq!(cli.cmake_define, ["FOO=1", "BAR=2", "FOO=3"]);
    }

    #[test]
    fn test_positional_target() {
        let cli = Cli::parse_from(["cvn", "-b", "-j", "4", "mylib"]);
        assert_eq!(cli.target.as_deref(), Some("mylib"));
        assert_eq!(cli.jobs, NonZeroUsize::new(4));
    }

    #[test]
    fn test_zero_jobs_rejected() {
        assert!(Cli::try_parse_from(["cvn", "-b", "-j", "0"]).is_err());
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Cli::try_parse_from(["cvn", "--bogus"]).is_err());
    }
}
