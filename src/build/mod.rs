//! Build pipeline orchestration
//!
//! Strictly sequential: clean → configure → build, each step gated by a
//! flag and the configure step additionally by the sentinel check. A
//! failed step halts the pipeline in place; there is no rollback.

pub mod cmake;

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::platform::Platform;
use crate::utils::paths::{clear_contents, format_size};
use crate::utils::terminal;
use cmake::{BuildType, CmakeConfig};

/// Build options parsed from the command line
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Run the configure step
    pub gen: bool,
    /// Run the build step
    pub build: bool,
    /// Release build mode (default is debug)
    pub release: bool,
    /// Generate IDE project files instead of a Ninja tree
    pub ide: bool,
    /// Select the v141_xp toolset (IDE path only)
    pub winxp: bool,
    /// Parallelism hint forwarded to the build step
    pub jobs: Option<NonZeroUsize>,
    /// Clear output directory contents before configure/build
    pub clean: bool,
    /// User cache entries (NAME=VALUE, order preserved)
    pub defines: Vec<String>,
    /// Source directory given to the configure step
    pub src: PathBuf,
    /// Root of all generated output directories
    pub output: PathBuf,
    /// Specific target forwarded to the build step
    pub target: Option<String>,
    /// Echo external command lines before running them
    pub verbose: bool,
}

/// Build context: resolved platform plus the computed output directory
#[derive(Debug)]
pub struct BuildContext {
    pub options: BuildOptions,
    pub platform: Platform,
    pub out_dir: PathBuf,
}

impl BuildContext {
    /// Create a new build context
    pub fn new(options: BuildOptions, platform: Platform) -> Self {
        let out_dir = output_dir(
            &options.output,
            &platform.identifier,
            options.release,
            options.ide,
        );
        Self {
            options,
            platform,
            out_dir,
        }
    }

    fn cmake_config(&self) -> CmakeConfig {
        let opts = &self.options;
        let build_type = if opts.release {
            BuildType::Release
        } else {
            BuildType::Debug
        };

        let mut config = CmakeConfig::new(opts.src.clone(), self.out_dir.clone())
            .build_type(build_type)
            .defines(opts.defines.clone())
            .winxp(opts.winxp)
            .verbose(opts.verbose);

        if let Some(toolchain) = &self.platform.toolchain_file {
            config = config.toolchain_file(toolchain.clone());
        }
        if let Some(triplet) = &self.platform.triplet {
            config = config.triplet(triplet.clone());
        }
        if opts.ide {
            config = config.ide(self.platform.arch().to_string());
        }
        if let Some(jobs) = opts.jobs {
            config = config.jobs(jobs);
        }
        if let Some(target) = &opts.target {
            config = config.target(target.clone());
        }

        config
    }
}

/// Compute the triplet-keyed output directory
///
/// `<root>/<platform-id>[-vs][-d]` — a pure function of its inputs.
pub fn output_dir(root: &Path, platform_id: &str, release: bool, ide: bool) -> PathBuf {
    let mut leaf = platform_id.to_string();
    if ide {
        leaf.push_str("-vs");
    }
    if !release {
        leaf.push_str("-d");
    }
    root.join(leaf)
}

/// Run the pipeline: clean → configure → build, per the parsed options
pub fn run(ctx: &BuildContext) -> Result<()> {
    let opts = &ctx.options;

    // Clean only the directory this invocation is about to repopulate,
    // never the whole output root.
    if opts.clean {
        let freed = clear_contents(&ctx.out_dir)?;
        if freed > 0 {
            println!("Cleaned {} ({})", ctx.out_dir.display(), format_size(freed));
        }
    }

    if !opts.gen && !opts.build {
        return Ok(());
    }

    let config = ctx.cmake_config();

    // Configure on demand before a build as well; the sentinel check
    // makes repeated invocations cheap.
    terminal::phase(if opts.ide {
        "Generating Visual Studio files"
    } else {
        "Generating build files"
    });
    if config.is_configured() {
        terminal::skip_notice();
    } else {
        config.configure()?;
        println!();
    }

    if opts.build {
        terminal::phase("Building");
        config.build()?;
        println!();
        terminal::output_notice(&ctx.out_dir);
    }

    Ok(())
}
