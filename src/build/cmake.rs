//! CMake configuration and execution
//!
//! This module composes and runs the two external invocations: the
//! configure step (`cmake -S ... -B ...`) and the build step
//! (`cmake --build ...`). Argument composition is kept pure so the
//! exact command lines are unit-testable.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::Result;

use crate::error::{hints, CvnError};
use crate::exec::subprocess;
use crate::utils::paths::ensure_dir;

/// CMake build type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildType {
    #[default]
    Debug,
    Release,
}

impl std::fmt::Display for BuildType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildType::Debug => write!(f, "Debug"),
            BuildType::Release => write!(f, "Release"),
        }
    }
}

/// Map a CPU-architecture alias to the Visual Studio platform name for `-A`
///
/// Total over the documented alias table; anything unrecognized yields
/// `None` and the selector is omitted, leaving the generator default.
pub fn generator_platform(arch: &str) -> Option<&'static str> {
    match arch.to_ascii_lowercase().as_str() {
        "amd64" | "x86_64" | "x64" => Some("x64"),
        "i386" | "i686" | "x86" => Some("Win32"),
        _ => None,
    }
}

/// CMake invocation builder
#[derive(Debug, Default)]
pub struct CmakeConfig {
    /// Source directory (where CMakeLists.txt is located)
    source_dir: PathBuf,
    /// Build directory
    build_dir: PathBuf,
    /// Build type
    build_type: BuildType,
    /// User cache entries, forwarded verbatim with a -D prefix
    defines: Vec<String>,
    /// Toolchain file (vcpkg integration)
    toolchain_file: Option<PathBuf>,
    /// vcpkg target triplet
    triplet: Option<String>,
    /// Generate multi-config IDE project files instead of a Ninja tree
    ide: bool,
    /// CPU architecture alias for the IDE generator platform
    arch: Option<String>,
    /// Select the v141_xp toolset (IDE path only)
    winxp: bool,
    /// Number of parallel build jobs
    jobs: Option<NonZeroUsize>,
    /// Specific build target
    target: Option<String>,
    /// Echo command lines before running them
    verbose: bool,
}

impl CmakeConfig {
    /// Create a new CMake configuration
    pub fn new(source_dir: PathBuf, build_dir: PathBuf) -> Self {
        Self {
            source_dir,
            build_dir,
            ..Default::default()
        }
    }

    /// Set the build type
    pub fn build_type(mut self, build_type: BuildType) -> Self {
        self.build_type = build_type;
        self
    }

    /// Add user cache entries (NAME=VALUE, order preserved)
    pub fn defines(mut self, defines: Vec<String>) -> Self {
        self.defines.extend(defines);
        self
    }

    /// Set the toolchain file
    pub fn toolchain_file(mut self, path: PathBuf) -> Self {
        self.toolchain_file = Some(path);
        self
    }

    /// Set the vcpkg target triplet
    pub fn triplet(mut self, triplet: impl Into<String>) -> Self {
        self.triplet = Some(triplet.into());
        self
    }

    /// Generate IDE project files with the given architecture alias
    pub fn ide(mut self, arch: impl Into<String>) -> Self {
        self.ide = true;
        self.arch = Some(arch.into());
        self
    }

    /// Select the v141_xp toolset
    pub fn winxp(mut self, winxp: bool) -> Self {
        self.winxp = winxp;
        self
    }

    /// Set number of parallel jobs
    pub fn jobs(mut self, jobs: NonZeroUsize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    /// Set the specific build target
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sentinel file whose presence means the directory is already configured
    ///
    /// Build-system marker for the Ninja path, cache marker for the IDE
    /// path. No other staleness detection exists.
    pub fn sentinel(&self) -> PathBuf {
        let marker = if self.ide { "CMakeCache.txt" } else { "build.ninja" };
        self.build_dir.join(marker)
    }

    /// Whether a previous configure step already populated the directory
    pub fn is_configured(&self) -> bool {
        self.sentinel().exists()
    }

    /// Compose the configure argument list
    pub fn configure_args(&self) -> Vec<String> {
        let mut args = vec![
            "-S".to_string(),
            self.source_dir.display().to_string(),
            "-B".to_string(),
            self.build_dir.display().to_string(),
        ];

        if let Some(toolchain) = &self.toolchain_file {
            args.push(format!("-DCMAKE_TOOLCHAIN_FILE={}", toolchain.display()));
        }
        if let Some(triplet) = &self.triplet {
            args.push(format!("-DVCPKG_TARGET_TRIPLET={}", triplet));
        }

        for define in &self.defines {
            args.push(format!("-D{}", define));
        }

        if self.ide {
            // Multi-config generator: no explicit build type, the mode is
            // chosen at build time instead.
            if let Some(platform) = self.arch.as_deref().and_then(generator_platform) {
                args.push("-A".to_string());
                args.push(platform.to_string());
            }
            if self.winxp {
                args.push("-T".to_string());
                args.push("v141_xp".to_string());
            }
        } else {
            args.push("-G".to_string());
            args.push("Ninja".to_string());
            args.push(format!("-DCMAKE_BUILD_TYPE={}", self.build_type));
        }

        args
    }

    /// Compose the build argument list
    pub fn build_args(&self) -> Vec<String> {
        let mut args = vec!["--build".to_string(), self.build_dir.display().to_string()];

        if let Some(jobs) = self.jobs {
            args.push("-j".to_string());
            args.push(jobs.to_string());
        }
        if self.ide {
            args.push("--config".to_string());
            args.push(self.build_type.to_string());
        }
        if let Some(target) = &self.target {
            args.push("--target".to_string());
            args.push(target.clone());
        }

        args
    }

    /// Find CMake executable
    fn find_cmake() -> Result<PathBuf, CvnError> {
        which::which("cmake").map_err(|_| CvnError::missing_tool("cmake", hints::cmake()))
    }

    /// Run the configure step, blocking until CMake exits
    pub fn configure(&self) -> Result<()> {
        let cmake = Self::find_cmake()?;
        ensure_dir(&self.build_dir)?;

        let code = subprocess::run_status(&cmake, &self.configure_args(), self.verbose)?;
        if code != 0 {
            return Err(CvnError::tool_failure("cmake", code).into());
        }
        Ok(())
    }

    /// Run the build step, blocking until the build driver exits
    pub fn build(&self) -> Result<()> {
        let cmake = Self::find_cmake()?;

        let code = subprocess::run_status(&cmake, &self.build_args(), self.verbose)?;
        if code != 0 {
            return Err(CvnError::tool_failure("cmake", code).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CmakeConfig {
        CmakeConfig::new(PathBuf::from("."), PathBuf::from("out.cvn/native-d"))
    }

    #[test]
    fn test_generator_platform_aliases() {
        for alias in ["amd64", "x86_64", "x64", "AMD64"] {
            assert_eq!(generator_platform(alias), Some("x64"));
        }
        for alias in ["i386", "i686", "x86"] {
            assert_eq!(generator_platform(alias), Some("Win32"));
        }
    }

    #[test]
    fn test_generator_platform_unknown_is_omitted() {
        assert_eq!(generator_platform("aarch64"), None);
        assert_eq!(generator_platform(""), None);
    }

    #[test]
    fn test_configure_args_ninja_debug() {
        let args = config().configure_args();
        assert_eq!(
            args,
            vec![
                "-S",
                ".",
                "-B",
                "out.cvn/native-d",
                "-G",
                "Ninja",
                "-DCMAKE_BUILD_TYPE=Debug",
            ]
        );
    }

    #[test]
    fn test_configure_args_release_with_vcpkg() {
        let args = CmakeConfig::new(PathBuf::from("."), PathBuf::from("out.cvn/x64-linux"))
            .build_type(BuildType::Release)
            .toolchain_file(PathBuf::from("/opt/vcpkg/scripts/buildsystems/vcpkg.cmake"))
            .triplet("x64-linux")
            .configure_args();

        assert!(args.contains(
            &"-DCMAKE_TOOLCHAIN_FILE=/opt/vcpkg/scripts/buildsystems/vcpkg.cmake".to_string()
        ));
        assert!(args.contains(&"-DVCPKG_TARGET_TRIPLET=x64-linux".to_string()));
        assert!(args.contains(&"-DCMAKE_BUILD_TYPE=Release".to_string()));
    }

    #[test]
    fn test_defines_are_prefixed_and_ordered() {
        let args = config()
            .defines(vec!["FOO=1".to_string(), "BAR=two".to_string(), "FOO=3".to_string()])
            .configure_args();

        let defines: Vec<&String> = args
            .iter()
            .filter(|a| a.starts_with("-DFOO") || a.starts_with("-DBAR"))
            .collect();
        assert_eq!(defines, ["-DFOO=1", "-DBAR=two", "-DFOO=3"]);
    }

    #[test]
    fn test_ide_args_use_generator_platform() {
        let args = CmakeConfig::new(PathBuf::from("."), PathBuf::from("out.cvn/native-vs"))
            .ide("x86_64")
            .configure_args();

        assert!(args.windows(2).any(|w| w == ["-A", "x64"]));
        assert!(!args.contains(&"-G".to_string()));
        assert!(!args.iter().any(|a| a.starts_with("-DCMAKE_BUILD_TYPE")));
    }

    #[test]
    fn test_ide_unknown_arch_omits_selector() {
        let args = CmakeConfig::new(PathBuf::from("."), PathBuf::from("out.cvn/native-vs"))
            .ide("riscv64")
            .configure_args();
        assert!(!args.contains(&"-A".to_string()));
    }

    #[test]
    fn test_ide_winxp_toolset() {
        let args = CmakeConfig::new(PathBuf::from("."), PathBuf::from("out.cvn/native-vs"))
            .ide("x64")
            .winxp(true)
            .configure_args();
        assert!(args.windows(2).any(|w| w == ["-T", "v141_xp"]));
    }

    #[test]
    fn test_build_args_forwarding() {
        let args = config()
            .jobs(NonZeroUsize::new(4).unwrap())
            .target("mylib")
            .build_args();

        assert_eq!(
            args,
            vec!["--build", "out.cvn/native-d", "-j", "4", "--target", "mylib"]
        );
    }

    #[test]
    fn test_build_args_ide_passes_config() {
        let args = CmakeConfig::new(PathBuf::from("."), PathBuf::from("out.cvn/native-vs"))
            .ide("x64")
            .build_type(BuildType::Release)
            .build_args();
        assert!(args.windows(2).any(|w| w == ["--config", "Release"]));
    }

    #[test]
    fn test_build_args_ninja_omits_config() {
        let args = config().build_args();
        assert!(!args.contains(&"--config".to_string()));
    }

    #[test]
    fn test_sentinel_by_mode() {
        assert_eq!(
            config().sentinel(),
            PathBuf::from("out.cvn/native-d/build.ninja")
        );

        let ide = CmakeConfig::new(PathBuf::from("."), PathBuf::from("out.cvn/native-vs")).ide("x64");
        assert_eq!(ide.sentinel(), PathBuf::from("out.cvn/native-vs/CMakeCache.txt"));
    }
}
