//! Error types and helpers for user-friendly error messages
//!
//! External tool failures deliberately carry no wrapping context: the
//! child inherits stderr, so its own diagnostics stand as the explanation.

use thiserror::Error;

/// Custom error types with helpful context and suggestions
#[derive(Error, Debug)]
pub enum CvnError {
    /// Required environment variable is unset (strict mode only)
    #[error("Undefined {variable}!")]
    MissingEnv { variable: String, hint: String },

    /// Tool/executable not found on PATH
    #[error("Missing tool: {tool}")]
    MissingTool { tool: String, hint: String },

    /// External configure/build tool exited non-zero
    #[error("{tool} exited with status {code}")]
    ToolFailure { tool: String, code: i32 },
}

impl CvnError {
    /// Create a missing environment variable error
    pub fn missing_env(variable: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::MissingEnv {
            variable: variable.into(),
            hint: hint.into(),
        }
    }

    /// Create a missing tool error
    pub fn missing_tool(tool: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::MissingTool {
            tool: tool.into(),
            hint: hint.into(),
        }
    }

    /// Create an external tool failure from an exit code
    pub fn tool_failure(tool: impl Into<String>, code: i32) -> Self {
        Self::ToolFailure {
            tool: tool.into(),
            code,
        }
    }

    /// Process exit code for this error
    ///
    /// External tool failures propagate the child's own exit code;
    /// everything else is a plain failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            CvnError::ToolFailure { code, .. } if *code > 0 => *code,
            _ => 1,
        }
    }

    /// Display error with formatting and hints
    pub fn display_with_hints(&self) {
        use console::style;

        eprintln!("{} {}", style("ERROR:").red().bold(), self);

        match self {
            CvnError::MissingEnv { hint, .. } | CvnError::MissingTool { hint, .. } => {
                eprintln!("\n{} {}", style("HINT:").yellow().bold(), hint);
            }
            // The child's inherited stderr already explained the failure.
            CvnError::ToolFailure { .. } => {}
        }
    }
}

/// Common error hints for missing tools and environment
pub mod hints {
    /// Get hint for missing CMake
    pub fn cmake() -> &'static str {
        "Install CMake from https://cmake.org/ or use your package manager:\n\
         • macOS: brew install cmake\n\
         • Ubuntu: sudo apt install cmake\n\
         • Windows: winget install Kitware.CMake"
    }

    /// Get hint for missing vcpkg environment variables
    pub fn vcpkg_env() -> &'static str {
        "Strict environment mode requires vcpkg integration:\n\
         • Set VCPKG_ROOT to your vcpkg checkout\n\
         • Set VCPKG_DEFAULT_TRIPLET (e.g. x64-windows, x64-linux)\n\
         \n\
         Or drop --strict-env to fall back to the native toolchain."
    }
}
