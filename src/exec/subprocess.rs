//! Blocking subprocess execution with inherited standard streams
//!
//! The orchestrator never captures external tool output: stdin, stdout
//! and stderr are inherited so the child's diagnostics reach the user
//! directly. No timeout is applied; a hung tool hangs the pipeline.

use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

/// Run a command to completion and return its exit code
///
/// An exit code of -1 means the child terminated without one (killed
/// by a signal on Unix).
pub fn run_status(program: &Path, args: &[String], verbose: bool) -> Result<i32> {
    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd.stdin(Stdio::inherit());
    cmd.stdout(Stdio::inherit());
    cmd.stderr(Stdio::inherit());

    if verbose {
        eprintln!("Running: {:?}", cmd);
    }

    let status = cmd
        .status()
        .with_context(|| format!("Failed to execute {}", program.display()))?;

    Ok(status.code().unwrap_or(-1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn test_run_status_returns_exit_code() {
        let code = run_status(
            Path::new("/bin/sh"),
            &["-c".to_string(), "exit 3".to_string()],
            false,
        )
        .unwrap();
        assert_eq!(code, 3);
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let result = run_status(Path::new("cvn-no-such-program"), &[], false);
        assert!(result.is_err());
    }
}
