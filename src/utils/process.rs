//! Process execution utilities
//!
//! Runs alias commands through the platform shell and launches the
//! interactive editor. Both inherit the terminal and block until the child
//! exits.

use crate::error::{Result, YoError};
use std::ffi::OsStr;
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, info, instrument};

#[cfg(not(windows))]
const SHELL: (&str, &str) = ("sh", "-c");
#[cfg(windows)]
const SHELL: (&str, &str) = ("cmd", "/C");

/// Utility for running external processes
#[derive(Debug)]
pub struct ProcessRunner {
    debug: bool,
}

impl ProcessRunner {
    /// Create a new process runner
    #[must_use]
    pub const fn new(debug: bool) -> Self {
        Self { debug }
    }

    /// Run a command line through the platform shell
    ///
    /// The child inherits the environment and stdio. Its exit status is
    /// returned as-is; a non-zero status is not an error here.
    #[instrument(skip(self))]
    pub fn run_shell(&self, command_line: &str) -> Result<ExitStatus> {
        let (shell, flag) = SHELL;

        if self.debug {
            debug!("Running via {} {}: {}", shell, flag, command_line);
        } else {
            info!("+ {}", command_line);
        }

        let mut cmd = Command::new(shell);
        cmd.arg(flag).arg(command_line);
        self.spawn_and_wait(cmd, command_line)
    }

    /// Launch an editor command line with `file` appended as its last argument
    ///
    /// `editor` may carry its own arguments, e.g. `code --wait`.
    #[instrument(skip(self, file))]
    pub fn run_editor(&self, editor: &str, file: &OsStr) -> Result<ExitStatus> {
        let words = shlex::split(editor)
            .filter(|words| !words.is_empty())
            .unwrap_or_else(|| vec![editor.to_string()]);

        debug!("Editor argv: {:?} + {:?}", words, file);

        let mut cmd = Command::new(&words[0]);
        cmd.args(&words[1..]).arg(file);
        self.spawn_and_wait(cmd, editor)
    }

    fn spawn_and_wait(&self, mut cmd: Command, display: &str) -> Result<ExitStatus> {
        let status = cmd
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| YoError::process(display, e))?;

        debug!("Child finished: {}", status);
        Ok(status)
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_process_runner_creation() {
        let runner = ProcessRunner::new(true);
        assert!(runner.debug);

        let runner = ProcessRunner::default();
        assert!(!runner.debug);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_shell_blocks_until_exit() {
        let temp_dir = TempDir::new().unwrap();
        let marker = temp_dir.path().join("marker");
        let runner = ProcessRunner::new(false);

        let status = runner
            .run_shell(&format!("sleep 0.1 && echo done > '{}'", marker.display()))
            .unwrap();

        assert!(status.success());
        assert_eq!(fs::read_to_string(&marker).unwrap(), "done\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_shell_reports_failure_status() {
        let runner = ProcessRunner::new(false);
        let status = runner.run_shell("exit 3").unwrap();
        assert_eq!(status.code(), Some(3));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_shell_inherits_environment() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("out");
        let runner = ProcessRunner::new(false);

        // PATH is always set for a test process
        runner
            .run_shell(&format!("test -n \"$PATH\" && touch '{}'", out.display()))
            .unwrap();
        assert!(out.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_editor_with_arguments() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("scratch.tmp");
        fs::write(&file, "").unwrap();
        let runner = ProcessRunner::new(false);

        let status = runner
            .run_editor("sh -c 'echo edited > \"$0\"'", file.as_os_str())
            .unwrap();

        assert!(status.success());
        assert_eq!(fs::read_to_string(&file).unwrap(), "edited\n");
    }

    #[test]
    fn test_run_editor_missing_binary() {
        let runner = ProcessRunner::new(false);
        let result = runner.run_editor("nonexistent_editor_12345", OsStr::new("x"));
        assert!(matches!(result, Err(YoError::Process { .. })));
    }
}
