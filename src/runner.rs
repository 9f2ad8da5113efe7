//! Abstraction for shell command execution to enable testing and mocking.
//!
//! Both external collaborators (the listening-socket enumeration and the
//! supervisorctl status query) are plain "run a command, get stdout" calls.
//! The `CommandRunner` trait lets the pipeline run against the real shell in
//! production and canned output in tests.

use std::io;
use std::process::Command;

/// Abstraction for running a shell command and capturing its stdout.
pub trait CommandRunner: Send + Sync {
    /// Runs `command` through `/bin/sh -c` and returns captured stdout.
    ///
    /// Returns an I/O error when the command cannot be spawned or exits
    /// unsuccessfully with no output to classify.
    fn run(&self, command: &str) -> io::Result<String>;
}

/// Real implementation that delegates to `/bin/sh`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str) -> io::Result<String> {
        let output = Command::new("/bin/sh").arg("-c").arg(command).output()?;
        if !output.status.success() && output.stdout.is_empty() {
            return Err(io::Error::other(format!(
                "command exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        String::from_utf8(output.stdout)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "non-utf8 command output"))
    }
}

/// Mock implementation returning canned output for matching commands.
///
/// Responses are matched by substring of the command line, in registration
/// order. Unmatched commands fail with `NotFound`, which exercises the same
/// paths as a broken shell pipeline in production.
#[derive(Debug, Default)]
pub struct MockRunner {
    responses: Vec<(String, String)>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers canned `output` for any command containing `needle`.
    pub fn with_output(mut self, needle: impl Into<String>, output: impl Into<String>) -> Self {
        self.responses.push((needle.into(), output.into()));
        self
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, command: &str) -> io::Result<String> {
        for (needle, output) in &self.responses {
            if command.contains(needle.as_str()) {
                return Ok(output.clone());
            }
        }
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no canned output for: {command}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_runner_captures_stdout() {
        let runner = ShellRunner::new();
        let out = runner.run("echo hello").unwrap();
        assert_eq!(out, "hello\n");
    }

    #[test]
    fn test_shell_runner_failed_command_is_an_error() {
        let runner = ShellRunner::new();
        assert!(runner.run("exit 3").is_err());
    }

    #[test]
    fn test_mock_runner_matches_by_substring() {
        let runner = MockRunner::new()
            .with_output("ss -tlp", "LISTEN 0 128 127.0.0.1:9001 ...\n")
            .with_output("status", "myapp_1 RUNNING\n");
        assert!(runner.run("ss -tlp").unwrap().contains("9001"));
        assert!(runner.run("supervisorctl -s x status").unwrap().contains("RUNNING"));
        assert!(runner.run("unrelated").is_err());
    }
}
