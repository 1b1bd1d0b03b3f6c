//! [`ReviewHost`] backed by the GitHub `gh` command-line tool.

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::Command;

use yamldiff_core::{review::ReviewHost, ReviewError};

/// Runs `gh pr comment` and `gh pr edit --add-label` with `GH_TOKEN` set.
#[derive(Clone, Debug)]
pub struct GhCli {
    program: OsString,
    token: String,
}

impl GhCli {
    pub fn new(token: impl Into<String>) -> Self {
        Self { program: OsString::from("gh"), token: token.into() }
    }

    /// Replaces the `gh` executable, e.g. with a wrapper script.
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    fn run(&self, action: &'static str, args: &[&str]) -> Result<(), ReviewError> {
        tracing::debug!(program = ?self.program, ?args, "invoking review host");
        let output = Command::new(&self.program)
            .args(args)
            .env("GH_TOKEN", &self.token)
            .output()
            .map_err(|err| ReviewError::Host { action, message: err.to_string() })?;
        if output.status.success() {
            return Ok(());
        }
        let mut message = String::from_utf8_lossy(&output.stdout).into_owned();
        message.push_str(&String::from_utf8_lossy(&output.stderr));
        let message = match message.trim() {
            "" => format!("exited with {}", output.status),
            trimmed => trimmed.to_string(),
        };
        Err(ReviewError::Host { action, message })
    }
}

impl ReviewHost for GhCli {
    fn post_comment(&self, repo: &str, pr: u64, body: &str) -> Result<(), ReviewError> {
        let pr = pr.to_string();
        let args = ["pr", "comment", pr.as_str(), "--repo", repo, "--body", body];
        self.run("post comment", &args)?;
        let _ = writeln!(io::stderr(), "✓ Posted GitHub comment");
        Ok(())
    }

    fn add_labels(&self, repo: &str, pr: u64, labels: &[String]) -> Result<(), ReviewError> {
        let pr = pr.to_string();
        for label in labels.iter().filter(|label| !label.is_empty()) {
            let args = ["pr", "edit", pr.as_str(), "--repo", repo, "--add-label", label.as_str()];
            self.run("add label", &args)?;
            let _ = writeln!(io::stderr(), "✓ Applied GitHub label: {label}");
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn successful_commands_are_ok() {
        let host = GhCli::new("token").with_program("true");
        host.post_comment("acme/infra", 3, "hello").unwrap();
        host.add_labels("acme/infra", 3, &["a".into(), String::new()]).unwrap();
    }

    #[test]
    fn failing_commands_map_to_host_errors() {
        let host = GhCli::new("token").with_program("false");
        let err = host.add_labels("acme/infra", 3, &["a".into()]).unwrap_err();
        match err {
            ReviewError::Host { action, message } => {
                assert_eq!(action, "add label");
                assert!(message.starts_with("exited with"), "{message}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn missing_program_is_reported() {
        let host = GhCli::new("token").with_program("/nonexistent/gh");
        let err = host.post_comment("acme/infra", 3, "body").unwrap_err();
        assert!(err.to_string().starts_with("failed to post comment: "));
    }
}
