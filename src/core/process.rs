use crate::core::error::{DistkitError, Result};
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// A fully resolved external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub env: HashMap<String, String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>, cwd: PathBuf) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd,
            env: HashMap::new(),
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn envs(mut self, env: &HashMap<String, String>) -> Self {
        self.env
            .extend(env.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub exit_code: i32,
    /// Only populated when the output was captured.
    pub stderr: String,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs an external collaborator to completion and reports its exit status.
///
/// `Err` is reserved for failing to start the process at all; a process that
/// ran and exited non-zero is an `Ok` outcome.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutcome>;
}

pub struct ProcessExecutor;

impl ProcessExecutor {
    fn command(invocation: &Invocation) -> Command {
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .envs(&invocation.env);
        command
    }

    /// Run with stdio passed through to the terminal.
    pub async fn run_inherited(invocation: &Invocation) -> Result<CommandOutcome> {
        let status = Self::command(invocation)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| {
                DistkitError::CommandFailed(format!(
                    "Failed to execute {}: {}",
                    invocation.program, e
                ))
            })?;

        Ok(CommandOutcome {
            exit_code: status.code().unwrap_or(1),
            stderr: String::new(),
        })
    }

    /// Run with stdout/stderr captured.
    pub async fn run_captured(invocation: &Invocation) -> Result<CommandOutcome> {
        let output = Self::command(invocation)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                DistkitError::CommandFailed(format!(
                    "Failed to execute {}: {}",
                    invocation.program, e
                ))
            })?;

        Ok(CommandOutcome {
            exit_code: output.status.code().unwrap_or(1),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    pub fn check_command_exists(cmd: &str) -> bool {
        std::process::Command::new("which")
            .arg(cmd)
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }
}

/// Runs collaborators as real child processes.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    quiet: bool,
}

impl SystemRunner {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    fn spinner(invocation: &Invocation) -> Result<ProgressBar> {
        let style = ProgressStyle::with_template("{spinner:.green} [{elapsed}] {msg}")
            .map_err(anyhow::Error::from)?;
        let pb = ProgressBar::new_spinner();
        pb.set_style(style);
        pb.set_message(invocation.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Ok(pb)
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutcome> {
        tracing::debug!(command = %invocation, cwd = %invocation.cwd.display(), "spawning");

        if !self.quiet {
            return ProcessExecutor::run_inherited(invocation).await;
        }

        let pb = Self::spinner(invocation)?;
        let outcome = ProcessExecutor::run_captured(invocation).await;
        pb.finish_and_clear();

        let outcome = outcome?;
        if !outcome.success() && !outcome.stderr.trim().is_empty() {
            eprintln!("{}", outcome.stderr.trim_end());
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invocation_display_joins_args() {
        let inv = Invocation::new("python3", PathBuf::from("."))
            .args(["setup.py", "sdist", "bdist_wheel"]);
        assert_eq!(inv.to_string(), "python3 setup.py sdist bdist_wheel");
    }

    #[test]
    fn invocation_envs_are_merged() {
        let mut env = HashMap::new();
        env.insert("SOURCE_DATE_EPOCH".to_string(), "0".to_string());
        let inv = Invocation::new("twine", PathBuf::from(".")).envs(&env);
        assert_eq!(inv.env.get("SOURCE_DATE_EPOCH").map(String::as_str), Some("0"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn captured_run_reports_exit_code_and_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let inv = Invocation::new("sh", dir.path().to_path_buf())
            .args(["-c", "echo nope >&2; exit 3"]);

        let outcome = ProcessExecutor::run_captured(&inv).await.unwrap();
        assert_eq!(outcome.exit_code, 3);
        assert!(!outcome.success());
        assert_eq!(outcome.stderr.trim(), "nope");
    }

    #[tokio::test]
    async fn missing_program_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let inv = Invocation::new("distkit-no-such-program", dir.path().to_path_buf());

        let err = ProcessExecutor::run_captured(&inv).await.unwrap_err();
        assert!(matches!(err, DistkitError::CommandFailed(_)));
    }
}
