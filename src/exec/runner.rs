// src/exec/runner.rs

//! Pluggable command runner abstraction.
//!
//! Pipelines and the run supervisor talk to a [`CommandRunner`] instead of
//! spawning processes directly. This keeps the production implementation in
//! one place and lets tests swap in a fake that records which commands were
//! launched and answers with scripted exit codes / stdout.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::Context;
use tokio::process::Command;
use tracing::debug;

use crate::errors::{DevToolsError, Result};

use super::command::{CommandOutput, CommandSpec};

/// Trait abstracting how external commands are executed.
///
/// A completed child process is `Ok` regardless of its exit code; only
/// spawn/wait failures are `Err`. Callers that want "non-zero exit is fatal"
/// go through [`run_checked`]. The supervisor deliberately does not: it
/// restarts the server whether it crashed or exited cleanly.
pub trait CommandRunner: Send + Sync {
    fn run(
        &self,
        spec: CommandSpec,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutput>> + Send + '_>>;
}

/// Real command runner used in production, backed by `tokio::process`.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(
        &self,
        spec: CommandSpec,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutput>> + Send + '_>> {
        Box::pin(async move {
            debug!(cmd = %spec, cwd = ?spec.cwd, "launching command");

            let mut cmd = Command::new(&spec.program);
            cmd.args(&spec.args);
            if let Some(dir) = &spec.cwd {
                cmd.current_dir(dir);
            }
            for (key, value) in &spec.env {
                cmd.env(key, value);
            }

            let output = if spec.capture_stdout {
                // Keep stderr on the terminal even while capturing stdout.
                let out = cmd
                    .stdout(Stdio::piped())
                    .stderr(Stdio::inherit())
                    .output()
                    .await
                    .with_context(|| format!("spawning `{}`", spec.program))?;
                CommandOutput {
                    exit_code: out.status.code().unwrap_or(-1),
                    stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
                }
            } else {
                let status = cmd
                    .status()
                    .await
                    .with_context(|| format!("spawning `{}`", spec.program))?;
                CommandOutput {
                    exit_code: status.code().unwrap_or(-1),
                    stdout: String::new(),
                }
            };

            debug!(cmd = %spec, exit_code = output.exit_code, "command finished");
            Ok(output)
        })
    }
}

/// Run a command and treat any non-zero exit as a fatal error.
pub async fn run_checked<R: CommandRunner + ?Sized>(
    runner: &R,
    spec: CommandSpec,
) -> Result<CommandOutput> {
    let program = spec.program.clone();
    let output = runner.run(spec).await?;
    if !output.success() {
        return Err(DevToolsError::CommandFailed {
            program,
            code: output.exit_code,
        });
    }
    Ok(output)
}
