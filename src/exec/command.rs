// src/exec/command.rs

//! Description of a single external tool invocation.
//!
//! Every build tool this crate touches (`ng`, `go`, `./gradlew`, `jarsigner`,
//! `bundletool`, `scp`, `adb`) is launched from a [`CommandSpec`]: an explicit
//! program + argument vector with an optional working directory and an
//! environment *overlay*. The parent process environment is never mutated;
//! the child inherits it and the overlay is applied on top, per invocation.

use std::fmt;
use std::path::PathBuf;

/// Configuration for one child-process launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
    /// Capture stdout instead of inheriting the terminal. Stderr is always
    /// inherited so tool diagnostics reach the operator directly.
    pub capture_stdout: bool,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
            capture_stdout: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn capture_stdout(mut self) -> Self {
        self.capture_stdout = true;
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Structured result of a finished child process.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Exit code; `-1` if the process was terminated by a signal.
    pub exit_code: i32,
    /// Captured stdout; empty unless [`CommandSpec::capture_stdout`] was set.
    pub stdout: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}
