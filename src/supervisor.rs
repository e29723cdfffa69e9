// src/supervisor.rs

//! Crash-restart loop for the local development server.
//!
//! Two states:
//!
//! - RUNNING: the server child process is active. Interrupts arriving here
//!   are consumed and logged as ignored; killing the server mid-startup would
//!   leave a torn state, so the operator cannot break out of this window.
//! - IDLE: the fixed delay between an exit and the next launch. This is the
//!   only window in which an interrupt is honoured; it terminates the
//!   supervisor before another child is launched.
//!
//! The transition RUNNING → IDLE happens on child exit regardless of exit
//! code: crash and clean exit both restart. There is no restart bound and no
//! backoff; this is a development convenience, not a production supervisor.
//!
//! Interrupts are not a global flag: a spawned ctrl-c listener forwards them
//! over an mpsc channel, and the supervisor polls that channel only at the
//! two select points below, never inside the blocking wait itself.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::errors::Result;
use crate::exec::{CommandOutput, CommandRunner, CommandSpec};

/// Delay between a server exit and its restart.
pub const RESTART_DELAY: Duration = Duration::from_secs(3);

/// Local port forwarded to an attached device via `adb reverse`.
const DEVICE_PORT: u16 = 8080;

/// Runs the server in an unbounded start/wait/pause/restart loop.
pub struct Supervisor<R: CommandRunner> {
    cfg: RunConfig,
    runner: R,
    delay: Duration,
}

impl<R: CommandRunner> Supervisor<R> {
    pub fn new(cfg: RunConfig, runner: R) -> Self {
        Self {
            cfg,
            runner,
            delay: RESTART_DELAY,
        }
    }

    /// Override the idle delay. Used by tests to keep the loop fast.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Run until an interrupt arrives during the idle window.
    ///
    /// `interrupts` is normally fed by [`spawn_interrupt_listener`]; tests
    /// send on it directly.
    pub async fn run(&self, mut interrupts: mpsc::Receiver<()>) -> Result<()> {
        self.forward_device_port().await;

        loop {
            let spec = self.server_spec();
            info!(cmd = %spec, "starting server process");
            let output = self.wait_for_exit(spec, &mut interrupts).await?;

            info!(
                exit_code = output.exit_code,
                "server exited; restarting in {}s (press Ctrl+C to stop)",
                self.delay.as_secs()
            );

            // Idle window: the only point where an interrupt is honoured.
            tokio::select! {
                _ = sleep(self.delay) => {}
                Some(()) = interrupts.recv() => {
                    info!("interrupt received during idle window; stopping supervisor");
                    return Ok(());
                }
            }
        }
    }

    /// Block until the child exits, consuming (and ignoring) any interrupts
    /// that arrive while it runs.
    async fn wait_for_exit(
        &self,
        spec: CommandSpec,
        interrupts: &mut mpsc::Receiver<()>,
    ) -> Result<CommandOutput> {
        let wait = self.runner.run(spec);
        tokio::pin!(wait);

        loop {
            tokio::select! {
                output = &mut wait => return output,
                Some(()) = interrupts.recv() => {
                    info!("interrupt ignored while the server is running");
                }
            }
        }
    }

    /// One-time setup: let an attached device reach the local server.
    ///
    /// A missing device or adb must not block local runs, so a failure here
    /// is logged and otherwise ignored.
    async fn forward_device_port(&self) {
        let spec = CommandSpec::new("adb").args([
            "reverse".to_string(),
            format!("tcp:{DEVICE_PORT}"),
            format!("tcp:{DEVICE_PORT}"),
        ]);

        match self.runner.run(spec).await {
            Ok(output) if output.success() => {
                debug!("adb reverse set up");
            }
            Ok(output) => {
                warn!(exit_code = output.exit_code, "adb reverse failed; continuing");
            }
            Err(err) => {
                warn!(error = %err, "could not run adb; continuing");
            }
        }
    }

    fn server_spec(&self) -> CommandSpec {
        CommandSpec::new("go")
            .args(["run", "main.go"])
            .envs(self.cfg.server_env())
    }
}

/// Spawn a task forwarding ctrl-c signals into an mpsc channel.
///
/// The receiver side is handed to [`Supervisor::run`], which decides at its
/// own pace whether an interrupt is honoured or ignored.
pub fn spawn_interrupt_listener() -> mpsc::Receiver<()> {
    let (tx, rx) = mpsc::channel::<()>(4);

    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for Ctrl+C");
                return;
            }
            if tx.send(()).await.is_err() {
                // Supervisor is gone; nothing left to interrupt.
                return;
            }
        }
    });

    rx
}
