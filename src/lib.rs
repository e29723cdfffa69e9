// src/lib.rs

pub mod cli;
pub mod config;
pub mod deploy;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod supervisor;

use tracing::info;

use crate::cli::{CliArgs, Command, DeployArgs, RunArgs};
use crate::config::{DeployConfig, RunConfig, loader};
use crate::errors::Result;
use crate::exec::ProcessRunner;
use crate::supervisor::{Supervisor, spawn_interrupt_listener};

/// High-level entry point used by `main.rs`.
pub async fn run(args: CliArgs) -> Result<()> {
    match args.command {
        Command::Deploy(args) => run_deploy(args).await,
        Command::Run(args) => run_supervisor(args).await,
    }
}

/// Deploy orchestrator: resolve config, then run the selected pipelines.
async fn run_deploy(args: DeployArgs) -> Result<()> {
    let file = loader::load_optional(&args.config)?;
    let cfg = DeployConfig::resolve(&args, &file)?;

    if args.dry_run {
        deploy::print_plan(&cfg);
        return Ok(());
    }

    deploy::run_pipelines(&cfg, &ProcessRunner).await?;
    info!("deploy finished");
    Ok(())
}

/// Run supervisor: resolve config, wire up ctrl-c, loop until interrupted.
async fn run_supervisor(args: RunArgs) -> Result<()> {
    let file = loader::load_optional(&args.config)?;
    let cfg = RunConfig::resolve(&args, &file);

    let interrupts = spawn_interrupt_listener();
    Supervisor::new(cfg, ProcessRunner).run(interrupts).await
}
