// src/deploy/mod.rs

//! Deploy orchestrator.
//!
//! Two named pipelines, each an ordered list of stages:
//! - [`ServerDeployment`]: web build → web copy → server build → staging →
//!   archive → push.
//! - [`MobileDeployment`]: version bump → gradle clean/bundle → sign → copy,
//!   optionally followed by apks build + device install.
//!
//! The pipelines share nothing and could run in parallel; for now they run
//! sequentially, server first.

pub mod android;
pub mod archive;
pub mod server;
pub mod staging;
pub mod version;

pub use android::{MobileDeployment, MobileStage};
pub use server::{ServerDeployment, ServerStage};

use tracing::info;

use crate::config::DeployConfig;
use crate::errors::Result;
use crate::exec::CommandRunner;

/// Run the selected pipelines in order.
pub async fn run_pipelines<R: CommandRunner>(cfg: &DeployConfig, runner: &R) -> Result<()> {
    if cfg.build_server {
        ServerDeployment::new(cfg, runner).run().await?;
    } else {
        info!(pipeline = "server", "skipped");
    }

    if cfg.build_android {
        MobileDeployment::new(cfg, runner).run().await?;
    } else {
        info!(pipeline = "mobile", "skipped");
    }

    Ok(())
}

/// Simple dry-run output: print the pipelines and stages that would run.
pub fn print_plan(cfg: &DeployConfig) {
    println!("podcreep-dev deploy dry-run");
    println!("  server_dest = {}", cfg.server_dest);
    println!();

    if cfg.build_server {
        println!("pipeline server:");
        for stage in server::SERVER_STAGES {
            println!("  - {}", stage.name());
        }
    } else {
        println!("pipeline server: skipped (--skip-server)");
    }

    if cfg.build_android {
        println!("pipeline mobile:");
        for stage in android::stages_for(cfg.install) {
            println!("  - {}", stage.name());
        }
    } else {
        println!("pipeline mobile: skipped (--skip-android)");
    }
}
