// src/deploy/server.rs

//! The server deployment pipeline.
//!
//! Strictly sequential: each stage's output directory is the next stage's
//! input, and a failing stage aborts the rest with no cleanup of whatever was
//! already written (the next run rebuilds everything from scratch anyway).

use std::fs;

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::config::DeployConfig;
use crate::deploy::{archive, staging};
use crate::errors::Result;
use crate::exec::{CommandRunner, CommandSpec, run_checked};

/// One stage of the server pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStage {
    /// Clear the web `dist/` directory and run the web bundler.
    BuildWeb,
    /// Copy the bundled web assets into the server source tree.
    CopyWeb,
    /// Cross-compile the server binary.
    BuildServer,
    /// Rebuild the staging directory (binary + non-source files).
    StageServer,
    /// Zip the staging directory.
    ZipServer,
    /// Copy the archive to the remote host.
    PushServer,
}

impl ServerStage {
    pub fn name(self) -> &'static str {
        match self {
            ServerStage::BuildWeb => "build-web",
            ServerStage::CopyWeb => "copy-web",
            ServerStage::BuildServer => "build-server",
            ServerStage::StageServer => "stage-server",
            ServerStage::ZipServer => "zip-server",
            ServerStage::PushServer => "push-server",
        }
    }
}

pub const SERVER_STAGES: [ServerStage; 6] = [
    ServerStage::BuildWeb,
    ServerStage::CopyWeb,
    ServerStage::BuildServer,
    ServerStage::StageServer,
    ServerStage::ZipServer,
    ServerStage::PushServer,
];

/// Builds, stages, archives and pushes the server.
pub struct ServerDeployment<'a, R: CommandRunner> {
    cfg: &'a DeployConfig,
    runner: &'a R,
}

impl<'a, R: CommandRunner> ServerDeployment<'a, R> {
    pub fn new(cfg: &'a DeployConfig, runner: &'a R) -> Self {
        Self { cfg, runner }
    }

    pub async fn run(&self) -> Result<()> {
        info!(pipeline = "server", "starting server deployment");
        for stage in SERVER_STAGES {
            info!(pipeline = "server", stage = stage.name(), "running stage");
            self.run_stage(stage).await?;
        }
        info!(pipeline = "server", "server deployment finished");
        Ok(())
    }

    async fn run_stage(&self, stage: ServerStage) -> Result<()> {
        match stage {
            ServerStage::BuildWeb => self.build_web().await,
            ServerStage::CopyWeb => self.copy_web().await,
            ServerStage::BuildServer => self.build_server().await,
            ServerStage::StageServer => staging::stage_server_tree(
                &self.cfg.server_path,
                &self.cfg.staging_dir(),
            )
            .map_err(Into::into),
            ServerStage::ZipServer => {
                archive::zip_dir(&self.cfg.staging_dir(), &self.cfg.archive_path())
            }
            ServerStage::PushServer => self.push_server().await,
        }
    }

    async fn build_web(&self) -> Result<()> {
        // Clear stale bundler output first; `ng build` does not remove
        // chunks that no longer exist.
        let dist = self.cfg.web_path.join("dist");
        clear_dir(&dist)?;

        run_checked(
            self.runner,
            CommandSpec::new("ng")
                .args(["build", "--configuration", "production"])
                .current_dir(&self.cfg.web_path),
        )
        .await?;
        Ok(())
    }

    async fn copy_web(&self) -> Result<()> {
        let src_dir = self.cfg.web_path.join("dist");
        let dest_dir = self.cfg.server_path.join("dist");
        clear_dir(&dest_dir)?;

        for entry in
            fs::read_dir(&src_dir).with_context(|| format!("reading {:?}", src_dir))?
        {
            let entry = entry.with_context(|| format!("reading {:?}", src_dir))?;
            let path = entry.path();
            if !path.is_file() {
                warn!(path = %path.display(), "skipping non-file web asset");
                continue;
            }
            let dest = dest_dir.join(entry.file_name());
            debug!(src = %path.display(), "copying web asset");
            fs::copy(&path, &dest)
                .with_context(|| format!("copying {:?} to {:?}", path, dest))?;
        }
        Ok(())
    }

    async fn build_server(&self) -> Result<()> {
        run_checked(
            self.runner,
            CommandSpec::new("go")
                .arg("build")
                .current_dir(&self.cfg.server_path)
                .env("GOOS", "linux"),
        )
        .await?;
        Ok(())
    }

    async fn push_server(&self) -> Result<()> {
        run_checked(
            self.runner,
            CommandSpec::new("scp")
                .arg(self.cfg.archive_path().to_string_lossy())
                .arg(&self.cfg.server_dest),
        )
        .await?;
        Ok(())
    }
}

/// Delete and recreate a directory.
fn clear_dir(dir: &std::path::Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).with_context(|| format!("clearing {:?}", dir))?;
    }
    fs::create_dir_all(dir).with_context(|| format!("creating {:?}", dir))?;
    Ok(())
}
