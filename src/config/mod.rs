// src/config/mod.rs

//! Resolved configuration for the two workflows.
//!
//! Raw inputs come from two places: CLI flags and the optional
//! `Podcreep.toml` file ([`model::FileConfig`]). This module merges them into
//! immutable [`DeployConfig`] / [`RunConfig`] values with the precedence
//! flag > file > built-in default, and absolutizes all deploy paths once so
//! the pipelines never have to care about the working directory.

pub mod loader;
pub mod model;

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::cli::{DeployArgs, RunArgs};
use crate::errors::{DevToolsError, Result};
use model::FileConfig;

/// Relative path (under the android checkout) of the release bundle that
/// Gradle produces.
pub const ANDROID_AAB_REL_PATH: &str = "mobile/build/outputs/bundle/release/mobile-release.aab";

/// Name the server binary gets inside the staging directory.
pub const DEPLOY_BINARY_NAME: &str = "podcreep";

/// Name of the binary `go build` leaves in the server checkout.
pub const SERVER_BINARY_NAME: &str = "server";

/// Immutable configuration for the deploy orchestrator.
///
/// All paths are absolute by the time this struct exists.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub web_path: PathBuf,
    pub server_path: PathBuf,
    pub android_path: PathBuf,
    pub deploy_path: PathBuf,
    pub keystore_path: PathBuf,
    pub keystore_pass: String,
    pub key_alias: String,
    pub bundletool_jar: PathBuf,
    /// Remote destination in `scp` format, e.g. `user@host:/path/file.zip`.
    pub server_dest: String,
    pub build_server: bool,
    pub build_android: bool,
    pub install: bool,
}

impl DeployConfig {
    /// Merge CLI flags with the `[deploy]` file section and defaults.
    pub fn resolve(args: &DeployArgs, file: &FileConfig) -> Result<Self> {
        let deploy = &file.deploy;

        let web_path = pick_path(&args.web_path, &deploy.web_path, "../web")?;
        let server_path = pick_path(&args.server_path, &deploy.server_path, ".")?;
        let android_path = pick_path(&args.android_path, &deploy.android_path, "../android")?;
        let deploy_path = pick_path(&args.deploy_path, &deploy.deploy_path, "../dist")?;
        let keystore_path =
            pick_path(&args.keystore_path, &deploy.keystore_path, "../keystore.jks")?;

        let bundletool_jar = match args.bundletool_jar.clone().or_else(|| deploy.bundletool_jar.clone()) {
            Some(path) => absolutize(&path)?,
            None => android_path.join("bundletool-all-1.8.2.jar"),
        };

        let server_dest = args
            .server_dest
            .clone()
            .or_else(|| deploy.server_dest.clone())
            .ok_or_else(|| {
                DevToolsError::Config(
                    "server_dest is required (--server-dest flag or [deploy] server_dest)".into(),
                )
            })?;

        Ok(Self {
            web_path,
            server_path,
            android_path,
            deploy_path,
            keystore_path,
            keystore_pass: args
                .keystore_pass
                .clone()
                .or_else(|| deploy.keystore_pass.clone())
                .unwrap_or_default(),
            key_alias: args
                .key_alias
                .clone()
                .or_else(|| deploy.key_alias.clone())
                .unwrap_or_else(|| "podcreep".to_string()),
            bundletool_jar,
            server_dest,
            build_server: !args.skip_server,
            build_android: !args.skip_android,
            install: args.install,
        })
    }

    /// Staging directory the server tree is rebuilt into on every run.
    pub fn staging_dir(&self) -> PathBuf {
        self.deploy_path.join("server")
    }

    /// The archive pushed to the remote host.
    pub fn archive_path(&self) -> PathBuf {
        self.deploy_path.join("server.zip")
    }

    /// Output directory for versioned Android bundles.
    pub fn android_out_dir(&self) -> PathBuf {
        self.deploy_path.join("android")
    }

    /// The release bundle Gradle produces.
    pub fn aab_path(&self) -> PathBuf {
        self.android_path.join(ANDROID_AAB_REL_PATH)
    }

    /// The properties file holding the app's version fields.
    pub fn properties_path(&self) -> PathBuf {
        self.android_path.join("gradle.properties")
    }
}

/// Immutable configuration for the run supervisor.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub db_user: String,
    pub db_pass: String,
    pub db_name: String,
    pub db_host: String,
    pub blob_store_path: PathBuf,
    pub admin_password: String,
}

impl RunConfig {
    /// Merge CLI flags with the `[run]` file section and defaults.
    pub fn resolve(args: &RunArgs, file: &FileConfig) -> Self {
        let run = &file.run;
        Self {
            db_user: pick_string(&args.db_user, &run.db_user, "podcreep_user"),
            db_pass: pick_string(&args.db_pass, &run.db_pass, ""),
            db_name: pick_string(&args.db_name, &run.db_name, "podcreep"),
            db_host: pick_string(&args.db_host, &run.db_host, "localhost"),
            blob_store_path: args
                .blob_store_path
                .clone()
                .or_else(|| run.blob_store_path.clone())
                .unwrap_or_else(|| PathBuf::from("../store")),
            admin_password: pick_string(&args.admin_password, &run.admin_password, "secret"),
        }
    }

    /// Database connection string handed to the server.
    pub fn database_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}/{}",
            self.db_user, self.db_pass, self.db_host, self.db_name
        )
    }

    /// Environment overlay for the server child process.
    ///
    /// These variable names are the server's external configuration contract;
    /// they must stay exactly as the server expects them.
    pub fn server_env(&self) -> Vec<(String, String)> {
        vec![
            ("DATABASE_URL".into(), self.database_url()),
            (
                "BLOB_STORE_PATH".into(),
                self.blob_store_path.to_string_lossy().into_owned(),
            ),
            ("DEBUG".into(), "1".into()),
            ("ADMIN_PASSWORD".into(), self.admin_password.clone()),
        ]
    }
}

fn pick_string(flag: &Option<String>, file: &Option<String>, default: &str) -> String {
    flag.clone()
        .or_else(|| file.clone())
        .unwrap_or_else(|| default.to_string())
}

fn pick_path(flag: &Option<PathBuf>, file: &Option<PathBuf>, default: &str) -> Result<PathBuf> {
    let path = flag
        .clone()
        .or_else(|| file.clone())
        .unwrap_or_else(|| PathBuf::from(default));
    absolutize(&path)
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    Ok(std::path::absolute(path)
        .with_context(|| format!("absolutizing path {:?}", path))?)
}
