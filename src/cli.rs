// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Two subcommands, one per workflow:
//!
//! - `podcreep-dev deploy` — build, stage, archive and push the server, and
//!   build/sign the Android app.
//! - `podcreep-dev run` — run the server locally in a restart loop.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `podcreep-dev`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "podcreep-dev",
    version,
    about = "Development workflow tools for the podcreep server.",
    long_about = None
)]
pub struct CliArgs {
    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PODCREEP_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Build and deploy the server and the Android app.
    Deploy(DeployArgs),

    /// Run the server locally, restarting it whenever it exits.
    Run(RunArgs),
}

/// Arguments for `podcreep-dev deploy`.
///
/// Every path/credential flag is optional on the command line; values are
/// resolved as flag > `Podcreep.toml` `[deploy]` entry > built-in default.
/// The only parameter without a built-in default is `--server-dest`.
#[derive(Debug, Clone, Parser)]
pub struct DeployArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Podcreep.toml` in the current working directory. The file is
    /// optional; a missing file just means built-in defaults apply.
    #[arg(long, value_name = "PATH", default_value = "Podcreep.toml")]
    pub config: String,

    /// Path where the web app is checked out.
    #[arg(long, value_name = "PATH")]
    pub web_path: Option<PathBuf>,

    /// Path where the server code is checked out.
    #[arg(long, value_name = "PATH")]
    pub server_path: Option<PathBuf>,

    /// Path where the Android app's code is checked out.
    #[arg(long, value_name = "PATH")]
    pub android_path: Option<PathBuf>,

    /// Path where we build and stage the deploy artifacts, temporarily.
    #[arg(long, value_name = "PATH")]
    pub deploy_path: Option<PathBuf>,

    /// Path to the signing keystore.
    #[arg(long, value_name = "PATH")]
    pub keystore_path: Option<PathBuf>,

    /// Password for the keystore.
    #[arg(long, value_name = "PASS")]
    pub keystore_pass: Option<String>,

    /// Key alias inside the keystore.
    #[arg(long, value_name = "ALIAS")]
    pub key_alias: Option<String>,

    /// Path to the bundletool jar used to inspect and package the bundle.
    #[arg(long, value_name = "PATH")]
    pub bundletool_jar: Option<PathBuf>,

    /// Location (in `scp` format) we copy server.zip to,
    /// e.g. `username@host:/path/file.zip`. Required (flag or config file).
    #[arg(long, value_name = "DEST")]
    pub server_dest: Option<String>,

    /// Skip the server pipeline (web build, server build, staging, push).
    #[arg(long)]
    pub skip_server: bool,

    /// Skip the Android pipeline (version bump, bundle, sign, copy).
    #[arg(long)]
    pub skip_android: bool,

    /// After building the bundle, build a signed .apks package set and
    /// install it on the attached device.
    #[arg(long)]
    pub install: bool,

    /// Print the pipelines and stages that would run, without executing.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for `podcreep-dev run`.
#[derive(Debug, Clone, Parser)]
pub struct RunArgs {
    /// Path to the config file (TOML). Optional, like for `deploy`.
    #[arg(long, value_name = "PATH", default_value = "Podcreep.toml")]
    pub config: String,

    /// Username for the database.
    #[arg(long, value_name = "USER")]
    pub db_user: Option<String>,

    /// Password to use for the database user.
    #[arg(long, value_name = "PASS")]
    pub db_pass: Option<String>,

    /// Name of the database to connect to.
    #[arg(long, value_name = "NAME")]
    pub db_name: Option<String>,

    /// Host of the database server.
    #[arg(long, value_name = "HOST")]
    pub db_host: Option<String>,

    /// Path to a directory on disk where we store "blobs", i.e. icons etc.
    #[arg(long, value_name = "PATH")]
    pub blob_store_path: Option<PathBuf>,

    /// Password to access the admin section.
    #[arg(long, value_name = "PASS")]
    pub admin_password: Option<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
