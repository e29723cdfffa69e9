// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level configuration as read from `Podcreep.toml`.
///
/// The file is entirely optional, and so is every field in it:
///
/// ```toml
/// [deploy]
/// web_path = "../web"
/// server_dest = "deploy@podcreep.com:/srv/podcreep/server.zip"
/// keystore_pass = "hunter2"
///
/// [run]
/// db_pass = "hunter2"
/// ```
///
/// Values given on the command line always win over values from this file.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FileConfig {
    /// Defaults for `podcreep-dev deploy` from `[deploy]`.
    #[serde(default)]
    pub deploy: DeploySection,

    /// Defaults for `podcreep-dev run` from `[run]`.
    #[serde(default)]
    pub run: RunSection,
}

/// `[deploy]` section. Field names mirror the CLI flags.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DeploySection {
    #[serde(default)]
    pub web_path: Option<PathBuf>,

    #[serde(default)]
    pub server_path: Option<PathBuf>,

    #[serde(default)]
    pub android_path: Option<PathBuf>,

    #[serde(default)]
    pub deploy_path: Option<PathBuf>,

    #[serde(default)]
    pub keystore_path: Option<PathBuf>,

    #[serde(default)]
    pub keystore_pass: Option<String>,

    #[serde(default)]
    pub key_alias: Option<String>,

    #[serde(default)]
    pub bundletool_jar: Option<PathBuf>,

    /// Remote destination in `scp` format, e.g. `user@host:/path/file.zip`.
    #[serde(default)]
    pub server_dest: Option<String>,
}

/// `[run]` section. Field names mirror the CLI flags.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RunSection {
    #[serde(default)]
    pub db_user: Option<String>,

    #[serde(default)]
    pub db_pass: Option<String>,

    #[serde(default)]
    pub db_name: Option<String>,

    #[serde(default)]
    pub db_host: Option<String>,

    #[serde(default)]
    pub blob_store_path: Option<PathBuf>,

    #[serde(default)]
    pub admin_password: Option<String>,
}
