#![allow(dead_code)]

use std::path::Path;

use podcreep_dev::config::{DeployConfig, RunConfig};

/// Builder for `DeployConfig` to simplify test setup.
///
/// All paths are derived from a single root (normally a tempdir), matching
/// the layout the real tool expects: sibling `web/`, `server/`, `android/`
/// and `dist/` directories.
pub struct DeployConfigBuilder {
    cfg: DeployConfig,
}

impl DeployConfigBuilder {
    pub fn new(root: &Path) -> Self {
        Self {
            cfg: DeployConfig {
                web_path: root.join("web"),
                server_path: root.join("server"),
                android_path: root.join("android"),
                deploy_path: root.join("dist"),
                keystore_path: root.join("keystore.jks"),
                keystore_pass: "testpass".to_string(),
                key_alias: "podcreep".to_string(),
                bundletool_jar: root.join("android/bundletool-all-1.8.2.jar"),
                server_dest: "user@example.com:/srv/podcreep/server.zip".to_string(),
                build_server: true,
                build_android: true,
                install: false,
            },
        }
    }

    pub fn server_dest(mut self, dest: &str) -> Self {
        self.cfg.server_dest = dest.to_string();
        self
    }

    pub fn skip_server(mut self) -> Self {
        self.cfg.build_server = false;
        self
    }

    pub fn skip_android(mut self) -> Self {
        self.cfg.build_android = false;
        self
    }

    pub fn install(mut self, val: bool) -> Self {
        self.cfg.install = val;
        self
    }

    pub fn build(self) -> DeployConfig {
        self.cfg
    }
}

/// Builder for `RunConfig`.
pub struct RunConfigBuilder {
    cfg: RunConfig,
}

impl RunConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: RunConfig {
                db_user: "podcreep_user".to_string(),
                db_pass: String::new(),
                db_name: "podcreep".to_string(),
                db_host: "localhost".to_string(),
                blob_store_path: "../store".into(),
                admin_password: "secret".to_string(),
            },
        }
    }

    pub fn db_pass(mut self, pass: &str) -> Self {
        self.cfg.db_pass = pass.to_string();
        self
    }

    pub fn build(self) -> RunConfig {
        self.cfg
    }
}

impl Default for RunConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
