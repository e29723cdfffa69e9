// src/deploy/android.rs

//! The Android (mobile) deployment pipeline.
//!
//! Builds the release bundle with Gradle, signs it with `jarsigner`, asks
//! `bundletool` for the manifest version string, and copies the bundle to a
//! versioned filename under the deploy directory. With `--install`, it also
//! builds a signed `.apks` package set and installs it on the attached
//! device.

use std::fs;

use anyhow::{Context, anyhow};
use tracing::info;

use crate::config::DeployConfig;
use crate::deploy::version;
use crate::errors::Result;
use crate::exec::{CommandRunner, CommandSpec, run_checked};

/// One stage of the mobile pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MobileStage {
    /// Increment the build counter and patch version in gradle.properties.
    BumpVersion,
    GradleClean,
    GradleBundle,
    SignBundle,
    /// Copy the bundle to `podcreep-<version>.aab` under the deploy dir.
    CopyBundle,
    /// Build a signed `.apks` package set (only with `--install`).
    BuildApks,
    /// Install the package set on the attached device (only with `--install`).
    InstallApks,
}

impl MobileStage {
    pub fn name(self) -> &'static str {
        match self {
            MobileStage::BumpVersion => "bump-version",
            MobileStage::GradleClean => "gradle-clean",
            MobileStage::GradleBundle => "gradle-bundle",
            MobileStage::SignBundle => "sign-bundle",
            MobileStage::CopyBundle => "copy-bundle",
            MobileStage::BuildApks => "build-apks",
            MobileStage::InstallApks => "install-apks",
        }
    }
}

const BASE_STAGES: [MobileStage; 5] = [
    MobileStage::BumpVersion,
    MobileStage::GradleClean,
    MobileStage::GradleBundle,
    MobileStage::SignBundle,
    MobileStage::CopyBundle,
];

const INSTALL_STAGES: [MobileStage; 2] = [MobileStage::BuildApks, MobileStage::InstallApks];

/// The stage list for a given configuration.
pub fn stages_for(install: bool) -> Vec<MobileStage> {
    let mut stages = BASE_STAGES.to_vec();
    if install {
        stages.extend(INSTALL_STAGES);
    }
    stages
}

/// Builds, signs and stages the Android release bundle.
pub struct MobileDeployment<'a, R: CommandRunner> {
    cfg: &'a DeployConfig,
    runner: &'a R,
}

impl<'a, R: CommandRunner> MobileDeployment<'a, R> {
    pub fn new(cfg: &'a DeployConfig, runner: &'a R) -> Self {
        Self { cfg, runner }
    }

    pub async fn run(&self) -> Result<()> {
        info!(pipeline = "mobile", "starting mobile deployment");
        for stage in stages_for(self.cfg.install) {
            info!(pipeline = "mobile", stage = stage.name(), "running stage");
            self.run_stage(stage).await?;
        }
        info!(pipeline = "mobile", "mobile deployment finished");
        Ok(())
    }

    async fn run_stage(&self, stage: MobileStage) -> Result<()> {
        match stage {
            MobileStage::BumpVersion => {
                version::bump_version_file(&self.cfg.properties_path())?;
                Ok(())
            }
            MobileStage::GradleClean => self.gradle(&["clean"]).await,
            MobileStage::GradleBundle => self.gradle(&["bundle"]).await,
            MobileStage::SignBundle => self.sign_bundle().await,
            MobileStage::CopyBundle => self.copy_bundle().await,
            MobileStage::BuildApks => self.build_apks().await,
            MobileStage::InstallApks => self.install_apks().await,
        }
    }

    async fn gradle(&self, args: &[&str]) -> Result<()> {
        run_checked(
            self.runner,
            CommandSpec::new("./gradlew")
                .args(args.iter().copied())
                .current_dir(&self.cfg.android_path),
        )
        .await?;
        Ok(())
    }

    async fn sign_bundle(&self) -> Result<()> {
        run_checked(
            self.runner,
            CommandSpec::new("jarsigner")
                .args(["-verbose", "-sigalg", "SHA256withRSA", "-digestalg", "SHA-256"])
                .arg("-keystore")
                .arg(self.cfg.keystore_path.to_string_lossy())
                .arg(self.cfg.aab_path().to_string_lossy())
                .arg(&self.cfg.key_alias)
                .arg("-storepass")
                .arg(&self.cfg.keystore_pass),
        )
        .await?;
        Ok(())
    }

    /// Ask bundletool for the versionName baked into the bundle's manifest.
    ///
    /// The version comes from the bundle itself rather than the properties
    /// file, so the filename always reflects what was actually built.
    async fn bundle_version(&self) -> Result<String> {
        let output = run_checked(
            self.runner,
            self.bundletool()
                .args(["dump", "manifest"])
                .arg("--bundle")
                .arg(self.cfg.aab_path().to_string_lossy())
                .args(["--xpath", "/manifest/@android:versionName"])
                .capture_stdout(),
        )
        .await?;

        let version = output.stdout.trim().to_string();
        if version.is_empty() {
            return Err(anyhow!("bundletool returned an empty version string").into());
        }
        Ok(version)
    }

    async fn copy_bundle(&self) -> Result<()> {
        let version = self.bundle_version().await?;
        let dest_dir = self.cfg.android_out_dir();
        fs::create_dir_all(&dest_dir)
            .with_context(|| format!("creating {:?}", dest_dir))?;

        let dest = dest_dir.join(format!("podcreep-{version}.aab"));
        info!(dest = %dest.display(), "copying signed bundle");
        fs::copy(self.cfg.aab_path(), &dest)
            .with_context(|| format!("copying bundle to {:?}", dest))?;
        Ok(())
    }

    async fn build_apks(&self) -> Result<()> {
        run_checked(
            self.runner,
            self.bundletool()
                .arg("build-apks")
                .arg(format!("--bundle={}", self.cfg.aab_path().display()))
                .arg(format!("--output={}", self.apks_path().display()))
                .arg(format!("--ks={}", self.cfg.keystore_path.display()))
                .arg(format!("--ks-pass=pass:{}", self.cfg.keystore_pass))
                .arg(format!("--ks-key-alias={}", self.cfg.key_alias))
                .arg("--overwrite"),
        )
        .await?;
        Ok(())
    }

    async fn install_apks(&self) -> Result<()> {
        run_checked(
            self.runner,
            self.bundletool()
                .arg("install-apks")
                .arg(format!("--apks={}", self.apks_path().display())),
        )
        .await?;
        Ok(())
    }

    fn bundletool(&self) -> CommandSpec {
        CommandSpec::new("java")
            .arg("-jar")
            .arg(self.cfg.bundletool_jar.to_string_lossy())
    }

    fn apks_path(&self) -> std::path::PathBuf {
        self.cfg.android_out_dir().join("podcreep.apks")
    }
}
