// src/deploy/staging.rs

//! Artifact staging: rebuild the deploy directory from the server tree.
//!
//! The staging directory is ephemeral. It is deleted and rebuilt on every
//! run, so re-staging with unchanged inputs always yields an identical tree
//! no matter what was there before.
//!
//! Three filters decide what gets staged:
//! - anything under the `.git/` metadata directory is skipped,
//! - files matching the source-extension globs (`*.go`, `*.py`) are skipped,
//! - relative paths on the literal ignore list are skipped.
//!
//! Everything else is copied at its original relative path. The compiled
//! server binary is *moved* into place first (renamed to its deploy name),
//! which means the build output path no longer holds the binary afterwards.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::{DEPLOY_BINARY_NAME, SERVER_BINARY_NAME};

/// Source files never shipped to the deploy host.
const SOURCE_EXCLUDE_GLOBS: &[&str] = &["*.go", "*.py"];

/// Repo metadata/config files excluded from staging regardless of the
/// extension filter.
const IGNORED_FILES: &[&str] = &[".gitignore", "go.mod", "go.sum", "LICENSE", "README.md"];

/// Version-control metadata directory, skipped wholesale.
const VCS_DIR: &str = ".git";

/// Rebuild `staging_dir` from `server_path`.
///
/// Expects the compiled binary at `<server_path>/server`; it ends up at
/// `<staging_dir>/podcreep`. Any filesystem error is fatal; there is no
/// partial-success or rollback handling.
pub fn stage_server_tree(server_path: &Path, staging_dir: &Path) -> Result<()> {
    if staging_dir.exists() {
        fs::remove_dir_all(staging_dir)
            .with_context(|| format!("removing old staging directory {:?}", staging_dir))?;
    }
    fs::create_dir_all(staging_dir)
        .with_context(|| format!("creating staging directory {:?}", staging_dir))?;

    // Move the binary before walking the tree; once moved it is gone from
    // the source tree and cannot be picked up twice.
    let binary = server_path.join(SERVER_BINARY_NAME);
    if !binary.is_file() {
        bail!(
            "server binary {:?} not found; did the build step run?",
            binary
        );
    }
    move_file(&binary, &staging_dir.join(DEPLOY_BINARY_NAME))?;

    let source_excludes = build_globset(SOURCE_EXCLUDE_GLOBS)?;

    let mut staged = 0usize;
    for entry in WalkDir::new(server_path)
        .into_iter()
        .filter_entry(|e| !(e.file_type().is_dir() && e.file_name() == VCS_DIR))
    {
        let entry = entry.with_context(|| format!("walking server tree {:?}", server_path))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let rel = entry
            .path()
            .strip_prefix(server_path)
            .context("stripping server path prefix")?;
        let rel_str = rel.to_string_lossy().replace('\\', "/");

        if source_excludes.is_match(&rel_str) {
            debug!(path = %rel_str, "skipping source file");
            continue;
        }
        if IGNORED_FILES.contains(&rel_str.as_str()) {
            debug!(path = %rel_str, "skipping ignored file");
            continue;
        }

        let dest = staging_dir.join(rel);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {:?}", parent))?;
        }
        fs::copy(entry.path(), &dest)
            .with_context(|| format!("copying {:?} to {:?}", entry.path(), dest))?;
        staged += 1;
    }

    info!(files = staged, staging_dir = %staging_dir.display(), "staged server tree");
    Ok(())
}

/// Move a file, falling back to copy+remove when rename crosses filesystems.
fn move_file(src: &Path, dest: &Path) -> Result<()> {
    if fs::rename(src, dest).is_err() {
        fs::copy(src, dest).with_context(|| format!("copying {:?} to {:?}", src, dest))?;
        fs::remove_file(src).with_context(|| format!("removing {:?} after copy", src))?;
    }
    Ok(())
}

fn build_globset(patterns: &[&str]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
