// src/deploy/version.rs

//! Version bump for the Android app's `gradle.properties`.
//!
//! Two lines are rewritten, everything else passes through byte-identical and
//! in the original order:
//!
//! - `app.versionCode=41` becomes `app.versionCode=42`
//! - `app.versionName=1.2.7` becomes `app.versionName=1.2.8` (only the patch
//!   component moves; major/minor are untouched)
//!
//! A file missing either key, a non-numeric counter, or a version value that
//! is not a numeric three-part triplet is a fatal configuration error; the
//! file is left unmodified in that case.

use std::fs;
use std::path::Path;

use anyhow::Context;
use tracing::info;

use crate::errors::{DevToolsError, Result};

pub const VERSION_CODE_KEY: &str = "app.versionCode";
pub const VERSION_NAME_KEY: &str = "app.versionName";

/// The values written back by a bump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpedVersion {
    pub version_code: u64,
    pub version_name: String,
}

/// Read, bump and rewrite the properties file in place.
pub fn bump_version_file(path: &Path) -> Result<BumpedVersion> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading properties file {:?}", path))?;
    let (updated, bumped) = bump_properties(&contents)?;
    fs::write(path, updated).with_context(|| format!("writing properties file {:?}", path))?;

    info!(
        version_code = bumped.version_code,
        version_name = %bumped.version_name,
        "bumped app version"
    );
    Ok(bumped)
}

/// Pure line-by-line rewrite. Returns the new file contents and the values
/// that were written.
pub fn bump_properties(contents: &str) -> Result<(String, BumpedVersion)> {
    let mut version_code = None;
    let mut version_name = None;

    let lines: Vec<String> = contents
        .split('\n')
        .map(|line| {
            if let Some(value) = key_value(line, VERSION_CODE_KEY) {
                let code: u64 = value.trim().parse().map_err(|_| {
                    DevToolsError::Properties(format!(
                        "{VERSION_CODE_KEY} value `{value}` is not an integer"
                    ))
                })?;
                version_code = Some(code + 1);
                Ok(format!("{VERSION_CODE_KEY}={}", code + 1))
            } else if let Some(value) = key_value(line, VERSION_NAME_KEY) {
                let bumped = bump_patch(value.trim())?;
                version_name = Some(bumped.clone());
                Ok(format!("{VERSION_NAME_KEY}={bumped}"))
            } else {
                Ok(line.to_string())
            }
        })
        .collect::<Result<_>>()?;

    let bumped = BumpedVersion {
        version_code: version_code.ok_or_else(|| missing_key(VERSION_CODE_KEY))?,
        version_name: version_name.ok_or_else(|| missing_key(VERSION_NAME_KEY))?,
    };

    Ok((lines.join("\n"), bumped))
}

/// Increment the last component of a numeric `major.minor.patch` triplet.
fn bump_patch(version: &str) -> Result<String> {
    let parts: Vec<&str> = version.split('.').collect();
    let [major, minor, patch] = parts.as_slice() else {
        return Err(DevToolsError::Properties(format!(
            "{VERSION_NAME_KEY} value `{version}` is not a three-part version"
        )));
    };

    let parse = |part: &str| -> Result<u64> {
        part.parse().map_err(|_| {
            DevToolsError::Properties(format!(
                "{VERSION_NAME_KEY} component `{part}` in `{version}` is not a number"
            ))
        })
    };
    let (major, minor, patch) = (parse(major)?, parse(minor)?, parse(patch)?);

    Ok(format!("{major}.{minor}.{}", patch + 1))
}

fn missing_key(key: &str) -> DevToolsError {
    DevToolsError::Properties(format!("missing key `{key}`"))
}

/// Returns the value of a `key=value` line, or `None` when the line does not
/// start with `key=`.
fn key_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    line.strip_prefix(key)?.strip_prefix('=')
}
