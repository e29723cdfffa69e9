// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::FileConfig;
use crate::errors::Result;

/// Load the optional `Podcreep.toml` configuration file.
///
/// - A missing file is not an error: all values fall back to CLI flags and
///   built-in defaults.
/// - A file that exists but does not parse is a hard error; silently ignoring
///   a typo-ridden config would be worse than failing.
pub fn load_optional(path: impl AsRef<Path>) -> Result<FileConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(FileConfig::default());
    }

    let contents = fs::read_to_string(path)?;
    let config: FileConfig = toml::from_str(&contents)?;

    Ok(config)
}
