// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DevToolsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Command `{program}` exited with status {code}")]
    CommandFailed { program: String, code: i32 },

    #[error("Malformed properties file: {0}")]
    Properties(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, DevToolsError>;
