use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Config unreadable at {path}: {reason}")]
    ConfigUnreadable { path: PathBuf, reason: String },

    #[error("Failed to write config to {path}: {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not determine home directory for config")]
    NoConfigDir,

    #[error("Route index {index} out of range ({len} routes)")]
    RouteIndex { index: usize, len: usize },

    #[error("Invalid config value: {0}")]
    InvalidValue(String),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
