use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not resolve browser install {path}: {reason}")]
    InstallUnresolved { path: PathBuf, reason: String },

    #[error("Browser executable not found at: {0}")]
    ExecutableNotFound(PathBuf),

    #[error("Launch error: {0}")]
    Launch(String),

    #[error("Profile catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
