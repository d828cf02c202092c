pub mod autosave;
pub mod config;
pub mod error;
pub mod router;

pub use autosave::AutoSave;
pub use config::{Condition, Config, ConfigStore, Route};
pub use error::{Error, Result};
pub use router::Router;
