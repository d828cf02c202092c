//! Routing configuration: the document model and its on-disk store.

mod store;
mod types;

pub use store::ConfigStore;
pub use types::{Condition, Config, DEFAULT_PROFILE, FALLBACK_BROWSER, Route};
