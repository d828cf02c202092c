pub mod completion;
pub mod config;
pub mod open;
pub mod profiles;
pub mod route;

use anyhow::{Result, anyhow};
use std::path::PathBuf;
use switchboard_core::autosave::DEFAULT_QUIESCENCE;
use switchboard_core::{AutoSave, Config, ConfigStore};

/// Config store at the given path, or the per-user default location
pub fn open_store(path: Option<PathBuf>) -> Result<ConfigStore> {
    match path {
        Some(path) => Ok(ConfigStore::new(path)),
        None => Ok(ConfigStore::default_location()?),
    }
}

/// Apply one edit to the stored config through the debounced writer
///
/// The writer is flushed before returning, so a save failure is reported
/// here rather than lost. A config file that exists but cannot be read is
/// reported without touching it.
pub fn edit_config<T>(
    store: &ConfigStore,
    edit: impl FnOnce(&mut Config) -> switchboard_core::Result<T>,
) -> Result<T> {
    let initial = store.load_for_edit()?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let autosave = AutoSave::spawn(store.clone(), initial, DEFAULT_QUIESCENCE);
        let result = autosave.update(edit);

        if let Some(error) = autosave.shutdown().await {
            return Err(anyhow!("Failed to save config: {}", error));
        }

        Ok(result?)
    })
}

/// Convert a 1-based position from the command line to an index
pub(crate) fn to_index(position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| anyhow!("Route positions start at 1"))
}
