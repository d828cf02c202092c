use anyhow::Result;
use switchboard_browser::{Dispatcher, Outcome};
use switchboard_core::ConfigStore;

/// Dispatch one URL to its browser profile, then linger for the grace period
pub fn execute(store: ConfigStore, url: &str) -> Result<()> {
    tracing::debug!("Handling URL: {}", url);

    let dispatcher = Dispatcher::for_platform(store);

    match dispatcher.run(url)? {
        Outcome::Routed { profile, directory } => {
            tracing::info!("Routed {} to profile '{}' ({})", url, profile, directory);
        }
        Outcome::Fallback { stage, reason } => {
            tracing::info!("Opened {} with fallback after {} failed: {}", url, stage, reason);
        }
    }

    Ok(())
}
