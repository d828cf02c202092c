//! Debounced persistence for an interactively edited [`Config`].
//!
//! Every edit notifies a writer task through a `watch` channel. The writer
//! waits until no further edit has arrived for the quiescence window and then
//! saves the newest snapshot, so a burst of edits results in a single write.

use crate::config::{Config, ConfigStore};
use crate::Result;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const DEFAULT_QUIESCENCE: Duration = Duration::from_millis(500);

/// Observable config holder with a debounced background writer
pub struct AutoSave {
    config_tx: watch::Sender<Config>,
    error_rx: watch::Receiver<Option<String>>,
    writer: JoinHandle<()>,
}

impl AutoSave {
    /// Start the writer task. Must be called from within a tokio runtime.
    pub fn spawn(store: ConfigStore, initial: Config, quiescence: Duration) -> Self {
        let (config_tx, config_rx) = watch::channel(initial);
        let (error_tx, error_rx) = watch::channel(None);

        let writer = tokio::spawn(run_writer(store, config_rx, error_tx, quiescence));

        Self {
            config_tx,
            error_rx,
            writer,
        }
    }

    /// Snapshot of the in-memory config
    pub fn current(&self) -> Config {
        self.config_tx.borrow().clone()
    }

    /// Apply an edit. A failed edit leaves the config untouched, and an edit
    /// that changes nothing does not schedule a save.
    pub fn update<T>(&self, edit: impl FnOnce(&mut Config) -> Result<T>) -> Result<T> {
        let mut draft = self.current();
        let value = edit(&mut draft)?;

        self.config_tx.send_if_modified(|config| {
            if *config == draft {
                false
            } else {
                *config = draft;
                true
            }
        });

        Ok(value)
    }

    /// Error from the most recent save, cleared by the next successful one
    pub fn last_error(&self) -> Option<String> {
        self.error_rx.borrow().clone()
    }

    /// Flush any pending edit, stop the writer and return the final save error
    pub async fn shutdown(self) -> Option<String> {
        let Self {
            config_tx,
            error_rx,
            writer,
        } = self;

        drop(config_tx);
        if let Err(e) = writer.await {
            tracing::warn!("Config writer task failed: {}", e);
        }

        error_rx.borrow().clone()
    }
}

async fn run_writer(
    store: ConfigStore,
    mut config_rx: watch::Receiver<Config>,
    error_tx: watch::Sender<Option<String>>,
    quiescence: Duration,
) {
    while config_rx.changed().await.is_ok() {
        // Restart the window on every change; a closed channel flushes immediately
        let mut closed = false;
        loop {
            tokio::select! {
                changed = config_rx.changed() => {
                    if changed.is_err() {
                        closed = true;
                        break;
                    }
                }
                _ = tokio::time::sleep(quiescence) => break,
            }
        }

        let snapshot = config_rx.borrow_and_update().clone();
        let task_store = store.clone();
        let outcome = tokio::task::spawn_blocking(move || task_store.save(&snapshot)).await;

        let error = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(e) => Some(format!("Config save task failed: {}", e)),
        };
        if let Some(message) = &error {
            tracing::warn!("Auto-save failed: {}", message);
        }
        error_tx.send_replace(error);

        if closed {
            break;
        }
    }

    tracing::debug!("Config writer stopped");
}
