//! End-to-end handling of one incoming URL.
//!
//! Loading -> Routing -> Resolving -> Launching -> Terminating. A failure in
//! Loading or Launching degrades to opening the URL with the fallback
//! application; nothing in this path is surfaced to the user.

use crate::catalog::ProfileCatalog;
use crate::launcher::BrowserLauncher;
use crate::{Error, Result, fallback};
use std::path::Path;
use std::time::Duration;
use switchboard_core::{ConfigStore, Router};
use url::Url;

/// Time the host process lingers so the spawned browser can detach
pub const TERMINATE_GRACE: Duration = Duration::from_millis(500);

/// Maps a profile display name to the directory the browser expects
pub trait ProfileResolver {
    fn profile_directory(&self, name: &str, browser: &Path) -> String;
}

impl ProfileResolver for ProfileCatalog {
    fn profile_directory(&self, name: &str, browser: &Path) -> String {
        ProfileCatalog::profile_directory(self, name, browser)
    }
}

/// Process launching used by the dispatcher
pub trait Launch {
    fn launch(&self, browser: &Path, profile_directory: &str, url: &str) -> Result<()>;

    /// Open the URL with the fixed fallback application, no profile
    fn open_fallback(&self, url: &str) -> Result<()>;
}

impl Launch for BrowserLauncher {
    fn launch(&self, browser: &Path, profile_directory: &str, url: &str) -> Result<()> {
        BrowserLauncher::launch(self, browser, profile_directory, url)
    }

    fn open_fallback(&self, url: &str) -> Result<()> {
        fallback::open_fallback(url)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loading,
    Routing,
    Resolving,
    Launching,
    Terminating,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Loading => "loading",
            Stage::Routing => "routing",
            Stage::Resolving => "resolving",
            Stage::Launching => "launching",
            Stage::Terminating => "terminating",
        };
        f.write_str(name)
    }
}

/// How a URL ended up being opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Opened in the configured browser with a resolved profile
    Routed { profile: String, directory: String },
    /// Opened with the fallback application after `stage` failed
    Fallback { stage: Stage, reason: String },
}

/// Coordinates config loading, routing, profile resolution and launching
pub struct Dispatcher<R, L> {
    store: ConfigStore,
    resolver: R,
    launcher: L,
    grace: Duration,
}

impl Dispatcher<ProfileCatalog, BrowserLauncher> {
    /// Dispatcher using the platform install layout
    pub fn for_platform(store: ConfigStore) -> Self {
        Self::new(
            store,
            ProfileCatalog::for_platform(),
            BrowserLauncher::for_platform(),
        )
    }
}

impl<R: ProfileResolver, L: Launch> Dispatcher<R, L> {
    pub fn new(store: ConfigStore, resolver: R, launcher: L) -> Self {
        Self {
            store,
            resolver,
            launcher,
            grace: TERMINATE_GRACE,
        }
    }

    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Dispatch the URL, then wait out the grace period before returning
    pub fn run(&self, url: &str) -> Result<Outcome> {
        let outcome = self.dispatch(url);

        tracing::debug!(stage = %Stage::Terminating, "Waiting {:?} before exit", self.grace);
        std::thread::sleep(self.grace);

        outcome
    }

    /// Open the URL in the profile selected by the routing config
    ///
    /// Only an unparseable URL, or a failure of the fallback launch itself,
    /// is returned as an error.
    pub fn dispatch(&self, url: &str) -> Result<Outcome> {
        Url::parse(url).map_err(|e| Error::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!(stage = %Stage::Loading, "Loading config");
        let config = match self.store.load() {
            Ok(config) => config,
            Err(e) => return self.fallback(url, Stage::Loading, e.to_string()),
        };

        tracing::debug!(stage = %Stage::Routing, "Routing {}", url);
        let profile = Router::new(&config).route(url).to_string();

        tracing::debug!(stage = %Stage::Resolving, "Resolving profile '{}'", profile);
        let browser = Path::new(&config.browser);
        let directory = self.resolver.profile_directory(&profile, browser);

        tracing::debug!(stage = %Stage::Launching, "Launching {}", browser.display());
        if let Err(e) = self.launcher.launch(browser, &directory, url) {
            return self.fallback(url, Stage::Launching, e.to_string());
        }

        Ok(Outcome::Routed { profile, directory })
    }

    fn fallback(&self, url: &str, stage: Stage, reason: String) -> Result<Outcome> {
        tracing::warn!("Dispatch failed while {}: {}; using fallback", stage, reason);
        self.launcher.open_fallback(url)?;
        Ok(Outcome::Fallback { stage, reason })
    }
}
