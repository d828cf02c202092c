// Profile discovery, browser launching and URL dispatch

mod catalog;
mod dispatch;
mod error;
mod fallback;
mod install;
mod launcher;

pub use catalog::{Profile, ProfileCatalog, sort_profiles};
pub use dispatch::{Dispatcher, Launch, Outcome, ProfileResolver, Stage, TERMINATE_GRACE};
pub use error::{Error, Result};
pub use fallback::{FALLBACK_APP, fallback_command};
pub use install::{AppBundleLayout, DirectBinaryLayout, InstallLayout, platform_layout};
pub use launcher::BrowserLauncher;
