use crate::install::{InstallLayout, platform_layout};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use switchboard_core::config::DEFAULT_PROFILE;

/// A browser profile: what a human calls it and what the launch flag expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub name: String,
    pub directory: String,
}

impl Profile {
    /// Stand-in used when the real catalog cannot be read
    pub fn synthetic_default() -> Self {
        Self {
            name: DEFAULT_PROFILE.to_string(),
            directory: DEFAULT_PROFILE.to_string(),
        }
    }
}

// Strict view of the browser's `Local State`. Unknown fields and a missing
// `profile` section are tolerated; any type mismatch fails the whole decode.
#[derive(Deserialize)]
struct LocalState {
    profile: Option<ProfileSection>,
}

#[derive(Deserialize)]
struct ProfileSection {
    #[serde(default)]
    info_cache: BTreeMap<String, ProfileInfo>,
}

#[derive(Deserialize)]
struct ProfileInfo {
    name: Option<String>,
}

/// Reads the profile table a Chromium-family browser keeps in its `Local State`
#[derive(Clone)]
pub struct ProfileCatalog {
    layout: Arc<dyn InstallLayout>,
}

impl ProfileCatalog {
    pub fn new(layout: Arc<dyn InstallLayout>) -> Self {
        Self { layout }
    }

    pub fn for_platform() -> Self {
        Self::new(platform_layout())
    }

    /// Profiles of the install, sorted; never empty
    pub fn discover(&self, browser: &Path) -> Vec<Profile> {
        match self.read_profiles(browser) {
            Ok(profiles) if !profiles.is_empty() => profiles,
            Ok(_) => {
                tracing::debug!("No profiles listed for {}", browser.display());
                vec![Profile::synthetic_default()]
            }
            Err(e) => {
                tracing::debug!("{}", e);
                vec![Profile::synthetic_default()]
            }
        }
    }

    /// Directory for a profile display name, or the name itself when no
    /// profile carries that name
    pub fn profile_directory(&self, name: &str, browser: &Path) -> String {
        let profiles = match self.read_profiles(browser) {
            Ok(profiles) => profiles,
            Err(e) => {
                tracing::debug!("Using '{}' as profile directory: {}", name, e);
                return name.to_string();
            }
        };

        match profiles.into_iter().find(|profile| profile.name == name) {
            Some(profile) => profile.directory,
            None => {
                tracing::debug!("No profile named '{}', using it as directory", name);
                name.to_string()
            }
        }
    }

    /// Read and sort the profile table, failing when it is unavailable
    pub fn read_profiles(&self, browser: &Path) -> Result<Vec<Profile>> {
        let local_state = self
            .layout
            .local_state(browser)
            .map_err(|e| Error::CatalogUnavailable(e.to_string()))?;

        tracing::debug!("Reading profiles from: {}", local_state.display());

        let content = std::fs::read_to_string(&local_state).map_err(|e| {
            Error::CatalogUnavailable(format!("{}: {}", local_state.display(), e))
        })?;

        let mut profiles = parse_local_state(&content)?;
        sort_profiles(&mut profiles);

        tracing::debug!("Found {} profiles", profiles.len());

        Ok(profiles)
    }
}

fn parse_local_state(content: &str) -> Result<Vec<Profile>> {
    let state: LocalState = serde_json::from_str(content)
        .map_err(|e| Error::CatalogUnavailable(format!("malformed Local State: {}", e)))?;

    let info_cache = state.profile.map(|p| p.info_cache).unwrap_or_default();

    Ok(info_cache
        .into_iter()
        .filter_map(|(directory, info)| info.name.map(|name| Profile { name, directory }))
        .collect())
}

/// `Default` directory first, then by name in natural, case-insensitive order
pub fn sort_profiles(profiles: &mut [Profile]) {
    profiles.sort_by(|lhs, rhs| {
        let lhs_default = lhs.directory == DEFAULT_PROFILE;
        let rhs_default = rhs.directory == DEFAULT_PROFILE;

        rhs_default
            .cmp(&lhs_default)
            .then_with(|| natural_cmp(&lhs.name, &rhs.name))
            .then_with(|| lhs.name.cmp(&rhs.name))
            .then_with(|| lhs.directory.cmp(&rhs.directory))
    });
}

/// Case-insensitive comparison that orders digit runs by numeric value,
/// so "Profile 2" sorts before "Profile 10"
fn natural_cmp(lhs: &str, rhs: &str) -> Ordering {
    let lhs = lhs.to_lowercase();
    let rhs = rhs.to_lowercase();
    let mut lhs_chars = lhs.chars().peekable();
    let mut rhs_chars = rhs.chars().peekable();

    loop {
        match (lhs_chars.peek().copied(), rhs_chars.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_digits = take_digits(&mut lhs_chars);
                let r_digits = take_digits(&mut rhs_chars);
                let ordering = compare_digit_runs(&l_digits, &r_digits);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(l), Some(r)) => {
                if l != r {
                    return l.cmp(&r);
                }
                lhs_chars.next();
                rhs_chars.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
        digits.push(c);
        chars.next();
    }
    digits
}

fn compare_digit_runs(lhs: &str, rhs: &str) -> Ordering {
    let lhs = lhs.trim_start_matches('0');
    let rhs = rhs.trim_start_matches('0');
    lhs.len().cmp(&rhs.len()).then_with(|| lhs.cmp(rhs))
}
