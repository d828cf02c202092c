use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Profile name used when nothing else is configured.
pub const DEFAULT_PROFILE: &str = "Default";

/// Browser install used when no config document exists.
#[cfg(target_os = "macos")]
pub const FALLBACK_BROWSER: &str = "/Applications/Helium.app";
#[cfg(not(target_os = "macos"))]
pub const FALLBACK_BROWSER: &str = "/usr/bin/chromium";

/// How a route's pattern is compared against a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    /// URL contains the pattern as a substring
    Contains,
    /// URL equals the pattern
    Exact,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Contains => "contains",
            Condition::Exact => "exact",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single routing rule pairing a URL pattern with a target profile name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RouteRepr")]
pub struct Route {
    pub condition: Condition,
    #[serde(rename = "value")]
    pub pattern: String,
    pub profile: String,
}

impl Route {
    pub fn new(condition: Condition, pattern: impl Into<String>, profile: impl Into<String>) -> Self {
        Self {
            condition,
            pattern: pattern.into(),
            profile: profile.into(),
        }
    }

    pub fn contains(pattern: impl Into<String>, profile: impl Into<String>) -> Self {
        Self::new(Condition::Contains, pattern, profile)
    }

    pub fn exact(pattern: impl Into<String>, profile: impl Into<String>) -> Self {
        Self::new(Condition::Exact, pattern, profile)
    }
}

/// On-disk route shapes. Early documents stored only a `contains` string;
/// those are migrated to a `Contains` route on read.
#[derive(Deserialize)]
#[serde(untagged)]
enum RouteRepr {
    Current {
        condition: Condition,
        value: String,
        profile: String,
    },
    Legacy {
        contains: String,
        profile: String,
    },
}

impl From<RouteRepr> for Route {
    fn from(repr: RouteRepr) -> Self {
        match repr {
            RouteRepr::Current {
                condition,
                value,
                profile,
            } => Route::new(condition, value, profile),
            RouteRepr::Legacy { contains, profile } => {
                tracing::debug!("Migrating legacy route for pattern '{}'", contains);
                Route::contains(contains, profile)
            }
        }
    }
}

/// The routing configuration document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Install path of the Chromium-family browser to launch
    pub browser: String,
    /// Profile used when no route matches
    pub default_profile: String,
    /// Ordered routes; the first match wins
    pub routes: Vec<Route>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser: FALLBACK_BROWSER.to_string(),
            default_profile: DEFAULT_PROFILE.to_string(),
            routes: Vec::new(),
        }
    }
}

impl Config {
    /// Check invariants serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.browser.trim().is_empty() {
            return Err(Error::InvalidValue("browser must not be empty".to_string()));
        }
        if self.default_profile.trim().is_empty() {
            return Err(Error::InvalidValue(
                "defaultProfile must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn add_route(&mut self, route: Route) {
        self.routes.push(route);
    }

    pub fn remove_route(&mut self, index: usize) -> Result<Route> {
        self.check_index(index)?;
        Ok(self.routes.remove(index))
    }

    /// Move the route at `from` so that it ends up at position `to`
    pub fn move_route(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        let route = self.routes.remove(from);
        self.routes.insert(to, route);
        Ok(())
    }

    pub fn set_browser(&mut self, browser: impl Into<String>) -> Result<()> {
        let browser = browser.into();
        if browser.trim().is_empty() {
            return Err(Error::InvalidValue("browser must not be empty".to_string()));
        }
        self.browser = browser;
        Ok(())
    }

    pub fn set_default_profile(&mut self, profile: impl Into<String>) -> Result<()> {
        let profile = profile.into();
        if profile.trim().is_empty() {
            return Err(Error::InvalidValue(
                "default profile must not be empty".to_string(),
            ));
        }
        self.default_profile = profile;
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.routes.len() {
            return Err(Error::RouteIndex {
                index,
                len: self.routes.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            browser: "/Apps/X.app".to_string(),
            default_profile: "Default".to_string(),
            routes: vec![
                Route::contains("github.com", "Work"),
                Route::exact("https://mail.example.com/", "Personal"),
                Route::contains("youtube", "Fun"),
            ],
        }
    }

    #[test]
    fn test_decodes_current_route_shape() {
        let json = r#"{
            "browser": "/Apps/X.app",
            "defaultProfile": "Default",
            "routes": [{"condition": "exact", "value": "https://a.com", "profile": "A"}]
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.routes, vec![Route::exact("https://a.com", "A")]);
    }

    #[test]
    fn test_migrates_legacy_contains_route() {
        let json = r#"{
            "browser": "/Apps/X.app",
            "defaultProfile": "Default",
            "routes": [{"contains": "github.com", "profile": "Work"}]
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.routes, vec![Route::contains("github.com", "Work")]);

        let written = serde_json::to_value(&config).unwrap();
        assert_eq!(written["routes"][0]["condition"], "contains");
        assert_eq!(written["routes"][0]["value"], "github.com");
        assert!(written["routes"][0].get("contains").is_none());
    }

    #[test]
    fn test_ignores_unknown_fields() {
        let json = r#"{
            "browser": "/Apps/X.app",
            "defaultProfile": "Default",
            "theme": "dark",
            "routes": []
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_rejects_unknown_condition() {
        let json = r#"{
            "browser": "/Apps/X.app",
            "defaultProfile": "Default",
            "routes": [{"condition": "regex", "value": ".*", "profile": "A"}]
        }"#;
        assert!(serde_json::from_str::<Config>(json).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_default_profile() {
        let mut config = sample();
        config.default_profile = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_move_route_to_front() {
        let mut config = sample();
        config.move_route(2, 0).unwrap();
        let profiles: Vec<_> = config.routes.iter().map(|r| r.profile.as_str()).collect();
        assert_eq!(profiles, vec!["Fun", "Work", "Personal"]);
    }

    #[test]
    fn test_move_route_to_back() {
        let mut config = sample();
        config.move_route(0, 2).unwrap();
        let profiles: Vec<_> = config.routes.iter().map(|r| r.profile.as_str()).collect();
        assert_eq!(profiles, vec!["Personal", "Fun", "Work"]);
    }

    #[test]
    fn test_remove_route_out_of_range() {
        let mut config = sample();
        let err = config.remove_route(3).unwrap_err();
        assert!(matches!(err, Error::RouteIndex { index: 3, len: 3 }));
        assert_eq!(config.routes.len(), 3);
    }

    #[test]
    fn test_set_default_profile_rejects_empty() {
        let mut config = sample();
        assert!(config.set_default_profile("").is_err());
        assert_eq!(config.default_profile, "Default");
    }
}
