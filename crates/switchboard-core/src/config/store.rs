use super::types::Config;
use crate::{Error, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Reads and writes the routing configuration document
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Create a store backed by an explicit file path
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the canonical per-user location, `~/.config/switchboard/config.json`
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(Error::NoConfigDir)?;
        Ok(home.join(".config").join("switchboard").join("config.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and validate the config document
    pub fn load(&self) -> Result<Config> {
        tracing::debug!("Reading config from: {}", self.path.display());

        let content = fs::read_to_string(&self.path).map_err(|e| self.unreadable(e))?;
        let config = Self::from_str(&content).map_err(|e| self.unreadable(e))?;

        tracing::debug!(
            "Loaded config with {} routes for browser {}",
            config.routes.len(),
            config.browser
        );

        Ok(config)
    }

    /// Load the config, falling back to built-in defaults on any failure
    pub fn load_or_default(&self) -> Config {
        match self.load() {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("Using default config: {}", e);
                Config::default()
            }
        }
    }

    /// Load the config as the base for an edit. Only a missing file falls
    /// back to defaults; a file that exists but is unreadable is an error,
    /// so an edit never replaces it.
    pub fn load_for_edit(&self) -> Result<Config> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Self::from_str(&content).map_err(|e| self.unreadable(e)),
            Err(e) if matches!(
                e.kind(),
                io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
            ) =>
            {
                tracing::debug!("No config at {}, starting from defaults", self.path.display());
                Ok(Config::default())
            }
            Err(e) => Err(self.unreadable(e)),
        }
    }

    /// Atomically write the config, creating parent directories as needed
    pub fn save(&self, config: &Config) -> Result<()> {
        tracing::debug!("Writing config to: {}", self.path.display());

        let json = Self::to_string(config)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        fs::create_dir_all(dir).map_err(|e| self.write_error(e))?;

        let mut temp = NamedTempFile::new_in(dir).map_err(|e| self.write_error(e))?;
        temp.write_all(json.as_bytes())
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| self.write_error(e))?;

        // Temp files are created 0600: keep the existing mode, 0644 for a new file
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::metadata(&self.path)
                .map(|metadata| metadata.permissions())
                .unwrap_or_else(|_| fs::Permissions::from_mode(0o644));
            temp.as_file()
                .set_permissions(permissions)
                .map_err(|e| self.write_error(e))?;
        }

        temp.persist(&self.path)
            .map_err(|e| self.write_error(e.error))?;

        tracing::info!(
            "Saved config with {} routes to {}",
            config.routes.len(),
            self.path.display()
        );

        Ok(())
    }

    /// Parse and validate a config document
    pub fn from_str(content: &str) -> Result<Config> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize with sorted keys and pretty formatting
    pub fn to_string(config: &Config) -> Result<String> {
        // serde_json::Value keeps object keys in sorted order
        let value = serde_json::to_value(config)?;
        let mut json = serde_json::to_string_pretty(&value)?;
        json.push('\n');
        Ok(json)
    }

    fn unreadable(&self, reason: impl std::fmt::Display) -> Error {
        Error::ConfigUnreadable {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }

    fn write_error(&self, source: io::Error) -> Error {
        Error::ConfigWrite {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Route};

    fn store_in(dir: &Path) -> ConfigStore {
        ConfigStore::new(dir.join("switchboard").join("config.json"))
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = store_in(temp_dir.path());

        let config = Config {
            browser: "/Applications/Brave Browser.app".to_string(),
            default_profile: "Persönlich".to_string(),
            routes: vec![
                Route::contains("github.com", "Work"),
                Route::exact("https://news.ycombinator.com/", "Zeit 🕐"),
                Route::contains("GitHub.com/Personal", "Persönlich"),
            ],
        };

        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn test_round_trip_with_no_routes() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = store_in(temp_dir.path());

        let config = Config::default();
        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn test_save_writes_sorted_keys() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = store_in(temp_dir.path());

        let mut config = Config::default();
        config.add_route(Route::contains("github.com", "Work"));
        store.save(&config).unwrap();

        let written = fs::read_to_string(store.path()).unwrap();
        let browser = written.find("\"browser\"").unwrap();
        let default_profile = written.find("\"defaultProfile\"").unwrap();
        let routes = written.find("\"routes\"").unwrap();
        assert!(browser < default_profile && default_profile < routes);

        let condition = written.find("\"condition\"").unwrap();
        let profile = written.find("\"profile\"").unwrap();
        let value = written.find("\"value\"").unwrap();
        assert!(condition < profile && profile < value);
        assert!(written.contains("\n  "));
    }

    #[test]
    fn test_save_overwrites_existing_document() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = store_in(temp_dir.path());

        let mut config = Config::default();
        store.save(&config).unwrap();
        config.add_route(Route::contains("example.org", "Other"));
        store.save(&config).unwrap();

        assert_eq!(store.load().unwrap().routes.len(), 1);
        let leftovers: Vec<_> = fs::read_dir(store.path().parent().unwrap())
            .unwrap()
            .collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn test_load_missing_file_is_unreadable() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = store_in(temp_dir.path());

        let err = store.load().unwrap_err();
        assert!(matches!(err, Error::ConfigUnreadable { .. }));
    }

    #[test]
    fn test_load_malformed_json_is_unreadable() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ \"browser\": ").unwrap();

        let err = ConfigStore::new(path).load().unwrap_err();
        assert!(matches!(err, Error::ConfigUnreadable { .. }));
    }

    #[test]
    fn test_load_wrong_field_type_is_unreadable() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"browser": 42, "defaultProfile": "Default", "routes": []}"#,
        )
        .unwrap();

        assert!(ConfigStore::new(path).load().is_err());
    }

    #[test]
    fn test_load_missing_routes_is_unreadable() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"browser": "/Apps/X.app", "defaultProfile": "Default"}"#).unwrap();

        assert!(ConfigStore::new(path).load().is_err());
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = store_in(temp_dir.path());

        let config = store.load_or_default();
        assert_eq!(config, Config::default());
        assert_eq!(config.default_profile, "Default");
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_load_for_edit_on_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = store_in(temp_dir.path());

        assert_eq!(store.load_for_edit().unwrap(), Config::default());
    }

    #[test]
    fn test_load_for_edit_rejects_malformed_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        let content = r#"{"browser": "/Apps/X.app", "defaultProfile": "Work", "routes": [],}"#;
        fs::write(&path, content).unwrap();

        let err = ConfigStore::new(path.clone()).load_for_edit().unwrap_err();
        assert!(matches!(err, Error::ConfigUnreadable { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_creates_world_readable_file() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let store = store_in(temp_dir.path());
        store.save(&Config::default()).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let store = store_in(temp_dir.path());
        store.save(&Config::default()).unwrap();
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o640)).unwrap();

        let mut config = Config::default();
        config.add_route(Route::contains("example.org", "Other"));
        store.save(&config).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[test]
    fn test_save_to_unwritable_location_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let store = ConfigStore::new(blocker.join("config.json"));
        let err = store.save(&Config::default()).unwrap_err();
        assert!(matches!(err, Error::ConfigWrite { .. }));
    }
}
