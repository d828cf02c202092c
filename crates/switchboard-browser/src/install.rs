use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Platform convention for turning a browser install path into the
/// executable to spawn and the location of its `Local State` document
pub trait InstallLayout: Send + Sync {
    /// Executable entry point for the install
    fn executable(&self, install: &Path) -> Result<PathBuf>;

    /// Path of the browser's own preference document
    fn local_state(&self, install: &Path) -> Result<PathBuf>;
}

/// Layout for the current platform
pub fn platform_layout() -> Arc<dyn InstallLayout> {
    #[cfg(target_os = "macos")]
    return Arc::new(AppBundleLayout::new());

    #[cfg(not(target_os = "macos"))]
    return Arc::new(DirectBinaryLayout::new());
}

/// macOS `.app` bundles: `Foo.app/Contents/MacOS/Foo`, with preferences under
/// `~/Library/Application Support/<bundle identifier>/Local State`
#[derive(Debug, Clone)]
pub struct AppBundleLayout {
    support_dir: Option<PathBuf>,
}

impl AppBundleLayout {
    pub fn new() -> Self {
        let support_dir =
            dirs::home_dir().map(|home| home.join("Library").join("Application Support"));
        Self { support_dir }
    }

    /// Use a custom application support directory
    pub fn with_support_dir(support_dir: PathBuf) -> Self {
        Self {
            support_dir: Some(support_dir),
        }
    }

    /// Read `CFBundleIdentifier` from the bundle's Info.plist
    pub fn bundle_identifier(&self, install: &Path) -> Result<String> {
        let plist_path = install.join("Contents").join("Info.plist");
        let plist = plist::Value::from_file(&plist_path)
            .map_err(|e| unresolved(install, format!("unreadable Info.plist: {}", e)))?;

        plist
            .as_dictionary()
            .and_then(|dict| dict.get("CFBundleIdentifier"))
            .and_then(|value| value.as_string())
            .map(|id| id.to_string())
            .ok_or_else(|| unresolved(install, "Info.plist has no CFBundleIdentifier"))
    }
}

impl Default for AppBundleLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl InstallLayout for AppBundleLayout {
    fn executable(&self, install: &Path) -> Result<PathBuf> {
        let app_name = install
            .file_stem()
            .ok_or_else(|| unresolved(install, "bundle path has no name"))?;

        let executable = install.join("Contents").join("MacOS").join(app_name);
        validate_executable(&executable)
    }

    fn local_state(&self, install: &Path) -> Result<PathBuf> {
        let bundle_id = self.bundle_identifier(install)?;
        let support_dir = self
            .support_dir
            .as_ref()
            .ok_or_else(|| unresolved(install, "could not determine home directory"))?;

        Ok(support_dir.join(bundle_id).join("Local State"))
    }
}

/// Known Chromium-family binaries and their user data directories,
/// relative to the platform data root
const USER_DATA_DIRS: &[(&str, &str)] = &[
    ("google-chrome", "google-chrome"),
    ("google-chrome-stable", "google-chrome"),
    ("google-chrome-beta", "google-chrome-beta"),
    ("google-chrome-unstable", "google-chrome-unstable"),
    ("chromium", "chromium"),
    ("chromium-browser", "chromium"),
    ("brave", "BraveSoftware/Brave-Browser"),
    ("brave-browser", "BraveSoftware/Brave-Browser"),
    ("microsoft-edge", "microsoft-edge"),
    ("microsoft-edge-stable", "microsoft-edge"),
    ("vivaldi", "vivaldi"),
    ("vivaldi-stable", "vivaldi"),
    ("opera", "opera"),
    ("helium", "net.imput.helium"),
];

/// Vendor binaries whose data directory differs per platform
/// (`/opt/google/chrome/chrome` on Linux, `chrome.exe` on Windows)
#[cfg(windows)]
const VENDOR_USER_DATA_DIRS: &[(&str, &str)] = &[
    ("chrome", "Google/Chrome/User Data"),
    ("msedge", "Microsoft/Edge/User Data"),
    ("brave", "BraveSoftware/Brave-Browser/User Data"),
];

#[cfg(not(windows))]
const VENDOR_USER_DATA_DIRS: &[(&str, &str)] = &[
    ("chrome", "google-chrome"),
    ("msedge", "microsoft-edge"),
];

/// Plain executables (Linux, Windows): the install path is the binary itself
#[derive(Debug, Clone)]
pub struct DirectBinaryLayout {
    data_root: Option<PathBuf>,
}

impl DirectBinaryLayout {
    pub fn new() -> Self {
        #[cfg(windows)]
        let data_root = dirs::data_local_dir();
        #[cfg(not(windows))]
        let data_root = dirs::config_dir();

        Self { data_root }
    }

    /// Use a custom root for browser user data directories
    pub fn with_data_root(data_root: PathBuf) -> Self {
        Self {
            data_root: Some(data_root),
        }
    }

    fn user_data_dir(install: &Path) -> Option<&'static str> {
        let name = install.file_stem()?.to_str()?.to_lowercase();
        VENDOR_USER_DATA_DIRS
            .iter()
            .chain(USER_DATA_DIRS)
            .find(|(binary, _)| *binary == name)
            .map(|(_, dir)| *dir)
    }
}

impl Default for DirectBinaryLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl InstallLayout for DirectBinaryLayout {
    fn executable(&self, install: &Path) -> Result<PathBuf> {
        validate_executable(install)
    }

    fn local_state(&self, install: &Path) -> Result<PathBuf> {
        let user_data = Self::user_data_dir(install)
            .ok_or_else(|| unresolved(install, "not a known Chromium-family browser"))?;
        let data_root = self
            .data_root
            .as_ref()
            .ok_or_else(|| unresolved(install, "could not determine data directory"))?;

        Ok(data_root.join(user_data).join("Local State"))
    }
}

/// Validate that a path exists and is executable
fn validate_executable(path: &Path) -> Result<PathBuf> {
    if !path.is_file() {
        return Err(Error::ExecutableNotFound(path.to_path_buf()));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let metadata = std::fs::metadata(path)?;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err(Error::Launch(format!(
                "Browser binary not executable: {}",
                path.display()
            )));
        }
    }

    Ok(path.to_path_buf())
}

fn unresolved(install: &Path, reason: impl Into<String>) -> Error {
    Error::InstallUnresolved {
        path: install.to_path_buf(),
        reason: reason.into(),
    }
}
