use crate::install::{InstallLayout, platform_layout};
use crate::{Error, Result};
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Arc;

/// Starts a browser install with a profile and a URL
#[derive(Clone)]
pub struct BrowserLauncher {
    layout: Arc<dyn InstallLayout>,
}

impl BrowserLauncher {
    pub fn new(layout: Arc<dyn InstallLayout>) -> Self {
        Self { layout }
    }

    pub fn for_platform() -> Self {
        Self::new(platform_layout())
    }

    /// Spawn the browser as an independent process; does not wait for it
    pub fn launch(&self, install: &Path, profile_directory: &str, url: &str) -> Result<()> {
        let executable = self.layout.executable(install)?;
        let args = Self::build_args(profile_directory, url);

        tracing::debug!("Launching {} {:?}", executable.display(), args);
        spawn_detached(executable.as_os_str(), &args)?;
        tracing::info!("Opened {} with profile '{}'", url, profile_directory);

        Ok(())
    }

    /// Browser command-line arguments: profile selector, then the URL
    pub fn build_args(profile_directory: &str, url: &str) -> Vec<String> {
        vec![
            format!("--profile-directory={}", profile_directory),
            url.to_string(),
        ]
    }
}

/// Spawn a process that outlives the caller. The child handle is dropped
/// without waiting.
pub(crate) fn spawn_detached<S: AsRef<OsStr>>(program: &OsStr, args: &[S]) -> Result<()> {
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }

    command.spawn().map(drop).map_err(|e| {
        Error::Launch(format!(
            "Failed to launch {}: {}",
            Path::new(program).display(),
            e
        ))
    })
}
