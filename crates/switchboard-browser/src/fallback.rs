use crate::Result;
use crate::launcher::spawn_detached;
use std::ffi::OsStr;

/// Application used when no configured browser can be launched
pub const FALLBACK_APP: &str = "Helium";

/// Command that opens a URL without any profile selection
pub fn fallback_command(url: &str) -> (&'static str, Vec<String>) {
    #[cfg(target_os = "macos")]
    return (
        "/usr/bin/open",
        vec!["-a".to_string(), FALLBACK_APP.to_string(), url.to_string()],
    );

    #[cfg(windows)]
    return (
        "cmd",
        vec![
            "/C".to_string(),
            "start".to_string(),
            String::new(),
            url.to_string(),
        ],
    );

    #[cfg(not(any(target_os = "macos", windows)))]
    return ("xdg-open", vec![url.to_string()]);
}

/// Open the URL with the fixed fallback application
pub(crate) fn open_fallback(url: &str) -> Result<()> {
    let (program, args) = fallback_command(url);
    tracing::debug!("Fallback launch: {} {:?}", program, args);
    spawn_detached(OsStr::new(program), &args)?;
    tracing::info!("Opened {} with fallback application", url);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_passes_raw_url_last() {
        let (_, args) = fallback_command("https://Example.com/Path");
        assert_eq!(args.last().unwrap(), "https://Example.com/Path");
        assert!(!args.iter().any(|a| a.starts_with("--profile-directory")));
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn test_fallback_uses_fixed_application() {
        let (program, args) = fallback_command("https://example.com");
        assert_eq!(program, "/usr/bin/open");
        assert_eq!(args[..2], ["-a".to_string(), FALLBACK_APP.to_string()]);
    }
}
