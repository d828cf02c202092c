use crate::OutputFormat;
use anyhow::Result;
use std::path::{Path, PathBuf};
use switchboard_browser::{Profile, ProfileCatalog};
use switchboard_core::ConfigStore;

/// List the profiles of the given browser, or of the configured one
pub fn execute(store: &ConfigStore, browser: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    let config = store.load_or_default();
    let browser = browser.unwrap_or_else(|| PathBuf::from(&config.browser));

    tracing::debug!("Discovering profiles for {}", browser.display());
    let profiles = ProfileCatalog::for_platform().discover(&browser);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&profiles)?),
        OutputFormat::Pretty => output_pretty(&browser, &profiles, &config.default_profile),
    }

    Ok(())
}

fn output_pretty(browser: &Path, profiles: &[Profile], default_profile: &str) {
    use console::style;

    println!("{}", style(format!("Profiles for {}", browser.display())).bold());
    println!();

    for profile in profiles {
        let marker = if profile.name == default_profile { "* " } else { "  " };
        println!("{}{:<24} {}", marker, profile.name, style(&profile.directory).dim());
    }
}
