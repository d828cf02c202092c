use crate::OutputFormat;
use crate::commands::edit_config;
use anyhow::Result;
use std::path::Path;
use switchboard_browser::{ProfileCatalog, platform_layout};
use switchboard_core::{Config, ConfigStore};

/// Print the current config (built-in defaults when none is stored)
pub fn show(store: &ConfigStore, format: OutputFormat) -> Result<()> {
    let config = store.load_or_default();

    match format {
        OutputFormat::Json => print!("{}", ConfigStore::to_string(&config)?),
        OutputFormat::Pretty => output_pretty(store, &config),
    }

    Ok(())
}

/// Print the config file location
pub fn path(store: &ConfigStore) -> Result<()> {
    println!("{}", store.path().display());
    Ok(())
}

/// Change the browser install used for launching
pub fn set_browser(store: &ConfigStore, browser: &str) -> Result<()> {
    if let Err(e) = platform_layout().executable(Path::new(browser)) {
        println!("⚠️  {}", e);
    }

    edit_config(store, |config| config.set_browser(browser))?;
    println!("✅ Browser set to {}", browser);
    Ok(())
}

/// Change the profile used when no route matches
pub fn set_default(store: &ConfigStore, profile: &str) -> Result<()> {
    let browser = store.load_or_default().browser;
    let profiles = ProfileCatalog::for_platform().discover(Path::new(&browser));
    if !profiles.iter().any(|p| p.name == profile) {
        println!(
            "⚠️  No profile named '{}' in {}; it will be passed to the browser as a directory",
            profile, browser
        );
    }

    edit_config(store, |config| config.set_default_profile(profile))?;
    println!("✅ Default profile set to '{}'", profile);
    Ok(())
}

fn output_pretty(store: &ConfigStore, config: &Config) {
    use console::style;

    println!("{}", style("Switchboard Config").bold().cyan());
    println!("{}", style("==================").cyan());
    println!("  File:            {}", store.path().display());
    println!("  Browser:         {}", config.browser);
    println!("  Default profile: {}", config.default_profile);
    println!("  Routes:          {}", config.routes.len());
}
