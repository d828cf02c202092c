//! Routing rule management.
//!
//! Rules are evaluated top to bottom and the first match wins, so positions
//! matter. Positions on the command line start at 1.
//!
//! # Examples
//!
//! ```bash
//! # Open GitHub links in the "Work" profile
//! switchboard route add --contains github.com --profile Work
//!
//! # Show which profile a link would open in
//! switchboard route test https://github.com/org/repo
//!
//! # Give the third rule top priority
//! switchboard route move 3 1
//! ```

use crate::OutputFormat;
use crate::commands::{edit_config, to_index};
use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use switchboard_browser::ProfileCatalog;
use switchboard_core::{Condition, ConfigStore, Route, Router};

/// List rules in evaluation order
pub fn list(store: &ConfigStore, format: OutputFormat) -> Result<()> {
    let config = store.load_or_default();

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&config.routes)?);
        return Ok(());
    }

    use console::style;

    if config.routes.is_empty() {
        println!("No routes configured. Every link opens in '{}'.", config.default_profile);
        return Ok(());
    }

    println!("{}", style("Routes (first match wins):").bold());
    println!();
    for (index, route) in config.routes.iter().enumerate() {
        print_route(index, route);
    }
    println!();
    println!("  Default: {}", style(&config.default_profile).green());

    Ok(())
}

/// Append a rule; without an explicit profile the first discovered one is used
pub fn add(
    store: &ConfigStore,
    contains: Option<String>,
    exact: Option<String>,
    profile: Option<String>,
) -> Result<()> {
    let (condition, pattern) = match (contains, exact) {
        (_, Some(pattern)) => (Condition::Exact, pattern),
        (Some(pattern), None) => (Condition::Contains, pattern),
        (None, None) => anyhow::bail!("Either --contains or --exact is required"),
    };

    let profile = match profile {
        Some(profile) => profile,
        None => {
            let config = store.load_or_default();
            ProfileCatalog::for_platform()
                .discover(Path::new(&config.browser))
                .into_iter()
                .next()
                .map(|p| p.name)
                .unwrap_or(config.default_profile)
        }
    };

    let route = Route::new(condition, pattern, profile);
    let position = edit_config(store, |config| {
        config.add_route(route.clone());
        Ok(config.routes.len())
    })?;

    println!(
        "✅ Added route {}: {} '{}' → {}",
        position, route.condition, route.pattern, route.profile
    );
    Ok(())
}

/// Remove the rule at a 1-based position
pub fn remove(store: &ConfigStore, position: usize) -> Result<()> {
    let index = to_index(position)?;
    let removed = edit_config(store, |config| config.remove_route(index))?;

    println!(
        "✅ Removed route {}: {} '{}' → {}",
        position, removed.condition, removed.pattern, removed.profile
    );
    Ok(())
}

/// Move a rule so that it ends up at position `to`
pub fn move_route(store: &ConfigStore, from: usize, to: usize) -> Result<()> {
    let source = to_index(from)?;
    let target = to_index(to)?;
    edit_config(store, |config| config.move_route(source, target))?;

    println!("✅ Moved route {} to position {}", from, to);
    Ok(())
}

#[derive(Debug, Serialize)]
struct RouteTest {
    url: String,
    /// 1-based position of the matching rule
    rule: Option<usize>,
    profile: String,
    directory: String,
}

/// Show which rule and profile a URL resolves to, without launching anything
pub fn test(store: &ConfigStore, url: &str, format: OutputFormat) -> Result<()> {
    let config = store.load_or_default();
    let router = Router::new(&config);
    let matched = router.matching_route(url);
    let profile = router.route(url).to_string();
    let directory =
        ProfileCatalog::for_platform().profile_directory(&profile, Path::new(&config.browser));

    let result = RouteTest {
        url: url.to_string(),
        rule: matched.map(|(index, _)| index + 1),
        profile,
        directory,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Pretty => {
            match matched {
                Some((index, route)) => print_route(index, route),
                None => println!("  No route matched; using the default profile"),
            }
            println!("  Profile:   {}", result.profile);
            println!("  Directory: {}", result.directory);
        }
    }

    Ok(())
}

fn print_route(index: usize, route: &Route) {
    use console::style;

    println!(
        "  {:>2}. {:<8} {:<40} → {}",
        index + 1,
        route.condition.as_str(),
        route.pattern,
        style(&route.profile).green()
    );
}
