use anyhow::Result;
use clap::{ArgGroup, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use switchboard_cli::{OutputFormat, commands};

#[derive(Parser)]
#[command(name = "switchboard")]
#[command(
    author,
    version,
    about = "Open links in the right Chromium browser profile",
    long_about = "Switchboard is a default-browser handler: every link it receives is matched \
                  against your routing rules and opened in the selected profile of a \
                  Chromium-family browser."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// URL to open, as delivered by the system URL handler
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (pretty, json)
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: OutputFormat,

    /// Path to the routing config file
    #[arg(long, global = true, env = "SWITCHBOARD_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a URL in the profile selected by the routing rules
    Open {
        /// URL to open
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Manage routing rules
    Route {
        #[command(subcommand)]
        command: RouteCommands,
    },

    /// List the profiles of a Chromium-family browser
    Profiles {
        /// Browser install to inspect (defaults to the configured browser)
        #[arg(long, value_name = "PATH")]
        browser: Option<PathBuf>,
    },

    /// Show or change the routing config
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completion scripts
    #[command(long_about = "Generate shell completion scripts for switchboard.

SUPPORTED SHELLS:
  bash, zsh, fish, powershell, elvish

INSTALLATION:
  bash:  switchboard completion --shell bash > ~/.local/share/bash-completion/completions/switchboard
  zsh:   switchboard completion --shell zsh > ~/.zfunc/_switchboard
  fish:  switchboard completion --shell fish > ~/.config/fish/completions/switchboard.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum RouteCommands {
    /// List routing rules in evaluation order
    List,

    /// Add a routing rule after the existing ones
    #[command(group(ArgGroup::new("pattern").required(true).args(["contains", "exact"])))]
    Add {
        /// Match URLs containing this text (case-insensitive)
        #[arg(long, value_name = "TEXT")]
        contains: Option<String>,

        /// Match URLs equal to this text (case-insensitive)
        #[arg(long, value_name = "URL")]
        exact: Option<String>,

        /// Profile name to open matching URLs in
        #[arg(long)]
        profile: Option<String>,
    },

    /// Remove the routing rule at a position
    Remove {
        /// Position of the rule, starting at 1
        #[arg(value_name = "POSITION")]
        position: usize,
    },

    /// Move a routing rule to a new position
    Move {
        /// Current position of the rule
        #[arg(value_name = "FROM")]
        from: usize,

        /// Position the rule should end up at
        #[arg(value_name = "TO")]
        to: usize,
    },

    /// Show which profile a URL would open in, without opening it
    Test {
        /// URL to check
        #[arg(value_name = "URL")]
        url: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the current config
    Show,

    /// Print the config file location
    Path,

    /// Set the browser install to launch
    SetBrowser {
        /// Browser install path (an .app bundle on macOS, a binary elsewhere)
        #[arg(value_name = "PATH")]
        path: String,
    },

    /// Set the profile used when no rule matches
    SetDefault {
        /// Profile name
        #[arg(value_name = "PROFILE")]
        profile: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let store = commands::open_store(cli.config)?;
    let format = cli.format;

    // Execute the command
    match (cli.command, cli.url) {
        (Some(Commands::Open { url }), _) | (None, Some(url)) => {
            commands::open::execute(store, &url)
        }
        (Some(Commands::Route { command }), _) => match command {
            RouteCommands::List => commands::route::list(&store, format),
            RouteCommands::Add {
                contains,
                exact,
                profile,
            } => commands::route::add(&store, contains, exact, profile),
            RouteCommands::Remove { position } => commands::route::remove(&store, position),
            RouteCommands::Move { from, to } => commands::route::move_route(&store, from, to),
            RouteCommands::Test { url } => commands::route::test(&store, &url, format),
        },
        (Some(Commands::Profiles { browser }), _) => {
            commands::profiles::execute(&store, browser, format)
        }
        (Some(Commands::Config { command }), _) => match command {
            ConfigCommands::Show => commands::config::show(&store, format),
            ConfigCommands::Path => commands::config::path(&store),
            ConfigCommands::SetBrowser { path } => commands::config::set_browser(&store, &path),
            ConfigCommands::SetDefault { profile } => {
                commands::config::set_default(&store, &profile)
            }
        },
        (Some(Commands::Completion { shell }), _) => {
            commands::completion::execute(shell, &mut Cli::command())
        }
        // Launched without a link: show what links would be routed with
        (None, None) => commands::route::list(&store, format),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("switchboard=debug,switchboard_core=debug,switchboard_browser=debug")
    } else {
        EnvFilter::new("switchboard=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
