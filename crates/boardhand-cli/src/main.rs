//! boardhand CLI - moves project board cards in response to repository events.
//!
//! Runs as a workflow step: inputs arrive as `INPUT_*` environment variables
//! and the triggering event as `GITHUB_EVENT_NAME` / `GITHUB_EVENT_PATH`.

use std::path::PathBuf;
use std::time::Instant;

use boardhand_core::config::{
    non_empty, parse_column_list, parse_column_mapping, parse_project_number,
};
use boardhand_core::{Error, Event, Outcome, Result, Router, Settings};
use boardhand_github::{GitHubBoardClient, DEFAULT_GITHUB_URL};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "boardhand")]
#[command(author, version, about = "boardhand - project board automation", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, env = "RUNNER_DEBUG")]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle the triggering event and update the board
    Run(RunArgs),

    /// Manage the configuration file
    Config {
        /// Config file (defaults to the platform config dir)
        #[arg(long, global = true)]
        file: Option<PathBuf>,

        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Print the config file location
    Path,

    /// Get a configuration value
    Get {
        /// Key, e.g. `owner` or `column_by_label.bug`
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Key, e.g. `owner` or `column_by_label.bug`
        key: String,
        /// New value
        value: String,
    },
}

/// Workflow inputs; flags override the config file.
#[derive(Args, Debug, Default)]
struct RunArgs {
    /// Access token with project and issue permissions
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Repository owner
    #[arg(long, env = "INPUT_OWNER")]
    owner: Option<String>,

    /// Repository name
    #[arg(long, env = "INPUT_REPO")]
    repo: Option<String>,

    /// Project number
    #[arg(long, env = "INPUT_PROJECT")]
    project: Option<String>,

    /// Label to column mapping as a JSON object
    #[arg(long, env = "INPUT_COLUMNBYLABEL")]
    column_by_label: Option<String>,

    /// Comma-separated column names never vacated by label moves
    #[arg(long, env = "INPUT_IGNORECOLUMNNAMES")]
    ignore_column_names: Option<String>,

    /// Label added to closed issues
    #[arg(long, env = "INPUT_LABELONCLOSE")]
    label_on_close: Option<String>,

    /// Column whose cards are archived when their issue closes
    #[arg(long, env = "INPUT_REMOVEONCLOSE")]
    remove_on_close: Option<String>,

    /// Which mapped label wins: first or last
    #[arg(long, env = "INPUT_LABELPRECEDENCE")]
    label_precedence: Option<String>,

    /// API root URL
    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,

    /// Triggering event kind
    #[arg(long, env = "GITHUB_EVENT_NAME")]
    event_name: Option<String>,

    /// Path to the webhook payload JSON
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: Option<PathBuf>,

    /// Config file to start from
    #[arg(long)]
    config: Option<PathBuf>,
}

impl RunArgs {
    /// Build validated settings: config file first, then non-empty inputs.
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load_from(path)?,
            None => Settings::load()?,
        };

        if let Some(owner) = non_empty(self.owner.clone()) {
            settings.owner = owner;
        }
        if let Some(repo) = non_empty(self.repo.clone()) {
            settings.repo = repo;
        }
        if let Some(project) = non_empty(self.project.clone()) {
            settings.project = parse_project_number(&project)?;
        }
        if let Some(mapping) = non_empty(self.column_by_label.clone()) {
            settings.column_by_label = parse_column_mapping(&mapping)?;
        }
        if let Some(names) = non_empty(self.ignore_column_names.clone()) {
            settings.ignore_column_names = parse_column_list(&names);
        }
        if let Some(label) = non_empty(self.label_on_close.clone()) {
            settings.label_on_close = Some(label);
        }
        if let Some(column) = non_empty(self.remove_on_close.clone()) {
            settings.remove_on_close = Some(column);
        }
        if let Some(precedence) = non_empty(self.label_precedence.clone()) {
            settings.label_precedence = precedence.parse()?;
        }
        if let Some(url) = non_empty(self.api_url.clone()) {
            settings.base_url = Some(url);
        }

        settings.validate()?;
        Ok(settings)
    }

    fn token(&self) -> Result<String> {
        non_empty(self.token.clone()).ok_or_else(|| Error::Config("invalid token".to_string()))
    }

    fn event(&self) -> Result<Event> {
        let name = non_empty(self.event_name.clone())
            .ok_or_else(|| Error::Config("missing event name".to_string()))?;
        let path = self
            .event_path
            .as_ref()
            .ok_or_else(|| Error::Config("missing event payload path".to_string()))?;
        Event::from_json_file(name, path)
    }
}

/// Validate everything up front, then dispatch the event.
async fn run(args: &RunArgs) -> Result<Outcome> {
    let token = args.token()?;
    let settings = args.settings()?;
    let event = args.event()?;

    let base_url = settings.base_url.as_deref().unwrap_or(DEFAULT_GITHUB_URL);
    let client = GitHubBoardClient::with_base_url(
        base_url,
        settings.owner.as_str(),
        settings.repo.as_str(),
        token,
    );

    Router::new(&client, &settings).dispatch(&event).await
}

fn config_file(file: Option<PathBuf>) -> Result<PathBuf> {
    match file {
        Some(path) => Ok(path),
        None => Settings::config_path(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Run(args)) => {
            let start = Instant::now();
            let result = run(&args).await;
            debug!(
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Handler returned"
            );

            match result {
                Ok(outcome) => {
                    info!(outcome = %outcome, "Board updated");
                    println!("{}", outcome);
                }
                Err(e) => {
                    error!(error = %e, "Board update failed");
                    // Workflow command: marks the step as failed with this message
                    println!("::error::{}", e);
                    return Err(e.into());
                }
            }
        }
        Some(Commands::Config { file, command }) => {
            let path = config_file(file)?;
            match command {
                ConfigCommands::Show => {
                    let settings = Settings::load_from(&path)?;
                    println!("# {}", path.display());
                    print!("{}", toml::to_string_pretty(&settings)?);
                }
                ConfigCommands::Path => println!("{}", path.display()),
                ConfigCommands::Get { key } => {
                    let settings = Settings::load_from(&path)?;
                    match settings.get(&key)? {
                        Some(value) => println!("{}", value),
                        None => info!(key = %key, "Not set"),
                    }
                }
                ConfigCommands::Set { key, value } => {
                    let mut settings = Settings::load_from(&path)?;
                    settings.set(&key, &value)?;
                    settings.save_to(&path)?;
                }
            }
        }
        None => {
            println!("boardhand - project board automation");
            println!("Run with --help for usage information");
        }
    }

    Ok(())
}
