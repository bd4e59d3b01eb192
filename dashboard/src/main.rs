//! TrackFlow dashboard - terminal viewer for Notehub tracking events.
//!
//! # Commands
//!
//! - `trackflow-dashboard`: Interactive map and table (default)
//! - `trackflow-dashboard print`: Fetch once and print the table to stdout
//!
//! # Environment Variables
//!
//! See the [`config`](trackflow_dashboard::config) module for available
//! configuration options.

use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use trackflow_dashboard::client::EventsClient;
use trackflow_dashboard::config::Config;
use trackflow_dashboard::print::format_table;
use trackflow_dashboard::tui;
use trackflow_dashboard::view::table_rows;

const LOG_FILE_NAME: &str = "dashboard.log";

/// TrackFlow dashboard - view tracking events from Notehub projects.
#[derive(Parser, Debug)]
#[command(name = "trackflow-dashboard")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
ENVIRONMENT VARIABLES:
    TRACKFLOW_SERVER_URL    Server URL (default: http://localhost:8080)
    TRACKFLOW_EVENT_COUNT   Initial result count: 10, 25, 50, 100 or 200 (default: 50)
    TRACKFLOW_LOG_DIR       Directory for dashboard.log (default: platform data dir)
    RUST_LOG                Log filter (default: info)
    NO_COLOR                Disable colors

EXAMPLES:
    # Browse events from a local server
    trackflow-dashboard

    # Print the latest 10 events from a remote server
    trackflow-dashboard --server-url https://trackflow.example.com --count 10 print
")]
struct Cli {
    /// Server URL, overriding TRACKFLOW_SERVER_URL.
    #[arg(long, global = true)]
    server_url: Option<String>,

    /// Number of events to request (10, 25, 50, 100 or 200).
    #[arg(long, global = true)]
    count: Option<u32>,

    #[command(subcommand)]
    command: Option<Command>,
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Start the interactive dashboard (the default).
    Tui,

    /// Fetch events once and print them, newest first.
    Print,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(url) = cli.server_url.as_deref() {
        config = config.with_server_url(url)?;
    }
    if let Some(count) = cli.count {
        config = config.with_event_count(count)?;
    }

    init_logging(&config)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => runtime.block_on(tui::run(&config)).context("Dashboard failed"),
        Command::Print => runtime.block_on(run_print(&config)),
    }
}

/// Fetches once and writes the table to stdout.
async fn run_print(config: &Config) -> Result<()> {
    let client = EventsClient::new(&config.server_url)?;
    info!(server_url = %config.server_url, count = config.event_count.value(), "Printing events");

    let events = client
        .fetch_events(config.event_count)
        .await
        .with_context(|| format!("Failed to fetch events from {}", config.server_url))?;

    print!("{}", format_table(&table_rows(&events)));
    Ok(())
}

/// Sends logs to `{log_dir}/dashboard.log`; the terminal belongs to the UI.
fn init_logging(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.log_dir).with_context(|| {
        format!("Failed to create log directory {}", config.log_dir.display())
    })?;

    let path = config.log_dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();

    Ok(())
}
