use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use undercover_api::{ClientConfig, HttpGameApi};
use undercover_app::Dispatcher;

mod app;
mod views;

use app::App;

#[derive(Parser)]
#[command(name = "undercover")]
#[command(about = "Undercover - a social deduction spy game played around one terminal", long_about = None)]
struct Cli {
    /// Backend base URL, overriding the config file and environment.
    #[arg(long)]
    server: Option<String>,

    /// Request timeout in seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Speaking time per player during discussion, in seconds.
    #[arg(long)]
    speaking: Option<u32>,

    /// Log file. The alternate screen owns stdout, so logs go here.
    #[arg(long, default_value = "undercover.log")]
    log_file: PathBuf,
}

fn init_logging(path: &PathBuf) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let mut config = ClientConfig::load()?;
    if let Some(url) = cli.server {
        config.base_url = url;
    }
    if let Some(secs) = cli.timeout {
        config.timeout_secs = secs;
    }
    if let Some(secs) = cli.speaking {
        config.speaking_secs = secs;
    }
    tracing::info!(base_url = %config.base_url, "starting client");

    let api = Arc::new(HttpGameApi::new(&config)?);
    let (dispatcher, rx) = Dispatcher::new(api);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(dispatcher, rx, config.speaking_secs);
    let result = app.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
