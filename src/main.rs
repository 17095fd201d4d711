use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use playtui::app::{self, App, Tab};
use playtui::config::Config;
use playtui::feeds::client::HttpApi;
use playtui::logging;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Parser, Debug)]
#[command(name = "playtui")]
#[command(version, about = "Terminal client for the Playto community feed and karma leaderboard")]
struct Cli {
    /// Path to config file (default: ~/.config/playtui/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API base URL, overrides the config file and PLAYTUI_API_BASE_URL
    #[arg(long)]
    api_base_url: Option<String>,

    /// Tab to open on start
    #[arg(long, value_enum)]
    tab: Option<Tab>,

    /// Write a default config file and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config.clone().or_else(Config::default_path) {
        Some(path) => path,
        None => bail!("could not determine the config directory; pass --config"),
    };

    if cli.init_config {
        if config_path.exists() {
            bail!("{} already exists", config_path.display());
        }
        Config::write_default(&config_path)?;
        println!("Wrote default config to {}", config_path.display());
        return Ok(());
    }

    let mut config = Config::load(&config_path)?;
    config.apply_env();
    if let Some(base_url) = cli.api_base_url {
        config.api.base_url = base_url;
    }
    if let Some(tab) = cli.tab {
        config.ui.default_tab = tab;
    }
    config.validate()?;

    logging::init(&config.logging)?;
    tracing::info!(base_url = %config.api.base_url, "starting playtui");

    let api = Arc::new(HttpApi::new(&config.api)?);

    install_panic_hook();
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new(api, &config, tx);
    let tick_rate = Duration::from_millis(config.ui.tick_rate_ms);
    let result = app::run(&mut terminal, &mut app, &mut rx, tick_rate).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        let message = format!("{:#}", e);
        tracing::error!(error = %message, "exiting with error");
    }
    result
}

/// Restores the terminal before the default hook prints the panic message.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));
}
