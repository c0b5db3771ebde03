use std::{path::PathBuf, process::ExitCode, sync::Arc, time::Duration};

use clap::Parser;
use env_logger::{Builder, Env};
use jukebox_core::{
    app::App,
    data::{Config, Period},
    error::Error,
    loader::FileSource,
    surface::Document,
};

const ENV_LOG: &str = "JUKEBOX_LOG";
const ENV_LOG_STYLE: &str = "JUKEBOX_LOG_STYLE";
const LOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Render the song request inbox and playlist of one period as HTML.
#[derive(Debug, Parser)]
#[command(name = "jukebox", version)]
struct Args {
    /// JSON payload with `period` and `requests`.
    #[arg(long)]
    source: Option<PathBuf>,
    /// Period to show, e.g. `1` or `"Period 1"`.
    #[arg(long, value_parser = Period::parse)]
    period: Option<Period>,
    /// View to activate: dashboard, song-manager, leaderboard or auction.
    #[arg(long)]
    view: Option<String>,
    /// Theme class for the background layer, e.g. theme-blue.
    #[arg(long)]
    theme: Option<String>,
    /// Alternative config file.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    // Setup logging from the env variables, with defaults.
    Builder::from_env(
        Env::new()
            .filter_or(ENV_LOG, "info")
            .write_style(ENV_LOG_STYLE),
    )
    .init();

    match run(Args::parse()) {
        Ok(html) => {
            print!("{html}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<String, Error> {
    let loaded = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let mut config = loaded.unwrap_or_default();
    if let Some(period) = args.period {
        config.period = Some(period);
    }
    let source = args
        .source
        .clone()
        .or_else(|| config.source())
        .ok_or_else(|| Error::ConfigError("no request source given".to_string()))?;

    let mut app = App::new(
        Document::new("Jukebox"),
        &config,
        Arc::new(FileSource::new(source)),
    )?;

    app.refresh();
    if !app.wait(LOAD_TIMEOUT) {
        log::warn!("load did not finish in {:?}", LOAD_TIMEOUT);
    }
    if let Some(err) = app.state().load_error() {
        log::error!("{err}");
    }
    for err in &app.state().skipped {
        log::warn!("skipped: {err}");
    }

    // Bad names leave the page as it was.
    if let Some(view) = &args.view {
        if let Err(err) = app.activate(view) {
            log::warn!("not showing {view:?}: {err}");
        }
    }
    if let Some(theme) = &args.theme {
        if let Err(err) = app.apply_theme(theme) {
            log::warn!("not applying {theme:?}: {err}");
        }
    }

    Ok(app.surface().to_html())
}
