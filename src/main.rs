mod app;
mod board;
mod cache;
mod config;
mod event;
mod session;
mod sheet;
mod ui;

use cache::{CacheStore, SqliteStorage};
use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "sheetboard")]
#[command(about = "A terminal menu board fed by a published spreadsheet")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/sheetboard/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// CSV URL of the published sheet
  #[arg(short, long)]
  url: Option<Url>,

  /// Seconds between refreshes
  #[arg(short, long)]
  refresh: Option<u64>,

  /// Don't read or write the offline cache
  #[arg(long)]
  no_cache: bool,

  /// Fetch once, print the board and exit
  #[arg(long)]
  once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let mut config = config::Config::load(args.config.as_deref())?;

  // Override config with command line flags
  if let Some(url) = args.url {
    config.source.url = url;
  }
  if let Some(refresh) = args.refresh {
    config.refresh_secs = refresh;
  }
  if args.no_cache {
    config.cache.enabled = false;
  }
  config.validate()?;

  // The TUI owns the terminal, so logs go to a file unless printing once
  let _guard = init_tracing(args.once);
  info!(url = %config.source.url, "sheetboard starting");

  let cache = open_cache(&config)?;

  if args.once {
    return app::run_once(config, cache).await;
  }

  let mut app = app::App::new(config, cache)?;
  app.run().await?;

  Ok(())
}

/// Initialize the tracing subscriber; RUST_LOG controls the level
fn init_tracing(to_stderr: bool) -> Option<WorkerGuard> {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

  if to_stderr {
    tracing_subscriber::registry()
      .with(fmt::layer().with_writer(std::io::stderr))
      .with(filter)
      .init();
    return None;
  }

  let Some(log_dir) = log_dir() else {
    // Nowhere to write; stay silent rather than corrupt the screen
    return None;
  };

  let appender = tracing_appender::rolling::daily(log_dir, "sheetboard.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(writer).with_ansi(false))
    .with(filter)
    .init();

  Some(guard)
}

fn log_dir() -> Option<PathBuf> {
  dirs::state_dir()
    .or_else(dirs::data_dir)
    .map(|dir| dir.join("sheetboard"))
}

/// Open the snapshot cache, degrading to no cache when storage is unavailable
fn open_cache(config: &config::Config) -> Result<CacheStore> {
  if !config.cache.enabled {
    return Ok(CacheStore::disabled());
  }

  let ttl = config.cache_ttl()?;
  Ok(match SqliteStorage::open() {
    Ok(storage) => CacheStore::new(storage).with_ttl(ttl),
    Err(e) => {
      warn!(error = %e, "Offline cache unavailable");
      CacheStore::disabled()
    }
  })
}
