use crate::cache::CacheStore;
use crate::config::Config;
use crate::event::{Event, EventHandler, Timers};
use crate::session::{CycleOutcome, Session};
use crate::sheet::SheetClient;
use crate::ui;
use chrono::Utc;
use color_eyre::{eyre::eyre, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

/// Main application state
pub struct App {
  /// Header title
  title: String,

  /// Sheet client
  client: SheetClient,

  /// Board, status and cache
  session: Session,

  /// Lines scrolled past at the top of the board
  scroll: u16,

  /// Fetches started but not yet reported back
  in_flight: usize,

  /// Application configuration
  config: Config,

  /// Event sender for async tasks
  event_tx: mpsc::UnboundedSender<Event>,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(config: Config, cache: CacheStore) -> Result<Self> {
    let client = SheetClient::new(&config.source)
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;
    let (tx, _rx) = mpsc::unbounded_channel();

    Ok(Self {
      title: config.display_title(),
      client,
      session: Session::new(cache, Utc::now()),
      scroll: 0,
      in_flight: 0,
      config,
      event_tx: tx,
      should_quit: false,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    let result = self.event_loop().await;

    // Cleanup terminal, even when the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop(&mut self) -> Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Create event handler
    let mut events = EventHandler::new(Timers {
      input_poll: Duration::from_millis(250),
      refresh: self.config.refresh_interval(),
      status_tick: self.config.status_tick_interval(),
    });
    self.event_tx = events.sender();

    // Main loop
    while !self.should_quit {
      // Draw UI
      terminal.draw(|frame| ui::draw(frame, self))?;

      // Handle events
      match events.next().await {
        Some(event) => self.handle_event(event),
        None => break,
      }
    }

    info!("Shutting down");
    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Resize => {} // Redraw happens on every loop iteration
      Event::Refresh => self.start_refresh(),
      Event::StatusTick => self.session.tick_status(),
      Event::Fetched(result) => {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.session.apply_fetch(result);
      }
    }
  }

  /// Spawn one fetch; overlapping fetches are allowed and the last to
  /// finish wins
  fn start_refresh(&mut self) {
    let client = self.client.clone();
    let tx = self.event_tx.clone();
    self.in_flight += 1;

    tokio::spawn(async move {
      let result = client.fetch_records().await;
      let _ = tx.send(Event::Fetched(result));
    });
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
      return;
    }

    match key.code {
      // Quit
      KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
      KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.should_quit = true;
      }

      // Manual refresh
      KeyCode::Char('r') => self.start_refresh(),

      // Scrolling
      KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
      KeyCode::Down | KeyCode::Char('j') => self.scroll = self.scroll.saturating_add(1),
      KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
      KeyCode::PageDown => self.scroll = self.scroll.saturating_add(10),
      KeyCode::Home | KeyCode::Char('g') => self.scroll = 0,

      _ => {}
    }
  }

  // Accessors for UI rendering
  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn source_url(&self) -> &url::Url {
    self.client.url()
  }

  pub fn session(&self) -> &Session {
    &self.session
  }

  pub fn is_fetching(&self) -> bool {
    self.in_flight > 0
  }

  pub fn scroll(&self) -> u16 {
    self.scroll
  }

  /// Clamp scrolling once the board height is known
  pub fn clamp_scroll(&mut self, max: u16) {
    self.scroll = self.scroll.min(max);
  }
}

/// Run a single refresh cycle and print the board to stdout.
pub async fn run_once(config: Config, cache: CacheStore) -> Result<()> {
  let client = SheetClient::new(&config.source)
    .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;
  let mut session = Session::new(cache, Utc::now());

  let outcome = session.apply_fetch(client.fetch_records().await);
  if outcome == CycleOutcome::Failed {
    return Err(eyre!(
      "Failed to load data from {} and no cached copy is available",
      client.url()
    ));
  }

  print!("{}", session.board());
  println!();
  println!("{}", session.status());
  Ok(())
}
