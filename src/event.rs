use crate::sheet::{Record, SheetError};
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};

/// Application events
#[derive(Debug)]
pub enum Event {
  /// Terminal key press
  Key(KeyEvent),
  /// Terminal resized, redraw
  Resize,
  /// Time to start a refresh cycle
  Refresh,
  /// Time to recompute the "Updated Ns ago" status
  StatusTick,
  /// A refresh cycle's fetch finished
  Fetched(Result<Vec<Record>, SheetError>),
}

/// Timer settings for the event handler
#[derive(Debug, Clone, Copy)]
pub struct Timers {
  /// How long to wait on terminal input before checking for shutdown
  pub input_poll: Duration,
  pub refresh: Duration,
  pub status_tick: Duration,
}

/// Event handler that produces events from terminal input and the
/// refresh and status timers
pub struct EventHandler {
  tx: mpsc::UnboundedSender<Event>,
  rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
  /// Create a new event handler; the first refresh fires immediately
  pub fn new(timers: Timers) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();

    // Spawn terminal event reader
    let input_tx = tx.clone();
    tokio::spawn(async move {
      loop {
        if event::poll(timers.input_poll).unwrap_or(false) {
          let forwarded = match event::read() {
            Ok(CrosstermEvent::Key(key)) => input_tx.send(Event::Key(key)),
            Ok(CrosstermEvent::Resize(_, _)) => input_tx.send(Event::Resize),
            _ => Ok(()),
          };
          if forwarded.is_err() {
            break;
          }
        } else if input_tx.is_closed() {
          break;
        }
      }
    });

    spawn_timers(tx.clone(), timers);

    Self { tx, rx }
  }

  /// Sender for async tasks that report back to the event loop
  pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
    self.tx.clone()
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}

/// Spawn the refresh and status timers.
///
/// The first refresh fires immediately, the first status tick one
/// `status_tick` later. Both stop once the receiver is gone.
fn spawn_timers(tx: mpsc::UnboundedSender<Event>, timers: Timers) {
  let refresh_tx = tx.clone();
  tokio::spawn(async move {
    let mut ticker = interval(timers.refresh);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
      ticker.tick().await;
      if refresh_tx.send(Event::Refresh).is_err() {
        break;
      }
    }
  });

  tokio::spawn(async move {
    let mut ticker = interval_at(Instant::now() + timers.status_tick, timers.status_tick);
    loop {
      ticker.tick().await;
      if tx.send(Event::StatusTick).is_err() {
        break;
      }
    }
  });
}
