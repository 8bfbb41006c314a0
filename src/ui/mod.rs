mod renderfns;
mod views;

use crate::app::App;
use ratatui::prelude::*;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Board
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  renderfns::draw_header(
    frame,
    chunks[0],
    app.title(),
    app.source_url(),
    app.is_fetching(),
  );

  let max_scroll = views::board::max_scroll(app.session().board(), chunks[1]);
  app.clamp_scroll(max_scroll);
  views::board::draw_board(frame, chunks[1], app.session().board(), app.scroll());

  renderfns::draw_status_bar(frame, chunks[2], app.session());
}
