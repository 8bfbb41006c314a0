use crate::session::Session;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the status bar with the offline badge and "updated" text
pub fn draw_status_bar(frame: &mut Frame, area: Rect, session: &Session) {
  let mut spans = vec![Span::raw(" ")];

  if session.is_offline() {
    spans.push(Span::styled(
      " OFFLINE ",
      Style::default().fg(Color::Black).bg(Color::Red).bold(),
    ));
    spans.push(Span::raw(" "));
  }

  spans.push(Span::styled(
    session.status().to_string(),
    Style::default().fg(Color::White),
  ));

  let line = Line::from(spans);
  let paragraph = Paragraph::new(line).style(Style::default().bg(Color::Black));

  frame.render_widget(paragraph, area);
}
