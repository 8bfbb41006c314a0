use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use url::Url;

/// Draw the header bar with logo, title, source and shortcuts
pub fn draw_header(frame: &mut Frame, area: Rect, title: &str, source: &Url, fetching: bool) {
  let mut spans = vec![
    Span::styled(" sheetboard ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", title), Style::default().fg(Color::Yellow).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(
      format!(" {} ", source_label(source)),
      Style::default().fg(Color::White),
    ),
  ];

  if fetching {
    spans.push(Span::styled("⟳ ", Style::default().fg(Color::Cyan)));
  }

  spans.extend([
    Span::raw("  "),
    // Shortcuts - keys and brackets highlighted, descriptions dimmed
    Span::styled("<r>", Style::default().fg(Color::Cyan)),
    Span::styled(" refresh", Style::default().fg(Color::DarkGray)),
    Span::raw("   "),
    Span::styled("<j/k>", Style::default().fg(Color::Cyan)),
    Span::styled(" scroll", Style::default().fg(Color::DarkGray)),
    Span::raw("   "),
    Span::styled("<q>", Style::default().fg(Color::Cyan)),
    Span::styled(" quit", Style::default().fg(Color::DarkGray)),
  ]);

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));

  frame.render_widget(paragraph, area);
}

/// Host (and port, if any) of the sheet URL
fn source_label(url: &Url) -> String {
  match (url.host_str(), url.port()) {
    (Some(host), Some(port)) => format!("{}:{}", host, port),
    (Some(host), None) => host.to_string(),
    (None, _) => url.as_str().to_string(),
  }
}
