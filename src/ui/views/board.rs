use crate::board::{Board, DisplayGroup};
use crate::ui::renderfns::{fill_between, truncate};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

/// Space kept for the price column when names get truncated
const PRICE_RESERVE: usize = 12;

pub fn draw_board(frame: &mut Frame, area: Rect, board: &Board, scroll: u16) {
  let block = Block::default()
    .title(format!(" Menu ({}) ", board.card_count()))
    .title_alignment(Alignment::Center)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if board.is_empty() {
    let paragraph = Paragraph::new("Nothing to show yet.")
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let width = block.inner(area).width as usize;
  let lines = board_lines(board, width);

  let paragraph = Paragraph::new(lines).block(block).scroll((scroll, 0));
  frame.render_widget(paragraph, area);
}

/// Largest useful scroll offset for the board in `area`
pub fn max_scroll(board: &Board, area: Rect) -> u16 {
  let inner_height = area.height.saturating_sub(2) as usize;
  let total = board_lines(board, area.width.saturating_sub(2) as usize).len();
  total.saturating_sub(inner_height).min(u16::MAX as usize) as u16
}

/// Category headings followed by their cards, one blank line between groups
fn board_lines(board: &Board, width: usize) -> Vec<Line<'_>> {
  let mut lines = Vec::new();

  for (i, group) in board.groups.iter().enumerate() {
    if i > 0 {
      lines.push(Line::raw(""));
    }
    group_lines(group, width, &mut lines);
  }

  lines
}

fn group_lines<'a>(group: &'a DisplayGroup, width: usize, lines: &mut Vec<Line<'a>>) {
  if let Some(heading) = &group.heading {
    lines.push(Line::from(Span::styled(
      heading.as_str(),
      Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    )));
  }

  for card in &group.cards {
    let name = truncate(&card.name, width.saturating_sub(PRICE_RESERVE).max(4));
    let gap = fill_between(&name, &card.price, width.saturating_sub(2));
    lines.push(Line::from(vec![
      Span::raw("  "),
      Span::styled(name, Style::default().fg(Color::White).bold()),
      Span::raw(" ".repeat(gap)),
      Span::styled(card.price.as_str(), Style::default().fg(Color::Green)),
    ]));

    if let Some(note) = &card.note {
      lines.push(Line::from(Span::styled(
        format!("    {}", note),
        Style::default().fg(Color::DarkGray).italic(),
      )));
    }
  }
}
