//! Turns sheet records into the grouped menu board that gets drawn.

use std::fmt;

use crate::sheet::types::fields;
use crate::sheet::Record;

/// One item card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
  pub name: String,
  pub price: String,
  /// Notes/emoji line, only when the sheet has one for this item
  pub note: Option<String>,
}

/// Items sharing a category, in sheet order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayGroup {
  /// `None` for records without a category; drawn without a heading
  pub heading: Option<String>,
  pub cards: Vec<Card>,
}

/// The full display tree for one render pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
  pub groups: Vec<DisplayGroup>,
}

impl Board {
  /// Group records by category and build cards for in-stock items.
  ///
  /// Groups appear in order of first appearance. An item is hidden only when
  /// its `In Stock` value is `false` (any case).
  pub fn present(records: &[Record]) -> Self {
    let mut groups: Vec<(String, Vec<&Record>)> = Vec::new();

    for record in records {
      let category = record.get_or_empty(fields::CATEGORY);
      match groups.iter_mut().find(|(name, _)| name == category) {
        Some((_, members)) => members.push(record),
        None => groups.push((category.to_string(), vec![record])),
      }
    }

    let groups = groups
      .into_iter()
      .map(|(category, members)| DisplayGroup {
        heading: (!category.is_empty()).then(|| plain_text(&category)),
        cards: members
          .into_iter()
          .filter(|r| is_in_stock(r))
          .map(Card::from_record)
          .collect(),
      })
      .collect();

    Self { groups }
  }

  pub fn is_empty(&self) -> bool {
    self.groups.is_empty()
  }

  pub fn card_count(&self) -> usize {
    self.groups.iter().map(|g| g.cards.len()).sum()
  }
}

impl Card {
  fn from_record(record: &Record) -> Self {
    let note = record.get_or_empty(fields::NOTES);
    Self {
      name: plain_text(record.get_or_empty(fields::ITEM)),
      price: plain_text(record.get_or_empty(fields::PRICE)),
      note: (!note.is_empty()).then(|| plain_text(note)),
    }
  }
}

fn is_in_stock(record: &Record) -> bool {
  record.get_or_empty(fields::IN_STOCK).to_lowercase() != "false"
}

/// Make sheet text safe to put on a terminal.
///
/// Control characters (escape sequences included) are never passed through.
fn plain_text(s: &str) -> String {
  s.chars()
    .map(|c| match c {
      '\t' => ' ',
      c if c.is_control() => '\u{FFFD}',
      c => c,
    })
    .collect()
}

/// Plain-text listing, used outside the TUI
impl fmt::Display for Board {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, group) in self.groups.iter().enumerate() {
      if i > 0 {
        writeln!(f)?;
      }
      if let Some(heading) = &group.heading {
        writeln!(f, "{}", heading)?;
      }
      for card in &group.cards {
        writeln!(f, "  {}  {}", card.name, card.price)?;
        if let Some(note) = &card.note {
          writeln!(f, "    {}", note)?;
        }
      }
    }
    Ok(())
  }
}
