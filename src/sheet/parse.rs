//! CSV tokenizing and header mapping for published sheets.
//!
//! The tokenizer is deliberately small: a `"` always toggles quoted mode and is
//! dropped, so a literal quote character cannot appear inside a cell.

use super::types::Record;

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// Split CSV text into rows of trimmed cells.
///
/// Surrounding whitespace of the whole document (including trailing blank
/// lines) is removed first. Rows are separated by `\n` or `\r\n`.
pub fn tokenize(text: &str) -> Vec<Vec<String>> {
  text.trim().lines().map(tokenize_row).collect()
}

fn tokenize_row(line: &str) -> Vec<String> {
  let mut cells = Vec::new();
  let mut current = String::new();
  let mut in_quotes = false;

  for c in line.chars() {
    match c {
      QUOTE => in_quotes = !in_quotes,
      DELIMITER if !in_quotes => cells.push(std::mem::take(&mut current)),
      _ => current.push(c),
    }
  }
  cells.push(current);

  cells.into_iter().map(|c| c.trim().to_string()).collect()
}

/// Zip every row after the first against the header row.
///
/// Short rows are padded with empty strings, long rows are cut to the header
/// width.
pub fn build_records(rows: Vec<Vec<String>>) -> Vec<Record> {
  let mut rows = rows.into_iter();
  let Some(headers) = rows.next() else {
    return Vec::new();
  };

  rows
    .map(|row| {
      let mut cells = row.into_iter();
      headers
        .iter()
        .map(|h| (h.clone(), cells.next().unwrap_or_default()))
        .collect::<Record>()
    })
    .collect()
}

/// Tokenize and build records in one step.
pub fn parse_records(text: &str) -> Vec<Record> {
  build_records(tokenize(text))
}
