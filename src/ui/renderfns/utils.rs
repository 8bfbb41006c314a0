use ratatui::text::Span;

/// Terminal columns `s` occupies; wide glyphs such as CJK and emoji count as two
pub fn display_width(s: &str) -> usize {
  Span::raw(s).width()
}

/// Truncate a string to a maximum width in terminal columns, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if display_width(s) <= max_len {
    return s.to_string();
  }

  let budget = max_len.saturating_sub(3);
  let mut kept = String::new();
  let mut used = 0;
  let mut buf = [0u8; 4];
  for c in s.chars() {
    let w = display_width(c.encode_utf8(&mut buf));
    if used + w > budget {
      break;
    }
    used += w;
    kept.push(c);
  }
  format!("{}...", kept)
}

/// Number of spaces that right-aligns `right` after `left` within `width`.
///
/// Always at least one space so the two never touch.
pub fn fill_between(left: &str, right: &str, width: usize) -> usize {
  width
    .saturating_sub(display_width(left) + display_width(right))
    .max(1)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
  }

  #[test]
  fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_truncate_multibyte() {
    assert_eq!(truncate("crème brûlée", 8), "crème...");
  }

  #[test]
  fn test_fill_between() {
    assert_eq!(fill_between("Cola", "2.00", 20), 12);
    assert_eq!(fill_between("A very long name", "2.00", 10), 1);
  }

  #[test]
  fn test_truncate_wide_glyphs() {
    // Each glyph takes two columns, so only two fit before the ellipsis
    assert_eq!(truncate("日本語メニュー", 8), "日本...");
    assert_eq!(display_width(&truncate("日本語メニュー", 8)), 7);
  }

  #[test]
  fn test_fill_between_wide_glyphs() {
    assert_eq!(fill_between("🥤", "1.00", 10), 4);
    assert_eq!(fill_between("日本", "1.00", 10), 2);
  }
}
