use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column names the board knows how to display
pub mod fields {
  pub const CATEGORY: &str = "Category";
  pub const ITEM: &str = "Item";
  pub const PRICE: &str = "Price";
  pub const IN_STOCK: &str = "In Stock";
  pub const NOTES: &str = "Notes/Emoji";
}

/// One data row of the sheet, keyed by header name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
  fields: BTreeMap<String, String>,
}

impl Record {
  /// Value of a column, `None` when the sheet has no such header
  pub fn get(&self, field: &str) -> Option<&str> {
    self.fields.get(field).map(String::as_str)
  }

  /// Value of a column, empty when missing
  pub fn get_or_empty(&self, field: &str) -> &str {
    self.get(field).unwrap_or("")
  }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self {
      fields: iter
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_get_missing_field() {
    let record: Record = [("Item", "Cola")].into_iter().collect();
    assert_eq!(record.get("Item"), Some("Cola"));
    assert_eq!(record.get("Price"), None);
    assert_eq!(record.get_or_empty("Price"), "");
  }

  #[test]
  fn test_serializes_as_plain_object() {
    let record: Record = [("Item", "Cola"), ("Price", "2.00")].into_iter().collect();
    let json = serde_json::to_string(&record).unwrap();
    assert_eq!(json, r#"{"Item":"Cola","Price":"2.00"}"#);
  }
}
