//! The published sheet: fetching it and turning its CSV text into records.

pub mod client;
pub mod parse;
pub mod types;

pub use client::{SheetClient, SheetError};
pub use types::Record;
