pub mod header;
pub mod status;
pub mod utils;

pub use header::draw_header;
pub use status::draw_status_bar;
pub use utils::{fill_between, truncate};
