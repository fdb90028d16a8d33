//! iCalendar export.
//!
//! Serializes events into a single RFC 5545 text blob ready to be saved as
//! an `.ics` file.

mod export;

pub use export::{PRODUCT_ID, export_file_name, export_ics};
