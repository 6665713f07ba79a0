#![warn(clippy::unwrap_used)]

pub mod aggregate;
pub mod quality;

pub use aggregate::{compute_stats, filter_records, group_by_channel, group_by_date, summarize};
pub use quality::quality_report;
