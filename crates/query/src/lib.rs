#![warn(clippy::unwrap_used)]

pub mod service;

pub use service::{cache_key, StatsService};
