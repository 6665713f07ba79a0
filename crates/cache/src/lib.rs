#![warn(clippy::unwrap_used)]

pub mod ttl;

pub use ttl::{CacheStats, TtlCache};
