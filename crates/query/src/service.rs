//! Cache-backed statistics queries. Owns the TTL caches that memoize
//! aggregate results between ingests; the ingestion pipeline must call
//! [`StatsService::invalidate`] synchronously after every successful bulk
//! write, before reporting success to its own caller.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use adtech_cache::TtlCache;
use adtech_core::config::CacheConfig;
use adtech_core::types::{CampaignRecord, ChannelSummary, StatsFilter, StatsResult};
use adtech_core::AnalyticsResult;
use adtech_stats::{compute_stats, filter_records, group_by_channel};
use tracing::debug;

const CHANNEL_BREAKDOWN_KEY: &str = "channel_summary";

/// Deterministic cache key for a filter combination. Absent filters use the
/// sentinel `none`, which is not a legal ISO date; a present channel is
/// prefixed with `some:` so even a channel literally named "none" keys
/// differently from no filter at all. Distinct filter combinations never
/// collide.
pub fn cache_key(filter: &StatsFilter) -> String {
    let fmt_date = |d: Option<chrono::NaiveDate>| {
        d.map_or_else(|| "none".to_string(), |d| d.to_string())
    };
    let channel = filter
        .channel
        .as_deref()
        .map_or_else(|| "none".to_string(), |c| format!("some:{c}"));
    format!(
        "stats:start={}:end={}:channel={}",
        fmt_date(filter.start_date),
        fmt_date(filter.end_date),
        channel,
    )
}

/// Query front end over the aggregator with TTL memoization. Constructed
/// explicitly by the host and passed by reference wherever needed; lives
/// for the whole process, one instance per process.
pub struct StatsService {
    stats_cache: TtlCache<StatsResult>,
    channel_cache: TtlCache<Vec<ChannelSummary>>,
    recomputes: AtomicU64,
}

impl StatsService {
    pub fn new(config: &CacheConfig) -> Self {
        let ttl = Duration::from_secs(config.default_ttl_secs);
        Self {
            stats_cache: TtlCache::new(ttl),
            channel_cache: TtlCache::new(ttl),
            recomputes: AtomicU64::new(0),
        }
    }

    /// Filtered statistics, served from cache while a previous query with
    /// the same filter combination is still live. Misses recompute
    /// independently; there is no request coalescing.
    pub fn get_stats(
        &self,
        records: &[CampaignRecord],
        filter: &StatsFilter,
    ) -> AnalyticsResult<StatsResult> {
        let key = cache_key(filter);
        if let Some(result) = self.stats_cache.get(&key) {
            return Ok(result);
        }

        debug!(key = %key, "stats cache miss, recomputing");
        let selected = filter_records(records, filter);
        let result = compute_stats(&selected)?;
        self.recomputes.fetch_add(1, Ordering::Relaxed);
        self.stats_cache.set(key, result.clone());
        Ok(result)
    }

    /// Per-channel breakdown over the full record set, cached under a
    /// fixed key.
    pub fn channel_breakdown(
        &self,
        records: &[CampaignRecord],
    ) -> AnalyticsResult<Vec<ChannelSummary>> {
        if let Some(summaries) = self.channel_cache.get(CHANNEL_BREAKDOWN_KEY) {
            return Ok(summaries);
        }

        let summaries = group_by_channel(records)?;
        self.recomputes.fetch_add(1, Ordering::Relaxed);
        self.channel_cache.set(CHANNEL_BREAKDOWN_KEY, summaries.clone());
        Ok(summaries)
    }

    /// Drops every cached aggregate so stale statistics are never served
    /// after new data lands.
    pub fn invalidate(&self) {
        self.stats_cache.clear();
        self.channel_cache.clear();
    }

    /// Number of aggregator invocations since construction. Diagnostic.
    pub fn recompute_count(&self) -> u64 {
        self.recomputes.load(Ordering::Relaxed)
    }
}
