//! Pure aggregation over validated campaign records: filtering, totals,
//! and per-channel / per-date breakdowns. No I/O and no shared state;
//! callers own synchronization of the record slice.

use std::collections::{BTreeMap, HashMap};

use adtech_core::types::{
    CampaignRecord, ChannelSummary, DateSummary, StatsFilter, StatsResult, StatsRow, StatsSummary,
};
use adtech_core::{AnalyticsError, AnalyticsResult};
use tracing::info;

/// Applies the optional filters: inclusive date range, exact channel match.
/// Absent filters are no-ops, filters commute, and the relative order of
/// the input is preserved.
pub fn filter_records(records: &[CampaignRecord], filter: &StatsFilter) -> Vec<CampaignRecord> {
    records
        .iter()
        .filter(|r| {
            filter.start_date.map_or(true, |start| r.date >= start)
                && filter.end_date.map_or(true, |end| r.date <= end)
                && filter.channel.as_deref().map_or(true, |c| r.channel == c)
        })
        .cloned()
        .collect()
}

/// Sums clicks and conversions across the input. The average rate derives
/// from the totals; zero total clicks yields a rate of exactly 0, never NaN.
pub fn summarize(records: &[CampaignRecord]) -> StatsSummary {
    let total_clicks: u64 = records.iter().map(|r| r.clicks).sum();
    let total_conversions: u64 = records.iter().map(|r| r.conversions).sum();
    StatsSummary {
        total_records: records.len(),
        total_clicks,
        total_conversions,
        avg_conversion_rate: rate(total_conversions, total_clicks),
    }
}

/// Builds the full statistics payload: one row per record plus the summary.
pub fn compute_stats(records: &[CampaignRecord]) -> AnalyticsResult<StatsResult> {
    validate(records)?;
    info!(records = records.len(), "computing stats");
    let rows: Vec<StatsRow> = records.iter().map(StatsRow::from).collect();
    Ok(StatsResult {
        records: rows,
        summary: summarize(records),
    })
}

/// Per-channel totals, largest channels first. Equal click totals keep
/// first-seen channel order (the sort is stable).
pub fn group_by_channel(records: &[CampaignRecord]) -> AnalyticsResult<Vec<ChannelSummary>> {
    validate(records)?;
    let mut summaries: Vec<ChannelSummary> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let slot = *index.entry(record.channel.as_str()).or_insert_with(|| {
            summaries.push(ChannelSummary {
                channel: record.channel.clone(),
                record_count: 0,
                total_clicks: 0,
                total_conversions: 0,
                avg_conversion_rate: 0.0,
            });
            summaries.len() - 1
        });
        let summary = &mut summaries[slot];
        summary.record_count += 1;
        summary.total_clicks += record.clicks;
        summary.total_conversions += record.conversions;
    }

    for summary in &mut summaries {
        summary.avg_conversion_rate = rate(summary.total_conversions, summary.total_clicks);
    }
    summaries.sort_by(|a, b| b.total_clicks.cmp(&a.total_clicks));
    Ok(summaries)
}

/// Per-date totals in ascending date order.
pub fn group_by_date(records: &[CampaignRecord]) -> AnalyticsResult<Vec<DateSummary>> {
    validate(records)?;
    let mut by_date: BTreeMap<chrono::NaiveDate, DateSummary> = BTreeMap::new();

    for record in records {
        let summary = by_date.entry(record.date).or_insert_with(|| DateSummary {
            date: record.date,
            record_count: 0,
            total_clicks: 0,
            total_conversions: 0,
            avg_conversion_rate: 0.0,
        });
        summary.record_count += 1;
        summary.total_clicks += record.clicks;
        summary.total_conversions += record.conversions;
    }

    Ok(by_date
        .into_values()
        .map(|mut summary| {
            summary.avg_conversion_rate = rate(summary.total_conversions, summary.total_clicks);
            summary
        })
        .collect())
}

/// Totals-based rate in percent with the zero-click guard.
fn rate(conversions: u64, clicks: u64) -> f64 {
    if clicks > 0 {
        conversions as f64 / clicks as f64 * 100.0
    } else {
        0.0
    }
}

/// Defensive check on the ingest contract: every record must carry a
/// non-empty channel identifier.
fn validate(records: &[CampaignRecord]) -> AnalyticsResult<()> {
    for (idx, record) in records.iter().enumerate() {
        if record.channel.trim().is_empty() {
            return Err(AnalyticsError::Validation(format!(
                "record {idx} has an empty channel identifier"
            )));
        }
    }
    Ok(())
}
