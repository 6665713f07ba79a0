use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of ingested campaign performance data. Produced by the
/// ingestion pipeline after CSV validation; immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub date: NaiveDate,
    pub channel: String,
    pub clicks: u64,
    pub conversions: u64,
}

impl CampaignRecord {
    pub fn new(date: NaiveDate, channel: impl Into<String>, clicks: u64, conversions: u64) -> Self {
        Self {
            date,
            channel: channel.into(),
            clicks,
            conversions,
        }
    }

    /// Per-record conversion rate in percent. `None` when the record has no
    /// clicks; such records still count toward every aggregate total.
    pub fn conversion_rate(&self) -> Option<f64> {
        if self.clicks > 0 {
            Some(self.conversions as f64 / self.clicks as f64 * 100.0)
        } else {
            None
        }
    }
}

/// Optional query filters applied to a record set before aggregation.
/// Date bounds are inclusive; the channel filter is an exact match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub channel: Option<String>,
}

/// A record as it appears in a stats response, with its derived rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsRow {
    pub date: NaiveDate,
    pub channel: String,
    pub clicks: u64,
    pub conversions: u64,
    /// Null for zero-click records; never NaN.
    pub conversion_rate: Option<f64>,
}

impl From<&CampaignRecord> for StatsRow {
    fn from(record: &CampaignRecord) -> Self {
        Self {
            date: record.date,
            channel: record.channel.clone(),
            clicks: record.clicks,
            conversions: record.conversions,
            conversion_rate: record.conversion_rate(),
        }
    }
}

/// Aggregate totals over a record set. The average rate is always derived
/// from the click/conversion totals, never averaged over per-row rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total_records: usize,
    pub total_clicks: u64,
    pub total_conversions: u64,
    pub avg_conversion_rate: f64,
}

/// Full statistics payload: the (filtered) rows plus their summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsResult {
    pub records: Vec<StatsRow>,
    pub summary: StatsSummary,
}

/// Per-channel aggregate, one entry per distinct channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSummary {
    pub channel: String,
    pub record_count: usize,
    pub total_clicks: u64,
    pub total_conversions: u64,
    pub avg_conversion_rate: f64,
}

/// Per-date aggregate, one entry per distinct date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateSummary {
    pub date: NaiveDate,
    pub record_count: usize,
    pub total_clicks: u64,
    pub total_conversions: u64,
    pub avg_conversion_rate: f64,
}

/// Inclusive date span covered by a record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Quality checks over an ingested record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQualityReport {
    pub total_rows: usize,
    pub duplicate_rows: usize,
    pub date_range: Option<DateRange>,
    /// Distinct channels in first-seen order.
    pub channels: Vec<String>,
}
