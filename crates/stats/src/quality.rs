//! Data-quality checks over an ingested record set: row and duplicate
//! counts, covered date range, and the distinct channel set.

use std::collections::HashSet;

use adtech_core::types::{CampaignRecord, DataQualityReport, DateRange};

pub fn quality_report(records: &[CampaignRecord]) -> DataQualityReport {
    let mut seen: HashSet<(chrono::NaiveDate, &str, u64, u64)> = HashSet::new();
    let mut duplicate_rows = 0;
    let mut channels: Vec<String> = Vec::new();

    for record in records {
        if !seen.insert((
            record.date,
            record.channel.as_str(),
            record.clicks,
            record.conversions,
        )) {
            duplicate_rows += 1;
        }
        if !channels.iter().any(|c| c == &record.channel) {
            channels.push(record.channel.clone());
        }
    }

    let date_range = records
        .iter()
        .map(|r| r.date)
        .min()
        .zip(records.iter().map(|r| r.date).max())
        .map(|(start, end)| DateRange { start, end });

    DataQualityReport {
        total_rows: records.len(),
        duplicate_rows,
        date_range,
        channels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_empty_input_has_no_date_range() {
        let report = quality_report(&[]);
        assert_eq!(report.total_rows, 0);
        assert_eq!(report.duplicate_rows, 0);
        assert_eq!(report.date_range, None);
        assert!(report.channels.is_empty());
    }

    #[test]
    fn test_duplicates_and_channels() {
        let records = vec![
            CampaignRecord::new(date("2024-01-02"), "search", 100, 10),
            CampaignRecord::new(date("2024-01-02"), "search", 100, 10),
            CampaignRecord::new(date("2024-01-01"), "social", 50, 5),
        ];
        let report = quality_report(&records);
        assert_eq!(report.total_rows, 3);
        assert_eq!(report.duplicate_rows, 1);
        assert_eq!(
            report.date_range,
            Some(DateRange {
                start: date("2024-01-01"),
                end: date("2024-01-02"),
            })
        );
        assert_eq!(report.channels, vec!["search", "social"]);
    }
}
