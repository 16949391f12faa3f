//! Grouping, statistics and the text report for validated proxies

use crate::error::ScrapeError;
use crate::proxy::models::ProxyRecord;
use crate::Result;
use chrono::{DateTime, Local};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const BANNER_WIDTH: usize = 80;
const SECTION_WIDTH: usize = 40;

/// Counts per key, kept in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<(String, usize)>,
}

impl FrequencyTable {
    fn count<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        let mut table = Self::default();
        for key in keys {
            match table.entries.iter_mut().find(|(k, _)| k == key) {
                Some((_, count)) => *count += 1,
                None => table.entries.push((key.to_string(), 1)),
            }
        }
        table
    }

    /// Entries in first-seen order
    pub fn entries(&self) -> &[(String, usize)] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, count)| *count)
    }

    /// Entries by descending count; ties keep first-seen order
    pub fn ranked(&self) -> Vec<(String, usize)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Frequency tables over a validated set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statistics {
    pub total: usize,
    pub by_country: FrequencyTable,
    pub by_scheme: FrequencyTable,
    pub by_anonymity: FrequencyTable,
}

impl Statistics {
    fn from_records(records: &[ProxyRecord]) -> Self {
        Self {
            total: records.len(),
            by_country: FrequencyTable::count(records.iter().map(|r| r.country.as_str())),
            by_scheme: FrequencyTable::count(records.iter().map(|r| r.scheme.as_str())),
            by_anonymity: FrequencyTable::count(records.iter().map(|r| r.anonymity.as_str())),
        }
    }
}

/// Validated proxies that share a country
#[derive(Debug, Clone)]
pub struct CountryBucket<'a> {
    pub country: &'a str,
    pub records: Vec<&'a ProxyRecord>,
}

/// Everything needed to print or save the results of a run
#[derive(Debug, Clone)]
pub struct Report<'a> {
    pub generated_at: DateTime<Local>,
    pub buckets: Vec<CountryBucket<'a>>,
    pub statistics: Statistics,
}

/// Group `records` by country and count them.
///
/// Fails with [`ScrapeError::NothingToReport`] on an empty set.
pub fn summarize(records: &[ProxyRecord]) -> Result<Report<'_>> {
    if records.is_empty() {
        return Err(ScrapeError::NothingToReport);
    }

    let mut buckets: Vec<CountryBucket<'_>> = Vec::new();
    for record in records {
        match buckets.iter_mut().find(|b| b.country == record.country) {
            Some(bucket) => bucket.records.push(record),
            None => buckets.push(CountryBucket {
                country: &record.country,
                records: vec![record],
            }),
        }
    }

    Ok(Report {
        generated_at: Local::now(),
        buckets,
        statistics: Statistics::from_records(records),
    })
}

/// Render the text report for `records`
pub fn render(records: &[ProxyRecord]) -> Result<String> {
    Ok(summarize(records)?.to_string())
}

/// Write the text report for `records` to `path`.
///
/// Nothing is written when `records` is empty.
pub fn save_report(records: &[ProxyRecord], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let content = render(records)?;

    fs::write(path, content).map_err(|source| ScrapeError::ReportWrite {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Saved {} proxies to {}", records.len(), path.display());
    Ok(())
}

/// Timestamped report file name, e.g. `proxies_20240101_120000.txt`
pub fn default_report_path(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!("proxies_{}.txt", now.format("%Y%m%d_%H%M%S")))
}

impl Report<'_> {
    pub fn at(mut self, generated_at: DateTime<Local>) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// Render the report stamped with `generated_at`
    pub fn render(&self, generated_at: DateTime<Local>) -> String {
        self.clone().at(generated_at).to_string()
    }

    /// Countries by descending proxy count
    pub fn ranking(&self) -> Vec<(String, usize)> {
        self.statistics.by_country.ranked()
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let banner = "=".repeat(BANNER_WIDTH);
        let rule = "-".repeat(SECTION_WIDTH);

        writeln!(f, "{}", banner)?;
        writeln!(f, "HIGH-QUALITY PROXY LIST")?;
        writeln!(f, "{}", banner)?;
        writeln!(
            f,
            "Generated on: {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(f, "Total proxies: {}", self.statistics.total)?;
        writeln!(f, "{}", banner)?;
        writeln!(f)?;

        for bucket in &self.buckets {
            writeln!(f)?;
            writeln!(f, "{}", rule)?;
            writeln!(
                f,
                "Country: {} ({} proxies)",
                bucket.country.to_uppercase(),
                bucket.records.len()
            )?;
            writeln!(f, "{}", rule)?;
            for record in &bucket.records {
                writeln!(f, "{}", RecordLine(record))?;
            }
        }

        writeln!(f)?;
        writeln!(f, "{}", banner)?;
        writeln!(f, "SUMMARY")?;
        writeln!(f, "{}", banner)?;
        writeln!(f, "Total countries: {}", self.buckets.len())?;
        for (country, count) in self.ranking() {
            writeln!(f, "{}: {} proxies", country, count)?;
        }
        writeln!(f, "{}", banner)
    }
}

/// One fixed-width report line
pub struct RecordLine<'a>(pub &'a ProxyRecord);

impl fmt::Display for RecordLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.0;
        write!(
            f,
            "{:<8} {:<15}:{:<6} Anonymity: {:<10} Source: {}",
            record.scheme.as_str().to_uppercase(),
            record.address,
            record.port,
            record.anonymity,
            record.source
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::models::{Scheme, UNKNOWN};
    use chrono::TimeZone;

    fn record(address: &str, scheme: Scheme, country: &str, anonymity: &str) -> ProxyRecord {
        ProxyRecord::new(
            address.to_string(),
            "8080".to_string(),
            scheme,
            "https://free-proxy-list.net/".to_string(),
        )
        .with_country(country.to_string())
        .with_anonymity(anonymity.to_string())
    }

    fn sample() -> Vec<ProxyRecord> {
        vec![
            record("5.5.5.5", Scheme::Https, "DE", "elite proxy"),
            record("1.1.1.1", Scheme::Http, "US", "anonymous"),
            record("2.2.2.2", Scheme::Http, "US", "elite proxy"),
        ]
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{}_{}.txt", name, uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_summary_ranks_by_count() {
        let records = sample();
        let report = summarize(&records).unwrap();
        assert_eq!(
            report.ranking(),
            vec![("US".to_string(), 2), ("DE".to_string(), 1)]
        );
    }

    #[test]
    fn test_ranking_ties_keep_first_seen_order() {
        let records = vec![
            record("1.1.1.1", Scheme::Http, "FR", UNKNOWN),
            record("2.2.2.2", Scheme::Http, "BR", UNKNOWN),
            record("3.3.3.3", Scheme::Http, "JP", UNKNOWN),
            record("4.4.4.4", Scheme::Http, "JP", UNKNOWN),
        ];
        let report = summarize(&records).unwrap();
        let countries: Vec<_> = report.ranking().into_iter().map(|(c, _)| c).collect();
        assert_eq!(countries, vec!["JP", "FR", "BR"]);
    }

    #[test]
    fn test_buckets_group_exact_country() {
        let records = vec![
            record("1.1.1.1", Scheme::Http, "us", UNKNOWN),
            record("2.2.2.2", Scheme::Http, "US", UNKNOWN),
            record("3.3.3.3", Scheme::Http, UNKNOWN, UNKNOWN),
            record("4.4.4.4", Scheme::Http, "US", UNKNOWN),
        ];
        let report = summarize(&records).unwrap();
        let buckets: Vec<_> = report
            .buckets
            .iter()
            .map(|b| (b.country, b.records.len()))
            .collect();
        assert_eq!(buckets, vec![("us", 1), ("US", 2), (UNKNOWN, 1)]);
        assert_eq!(report.buckets[1].records[1].address, "4.4.4.4");
    }

    #[test]
    fn test_statistics() {
        let records = sample();
        let stats = summarize(&records).unwrap().statistics;
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_country.get("US"), Some(2));
        assert_eq!(stats.by_country.get("DE"), Some(1));
        assert_eq!(stats.by_scheme.get("http"), Some(2));
        assert_eq!(stats.by_scheme.get("https"), Some(1));
        assert_eq!(stats.by_anonymity.get("elite proxy"), Some(2));
        assert_eq!(stats.by_anonymity.get("anonymous"), Some(1));
        assert_eq!(stats.by_anonymity.get("transparent"), None);
        assert_eq!(stats.by_anonymity.len(), 2);
    }

    #[test]
    fn test_summarize_is_pure() {
        let records = sample();
        let first = summarize(&records).unwrap();
        let second = summarize(&records).unwrap();
        assert_eq!(first.statistics, second.statistics);
        assert_eq!(first.ranking(), second.ranking());
    }

    #[test]
    fn test_summarize_empty_set() {
        assert!(matches!(summarize(&[]), Err(ScrapeError::NothingToReport)));
        assert!(matches!(render(&[]), Err(ScrapeError::NothingToReport)));
    }

    #[test]
    fn test_record_line_layout() {
        let proxy = record("1.2.3.4", Scheme::Https, "US", "elite");
        assert_eq!(
            RecordLine(&proxy).to_string(),
            "HTTPS    1.2.3.4        :8080   Anonymity: elite      Source: https://free-proxy-list.net/"
        );
    }

    #[test]
    fn test_render_layout() {
        let records = sample();
        let generated_at = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let text = summarize(&records).unwrap().render(generated_at);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "=".repeat(80));
        assert_eq!(lines[1], "HIGH-QUALITY PROXY LIST");
        assert_eq!(lines[3], "Generated on: 2024-01-02 03:04:05");
        assert_eq!(lines[4], "Total proxies: 3");
        assert!(text.contains("Country: DE (1 proxies)"));
        assert!(text.contains("Country: US (2 proxies)"));
        assert!(text.contains("Total countries: 2"));

        let us = text.find("US: 2 proxies").unwrap();
        let de = text.find("DE: 1 proxies").unwrap();
        assert!(us < de);
        assert!(text.ends_with(&format!("{}\n", "=".repeat(80))));
    }

    #[test]
    fn test_render_with_timestamp_matches_display() {
        let records = sample();
        let generated_at = Local.with_ymd_and_hms(2023, 12, 31, 23, 59, 58).unwrap();
        let report = summarize(&records).unwrap();

        let text = report.render(generated_at);
        assert!(text.contains("Generated on: 2023-12-31 23:59:58"));
        assert_eq!(text, report.clone().at(generated_at).to_string());
        // the report itself keeps its own timestamp
        assert_ne!(report.generated_at, generated_at);
    }

    #[test]
    fn test_render_upper_cases_country_header() {
        let records = vec![record("1.1.1.1", Scheme::Http, "Germany", UNKNOWN)];
        let text = render(&records).unwrap();
        assert!(text.contains("Country: GERMANY (1 proxies)"));
        assert!(text.contains("Germany: 1 proxies"));
    }

    #[test]
    fn test_save_report() {
        let path = temp_path("proxy_report");
        save_report(&sample(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(&"=".repeat(80)));
        assert!(content.contains("Total proxies: 3"));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_empty_report_writes_nothing() {
        let path = temp_path("empty_report");
        let result = save_report(&[], &path);
        assert!(matches!(result, Err(ScrapeError::NothingToReport)));
        assert!(!path.exists());
    }

    #[test]
    fn test_save_report_write_failure() {
        let dir = std::env::temp_dir().join(uuid::Uuid::new_v4().to_string());
        let path = dir.join("proxies.txt");
        let result = save_report(&sample(), &path);
        match result {
            Err(ScrapeError::ReportWrite { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected write failure, got {:?}", other),
        }
    }

    #[test]
    fn test_default_report_path() {
        let now = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(
            default_report_path(now),
            PathBuf::from("proxies_20240102_030405.txt")
        );
    }
}
