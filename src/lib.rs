//! Proxy Scraper - Free Proxy Collector and Checker
//!
//! Scrapes public proxy listings, checks which proxies actually answer and
//! writes a report grouped by country.

pub mod error;
pub mod pipeline;
pub mod proxy;
pub mod report;

pub use error::ScrapeError;
pub use pipeline::Pipeline;
pub use proxy::*;
pub use report::{render, save_report, summarize, Report, Statistics};
use std::path::PathBuf;

/// Application result type
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of proxies collected before validation
    pub max_proxies: usize,
    /// Listings to scrape, in order
    pub sources: Vec<ProxySource>,
    pub crawler: CrawlerConfig,
    pub checker: CheckerConfig,
    /// Report file; a timestamped name is used when unset
    pub output: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_proxies: DEFAULT_MAX_PROXIES,
            sources: default_sources(),
            crawler: CrawlerConfig::default(),
            checker: CheckerConfig::default(),
            output: None,
        }
    }
}

impl Config {
    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.max_proxies == 0 {
            return Err(ScrapeError::InvalidConfig(
                "max proxies must be greater than zero".to_string(),
            ));
        }
        if self.sources.is_empty() {
            return Err(ScrapeError::InvalidConfig(
                "at least one source is required".to_string(),
            ));
        }
        if self.checker.concurrency == 0 {
            return Err(ScrapeError::InvalidConfig(
                "concurrency must be greater than zero".to_string(),
            ));
        }
        if self.checker.timeout.is_zero() || self.crawler.timeout.is_zero() {
            return Err(ScrapeError::InvalidConfig(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Where the report should be written for a run started at `now`
    pub fn report_path(&self, now: chrono::DateTime<chrono::Local>) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| report::default_report_path(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.max_proxies, 200);
        assert_eq!(config.sources.len(), 3);
        assert_eq!(config.crawler.timeout, Duration::from_secs(10));
        assert_eq!(config.checker.timeout, Duration::from_secs(3));
        assert_eq!(config.checker.concurrency, 10);
        assert!(config.output.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_report_path() {
        let now = Local.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        assert_eq!(
            Config::default().report_path(now),
            PathBuf::from("proxies_20240506_070809.txt")
        );

        let config = Config {
            output: Some(PathBuf::from("out/live.txt")),
            ..Config::default()
        };
        assert_eq!(config.report_path(now), PathBuf::from("out/live.txt"));
    }

    #[test]
    fn test_invalid_config() {
        let zero_cap = Config {
            max_proxies: 0,
            ..Config::default()
        };
        assert!(matches!(zero_cap.validate(), Err(ScrapeError::InvalidConfig(_))));

        let no_sources = Config {
            sources: Vec::new(),
            ..Config::default()
        };
        assert!(no_sources.validate().is_err());

        let no_workers = Config {
            checker: CheckerConfig::new().with_concurrency(0),
            ..Config::default()
        };
        assert!(no_workers.validate().is_err());

        let no_timeout = Config {
            crawler: CrawlerConfig::new().with_timeout(Duration::ZERO),
            ..Config::default()
        };
        assert!(no_timeout.validate().is_err());
    }
}
