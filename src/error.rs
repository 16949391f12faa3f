//! Error type shared by the scraping pipeline

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors produced while collecting, checking or reporting proxies
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("No proxies were found")]
    EmptyCollection,

    #[error("No valid proxies found ({checked} checked)")]
    EmptyValidation { checked: usize },

    #[error("No proxies to report")]
    NothingToReport,

    #[error("Failed to write report to {path:?}: {source}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ScrapeError {
    /// Whether this error ends the run before a report can be produced
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ScrapeError::EmptyCollection | ScrapeError::EmptyValidation { .. }
        )
    }
}
