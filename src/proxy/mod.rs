//! Proxy module for collecting and checking proxies
//!
//! This module provides functionality for:
//! - The built-in list of proxy listing sites
//! - Extracting proxies from listing tables
//! - Collecting proxies across sources up to a cap
//! - Checking proxy liveness with bounded concurrency

pub mod checker;
pub mod crawler;
pub mod extractor;
pub mod models;
pub mod sources;

pub use checker::{CheckerConfig, HttpProbe, ProbeTransport, ProxyChecker};
pub use crawler::{CrawlerConfig, DocumentFetcher, HttpFetcher, ProxyCrawler};
pub use extractor::{extract_into, Extraction};
pub use models::{
    Admission, Liveness, ProbeOutcome, ProxyRecord, Scheme, WorkingSet, DEFAULT_MAX_PROXIES,
    UNKNOWN,
};
pub use sources::{default_sources, ProxySource};
