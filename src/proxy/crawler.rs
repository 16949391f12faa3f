//! Proxy crawler module for collecting proxies from listing websites
//!
//! Sources are fetched one after another. A source that fails to download or
//! has no proxy table is logged and skipped, so a single bad listing never
//! aborts the run.

use crate::proxy::extractor::{extract_into, Extraction};
use crate::proxy::models::WorkingSet;
use crate::proxy::sources::ProxySource;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

/// Default timeout for HTTP requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default user agent for HTTP requests
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Downloads listing pages
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch the body of `url` as text
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Configuration for proxy crawler
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Timeout for HTTP requests
    pub timeout: Duration,
    /// User agent for HTTP requests
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl CrawlerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// [`DocumentFetcher`] backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

/// Proxy crawler for collecting proxies from listing websites
pub struct ProxyCrawler<F = HttpFetcher> {
    fetcher: F,
}

impl ProxyCrawler<HttpFetcher> {
    /// Create a new proxy crawler with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(CrawlerConfig::default())
    }

    /// Create a new proxy crawler with custom configuration
    pub fn with_config(config: CrawlerConfig) -> Result<Self> {
        Ok(Self::with_fetcher(HttpFetcher::new(&config)?))
    }
}

impl<F: DocumentFetcher> ProxyCrawler<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Collect up to `cap` proxies from `sources`, in order.
    ///
    /// Always returns whatever was gathered; an empty set means every source
    /// failed or listed nothing.
    pub async fn collect(&self, sources: &[ProxySource], cap: usize) -> WorkingSet {
        let mut set = WorkingSet::new(cap);

        for source in sources {
            info!("Fetching from: {}", source.url);

            match self.crawl_source(source, &mut set).await {
                Ok(Extraction::TableMissing) => {
                    warn!("No proxy table found at {}, skipping", source.url);
                }
                Ok(Extraction::Scanned { added, skipped }) => {
                    info!(
                        "Found {} proxies so far ({} new from {}, {} rows skipped)",
                        set.len(),
                        added,
                        source.name,
                        skipped
                    );
                }
                Err(e) => {
                    warn!("Error fetching from {}: {}", source.url, e);
                }
            }
        }

        set
    }

    /// Fetch one source and scan it into `set`
    pub async fn crawl_source(
        &self,
        source: &ProxySource,
        set: &mut WorkingSet,
    ) -> Result<Extraction> {
        let document = self.fetcher.fetch(&source.url).await?;
        Ok(extract_into(&document, source, set))
    }
}

impl Default for ProxyCrawler<HttpFetcher> {
    fn default() -> Self {
        Self::new().expect("Failed to create default ProxyCrawler")
    }
}
