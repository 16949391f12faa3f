//! Collect-then-validate pipeline

use crate::error::ScrapeError;
use crate::proxy::checker::{HttpProbe, ProbeTransport, ProxyChecker};
use crate::proxy::crawler::{DocumentFetcher, HttpFetcher, ProxyCrawler};
use crate::proxy::models::ProxyRecord;
use crate::proxy::sources::ProxySource;
use crate::{Config, Result};
use tracing::info;

/// Runs the collector and the validator back to back
pub struct Pipeline<F = HttpFetcher, T = HttpProbe> {
    crawler: ProxyCrawler<F>,
    checker: ProxyChecker<T>,
    sources: Vec<ProxySource>,
    max_proxies: usize,
}

impl Pipeline<HttpFetcher, HttpProbe> {
    /// Build a pipeline that talks to the network
    pub fn from_config(config: Config) -> Result<Self> {
        config.validate()?;
        let crawler = ProxyCrawler::with_config(config.crawler)?;
        let checker = ProxyChecker::with_config(config.checker);
        Ok(Self::new(crawler, checker, config.sources, config.max_proxies))
    }
}

impl<F: DocumentFetcher, T: ProbeTransport> Pipeline<F, T> {
    pub fn new(
        crawler: ProxyCrawler<F>,
        checker: ProxyChecker<T>,
        sources: Vec<ProxySource>,
        max_proxies: usize,
    ) -> Self {
        Self {
            crawler,
            checker,
            sources,
            max_proxies,
        }
    }

    /// Collect candidates and return the ones that answered.
    ///
    /// Ends early with [`ScrapeError::EmptyCollection`] when no source
    /// produced anything; validation is not attempted in that case.
    pub async fn run(&self) -> Result<Vec<ProxyRecord>> {
        info!("Starting proxy scraping...");
        let working_set = self.crawler.collect(&self.sources, self.max_proxies).await;

        if working_set.is_empty() {
            return Err(ScrapeError::EmptyCollection);
        }
        info!("Collected {} proxies", working_set.len());

        self.checker.validate(working_set).await
    }
}
