//! Proxy checker module for checking proxy liveness

use crate::error::ScrapeError;
use crate::proxy::models::{Liveness, ProbeOutcome, ProxyRecord, WorkingSet};
use crate::Result;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::{Client, Proxy as ReqwestProxy, StatusCode};
use std::time::Duration;
use tracing::{debug, info};

/// Default timeout for proxy checks in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 3;

/// Default number of concurrent checks
const DEFAULT_CONCURRENCY: usize = 10;

/// Default URL to test proxies against
const DEFAULT_TEST_URL: &str = "http://httpbin.org/ip";

/// Sends a request to `target_url` through a proxy
#[async_trait]
pub trait ProbeTransport: Send + Sync {
    async fn get_via(
        &self,
        proxy_url: &str,
        target_url: &str,
        timeout: Duration,
    ) -> Result<StatusCode>;
}

/// [`ProbeTransport`] that builds a reqwest client per proxy
#[derive(Debug, Clone, Default)]
pub struct HttpProbe;

#[async_trait]
impl ProbeTransport for HttpProbe {
    async fn get_via(
        &self,
        proxy_url: &str,
        target_url: &str,
        timeout: Duration,
    ) -> Result<StatusCode> {
        // `all` routes both plain HTTP and HTTPS requests through the proxy
        let client = Client::builder()
            .proxy(ReqwestProxy::all(proxy_url)?)
            .timeout(timeout)
            .build()?;

        let response = client.get(target_url).send().await?;
        Ok(response.status())
    }
}

/// Configuration for proxy checker
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// Timeout for each proxy check
    pub timeout: Duration,
    /// Number of concurrent checks
    pub concurrency: usize,
    /// URL to test proxies against
    pub test_url: String,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            concurrency: DEFAULT_CONCURRENCY,
            test_url: DEFAULT_TEST_URL.to_string(),
        }
    }
}

impl CheckerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_test_url(mut self, url: String) -> Self {
        self.test_url = url;
        self
    }
}

/// Proxy checker for validating proxies
pub struct ProxyChecker<T = HttpProbe> {
    config: CheckerConfig,
    transport: T,
}

impl ProxyChecker<HttpProbe> {
    /// Create a new proxy checker with default configuration
    pub fn new() -> Self {
        Self::with_config(CheckerConfig::default())
    }

    /// Create a new proxy checker with custom configuration
    pub fn with_config(config: CheckerConfig) -> Self {
        Self::with_transport(config, HttpProbe)
    }
}

impl<T: ProbeTransport> ProxyChecker<T> {
    pub fn with_transport(config: CheckerConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Check a single proxy.
    ///
    /// Every failure, including the timeout, counts as unreachable.
    pub async fn check_proxy(&self, record: ProxyRecord) -> ProbeOutcome {
        let url = record.url();
        let liveness = match self.probe(&url).await {
            Ok(status) if status.is_success() => Liveness::Live,
            Ok(status) => {
                debug!("{} answered with HTTP status {}", url, status);
                Liveness::Unreachable
            }
            Err(e) => {
                debug!("{} failed: {}", url, e);
                Liveness::Unreachable
            }
        };

        ProbeOutcome::new(record, liveness)
    }

    async fn probe(&self, proxy_url: &str) -> Result<StatusCode> {
        let timeout = self.config.timeout;
        let request = self
            .transport
            .get_via(proxy_url, &self.config.test_url, timeout);

        tokio::time::timeout(timeout, request)
            .await
            .map_err(|_| ScrapeError::Timeout(timeout))?
    }

    /// Probe every record and keep the live ones.
    ///
    /// Fails with [`ScrapeError::EmptyCollection`] when there is nothing to
    /// check and [`ScrapeError::EmptyValidation`] when no probe succeeded.
    pub async fn validate(&self, working_set: WorkingSet) -> Result<Vec<ProxyRecord>> {
        if working_set.is_empty() {
            return Err(ScrapeError::EmptyCollection);
        }

        let checked = working_set.len();
        info!(
            "Validating {} proxies ({} at a time)...",
            checked,
            self.concurrency()
        );

        let mut outcomes = stream::iter(working_set.into_records())
            .map(|record| self.check_proxy(record))
            .buffer_unordered(self.concurrency());

        let mut live = Vec::new();
        while let Some(outcome) = outcomes.next().await {
            let record = outcome.record;
            match outcome.liveness {
                Liveness::Live => {
                    info!("Valid proxy: {} ({})", record.endpoint(), record.country);
                    live.push(record);
                }
                Liveness::Unreachable => {
                    info!("Invalid proxy: {}", record.endpoint());
                }
            }
        }

        info!("{} of {} proxies are alive", live.len(), checked);

        if live.is_empty() {
            return Err(ScrapeError::EmptyValidation { checked });
        }
        Ok(live)
    }

    fn concurrency(&self) -> usize {
        self.config.concurrency.max(1)
    }
}

impl Default for ProxyChecker<HttpProbe> {
    fn default() -> Self {
        Self::new()
    }
}
