use anyhow::Result;
use chrono::Local;
use clap::Parser;
use colored::Colorize;
use proxy_scraper::{
    report::{save_report, summarize, Statistics},
    CheckerConfig, Config, CrawlerConfig, Pipeline, ProxySource, ScrapeError,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Scrape free proxy lists, keep the working proxies and save them by country
#[derive(Parser)]
#[command(name = "proxy-scraper")]
#[command(about = "Scrape free proxy lists, keep the working proxies and save them by country")]
struct Cli {
    /// Maximum number of proxies to collect before checking
    #[arg(short, long, default_value = "200", env = "PROXY_SCRAPER_MAX_PROXIES")]
    max_proxies: usize,

    /// Number of concurrent checks
    #[arg(short = 'n', long, default_value = "10", env = "PROXY_SCRAPER_CONCURRENCY")]
    concurrency: usize,

    /// Timeout in seconds for each proxy check
    #[arg(long, default_value = "3", env = "PROXY_SCRAPER_PROBE_TIMEOUT")]
    probe_timeout: u64,

    /// Timeout in seconds for fetching listing pages
    #[arg(long, default_value = "10", env = "PROXY_SCRAPER_FETCH_TIMEOUT")]
    fetch_timeout: u64,

    /// URL to test proxies against
    #[arg(long, default_value = "http://httpbin.org/ip", env = "PROXY_SCRAPER_TEST_URL")]
    test_url: String,

    /// Listing URLs to scrape instead of the built-in sources (can specify multiple)
    #[arg(short, long)]
    url: Vec<String>,

    /// Report file (defaults to proxies_<timestamp>.txt)
    #[arg(short, long, env = "PROXY_SCRAPER_OUTPUT")]
    output: Option<PathBuf>,

    /// Log every skipped row and failed check
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config {
            max_proxies: self.max_proxies,
            crawler: CrawlerConfig::new().with_timeout(Duration::from_secs(self.fetch_timeout)),
            checker: CheckerConfig::new()
                .with_concurrency(self.concurrency)
                .with_timeout(Duration::from_secs(self.probe_timeout))
                .with_test_url(self.test_url.clone()),
            output: self.output.clone(),
            ..Config::default()
        };
        if !self.url.is_empty() {
            config.sources = self.url.iter().map(|u| ProxySource::from_url(u)).collect();
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "proxy_scraper=debug"
    } else {
        "proxy_scraper=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    print_banner();

    let config = cli.config();
    let path = config.report_path(Local::now());
    let pipeline = Pipeline::from_config(config)?;
    let proxies = match pipeline.run().await {
        Ok(proxies) => proxies,
        Err(ScrapeError::EmptyCollection) => {
            println!("{}", "No proxies were found!".red());
            return Ok(());
        }
        Err(ScrapeError::EmptyValidation { checked }) => {
            println!(
                "{}",
                format!("No valid proxies found! ({} checked)", checked).red()
            );
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let report = summarize(&proxies)?;
    print_statistics(&report.statistics);

    match save_report(&proxies, &path) {
        Ok(()) => {
            println!(
                "{}",
                format!("Successfully saved {} proxies to {}", proxies.len(), path.display())
                    .green()
            );
            println!(
                "{}",
                format!("\nDone! Check {} for your proxy list.", path.display()).green()
            );
        }
        Err(e) => {
            println!("{}", format!("Error saving to file: {}", e).red());
        }
    }

    Ok(())
}

fn print_banner() {
    let rule = "=".repeat(48);
    println!("{}", rule.magenta());
    println!("{}", "      HIGH-QUALITY PROXY SCRAPER".magenta().bold());
    println!("{}", "           WITH COUNTRY INFO".magenta().bold());
    println!("{}", rule.magenta());
    println!();
}

fn print_statistics(stats: &Statistics) {
    let rule = "=".repeat(50);
    println!("{}", format!("\n{}", rule).cyan());
    println!("{}", "PROXY STATISTICS".cyan().bold());
    println!("{}", rule.cyan());
    println!("{}", format!("Total proxies: {}", stats.total).yellow());

    println!("{}", "\nBy Country:".green());
    for (country, count) in stats.by_country.ranked() {
        println!("  {}: {}", country, count);
    }

    println!("{}", "\nBy Type:".green());
    for (scheme, count) in stats.by_scheme.entries() {
        println!("  {}: {}", scheme, count);
    }

    println!("{}", "\nBy Anonymity:".green());
    for (anonymity, count) in stats.by_anonymity.entries() {
        println!("  {}: {}", anonymity, count);
    }
}
