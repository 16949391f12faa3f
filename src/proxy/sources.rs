//! Built-in proxy listing sources

use crate::proxy::models::Scheme;

/// A website that publishes a proxy table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxySource {
    /// Name of the proxy source
    pub name: String,
    /// URL to fetch proxies from
    pub url: String,
}

impl ProxySource {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }

    /// Build a source from a bare URL, using the host as its name
    pub fn from_url(url: &str) -> Self {
        let name = url
            .split("://")
            .nth(1)
            .unwrap_or(url)
            .split('/')
            .next()
            .unwrap_or(url);
        Self::new(name, url)
    }

    /// Scheme of every proxy listed by this source.
    ///
    /// Listings with "ssl" in their name or URL only carry HTTPS proxies.
    pub fn scheme(&self) -> Scheme {
        if self.name.contains("ssl") || self.url.contains("ssl") {
            Scheme::Https
        } else {
            Scheme::Http
        }
    }
}

/// The listings scraped when no sources are given explicitly
pub fn default_sources() -> Vec<ProxySource> {
    vec![
        ProxySource::new("sslproxies.org", "https://www.sslproxies.org/"),
        ProxySource::new("free-proxy-list.net", "https://free-proxy-list.net/"),
        ProxySource::new("us-proxy.org", "https://www.us-proxy.org/"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sources() {
        let sources = default_sources();
        assert_eq!(sources.len(), 3);
        for source in &sources {
            assert!(!source.name.is_empty());
            assert!(source.url.starts_with("https://"));
        }
    }

    #[test]
    fn test_scheme_inference() {
        let sources = default_sources();
        assert_eq!(sources[0].scheme(), Scheme::Https);
        assert_eq!(sources[1].scheme(), Scheme::Http);
        assert_eq!(sources[2].scheme(), Scheme::Http);
    }

    #[test]
    fn test_scheme_inference_is_case_sensitive() {
        let source = ProxySource::new("SSL list", "https://example.com/SSL");
        assert_eq!(source.scheme(), Scheme::Http);
    }

    #[test]
    fn test_from_url() {
        let source = ProxySource::from_url("https://www.sslproxies.org/");
        assert_eq!(source.name, "www.sslproxies.org");
        assert_eq!(source.url, "https://www.sslproxies.org/");
        assert_eq!(source.scheme(), Scheme::Https);

        let bare = ProxySource::from_url("example.com");
        assert_eq!(bare.name, "example.com");
    }
}
