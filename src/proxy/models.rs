//! Proxy data models

use std::collections::HashSet;
use std::fmt;

/// Placeholder for a country or anonymity level the listing did not provide
pub const UNKNOWN: &str = "Unknown";

/// Default upper bound on the number of collected proxies
pub const DEFAULT_MAX_PROXIES: usize = 200;

/// Proxy scheme enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A proxy scraped from one row of a listing page
///
/// `address` and `port` are never empty: rows that cannot supply both are
/// dropped by the extractor before a record is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRecord {
    pub address: String,
    pub port: String,
    pub scheme: Scheme,
    pub country: String,
    pub anonymity: String,
    /// URL of the listing the record came from
    pub source: String,
}

impl ProxyRecord {
    /// Create a record with unknown country and anonymity
    pub fn new(address: String, port: String, scheme: Scheme, source: String) -> Self {
        Self {
            address,
            port,
            scheme,
            country: UNKNOWN.to_string(),
            anonymity: UNKNOWN.to_string(),
            source,
        }
    }

    pub fn with_country(mut self, country: String) -> Self {
        self.country = country;
        self
    }

    pub fn with_anonymity(mut self, anonymity: String) -> Self {
        self.anonymity = anonymity;
        self
    }

    /// Get the proxy URL string, e.g. `http://1.2.3.4:8080`
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.address, self.port)
    }

    /// Get the proxy string in IP:PORT format
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

impl fmt::Display for ProxyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url())
    }
}

/// Result of a single liveness probe. Failure causes are not kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Live,
    Unreachable,
}

/// A record paired with the outcome of its probe
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub record: ProxyRecord,
    pub liveness: Liveness,
}

impl ProbeOutcome {
    pub fn new(record: ProxyRecord, liveness: Liveness) -> Self {
        Self { record, liveness }
    }

    pub fn is_live(&self) -> bool {
        self.liveness == Liveness::Live
    }
}

/// What happened when a record was offered to a [`WorkingSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Added,
    Duplicate,
    Full,
}

/// Capped, insertion-ordered collection of scraped proxies
#[derive(Debug, Clone)]
pub struct WorkingSet {
    records: Vec<ProxyRecord>,
    seen: HashSet<(String, String)>,
    cap: usize,
}

impl WorkingSet {
    pub fn new(cap: usize) -> Self {
        Self {
            records: Vec::new(),
            seen: HashSet::new(),
            cap,
        }
    }

    /// Append a record unless the set is full or already holds its `address:port`
    pub fn push(&mut self, record: ProxyRecord) -> Admission {
        if self.is_full() {
            return Admission::Full;
        }
        let key = (record.address.clone(), record.port.clone());
        if !self.seen.insert(key) {
            return Admission::Duplicate;
        }
        self.records.push(record);
        Admission::Added
    }

    pub fn is_full(&self) -> bool {
        self.records.len() >= self.cap
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ProxyRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ProxyRecord> {
        self.records
    }
}

impl Default for WorkingSet {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PROXIES)
    }
}

impl From<Vec<ProxyRecord>> for WorkingSet {
    /// Build an uncapped set from already collected records
    fn from(records: Vec<ProxyRecord>) -> Self {
        let mut set = WorkingSet::new(usize::MAX);
        for record in records {
            set.push(record);
        }
        set
    }
}
