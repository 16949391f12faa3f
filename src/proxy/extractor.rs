//! Extraction of proxy records from listing pages
//!
//! Listing sites publish their proxies in a table with the id
//! `proxylisttable`: IP, port, code, country, anonymity, ... The first row is
//! the header. Every other row with at least two cells becomes a record;
//! missing trailing cells fall back to [`UNKNOWN`].

use crate::proxy::models::{Admission, ProxyRecord, WorkingSet, UNKNOWN};
use crate::proxy::sources::ProxySource;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Selector for the proxy table on listing pages
static TABLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("table#proxylisttable").expect("Invalid proxy table selector")
});

static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("Invalid row selector"));

static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td").expect("Invalid cell selector"));

const ADDRESS_COLUMN: usize = 0;
const PORT_COLUMN: usize = 1;
const COUNTRY_COLUMN: usize = 3;
const ANONYMITY_COLUMN: usize = 4;

/// Outcome of scanning one document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// The document has no proxy table
    TableMissing,
    /// The table was scanned; `added` records went into the working set
    Scanned { added: usize, skipped: usize },
}

impl Extraction {
    pub fn added(&self) -> usize {
        match self {
            Extraction::TableMissing => 0,
            Extraction::Scanned { added, .. } => *added,
        }
    }
}

/// Scan `document` for proxies and append them to `set`.
///
/// Scanning stops as soon as the set is full.
pub fn extract_into(document: &str, source: &ProxySource, set: &mut WorkingSet) -> Extraction {
    let html = Html::parse_document(document);
    let Some(table) = html.select(&TABLE_SELECTOR).next() else {
        return Extraction::TableMissing;
    };

    let mut added = 0;
    let mut skipped = 0;

    for row in table.select(&ROW_SELECTOR).skip(1) {
        if set.is_full() {
            break;
        }

        let cells = row_cells(row);
        let Some(record) = parse_row(&cells, source) else {
            debug!("Skipping malformed row from {}: {:?}", source.name, cells);
            skipped += 1;
            continue;
        };

        match set.push(record) {
            Admission::Added => added += 1,
            Admission::Duplicate => skipped += 1,
            Admission::Full => break,
        }
    }

    Extraction::Scanned { added, skipped }
}

/// Build a record from the text of one table row
///
/// Returns `None` when the row has fewer than two cells or a blank address or
/// port.
pub fn parse_row(cells: &[String], source: &ProxySource) -> Option<ProxyRecord> {
    if cells.len() < 2 {
        return None;
    }

    let address = cell(cells, ADDRESS_COLUMN)?;
    let port = cell(cells, PORT_COLUMN)?;

    let record = ProxyRecord::new(address, port, source.scheme(), source.url.clone())
        .with_country(cell(cells, COUNTRY_COLUMN).unwrap_or_else(|| UNKNOWN.to_string()))
        .with_anonymity(cell(cells, ANONYMITY_COLUMN).unwrap_or_else(|| UNKNOWN.to_string()));

    Some(record)
}

fn row_cells(row: ElementRef<'_>) -> Vec<String> {
    row.select(&CELL_SELECTOR)
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .collect()
}

fn cell(cells: &[String], index: usize) -> Option<String> {
    cells
        .get(index)
        .filter(|text| !text.is_empty())
        .cloned()
}
