use crate::error::{Error, Result};
use crate::http::Fetch;
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, error, info, trace};

pub const WIKIPEDIA_URL: &str = "https://en.wikipedia.org/wiki/List_of_S%26P_500_companies";

// column layout of the constituents table:
// 0 symbol | 1 security | 2 SEC filings | 3 GICS sector | 4 GICS sub-industry | 5 HQ location
const SYMBOL: usize = 0;
const NAME: usize = 1;
const SECTOR: usize = 3;
const SUB_INDUSTRY: usize = 4;
const HQ_LOCATION: usize = 5;

const DEFAULT_CAPACITY: usize = 512;

lazy_static! {
    static ref CONSTITUENTS: Selector = Selector::parse("#constituents").expect("constituents selector");
    static ref ROW: Selector = Selector::parse("tr").expect("row selector");
    static ref CELL: Selector = Selector::parse("td").expect("cell selector");
}

/// One row of the constituents table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompanyListing {
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub sub_industry: String,
    pub hq_location: String,
}

// scrape
// ----------------------------------------------------------------------------

/// GET the constituents page at `url` and return its first `limit` listings.
pub async fn fetch_listings<H: Fetch>(
    http: &H,
    url: &str,
    limit: usize,
) -> Result<Vec<CompanyListing>> {
    info!("fetching index constituents ...");
    let html = http.get(url, &[]).await.map_err(|err| {
        error!("failed to fetch constituents page, error({err})");
        err
    })?;

    let listings = parse_listings(&html, limit).map_err(|err| {
        error!("failed to parse constituents page, error({err})");
        err
    })?;
    info!("{} constituents scraped", listings.len());

    Ok(listings)
}

/// Extract up to `limit` listings from the `#constituents` table, in document order.
///
/// Rows without any `<td>` (the `<th>` header) are passed over and do not count
/// toward `limit`. A data row narrower than six cells fails the whole parse.
pub fn parse_listings(html: &str, limit: usize) -> Result<Vec<CompanyListing>> {
    let document = Html::parse_document(html);

    let table = document
        .select(&CONSTITUENTS)
        .next()
        .ok_or_else(|| Error::Structural("no element with id `constituents`".to_string()))?;

    let tag = table.value().name();
    if tag != "table" {
        return Err(Error::Structural(format!(
            "element with id `constituents` is a <{tag}>, not a <table>"
        )));
    }

    let mut listings = Vec::with_capacity(limit.min(DEFAULT_CAPACITY));
    for (row_idx, row) in table.select(&ROW).enumerate() {
        if listings.len() == limit {
            break;
        }

        let cells: Vec<String> = row.select(&CELL).map(cell_text).collect();
        if cells.is_empty() {
            trace!("skipping header row {row_idx}");
            continue;
        }

        let listing = CompanyListing {
            symbol: column(&cells, row_idx, SYMBOL)?,
            name: column(&cells, row_idx, NAME)?,
            sector: column(&cells, row_idx, SECTOR)?,
            sub_industry: column(&cells, row_idx, SUB_INDUSTRY)?,
            hq_location: column(&cells, row_idx, HQ_LOCATION)?,
        };
        debug!("scraped [{}] {}", listing.symbol, listing.name);
        listings.push(listing);
    }

    Ok(listings)
}

// all descendant text of a cell, trimmed
fn cell_text(cell: ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn column(cells: &[String], row: usize, index: usize) -> Result<String> {
    cells.get(index).cloned().ok_or(Error::MissingColumn {
        row,
        index,
        found: cells.len(),
    })
}
