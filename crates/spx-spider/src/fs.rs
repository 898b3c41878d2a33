use crate::constituents::CompanyListing;
use crate::error::Result;
use crate::finnhub::StatisticsRecord;
use serde_json::Number;
use std::fs::File;
use std::path::Path;
use tracing::{error, trace};

pub const HEADER: [&str; 9] = [
    "symbol",
    "name",
    "sector",
    "subindustry",
    "hq_location",
    "price",
    "52_week_low",
    "52_week_high",
    "market_cap",
];

/// CSV output, one flushed row per enriched listing.
///
/// Rows reach the disk as they are written, so a run that fails part way
/// leaves every completed row behind.
pub struct CsvSink {
    writer: csv::Writer<File>,
    rows: usize,
}

impl CsvSink {
    /// Create (or truncate) `path` and write the header row.
    ///
    /// Parent directories are created as necessary.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // ensure the directory exists
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            trace!("checking directory path: {dir:?}");
            std::fs::create_dir_all(dir)?;
        }

        let file = File::create(path).map_err(|err| {
            error!("failed to create {path:?}, error({err})");
            err
        })?;
        // rows end in CRLF
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::CRLF)
            .from_writer(file);
        writer.write_record(HEADER)?;
        writer.flush()?;

        Ok(Self { writer, rows: 0 })
    }

    pub fn write_row(&mut self, listing: &CompanyListing, stats: &StatisticsRecord) -> Result<()> {
        let price = cell(&stats.price);
        let low = cell(&stats.week_low_52);
        let high = cell(&stats.week_high_52);
        let cap = cell(&stats.market_cap);

        self.writer.write_record([
            listing.symbol.as_str(),
            listing.name.as_str(),
            listing.sector.as_str(),
            listing.sub_industry.as_str(),
            listing.hq_location.as_str(),
            price.as_str(),
            low.as_str(),
            high.as_str(),
            cap.as_str(),
        ])?;
        self.writer.flush()?;
        self.rows += 1;

        Ok(())
    }

    /// Data rows written so far, header excluded.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush()?;
        Ok(self.rows)
    }
}

// `null` statistics are written as empty cells
fn cell(value: &Option<Number>) -> String {
    value.as_ref().map(Number::to_string).unwrap_or_default()
}
