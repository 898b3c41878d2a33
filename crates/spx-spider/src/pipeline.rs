use crate::config::Config;
use crate::constituents::{self, WIKIPEDIA_URL};
use crate::error::Result;
use crate::finnhub::{self, FinnhubClient};
use crate::fs::CsvSink;
use crate::http::Fetch;
use crate::tui;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// What a completed run produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub rows_written: usize,
    pub elapsed: Duration,
}

/// Scrape the constituents, enrich each with Finnhub statistics and write the CSV.
///
/// Listings are processed one at a time, in table order, sleeping `config.delay`
/// milliseconds after each one (the last included). The first failure ends the
/// run; rows written before it stay in the file.
pub async fn run<H: Fetch>(config: &Config, http: &H, tui: bool) -> Result<RunSummary> {
    let time = Instant::now();

    let delay = Duration::from_millis(config.delay);
    if delay < finnhub::min_delay() {
        warn!(
            "delay of {delay:?} is below {:?}; Finnhub may rate limit the run",
            finnhub::min_delay()
        );
    }

    if tui {
        tui::banner("S&P 500 Constituents");
    }

    // 1. scrape the constituents table
    let listings = constituents::fetch_listings(http, WIKIPEDIA_URL, config.limit).await?;

    // 2. open the output, header first
    let mut sink = CsvSink::create(&config.output_file)?;
    debug!("writing to {:?}", config.output_file);

    // 3. enrich & write, one listing at a time
    let finnhub = FinnhubClient::new(http, config.token.as_str());
    let pb = tui::listing_progress(listings.len(), tui);
    for (i, listing) in listings.iter().enumerate() {
        pb.set_message(format!("[{}] {}", listing.symbol, listing.name));

        let stats = match finnhub.statistics(&listing.symbol).await {
            Ok(stats) => stats,
            Err(err) => {
                pb.abandon();
                error!(
                    "failed to collect statistics for [{}] {} ({} of {}), error({err})",
                    listing.symbol,
                    listing.name,
                    i + 1,
                    listings.len()
                );
                return Err(err);
            }
        };

        sink.write_row(listing, &stats)?;
        debug!("[{}] {} written", listing.symbol, listing.name);
        pb.inc(1);

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    // 4. close out
    pb.finish_and_clear();
    let rows_written = sink.finish()?;
    if tui {
        println!("loading constituents ... done\n");
    }

    info!(
        "{rows_written} rows written to {:?}, {}",
        config.output_file,
        crate::time_elapsed(time)
    );

    Ok(RunSummary {
        rows_written,
        elapsed: time.elapsed(),
    })
}
