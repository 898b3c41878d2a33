use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Scrape the S&P 500 constituents, enrich them with Finnhub statistics and
/// write the result to a CSV file.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the YAML config file (token, outputFile, delay).
    #[arg(short, long, default_value = "./config.yaml")]
    pub config: PathBuf,

    /// Sets the level of tracing.
    ///
    /// Without it, a progress bar is shown instead.
    #[arg(short, long)]
    pub trace: Option<TraceLevel>,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
#[clap(rename_all = "UPPERCASE")]
pub enum TraceLevel {
    DEBUG,
    ERROR,
    INFO,
    TRACE,
    WARN,
}
