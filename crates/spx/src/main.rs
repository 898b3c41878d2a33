mod cli;

// remote imports
use clap::Parser;
use cli::{Cli, TraceLevel};
use spx_spider::{pipeline, Config};
use tracing::{info, subscriber, trace, Level};
use tracing_subscriber::FmtSubscriber;

////////////////////////////////////////////////////////////////////////////

// install the subscriber at the requested trace level
fn preprocess(trace_level: Level) -> anyhow::Result<()> {
    let my_subscriber = FmtSubscriber::builder()
        .with_max_level(trace_level)
        .finish();
    subscriber::set_global_default(my_subscriber)?;
    Ok(())
}

////////////////////////////////////////////////////////////////////////////

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // set the trace level
    if let Some(trace_level) = cli.trace {
        preprocess(match trace_level {
            TraceLevel::DEBUG => Level::DEBUG,
            TraceLevel::ERROR => Level::ERROR,
            TraceLevel::INFO => Level::INFO,
            TraceLevel::TRACE => Level::TRACE,
            TraceLevel::WARN => Level::WARN,
        })?;
    }
    trace!("command line input recorded: {cli:?}");

    // if no trace level provided, use tui
    let tui = cli.trace.is_none();

    let config = Config::load(&cli.config)?;
    let http = spx_spider::http::ReqwestFetch::new(spx_spider::std_client_build()?);

    let summary = pipeline::run(&config, &http, tui).await?;
    info!(
        "spider finished, {} rows written, time elapsed: {:?}",
        summary.rows_written, summary.elapsed
    );

    Ok(())
}
