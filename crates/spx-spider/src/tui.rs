use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress over the constituent list: count, elapsed time and ETA.
///
/// Hidden when `tui` is off, so tracing output is not interleaved with it.
pub(crate) fn listing_progress(len: usize, tui: bool) -> ProgressBar {
    if !tui {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar().template(
        "{msg} {spinner:.magenta}\n\
        [{elapsed_precise:.magenta}] |{bar:40.cyan/blue}| ({pos}/{len}) \
        [Elapsed: {elapsed}, Remaining: {eta:.blue}]",
    );
    match style {
        Ok(style) => pb.set_style(style.progress_chars("##-")),
        Err(err) => tracing::warn!("invalid progress template, error({err})"),
    }
    pb.set_message("loading constituents ...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Section banner printed above the progress bar.
pub(crate) fn banner(name: &str) {
    println!(
        "{bar}\n{name:^40}\n{bar}",
        bar = "=".repeat(40),
        name = name
    );
}
