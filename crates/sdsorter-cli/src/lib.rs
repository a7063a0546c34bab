/// sdsorter CLI — terminal frontend.
///
/// This crate contains argument parsing, logging setup, progress rendering
/// and exit-code mapping. Business logic lives in `sdsorter-core`.
pub mod args;
pub mod logging;
pub mod progress;

pub use args::Args;

use progress::ProgressReporter;
use sdsorter_core::model::size::{files_per_second, format_count, format_size};
use sdsorter_core::relocate::RunProgress;
use sdsorter_core::{start_run, RunSummary, Verdict};
use tracing::{debug, error, info, warn};

/// Exit status for failures detected before any file is processed.
pub const EXIT_PRECONDITION: u8 = 2;

/// Set up logging from `args`, run, and return the process exit status.
pub fn main_with(args: &Args) -> u8 {
    let progress = ProgressReporter::new(!args.quiet);
    if let Err(err) = logging::init(args.verbose, args.quiet, args.logfile.as_deref(), progress.bar()) {
        progress.finish();
        eprintln!("sdsorter: {err:#}");
        return EXIT_PRECONDITION;
    }
    match sort(args, &progress) {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            EXIT_PRECONDITION
        }
    }
}

/// Run one sort and return the exit status.
///
/// Logging must already be initialised (or deliberately left off, as in
/// tests). Precondition failures map to [`EXIT_PRECONDITION`].
pub fn run(args: &Args) -> anyhow::Result<u8> {
    sort(args, &ProgressReporter::new(!args.quiet))
}

fn sort(args: &Args, progress: &ProgressReporter) -> anyhow::Result<u8> {
    let handle = match start_run(args.to_config()) {
        Ok(handle) => handle,
        Err(err) => {
            progress.finish();
            error!("{err}");
            return Ok(EXIT_PRECONDITION);
        }
    };

    let mut errors: u64 = 0;
    for message in handle.progress_rx.iter() {
        match message {
            RunProgress::Started { workers } => debug!("Running with {workers} worker(s)"),
            RunProgress::Relocated { .. } => progress.advance(),
            RunProgress::Failed { .. } => {
                errors += 1;
                progress.advance();
                progress.set_errors(errors);
            }
            RunProgress::Cancelled { .. } => {}
            RunProgress::Finished(_) => break,
        }
    }
    progress.finish();

    let summary = handle
        .join()
        .map_err(|_| anyhow::anyhow!("relocation thread panicked"))?;
    report(&summary);
    Ok(summary.verdict.exit_code())
}

/// Final summary line(s).
fn report(summary: &RunSummary) {
    info!(
        "{} files relocated ({}), {} files/s",
        format_count(summary.relocated),
        format_size(summary.bytes),
        format_count(files_per_second(summary.attempted(), summary.duration))
    );
    if summary.walk_errors > 0 {
        warn!("{} directory entries could not be read", format_count(summary.walk_errors));
    }
    match summary.verdict {
        Verdict::Success => info!("Done"),
        Verdict::CompletedWithErrors => warn!("Completed with {} file error(s)", summary.failed),
        Verdict::Aborted => error!(
            "Aborted on first error: {} file(s) processed, {} not started",
            format_count(summary.processed),
            format_count(summary.cancelled)
        ),
        Verdict::Cancelled => warn!("Cancelled after {} file(s)", format_count(summary.processed)),
    }
}
