/// Run progress reporting — lightweight messages sent from the run thread
/// to the frontend via a crossbeam channel.
///
/// One per-file message is sent for every outcome, so a frontend can
/// advance a counter by one per message without knowing the total.
use crate::relocate::aggregate::RunSummary;
use std::path::PathBuf;

#[derive(Debug)]
pub enum RunProgress {
    /// Streaming has begun. `workers` is the pool size actually in use.
    Started { workers: usize },
    /// A file was relocated, or would have been in dry-run.
    Relocated {
        source: PathBuf,
        destination: PathBuf,
        dry_run: bool,
    },
    /// A file could not be relocated.
    Failed { source: PathBuf, message: String },
    /// A file was dropped from its window because the run stopped.
    Cancelled { source: PathBuf },
    /// The run is over; no further messages follow.
    Finished(RunSummary),
}
