/// Outcome aggregation and the abort-vs-continue policy.
///
/// The aggregator lives on the coordinating thread only. Workers never touch
/// it; their outcomes reach it through a channel, so the error tally needs no
/// lock or atomic.
use crate::model::{Outcome, OutcomeStatus};
use std::time::Duration;
use tracing::{debug, error, warn};

/// Final status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every file was relocated (or, in dry-run, would have been).
    Success,
    /// `skip_errors` was on and at least one file failed.
    CompletedWithErrors,
    /// A file failed with `skip_errors` off; the run stopped there.
    Aborted,
    /// The run was stopped from outside before the source was exhausted.
    Cancelled,
}

impl Verdict {
    /// Process exit status for this verdict.
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::CompletedWithErrors | Self::Aborted | Self::Cancelled => 1,
        }
    }
}

/// Whether the coordinator may keep pulling work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Abort,
}

/// Totals for a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Outcomes received; one per enumerated file.
    pub processed: u64,
    /// Files relocated, or reported as would-be relocated in dry-run.
    pub relocated: u64,
    /// The error tally.
    pub failed: u64,
    /// Files pulled into a window but never started because the run stopped.
    pub cancelled: u64,
    /// Bytes written to the destination tree.
    pub bytes: u64,
    /// Directory entries the scanner could not read.
    pub walk_errors: u64,
    /// Largest number of tasks alive at once.
    pub peak_in_flight: usize,
    pub duration: Duration,
    pub verdict: Verdict,
}

impl RunSummary {
    /// Files that were actually worked on; cancelled ones are left out.
    pub fn attempted(&self) -> u64 {
        self.relocated + self.failed
    }
}

/// Running tally for one run.
#[derive(Debug)]
pub struct OutcomeAggregator {
    skip_errors: bool,
    processed: u64,
    relocated: u64,
    failed: u64,
    cancelled: u64,
    bytes: u64,
    peak_in_flight: usize,
    aborted: bool,
}

impl OutcomeAggregator {
    pub fn new(skip_errors: bool) -> Self {
        Self {
            skip_errors,
            processed: 0,
            relocated: 0,
            failed: 0,
            cancelled: 0,
            bytes: 0,
            peak_in_flight: 0,
            aborted: false,
        }
    }

    /// Fold one outcome into the tally and decide whether to go on.
    ///
    /// Returns [`Flow::Abort`] for the first error when errors are not
    /// skipped. Outcomes that arrive after the abort (siblings already running
    /// in the same window) are still counted but not escalated again.
    pub fn record(&mut self, outcome: &Outcome) -> Flow {
        self.processed += 1;
        match &outcome.status {
            OutcomeStatus::Relocated { destination, .. } => {
                self.relocated += 1;
                self.bytes += outcome.bytes();
                debug!(src = %outcome.source.display(), dest = %destination.display(), "Relocated");
            }
            OutcomeStatus::DryRun { .. } => self.relocated += 1,
            OutcomeStatus::Cancelled => self.cancelled += 1,
            OutcomeStatus::Failed(err) => {
                self.failed += 1;
                if self.skip_errors {
                    warn!("SKIP {} :: {err}", outcome.source.display());
                } else if self.aborted {
                    error!("ERROR on {} (after abort): {err}", outcome.source.display());
                } else {
                    error!("ERROR on {}: {err}", outcome.source.display());
                    self.aborted = true;
                    return Flow::Abort;
                }
            }
        }
        if self.aborted {
            Flow::Abort
        } else {
            Flow::Continue
        }
    }

    /// Record the size of a window about to be dispatched.
    pub fn note_in_flight(&mut self, in_flight: usize) {
        self.peak_in_flight = self.peak_in_flight.max(in_flight);
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Close the tally. `cancelled_externally` marks a run stopped by its
    /// handle rather than by a file error.
    pub fn finish(self, walk_errors: u64, duration: Duration, cancelled_externally: bool) -> RunSummary {
        let verdict = if self.aborted {
            Verdict::Aborted
        } else if cancelled_externally {
            Verdict::Cancelled
        } else if self.failed > 0 {
            Verdict::CompletedWithErrors
        } else {
            Verdict::Success
        };
        RunSummary {
            processed: self.processed,
            relocated: self.relocated,
            failed: self.failed,
            cancelled: self.cancelled,
            bytes: self.bytes,
            walk_errors,
            peak_in_flight: self.peak_in_flight,
            duration,
            verdict,
        }
    }
}
