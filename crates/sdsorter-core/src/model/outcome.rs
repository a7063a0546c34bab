/// Per-file outcomes.
///
/// Exactly one [`Outcome`] is produced for every enumerated file. A
/// destination is present on success (including dry-run, where it is the
/// would-be path); an error is present on failure; never both.
use crate::error::RelocateError;
use std::path::{Path, PathBuf};

/// Result of the best-effort read-only marking step.
///
/// Kept apart from [`OutcomeStatus::Failed`] on purpose: a failed mark is
/// logged and otherwise ignored, it never turns a relocation into an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOnlyMark {
    /// `readonly` was not requested for this run.
    NotRequested,
    /// Write permission was stripped from the destination.
    Applied,
    /// Stripping write permission failed; carries the reason.
    Failed(String),
}

#[derive(Debug)]
pub enum OutcomeStatus {
    /// The file now lives at `destination`.
    Relocated {
        destination: PathBuf,
        /// Bytes copied. Zero for a same-device move (a rename copies nothing).
        bytes: u64,
        readonly: ReadOnlyMark,
    },
    /// Dry-run: the file would have been relocated to `destination`.
    DryRun { destination: PathBuf },
    /// The file could not be relocated.
    Failed(RelocateError),
    /// The run was aborted before this task started; nothing was touched.
    Cancelled,
}

/// Terminal record for one file.
#[derive(Debug)]
pub struct Outcome {
    pub source: PathBuf,
    pub status: OutcomeStatus,
}

impl Outcome {
    pub fn relocated(source: PathBuf, destination: PathBuf, bytes: u64, readonly: ReadOnlyMark) -> Self {
        Self {
            source,
            status: OutcomeStatus::Relocated {
                destination,
                bytes,
                readonly,
            },
        }
    }

    pub fn dry_run(source: PathBuf, destination: PathBuf) -> Self {
        Self {
            source,
            status: OutcomeStatus::DryRun { destination },
        }
    }

    pub fn failed(source: PathBuf, error: RelocateError) -> Self {
        Self {
            source,
            status: OutcomeStatus::Failed(error),
        }
    }

    pub fn cancelled(source: PathBuf) -> Self {
        Self {
            source,
            status: OutcomeStatus::Cancelled,
        }
    }

    /// Destination path (actual or would-be), if the file was relocated.
    pub fn destination(&self) -> Option<&Path> {
        match &self.status {
            OutcomeStatus::Relocated { destination, .. } | OutcomeStatus::DryRun { destination } => {
                Some(destination)
            }
            OutcomeStatus::Failed(_) | OutcomeStatus::Cancelled => None,
        }
    }

    pub fn error(&self) -> Option<&RelocateError> {
        match &self.status {
            OutcomeStatus::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error().is_some()
    }

    /// Bytes written to the destination; zero for every non-copy outcome.
    pub fn bytes(&self) -> u64 {
        match self.status {
            OutcomeStatus::Relocated { bytes, .. } => bytes,
            _ => 0,
        }
    }
}
