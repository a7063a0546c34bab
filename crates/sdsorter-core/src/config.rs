/// Run configuration — an immutable snapshot built once at startup.
///
/// Every component receives the same `RunConfig` by reference (or, for pool
/// workers, through an `Arc`). Nothing mutates it after
/// [`RunConfig::check_preconditions`] succeeds.
use crate::error::PreconditionError;
use std::ffi::OsStr;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension accepted when the caller supplies no filter of their own.
pub const DEFAULT_EXTENSION: &str = ".wav";

/// Default number of tasks pulled into one batch window.
///
/// At most this many tasks (and their outcomes) are alive at once in
/// multi-worker mode, regardless of how many files the source holds.
pub const DEFAULT_BATCH_SIZE: usize = 2_000;

/// Where a file's bucket date comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateSource {
    /// Parse the first `YYYY-MM-DD_` token out of the file name.
    #[default]
    Filename,
    /// Use the file's last-modified timestamp in local time.
    Mtime,
}

impl DateSource {
    pub fn label(self) -> &'static str {
        match self {
            Self::Filename => "filename",
            Self::Mtime => "mtime",
        }
    }
}

/// Copy (the safe default) or move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferMode {
    #[default]
    Copy,
    Move,
}

impl TransferMode {
    /// Upper-case verb used in dry-run log lines.
    pub fn verb(self) -> &'static str {
        match self {
            Self::Copy => "COPY",
            Self::Move => "MOVE",
        }
    }
}

/// Case-insensitive set of accepted file extensions.
///
/// Extensions are normalised once on construction: the leading dot is
/// optional and case is folded, so `wav`, `.wav` and `.WAV` are the same
/// entry. An empty filter accepts every file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    /// Lower-case extensions without the leading dot, deduplicated.
    exts: Vec<String>,
}

impl ExtensionFilter {
    pub fn new<I, S>(exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalised: Vec<String> = Vec::new();
        for ext in exts {
            let ext = ext.as_ref().trim().trim_start_matches('.').to_ascii_lowercase();
            if !ext.is_empty() && !normalised.contains(&ext) {
                normalised.push(ext);
            }
        }
        Self { exts: normalised }
    }

    /// A filter that lets every regular file through.
    pub fn accept_all() -> Self {
        Self { exts: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.exts.is_empty()
    }

    /// Normalised extensions, without dots.
    pub fn extensions(&self) -> &[String] {
        &self.exts
    }

    /// Whether `path` carries one of the accepted extensions.
    ///
    /// Hot path: compares in place with `eq_ignore_ascii_case` rather than
    /// allocating a lower-cased copy per file.
    pub fn matches(&self, path: &Path) -> bool {
        if self.exts.is_empty() {
            return true;
        }
        match path.extension().and_then(OsStr::to_str) {
            Some(ext) => self.exts.iter().any(|e| e.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }
}

impl Default for ExtensionFilter {
    fn default() -> Self {
        Self::new([DEFAULT_EXTENSION])
    }
}

/// Everything one run needs to know.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Root of the tree to scan (recursively).
    pub source: PathBuf,
    /// Root under which `YYYY/MM/DD` bucket folders are created.
    pub destination: PathBuf,
    pub mode: TransferMode,
    /// Log intended actions only; touch neither files nor directories.
    pub dry_run: bool,
    /// Strip write permission from each relocated file (best effort).
    pub readonly: bool,
    /// Tally per-file errors and keep going instead of aborting.
    pub skip_errors: bool,
    pub date_source: DateSource,
    pub extensions: ExtensionFilter,
    /// Parallel relocation workers. `1` runs everything on the calling thread.
    pub workers: NonZeroUsize,
    /// Batch window capacity for multi-worker mode.
    pub batch_size: NonZeroUsize,
}

impl RunConfig {
    /// A config with the tool's defaults: copy, filename dates, `.wav` only,
    /// one worker.
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            mode: TransferMode::Copy,
            dry_run: false,
            readonly: false,
            skip_errors: false,
            date_source: DateSource::Filename,
            extensions: ExtensionFilter::default(),
            workers: NonZeroUsize::MIN,
            batch_size: NonZeroUsize::new(DEFAULT_BATCH_SIZE).unwrap_or(NonZeroUsize::MIN),
        }
    }

    /// `true` when the coordinator should use the worker pool.
    pub fn is_parallel(&self) -> bool {
        self.workers.get() > 1
    }

    /// Validate the source directory and create the destination root.
    ///
    /// The destination root is left alone in dry-run mode.
    pub fn check_preconditions(&self) -> Result<(), PreconditionError> {
        if !self.source.exists() {
            return Err(PreconditionError::SourceMissing(self.source.clone()));
        }
        if !self.source.is_dir() {
            return Err(PreconditionError::SourceNotDirectory(self.source.clone()));
        }
        if !self.dry_run {
            fs::create_dir_all(&self.destination).map_err(|source| {
                PreconditionError::CreateDestination {
                    path: self.destination.clone(),
                    source,
                }
            })?;
        }
        debug!(
            source = %self.source.display(),
            destination = %self.destination.display(),
            mode = self.mode.verb(),
            date_source = self.date_source.label(),
            workers = self.workers.get(),
            "Preconditions satisfied"
        );
        Ok(())
    }
}
