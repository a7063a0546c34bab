/// Error taxonomy.
///
/// Three tiers, matching how far an error is allowed to travel:
///
/// - [`PreconditionError`] — detected before any file is touched; fatal.
/// - [`RelocateError`] — one file could not be relocated. Always caught at the
///   executor boundary and carried as data inside an
///   [`Outcome`](crate::model::Outcome), never unwound past it.
/// - [`DateError`] — the date resolver's own failure reasons, wrapped by
///   [`RelocateError::Date`].
///
/// Best-effort failures (read-only marking) are not errors at all; see
/// [`ReadOnlyMark`](crate::model::ReadOnlyMark).
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a bucket date could not be derived from a file.
#[derive(Debug, Error)]
pub enum DateError {
    /// The file name has no `YYYY-MM-DD_` token anywhere in it.
    #[error("No valid date in filename: {name}")]
    NoDateFound { name: String },

    /// A token was found but its digits are not a real calendar date.
    #[error("Invalid date {year:04}-{month:02}-{day:02} in filename: {name}")]
    InvalidDate {
        name: String,
        year: i32,
        month: u32,
        day: u32,
    },

    /// The modification time could not be read.
    #[error("cannot read modification time: {0}")]
    Metadata(#[source] io::Error),
}

/// A per-file failure inside the relocation executor.
#[derive(Debug, Error)]
pub enum RelocateError {
    #[error(transparent)]
    Date(#[from] DateError),

    #[error("source path has no file name: {}", .path.display())]
    MissingFileName { path: PathBuf },

    /// The computed destination is the source file itself (already sorted,
    /// or reached through a link).
    #[error("source and destination are the same file: {}", .path.display())]
    SameFile { path: PathBuf },

    #[error("cannot create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("copy {} -> {} failed: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("move {} -> {} failed: {source}", .from.display(), .to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A fatal condition detected before streaming begins.
#[derive(Debug, Error)]
pub enum PreconditionError {
    #[error("Source directory not found: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("Source is not a directory: {}", .0.display())]
    SourceNotDirectory(PathBuf),

    #[error("cannot create destination root {}: {source}", .path.display())]
    CreateDestination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
