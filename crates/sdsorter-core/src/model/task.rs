/// A single unit of relocation work.
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// One enumerated file, waiting to be relocated.
///
/// Immutable once created. The bucket date and destination are resolved
/// lazily by the executor, not stored here, so a task in a batch window
/// costs little more than its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    source: PathBuf,
}

impl FileTask {
    pub fn new(source: PathBuf) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The original file name; never altered by relocation.
    pub fn file_name(&self) -> Option<&OsStr> {
        self.source.file_name()
    }

    pub fn into_source(self) -> PathBuf {
        self.source
    }
}
