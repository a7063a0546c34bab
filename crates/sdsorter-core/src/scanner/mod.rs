/// File enumeration — a lazy, single-pass walk of the source tree.
///
/// Built on `walkdir`, which reads directory entries incrementally through
/// the OS cursor instead of collecting each directory's listing first. A
/// flat folder holding a million recordings therefore never exists as a
/// million-element list anywhere in the process.
///
/// The scanner is an [`Iterator`] and nothing more: no upfront count, no
/// restart. Order is whatever the filesystem returns.
use crate::config::ExtensionFilter;
use crate::model::FileTask;
use std::path::{self, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Iterator over candidate files under a root directory.
///
/// Yields regular files whose extension passes the filter. Directories,
/// symlinks (to files or directories) and non-matching files are skipped
/// silently. Unreadable directories are logged, counted and skipped.
pub struct FileScanner {
    walker: walkdir::IntoIter,
    root: PathBuf,
    filter: ExtensionFilter,
    excluded: Option<PathBuf>,
    walk_errors: u64,
}

impl FileScanner {
    /// Start walking `root`. Nothing is read until the first `next()`.
    ///
    /// Relative roots are made absolute first so every yielded path is too.
    pub fn new(root: &Path, filter: ExtensionFilter) -> Self {
        let root: PathBuf = path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
        debug!(root = %root.display(), exts = ?filter.extensions(), "Starting file scan");
        let walker = WalkDir::new(&root).follow_links(false).into_iter();
        Self {
            walker,
            root,
            filter,
            excluded: None,
            walk_errors: 0,
        }
    }

    /// Never descend into `dir` when it lies strictly below the root.
    ///
    /// Used for a destination nested in the source, so files relocated
    /// earlier in the same run are not enumerated again. A `dir` equal to
    /// the root, or outside it, changes nothing.
    pub fn excluding(mut self, dir: &Path) -> Self {
        let dir = path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());
        if dir != self.root && dir.starts_with(&self.root) {
            debug!(dir = %dir.display(), "Excluding subtree from scan");
            self.excluded = Some(dir);
        }
        self
    }

    /// Directory entries that could not be read so far.
    pub fn walk_errors(&self) -> u64 {
        self.walk_errors
    }
}

impl Iterator for FileScanner {
    type Item = FileTask;

    fn next(&mut self) -> Option<FileTask> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    self.walk_errors += 1;
                    let err_path = err
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default();
                    warn!(path = %err_path, "Cannot read directory entry: {err}");
                    continue;
                }
            };

            if entry.file_type().is_dir() && self.excluded.as_deref() == Some(entry.path()) {
                self.walker.skip_current_dir();
                continue;
            }
            // `file_type()` is the entry's own type (links are not followed),
            // so symlinks fall through here as neither file nor directory.
            if !entry.file_type().is_file() {
                continue;
            }
            if !self.filter.matches(entry.path()) {
                continue;
            }

            return Some(FileTask::new(entry.into_path()));
        }
    }
}
