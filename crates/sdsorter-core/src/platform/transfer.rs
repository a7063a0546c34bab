/// Copy and move primitives.
///
/// Both overwrite an existing file at the destination without asking, so
/// callers check [`is_same_file`] first.
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// How [`move_file`] got the file to its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveMethod {
    /// Same device: a single rename, no data copied.
    Renamed,
    /// Different devices: copied (this many bytes), then the source removed.
    CopiedAcrossDevices(u64),
}

impl MoveMethod {
    pub fn bytes_copied(self) -> u64 {
        match self {
            Self::Renamed => 0,
            Self::CopiedAcrossDevices(bytes) => bytes,
        }
    }
}

/// Copy `from` to `to`, keeping permission bits and access/modification
/// times. Returns the number of bytes copied.
pub fn copy_with_metadata(from: &Path, to: &Path) -> io::Result<u64> {
    let bytes = fs::copy(from, to)?;
    preserve_times(from, to)?;
    Ok(bytes)
}

/// `true` when `to` exists and is the very file `from` names (same path,
/// hard link or symlink). Copying a file onto itself truncates it.
pub fn is_same_file(from: &Path, to: &Path) -> bool {
    // A missing destination is an error here, and never the same file.
    matches!(same_file::is_same_file(from, to), Ok(true))
}

/// Move `from` to `to`.
///
/// Tries a rename first. A rename cannot cross filesystems, so on a
/// cross-device error the file is copied with its metadata and the source
/// is removed afterwards. Any other rename error is returned as is.
pub fn move_file(from: &Path, to: &Path) -> io::Result<MoveMethod> {
    match fs::rename(from, to) {
        Ok(()) => Ok(MoveMethod::Renamed),
        Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
            debug!(src = %from.display(), dest = %to.display(), "Rename crosses devices; copying instead");
            copy_then_remove(from, to).map(MoveMethod::CopiedAcrossDevices)
        }
        Err(err) => Err(err),
    }
}

/// The cross-device half of [`move_file`]. The source is removed only once
/// the copy, timestamps included, has succeeded.
fn copy_then_remove(from: &Path, to: &Path) -> io::Result<u64> {
    let bytes = copy_with_metadata(from, to)?;
    fs::remove_file(from)?;
    Ok(bytes)
}

/// `fs::copy` carries permission bits but not timestamps on Unix.
///
/// The copy may already be read-only (permissions came from the source), so
/// the handle is opened for reading; `futimens` only needs ownership.
#[cfg(unix)]
fn preserve_times(from: &Path, to: &Path) -> io::Result<()> {
    let meta = fs::metadata(from)?;
    let mut times = fs::FileTimes::new().set_modified(meta.modified()?);
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }
    fs::File::open(to)?.set_times(times)
}

/// `CopyFileExW` already carries the timestamps across.
#[cfg(not(unix))]
fn preserve_times(_from: &Path, _to: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    #[test]
    fn copy_keeps_content_and_mtime() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.wav");
        let dst = tmp.path().join("b.wav");
        fs::write(&src, b"RIFF....WAVE").unwrap();
        let stamp = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        fs::File::options().write(true).open(&src).unwrap().set_modified(stamp).unwrap();

        let bytes = copy_with_metadata(&src, &dst).unwrap();
        assert_eq!(bytes, 12);
        assert_eq!(fs::read(&dst).unwrap(), b"RIFF....WAVE");
        assert_eq!(fs::metadata(&dst).unwrap().modified().unwrap(), stamp);
        assert!(src.exists());
    }

    #[test]
    fn copy_overwrites_existing_destination() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.wav");
        let dst = tmp.path().join("b.wav");
        fs::write(&src, b"new").unwrap();
        fs::write(&dst, b"old contents").unwrap();

        copy_with_metadata(&src, &dst).unwrap();
        assert_eq!(fs::read(&dst).unwrap(), b"new");
    }

    #[test]
    fn move_on_one_device_is_a_rename() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.wav");
        let dst = tmp.path().join("b.wav");
        fs::write(&src, b"data").unwrap();

        assert_eq!(move_file(&src, &dst).unwrap(), MoveMethod::Renamed);
        assert!(!src.exists());
        assert_eq!(fs::read(&dst).unwrap(), b"data");
    }

    #[test]
    fn move_of_missing_source_fails() {
        let tmp = TempDir::new().unwrap();
        let err = move_file(&tmp.path().join("gone.wav"), &tmp.path().join("b.wav")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn other_rename_errors_are_returned_unchanged() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.wav");
        let dst = tmp.path().join("occupied");
        fs::write(&src, b"data").unwrap();
        fs::create_dir_all(dst.join("inner")).unwrap();

        // Renaming a file over a non-empty directory fails on every platform.
        let err = move_file(&src, &dst).unwrap_err();
        assert_ne!(err.kind(), io::ErrorKind::CrossesDevices);
        assert_eq!(fs::read(&src).unwrap(), b"data", "no fallback may touch the source");
        assert!(dst.join("inner").is_dir());
    }

    #[test]
    fn copy_then_remove_moves_content_and_mtime() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.wav");
        let dst = tmp.path().join("b.wav");
        fs::write(&src, b"RIFF").unwrap();
        let stamp = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        fs::File::options().write(true).open(&src).unwrap().set_modified(stamp).unwrap();

        assert_eq!(copy_then_remove(&src, &dst).unwrap(), 4);
        assert!(!src.exists());
        assert_eq!(fs::read(&dst).unwrap(), b"RIFF");
        assert_eq!(fs::metadata(&dst).unwrap().modified().unwrap(), stamp);
    }

    #[test]
    fn copy_then_remove_keeps_source_when_copy_fails() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.wav");
        fs::write(&src, b"RIFF").unwrap();

        let err = copy_then_remove(&src, &tmp.path().join("missing/dir/b.wav")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(src.exists());
    }

    #[test]
    fn same_file_detects_identity_not_names() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.wav");
        let b = tmp.path().join("b.wav");
        fs::write(&a, b"x").unwrap();
        fs::write(&b, b"x").unwrap();

        assert!(is_same_file(&a, &a));
        assert!(is_same_file(&a, &tmp.path().join(".").join("a.wav")));
        assert!(!is_same_file(&a, &b), "equal content is not identity");
        assert!(!is_same_file(&a, &tmp.path().join("absent.wav")));

        let linked = tmp.path().join("linked.wav");
        fs::hard_link(&a, &linked).unwrap();
        assert!(is_same_file(&a, &linked));
    }

    #[test]
    fn bytes_copied_is_zero_for_a_rename() {
        assert_eq!(MoveMethod::Renamed.bytes_copied(), 0);
        assert_eq!(MoveMethod::CopiedAcrossDevices(42).bytes_copied(), 42);
    }
}
