/// Relocation of a single file.
///
/// [`execute`] is the error boundary of the engine: whatever goes wrong for
/// one file comes back as an [`Outcome`], never as a panic or an `Err`.
use crate::bucket::bucket_dir;
use crate::config::{RunConfig, TransferMode};
use crate::date;
use crate::error::RelocateError;
use crate::model::{FileTask, Outcome, ReadOnlyMark};
use crate::platform::{copy_with_metadata, is_same_file, move_file, strip_write_permission};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Relocate `task` according to `config` and report what happened.
///
/// Steps: resolve the bucket date, build `dest/YYYY/MM/DD/<original name>`,
/// then (unless dry-run) create the bucket folder, copy or move, and
/// optionally strip write permission from the result.
pub fn execute(task: FileTask, config: &RunConfig) -> Outcome {
    let source = task.into_source();
    match relocate(&source, config) {
        Ok(Relocation::Done {
            destination,
            bytes,
            readonly,
        }) => Outcome::relocated(source, destination, bytes, readonly),
        Ok(Relocation::DryRun { destination }) => Outcome::dry_run(source, destination),
        Err(err) => Outcome::failed(source, err),
    }
}

enum Relocation {
    Done {
        destination: PathBuf,
        bytes: u64,
        readonly: ReadOnlyMark,
    },
    DryRun {
        destination: PathBuf,
    },
}

fn relocate(source: &Path, config: &RunConfig) -> Result<Relocation, RelocateError> {
    let date = date::resolve(source, config.date_source)?;
    let out_dir = bucket_dir(&config.destination, date);
    let file_name = source.file_name().ok_or_else(|| RelocateError::MissingFileName {
        path: source.to_path_buf(),
    })?;
    let destination = out_dir.join(file_name);

    if config.dry_run {
        info!(
            "[DRY] {} {} -> {}",
            config.mode.verb(),
            source.display(),
            destination.display()
        );
        return Ok(Relocation::DryRun { destination });
    }

    // `create_dir_all` treats a directory that appeared concurrently (another
    // worker bucketing the same day) as success.
    fs::create_dir_all(&out_dir).map_err(|e| RelocateError::CreateDir {
        path: out_dir.clone(),
        source: e,
    })?;

    // Destination inside (or equal to) the source tree: the file may already
    // sit in its bucket. Copying onto itself would truncate it.
    if is_same_file(source, &destination) {
        return Err(RelocateError::SameFile { path: destination });
    }

    let bytes = match config.mode {
        TransferMode::Copy => {
            copy_with_metadata(source, &destination).map_err(|e| RelocateError::Copy {
                from: source.to_path_buf(),
                to: destination.clone(),
                source: e,
            })?
        }
        TransferMode::Move => move_file(source, &destination)
            .map_err(|e| RelocateError::Move {
                from: source.to_path_buf(),
                to: destination.clone(),
                source: e,
            })?
            .bytes_copied(),
    };
    debug!(src = %source.display(), dest = %destination.display(), bytes, "{}", config.mode.verb());

    let readonly = if config.readonly {
        mark_read_only(&destination)
    } else {
        ReadOnlyMark::NotRequested
    };

    Ok(Relocation::Done {
        destination,
        bytes,
        readonly,
    })
}

/// Best effort: a failure is logged and recorded, never escalated.
fn mark_read_only(path: &Path) -> ReadOnlyMark {
    match strip_write_permission(path) {
        Ok(()) => ReadOnlyMark::Applied,
        Err(err) => {
            warn!("Failed to set read-only on {}: {err}", path.display());
            ReadOnlyMark::Failed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DateSource;
    use crate::error::DateError;
    use crate::model::OutcomeStatus;
    use tempfile::TempDir;

    fn setup(name: &str) -> (TempDir, PathBuf, RunConfig) {
        let tmp = TempDir::new().unwrap();
        let src_dir = tmp.path().join("in");
        fs::create_dir_all(&src_dir).unwrap();
        let file = src_dir.join(name);
        fs::write(&file, b"audio").unwrap();
        let config = RunConfig::new(&src_dir, tmp.path().join("out"));
        (tmp, file, config)
    }

    #[test]
    fn copy_lands_in_the_bucket_and_keeps_the_source() {
        let (tmp, file, config) = setup("2025-09-13_03-35-28.wav");
        let outcome = execute(FileTask::new(file.clone()), &config);

        let expected = tmp.path().join("out/2025/09/13/2025-09-13_03-35-28.wav");
        assert_eq!(outcome.destination(), Some(expected.as_path()));
        assert_eq!(outcome.bytes(), 5);
        assert_eq!(fs::read(&expected).unwrap(), b"audio");
        assert!(file.exists());
    }

    #[test]
    fn move_leaves_nothing_at_the_source() {
        let (tmp, file, mut config) = setup("2025-09-13_03-35-28.wav");
        config.mode = TransferMode::Move;
        let outcome = execute(FileTask::new(file.clone()), &config);

        assert!(!outcome.is_error(), "{:?}", outcome.error());
        assert!(!file.exists());
        assert!(tmp.path().join("out/2025/09/13/2025-09-13_03-35-28.wav").exists());
    }

    #[test]
    fn dry_run_touches_nothing() {
        let (tmp, file, mut config) = setup("2025-09-13_03-35-28.wav");
        config.dry_run = true;
        let outcome = execute(FileTask::new(file.clone()), &config);

        assert!(matches!(outcome.status, OutcomeStatus::DryRun { .. }));
        assert_eq!(
            outcome.destination(),
            Some(tmp.path().join("out/2025/09/13/2025-09-13_03-35-28.wav").as_path())
        );
        assert!(!tmp.path().join("out").exists());
        assert!(file.exists());
    }

    #[test]
    fn undated_name_is_an_error_outcome() {
        let (tmp, file, config) = setup("garbage_file.wav");
        let outcome = execute(FileTask::new(file), &config);

        assert!(matches!(
            outcome.error(),
            Some(RelocateError::Date(DateError::NoDateFound { .. }))
        ));
        assert!(!tmp.path().join("out").exists());
    }

    #[test]
    fn mtime_mode_buckets_undated_names() {
        let (_tmp, file, mut config) = setup("garbage_file.wav");
        config.date_source = DateSource::Mtime;
        let outcome = execute(FileTask::new(file), &config);
        assert!(!outcome.is_error(), "{:?}", outcome.error());
    }

    #[test]
    fn vanished_source_is_an_error_outcome() {
        let (_tmp, file, config) = setup("2025-09-13_03-35-28.wav");
        fs::remove_file(&file).unwrap();
        let outcome = execute(FileTask::new(file), &config);
        assert!(matches!(outcome.error(), Some(RelocateError::Copy { .. })));
    }

    #[test]
    fn readonly_marks_the_destination() {
        let (_tmp, file, mut config) = setup("2025-09-13_03-35-28.wav");
        config.readonly = true;
        let outcome = execute(FileTask::new(file), &config);

        match &outcome.status {
            OutcomeStatus::Relocated { destination, readonly, .. } => {
                assert_eq!(*readonly, ReadOnlyMark::Applied);
                assert!(fs::metadata(destination).unwrap().permissions().readonly());
            }
            other => panic!("unexpected status {other:?}"),
        }
    }

    #[test]
    fn existing_destination_is_overwritten() {
        let (tmp, file, config) = setup("2025-09-13_03-35-28.wav");
        let bucket = tmp.path().join("out/2025/09/13");
        fs::create_dir_all(&bucket).unwrap();
        fs::write(bucket.join("2025-09-13_03-35-28.wav"), b"stale data").unwrap();

        let outcome = execute(FileTask::new(file), &config);
        assert!(!outcome.is_error());
        assert_eq!(fs::read(bucket.join("2025-09-13_03-35-28.wav")).unwrap(), b"audio");
    }

    #[test]
    fn file_already_in_its_bucket_is_left_intact() {
        let tmp = TempDir::new().unwrap();
        let bucket = tmp.path().join("2025/09/13");
        fs::create_dir_all(&bucket).unwrap();
        let file = bucket.join("2025-09-13_03-35-28.wav");
        fs::write(&file, b"precious audio").unwrap();

        for mode in [TransferMode::Copy, TransferMode::Move] {
            let mut config = RunConfig::new(tmp.path(), tmp.path());
            config.mode = mode;
            let outcome = execute(FileTask::new(file.clone()), &config);

            assert!(
                matches!(outcome.error(), Some(RelocateError::SameFile { .. })),
                "{mode:?}: {:?}",
                outcome.status
            );
            assert_eq!(fs::read(&file).unwrap(), b"precious audio");
        }
    }
}
