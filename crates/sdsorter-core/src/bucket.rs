/// Bucket folder mapping: `root/YYYY/MM/DD`.
///
/// Pure path arithmetic. Nothing here checks or creates directories; that is
/// the executor's job.
use chrono::{Datelike, NaiveDate};
use std::path::{Path, PathBuf};

/// The bucket folder for `date` under `root`.
///
/// Year is four digits, month and day two, all zero-padded, so two distinct
/// dates never share a folder and one date always maps to the same folder.
pub fn bucket_dir(root: &Path, date: NaiveDate) -> PathBuf {
    root.join(format!("{:04}", date.year()))
        .join(format!("{:02}", date.month()))
        .join(format!("{:02}", date.day()))
}
