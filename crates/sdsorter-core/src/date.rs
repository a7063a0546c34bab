/// Bucket-date resolution.
///
/// Scanner recordings are named `yyyy-mm-dd_hh-mm-ss.wav`; only the date
/// portion picks the bucket. The token is *searched for*, not matched
/// against the whole name, so arbitrary prefixes and suffixes are fine. Its
/// internal shape is strict, and digits that do not form a real calendar
/// date are rejected rather than bucketed somewhere nonsensical.
use crate::config::DateSource;
use crate::error::DateError;
use chrono::{DateTime, Local, NaiveDate};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// `yyyy-mm-dd_` anywhere in a file name. ASCII digits only.
static DATE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<y>[0-9]{4})-(?P<m>[0-9]{2})-(?P<d>[0-9]{2})_").expect("date token regex is valid")
});

/// Resolve the bucket date for `path` according to `source`.
pub fn resolve(path: &Path, source: DateSource) -> Result<NaiveDate, DateError> {
    match source {
        DateSource::Filename => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_default();
            date_from_filename(&name)
        }
        DateSource::Mtime => date_from_mtime(path),
    }
}

/// Parse the first `yyyy-mm-dd_` token in `name`.
///
/// Only the first occurrence is considered: if it is not a valid date the
/// name is rejected even when a later token would have been valid.
pub fn date_from_filename(name: &str) -> Result<NaiveDate, DateError> {
    let caps = DATE_TOKEN.captures(name).ok_or_else(|| DateError::NoDateFound {
        name: name.to_owned(),
    })?;

    // The regex guarantees ASCII digits of fixed width, so these parses
    // cannot overflow; default to 0 (never a valid month/day) regardless.
    let year: i32 = caps["y"].parse().unwrap_or(0);
    let month: u32 = caps["m"].parse().unwrap_or(0);
    let day: u32 = caps["d"].parse().unwrap_or(0);

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| DateError::InvalidDate {
        name: name.to_owned(),
        year,
        month,
        day,
    })
}

/// Calendar date (local time) of the file's last modification.
pub fn date_from_mtime(path: &Path) -> Result<NaiveDate, DateError> {
    let modified = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(DateError::Metadata)?;
    Ok(DateTime::<Local>::from(modified).date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn canonical_name_resolves() {
        assert_eq!(date_from_filename("2025-09-13_03-35-28.wav").unwrap(), ymd(2025, 9, 13));
    }

    #[test]
    fn token_is_found_anywhere_in_the_name() {
        for name in [
            "SDS100_2025-09-13_03-35-28.wav",
            "ch12 - 2025-09-13_.wav",
            "xx2025-09-13_yy",
            "2025-09-13_",
        ] {
            assert_eq!(date_from_filename(name).unwrap(), ymd(2025, 9, 13), "{name}");
        }
    }

    #[test]
    fn name_without_token_is_no_date_found() {
        for name in ["garbage_file.wav", "2025-09-13.wav", "2025_09_13_x.wav", "25-09-13_x.wav", ""] {
            assert!(
                matches!(date_from_filename(name), Err(DateError::NoDateFound { .. })),
                "{name}"
            );
        }
    }

    #[test]
    fn impossible_calendar_date_is_invalid() {
        for name in ["2025-13-01_x.wav", "2025-02-30_x.wav", "2025-00-10_x.wav", "2023-02-29_x.wav"] {
            assert!(
                matches!(date_from_filename(name), Err(DateError::InvalidDate { .. })),
                "{name}"
            );
        }
        // Leap day in a leap year is fine.
        assert_eq!(date_from_filename("2024-02-29_x.wav").unwrap(), ymd(2024, 2, 29));
    }

    #[test]
    fn first_token_wins() {
        assert_eq!(
            date_from_filename("2020-01-02_copy_of_2021-03-04_x.wav").unwrap(),
            ymd(2020, 1, 2)
        );
        assert!(matches!(
            date_from_filename("2020-99-02_then_2021-03-04_x.wav"),
            Err(DateError::InvalidDate { .. })
        ));
    }

    #[test]
    fn resolve_uses_only_the_base_name() {
        let path = Path::new("/archive/2019-01-01_dump/garbage.wav");
        assert!(matches!(
            resolve(path, DateSource::Filename),
            Err(DateError::NoDateFound { .. })
        ));
    }

    #[test]
    fn mtime_mode_reads_the_modification_time() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("garbage_file.wav");
        let file = File::create(&path).unwrap();
        // 2021-06-15 12:00:00 UTC; noon keeps the local date stable in any zone
        // within +/- 11 hours.
        let stamp = SystemTime::UNIX_EPOCH + Duration::from_secs(1_623_758_400);
        file.set_modified(stamp).unwrap();
        drop(file);

        let expected = DateTime::<Local>::from(stamp).date_naive();
        assert_eq!(resolve(&path, DateSource::Mtime).unwrap(), expected);
    }

    #[test]
    fn mtime_mode_fails_only_without_metadata() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            resolve(&tmp.path().join("vanished.wav"), DateSource::Mtime),
            Err(DateError::Metadata(_))
        ));
    }
}
