/// Human-readable byte counts, file counts and throughput for run summaries.
///
/// All internal sizes are `u64` bytes. Floating point is only used at the
/// display-formatting boundary.
use std::time::Duration;

/// Binary units (1 KB = 1024 B), labelled with the short forms users expect.
const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

/// Format a byte count, e.g. `512 B`, `1.5 KB`, `3.20 GB`.
///
/// One decimal below a gigabyte, two from there on, where archives of
/// recordings usually land.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    value /= 1024.0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    if unit >= 2 {
        format!("{value:.2} {}", UNITS[unit])
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Format a file count with thousand separators, e.g. `1,234,567`.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let lead = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Files per second over `elapsed`, rounded down. Zero for an instant run.
pub fn files_per_second(count: u64, elapsed: Duration) -> u64 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0;
    }
    (count as f64 / secs) as u64
}
