/// Terminal progress bar.
///
/// The total is never known up front (the source is streamed), so this is a
/// spinner with a running count rather than a bar with a percentage.
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TEMPLATE: &str = "{spinner:.green} {pos} files [{elapsed_precise}] {per_sec} {msg}";

pub struct ProgressReporter {
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    /// A reporter that draws to stderr, or a silent one when `enabled` is false.
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            return Self { bar: None };
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(ProgressStyle::with_template(TEMPLATE).unwrap_or_else(|_| ProgressStyle::default_spinner()));
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar: Some(bar) }
    }

    /// One more file done.
    pub fn advance(&self) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    pub fn set_errors(&self, errors: u64) {
        if let Some(bar) = &self.bar {
            bar.set_message(format!("{errors} error(s)"));
        }
    }

    /// A handle on the live bar, for writers that must draw around it.
    pub fn bar(&self) -> Option<ProgressBar> {
        self.bar.clone()
    }

    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_reporter_is_a_no_op() {
        let progress = ProgressReporter::new(false);
        progress.advance();
        progress.set_errors(3);
        assert!(progress.bar().is_none());
        progress.finish();
    }

    #[test]
    fn enabled_reporter_counts() {
        let progress = ProgressReporter::new(true);
        progress.advance();
        progress.advance();
        assert_eq!(progress.bar().map(|bar| bar.position()), Some(2));
        progress.finish();
    }
}
