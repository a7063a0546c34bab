/// Command-line arguments.
use clap::{ArgAction, Parser, ValueEnum};
use sdsorter_core::config::{DEFAULT_BATCH_SIZE, DEFAULT_EXTENSION};
use sdsorter_core::{DateSource, ExtensionFilter, RunConfig, TransferMode};
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Sort SDS100 recordings into YYYY/MM/DD folders (streaming).
///
/// Files keep their names; only their location changes. Copies by default.
#[derive(Debug, Parser)]
#[command(name = "sdsorter", version)]
pub struct Args {
    /// Source directory (recursively scanned)
    pub src: PathBuf,

    /// Destination root directory
    pub dst: PathBuf,

    /// Move instead of copy (destructive across devices)
    #[arg(long = "move")]
    pub move_files: bool,

    /// Only log actions, no writes
    #[arg(long)]
    pub dry_run: bool,

    /// Mark destination files read-only
    #[arg(long)]
    pub readonly: bool,

    /// Skip errors and continue
    #[arg(long)]
    pub skip_errors: bool,

    /// Date source for bucketing
    #[arg(long, value_enum, default_value_t = DateSourceArg::Filename)]
    pub date_source: DateSourceArg,

    /// Also include files with this extension (repeatable; `.wav` is always included)
    #[arg(long = "ext", value_name = "EXT")]
    pub ext: Vec<String>,

    /// Parallel workers (SSD/NVMe: 4-8; HDD: 2-3)
    #[arg(long, default_value_t = NonZeroUsize::MIN)]
    pub workers: NonZeroUsize,

    /// Files dispatched per window when running with several workers
    #[arg(long, value_name = "N", default_value_t = default_batch_size())]
    pub batch_size: NonZeroUsize,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to write a log file (tee console + file)
    #[arg(long, value_name = "PATH")]
    pub logfile: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DateSourceArg {
    Filename,
    Mtime,
}

impl From<DateSourceArg> for DateSource {
    fn from(arg: DateSourceArg) -> Self {
        match arg {
            DateSourceArg::Filename => DateSource::Filename,
            DateSourceArg::Mtime => DateSource::Mtime,
        }
    }
}

fn default_batch_size() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_BATCH_SIZE).unwrap_or(NonZeroUsize::MIN)
}

impl Args {
    /// Build the immutable run configuration.
    ///
    /// `--ext` values are added on top of the default `.wav`, never instead
    /// of it.
    pub fn to_config(&self) -> RunConfig {
        let mut config = RunConfig::new(&self.src, &self.dst);
        config.mode = if self.move_files {
            TransferMode::Move
        } else {
            TransferMode::Copy
        };
        config.dry_run = self.dry_run;
        config.readonly = self.readonly;
        config.skip_errors = self.skip_errors;
        config.date_source = self.date_source.into();
        config.extensions =
            ExtensionFilter::new(std::iter::once(DEFAULT_EXTENSION).chain(self.ext.iter().map(String::as_str)));
        config.workers = self.workers;
        config.batch_size = self.batch_size;
        config
    }
}
