/// Logging setup: console on stderr, optionally teed to a log file.
use anyhow::Context;
use indicatif::ProgressBar;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::prelude::*;

/// `--quiet` wins over `-v`; otherwise warnings by default, `-v` for info,
/// `-vv` and beyond for debug.
pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    }
}

/// Stderr writer that hides the progress bar while a log line is written,
/// then redraws it below the line.
#[derive(Clone)]
struct ConsoleWriter {
    bar: Option<ProgressBar>,
}

impl<'a> MakeWriter<'a> for ConsoleWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &self.bar {
            Some(bar) => bar.suspend(|| io::stderr().write(buf)),
            None => io::stderr().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

/// Install the global subscriber. Call once, before the run starts.
///
/// The log file is appended to, and its parent directories are created if
/// needed. Both outputs share one level. Console lines are drawn around
/// `bar` when there is one.
pub fn init(verbose: u8, quiet: bool, logfile: Option<&Path>, bar: Option<ProgressBar>) -> anyhow::Result<()> {
    let level = level_for(verbose, quiet);

    let console = fmt::layer()
        .with_writer(ConsoleWriter { bar })
        .with_target(false)
        .without_time();

    let file = match logfile {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("cannot create log directory {}", parent.display()))?;
            }
            let handle = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(handle))
                    .with_ansi(false)
                    .with_target(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .with(level)
        .try_init()
        .context("logging was already initialised")?;
    Ok(())
}
