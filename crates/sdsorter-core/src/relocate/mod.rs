/// Relocation module — drives the scanner, dispatches files to the
/// executor, and aggregates outcomes.
///
/// Two dispatch strategies, chosen by `RunConfig::workers`:
/// - **Sequential** (`workers == 1`): each file is relocated on the run
///   thread before the next one is pulled from the scanner.
/// - **Windowed pool** (`workers > 1`): up to `batch_size` files are pulled
///   into a window and handed to a rayon pool of `workers` threads. Every
///   outcome of that window is drained, in completion order, before the next
///   window is pulled. At most one window of tasks and outcomes is ever
///   alive, whatever the size of the source tree.
///
/// # Aborting
///
/// The first error with `skip_errors` off raises the shared cancel flag.
/// Nothing more is pulled from the scanner. Tasks of the current window that
/// have not started yet see the flag and report `Cancelled` without touching
/// the filesystem; tasks already running finish their I/O and report
/// normally. The run returns once the window is drained, so no filesystem
/// operation is left running behind it.
pub mod aggregate;
pub mod executor;
pub mod progress;

pub use aggregate::{Flow, OutcomeAggregator, RunSummary, Verdict};
pub use executor::execute;
pub use progress::RunProgress;

use crate::config::RunConfig;
use crate::error::PreconditionError;
use crate::model::{FileTask, Outcome, OutcomeStatus};
use crate::scanner::FileScanner;
use crossbeam_channel::{Receiver, Sender};
use rayon::ThreadPool;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Maximum number of progress messages that may queue up in the channel.
///
/// The frontend drains the channel continuously. If it falls behind, the
/// run thread stalls briefly on `send` rather than consuming unbounded heap.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 4_096;

/// Handle to a running or completed relocation run.
pub struct RunHandle {
    /// Receiver for progress updates from the run thread.
    pub progress_rx: Receiver<RunProgress>,
    /// Flag to request cancellation.
    cancel_flag: Arc<AtomicBool>,
    /// Join handle for the run thread.
    thread: thread::JoinHandle<RunSummary>,
}

impl RunHandle {
    /// Stop pulling new files. Work already running is allowed to finish.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation has been requested (or an abort happened).
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    /// Wait for the run thread and return its summary.
    ///
    /// Drain `progress_rx` first (or concurrently): the channel is bounded
    /// and the run thread blocks when it is full.
    pub fn join(self) -> thread::Result<RunSummary> {
        self.thread.join()
    }
}

/// Check preconditions, then start the run on a background thread.
///
/// Precondition failures are returned before any thread is spawned or any
/// file is touched.
pub fn start_run(config: RunConfig) -> Result<RunHandle, PreconditionError> {
    config.check_preconditions()?;

    let (progress_tx, progress_rx) = crossbeam_channel::bounded::<RunProgress>(PROGRESS_CHANNEL_CAPACITY);
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let cancel_clone = cancel_flag.clone();
    let config = Arc::new(config);

    let thread = thread::Builder::new()
        .name("sdsorter-run".into())
        .spawn(move || run(config, progress_tx, cancel_clone))
        .expect("failed to spawn run thread");

    Ok(RunHandle {
        progress_rx,
        cancel_flag,
        thread,
    })
}

/// Run to completion on the calling thread.
///
/// Assumes [`RunConfig::check_preconditions`] already passed. Sends one
/// per-file message per outcome and a final [`RunProgress::Finished`].
pub fn run(config: Arc<RunConfig>, progress_tx: Sender<RunProgress>, cancel_flag: Arc<AtomicBool>) -> RunSummary {
    let start = Instant::now();
    info!(
        "Sorting {} into {}{}",
        config.source.display(),
        config.destination.display(),
        if config.dry_run { " (dry run)" } else { "" }
    );

    let mut scanner = FileScanner::new(&config.source, config.extensions.clone()).excluding(&config.destination);
    let mut aggregator = OutcomeAggregator::new(config.skip_errors);

    let pool = if config.is_parallel() {
        match build_pool(config.workers.get()) {
            Ok(pool) => Some(pool),
            Err(err) => {
                warn!("Cannot start {} workers ({err}); relocating sequentially", config.workers);
                None
            }
        }
    } else {
        None
    };

    let workers = pool.as_ref().map_or(1, ThreadPool::current_num_threads);
    let _ = progress_tx.send(RunProgress::Started { workers });

    match &pool {
        Some(pool) => run_windowed(&config, pool, &mut scanner, &mut aggregator, &progress_tx, &cancel_flag),
        None => run_sequential(&config, &mut scanner, &mut aggregator, &progress_tx, &cancel_flag),
    }

    let cancelled_externally = !aggregator.is_aborted() && cancel_flag.load(Ordering::Relaxed);
    let summary = aggregator.finish(scanner.walk_errors(), start.elapsed(), cancelled_externally);
    debug!(
        "Run finished: {} processed, {} failed, peak {} in flight, {:?}",
        summary.processed, summary.failed, summary.peak_in_flight, summary.duration
    );
    let _ = progress_tx.send(RunProgress::Finished(summary.clone()));
    summary
}

fn build_pool(workers: usize) -> Result<ThreadPool, rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("sdsorter-worker-{i}"))
        .build()
}

/// One file at a time, end to end.
fn run_sequential(
    config: &RunConfig,
    scanner: &mut FileScanner,
    aggregator: &mut OutcomeAggregator,
    progress_tx: &Sender<RunProgress>,
    cancel_flag: &AtomicBool,
) {
    while !cancel_flag.load(Ordering::Relaxed) {
        let Some(task) = scanner.next() else {
            break;
        };
        aggregator.note_in_flight(1);
        let outcome = executor::execute(task, config);
        if settle(outcome, aggregator, progress_tx) == Flow::Abort {
            cancel_flag.store(true, Ordering::Relaxed);
            break;
        }
    }
}

/// Window-then-drain dispatch over the worker pool.
fn run_windowed(
    config: &Arc<RunConfig>,
    pool: &ThreadPool,
    scanner: &mut FileScanner,
    aggregator: &mut OutcomeAggregator,
    progress_tx: &Sender<RunProgress>,
    cancel_flag: &Arc<AtomicBool>,
) {
    let batch_size = config.batch_size.get();
    let mut window: Vec<FileTask> = Vec::with_capacity(batch_size);

    while !cancel_flag.load(Ordering::Relaxed) {
        window.extend(scanner.by_ref().take(batch_size));
        if window.is_empty() {
            break;
        }

        let in_flight = window.len();
        aggregator.note_in_flight(in_flight);
        debug!("Dispatching window of {in_flight} files");

        // Sized to the window so no worker ever blocks on `send`.
        let (outcome_tx, outcome_rx) = crossbeam_channel::bounded::<Outcome>(in_flight);
        for task in window.drain(..) {
            let outcome_tx = outcome_tx.clone();
            let config = Arc::clone(config);
            let cancel_flag = Arc::clone(cancel_flag);
            pool.spawn(move || {
                let outcome = if cancel_flag.load(Ordering::Relaxed) {
                    Outcome::cancelled(task.into_source())
                } else {
                    executor::execute(task, &config)
                };
                let _ = outcome_tx.send(outcome);
            });
        }
        drop(outcome_tx);

        // Completion order. The iterator ends once every task of the window
        // has reported and dropped its sender.
        for outcome in outcome_rx.iter() {
            if settle(outcome, aggregator, progress_tx) == Flow::Abort {
                cancel_flag.store(true, Ordering::Relaxed);
            }
        }
    }
}

/// Aggregate one outcome and forward it to the frontend.
fn settle(outcome: Outcome, aggregator: &mut OutcomeAggregator, progress_tx: &Sender<RunProgress>) -> Flow {
    let flow = aggregator.record(&outcome);
    let message = match outcome.status {
        OutcomeStatus::Relocated { destination, .. } => RunProgress::Relocated {
            source: outcome.source,
            destination,
            dry_run: false,
        },
        OutcomeStatus::DryRun { destination } => RunProgress::Relocated {
            source: outcome.source,
            destination,
            dry_run: true,
        },
        OutcomeStatus::Failed(err) => RunProgress::Failed {
            source: outcome.source,
            message: err.to_string(),
        },
        OutcomeStatus::Cancelled => RunProgress::Cancelled { source: outcome.source },
    };
    let _ = progress_tx.send(message);
    flow
}
