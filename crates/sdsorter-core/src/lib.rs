/// sdsorter Core — discovery, date bucketing, and relocation engine.
///
/// This crate contains all business logic with zero terminal dependencies.
/// It is designed to be reusable across different frontends (CLI, TUI, GUI).
///
/// # Modules
///
/// - [`config`] — Immutable run configuration and extension filtering.
/// - [`model`] — File tasks, per-file outcomes, and size/count formatting.
/// - [`date`] — Bucket-date resolution from file names or modification times.
/// - [`bucket`] — Mapping of a resolved date to its `YYYY/MM/DD` folder.
/// - [`scanner`] — Lazy, single-pass enumeration of candidate files.
/// - [`relocate`] — Per-file executor, windowed worker pool, and outcome aggregation.
/// - [`platform`] — Filesystem primitives: metadata-preserving copy, move, read-only marking.
/// - [`error`] — Error taxonomy shared by every module.
pub mod bucket;
pub mod config;
pub mod date;
pub mod error;
pub mod model;
pub mod platform;
pub mod relocate;
pub mod scanner;

pub use config::{DateSource, ExtensionFilter, RunConfig, TransferMode};
pub use error::{DateError, PreconditionError, RelocateError};
pub use model::{FileTask, Outcome, OutcomeStatus, ReadOnlyMark};
pub use relocate::{start_run, RunHandle, RunSummary, Verdict};
