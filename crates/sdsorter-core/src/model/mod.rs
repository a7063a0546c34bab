/// Data model for a relocation run.
///
/// A [`FileTask`] is created per enumerated file and consumed exactly once;
/// an [`Outcome`] is produced per task and discarded once aggregated.
pub mod outcome;
pub mod size;
pub mod task;

pub use outcome::{Outcome, OutcomeStatus, ReadOnlyMark};
pub use task::FileTask;
