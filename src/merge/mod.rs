//! Merge orchestration.
//!
//! - [`orchestrator`]: drives a codec over a queue snapshot
//! - [`progress`]: the progress reporting seam

pub mod orchestrator;
pub mod progress;

pub use orchestrator::{DocumentOutcome, MergeOrchestrator, MergeResult, MergeState, MergeStatus};
pub use progress::{NoProgress, ProgressSink, RecordingProgress};
