//! Progress reporting seam for merge runs.

/// Receives progress updates from a merge run.
///
/// Values are percentages in `0..=100` and never decrease within one run.
pub trait ProgressSink {
    /// Record the current progress.
    fn report(&mut self, percent: u8);
}

impl<F> ProgressSink for F
where
    F: FnMut(u8),
{
    fn report(&mut self, percent: u8) {
        self(percent)
    }
}

/// Sink that discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _percent: u8) {}
}

/// Sink that records every update, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingProgress {
    /// Values reported so far.
    pub values: Vec<u8>,
}

impl RecordingProgress {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last reported value, if any.
    pub fn last(&self) -> Option<u8> {
        self.values.last().copied()
    }
}

impl ProgressSink for RecordingProgress {
    fn report(&mut self, percent: u8) {
        self.values.push(percent);
    }
}
