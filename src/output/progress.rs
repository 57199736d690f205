//! Terminal progress bar for merge runs.
//!
//! # Examples
//!
//! ```
//! use pdfcombine::merge::ProgressSink;
//! use pdfcombine::output::progress::TerminalProgress;
//!
//! let mut progress = TerminalProgress::new("Combining");
//! progress.report(40);
//! progress.report(100);
//! progress.finish();
//! ```

use std::io::{self, Write};
use std::time::Instant;

use crate::merge::ProgressSink;

/// Width of the bar, in characters.
const BAR_WIDTH: usize = 40;

/// Renders `[=====>    ] 40%` on stdout when it is a terminal.
#[derive(Debug)]
pub struct TerminalProgress {
    /// Label shown before the bar.
    message: String,
    /// Last reported percentage.
    percent: u8,
    /// Start time of the run.
    start_time: Instant,
    /// Whether anything is drawn.
    enabled: bool,
    /// Whether a line is currently drawn.
    drawn: bool,
}

impl TerminalProgress {
    /// Create a progress bar, enabled only when stdout is a terminal.
    pub fn new(message: impl Into<String>) -> Self {
        use std::io::IsTerminal;

        Self {
            message: message.into(),
            percent: 0,
            start_time: Instant::now(),
            enabled: io::stdout().is_terminal(),
            drawn: false,
        }
    }

    /// Create a progress bar that never draws.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new("")
        }
    }

    /// Last reported percentage.
    pub fn percent(&self) -> u8 {
        self.percent
    }

    /// End the bar's line.
    pub fn finish(&mut self) {
        if self.drawn {
            println!();
            self.drawn = false;
        }
    }

    fn render_bar(&self) -> String {
        let filled = BAR_WIDTH * usize::from(self.percent) / 100;
        let head = if filled > 0 && filled < BAR_WIDTH { ">" } else { "" };
        let body = "=".repeat(if head.is_empty() { filled } else { filled - 1 });
        let empty = " ".repeat(BAR_WIDTH - filled);

        format!(
            "{} [{body}{head}{empty}] {:>3}% {:.1}s",
            self.message,
            self.percent,
            self.start_time.elapsed().as_secs_f64()
        )
    }
}

impl ProgressSink for TerminalProgress {
    fn report(&mut self, percent: u8) {
        self.percent = percent.min(100);

        if self.enabled {
            print!("\r{}", self.render_bar());
            io::stdout().flush().ok();
            self.drawn = true;
        }
    }
}
