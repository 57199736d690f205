//! Human-readable status lines.
//!
//! Info, success and plan lines go to stdout and disappear in quiet mode.
//! Warnings and errors go to stderr and are never suppressed. Debug lines
//! and `label: value` details only show up in verbose mode.
//!
//! # Examples
//!
//! ```
//! use pdfcombine::output::formatter::OutputFormatter;
//!
//! let formatter = OutputFormatter::new(false, false);
//! formatter.info("Queued 3 documents");
//! formatter.success("Saved combined.pdf");
//! formatter.error("Something went wrong");
//! ```

use std::io::IsTerminal;

use crate::config::Config;

/// Kind of status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Plain status.
    Info,
    /// A step finished.
    Success,
    /// Something was skipped or looks wrong.
    Warning,
    /// The run cannot continue.
    Error,
    /// Verbose-only detail.
    Debug,
}

impl MessageLevel {
    /// Marker and ANSI colour for this level.
    fn style(self) -> (&'static str, Option<&'static str>) {
        match self {
            Self::Info => ("", None),
            Self::Success => ("✓ ", Some("32")),
            Self::Warning => ("⚠ ", Some("33")),
            Self::Error => ("✗ ", Some("31")),
            Self::Debug => ("→ ", Some("36")),
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Self::Warning | Self::Error)
    }
}

/// Prints status lines according to the quiet/verbose settings.
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    quiet: bool,
    verbose: bool,
    colored: bool,
}

impl OutputFormatter {
    /// Create a formatter; colour is used when stdout is a terminal and
    /// `NO_COLOR` is unset.
    pub fn new(quiet: bool, verbose: bool) -> Self {
        let colored = std::io::stdout().is_terminal()
            && std::env::var_os("TERM").is_some()
            && std::env::var_os("NO_COLOR").is_none();

        Self {
            quiet,
            verbose,
            colored,
        }
    }

    /// Create a formatter from configuration.
    ///
    /// JSON mode keeps stdout free for the report, so it behaves as quiet.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.quiet || config.json, config.verbose && !config.json)
    }

    /// Formatter that only prints warnings and errors.
    pub fn quiet() -> Self {
        Self::new(true, false)
    }

    /// Print an informational line.
    pub fn info(&self, message: &str) {
        self.emit(MessageLevel::Info, message);
    }

    /// Print a success line.
    pub fn success(&self, message: &str) {
        self.emit(MessageLevel::Success, message);
    }

    /// Print a warning to stderr.
    pub fn warning(&self, message: &str) {
        self.emit(MessageLevel::Warning, message);
    }

    /// Print an error to stderr.
    pub fn error(&self, message: &str) {
        self.emit(MessageLevel::Error, message);
    }

    /// Print a verbose-only line.
    pub fn debug(&self, message: &str) {
        self.emit(MessageLevel::Debug, message);
    }

    /// Print a blank line followed by a heading.
    pub fn section(&self, title: &str) {
        if !self.quiet {
            println!("\n{title}");
        }
    }

    /// Print an indented `label: value` line in verbose mode.
    pub fn detail(&self, label: &str, value: &str) {
        if self.verbose {
            println!("  {label}: {value}");
        }
    }

    /// Print an empty line.
    pub fn blank_line(&self) {
        if !self.quiet {
            println!();
        }
    }

    /// Print `  {index}. {message}`; `index` is 1-based.
    pub fn list_item(&self, index: usize, message: &str) {
        if !self.quiet {
            println!("  {index}. {message}");
        }
    }

    /// Whether stdout lines are printed at all.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }

    /// Whether quiet mode is on.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    fn shows(&self, level: MessageLevel) -> bool {
        match level {
            MessageLevel::Warning | MessageLevel::Error => true,
            MessageLevel::Debug => self.verbose,
            MessageLevel::Info | MessageLevel::Success => !self.quiet,
        }
    }

    fn emit(&self, level: MessageLevel, message: &str) {
        if !self.shows(level) {
            return;
        }

        let line = self.render(level, message);
        if level.to_stderr() {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    fn render(&self, level: MessageLevel, message: &str) -> String {
        match level.style() {
            (marker, Some(code)) if self.colored => format!("\x1b[{code}m{marker}{message}\x1b[0m"),
            (marker, _) => format!("{marker}{message}"),
        }
    }
}
