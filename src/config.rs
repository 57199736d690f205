//! Configuration module for pdfcombine.
//!
//! This module turns CLI arguments into a validated configuration that
//! drives a combine run. It handles:
//! - Validation of argument combinations
//! - Parsing of human-readable size limits
//! - Application of defaults

use anyhow::{Context, Result, bail};

use crate::error::CombineError;
use crate::ingest::SizeLimits;
use std::{path::PathBuf, str::FromStr};

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// No compression; content streams are written as they are.
    None,
    /// Compress uncompressed streams.
    #[default]
    Standard,
    /// Compress streams and drop empty ones.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = CombineError;

    /// Parse compression level from string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not "none", "standard" or "maximum".
    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(CombineError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// PDF metadata to set on the output document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Document title.
    pub title: Option<String>,
    /// Document author.
    pub author: Option<String>,
    /// Document subject.
    pub subject: Option<String>,
    /// Document keywords (comma-separated).
    pub keywords: Option<String>,
}

impl Metadata {
    /// Check if any metadata fields are set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.subject.is_none()
            && self.keywords.is_none()
    }

    /// Create metadata from optional strings, dropping blank values.
    pub fn new(
        title: Option<String>,
        author: Option<String>,
        subject: Option<String>,
        keywords: Option<String>,
    ) -> Self {
        let clean = |opt: Option<String>| {
            opt.map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        Self {
            title: clean(title),
            author: clean(author),
            subject: clean(subject),
            keywords: clean(keywords),
        }
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Complete configuration for a combine run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input PDF file paths (in merge order).
    pub inputs: Vec<PathBuf>,

    /// Output PDF file path.
    pub output: PathBuf,

    /// Show the merge plan without decoding or writing anything.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Print a JSON report of the merge result.
    pub json: bool,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Compression level for output.
    pub compression: CompressionLevel,

    /// Metadata to set on output document.
    pub metadata: Metadata,

    /// Size limits applied at ingestion.
    pub limits: SizeLimits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output: PathBuf::from(crate::export::DEFAULT_ARTIFACT_NAME),
            dry_run: false,
            verbose: false,
            quiet: false,
            json: false,
            overwrite_mode: OverwriteMode::default(),
            compression: CompressionLevel::default(),
            metadata: Metadata::default(),
            limits: SizeLimits::default(),
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No input files are specified
    /// - Verbose and quiet modes are both enabled
    /// - The output path is also an input
    /// - The per-file limit is larger than the total limit
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            bail!("No input files specified");
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if self.inputs.iter().any(|input| input == &self.output) {
            bail!(
                "Output file cannot be the same as an input file: {}",
                self.output.display()
            );
        }

        let SizeLimits {
            max_document_bytes,
            max_total_bytes,
        } = self.limits;
        if max_document_bytes > 0 && max_total_bytes > 0 && max_document_bytes > max_total_bytes {
            bail!(
                "--max-file-size ({max_document_bytes} bytes) cannot exceed --max-total-size ({max_total_bytes} bytes)"
            );
        }

        Ok(())
    }
}

/// Parse a human-readable byte size such as `512`, `64K`, `25M` or `1G`.
///
/// Units are binary (1K = 1024 bytes) and case-insensitive; an optional
/// trailing `B` or `iB` is accepted. `0` disables a limit.
///
/// # Examples
///
/// ```
/// use pdfcombine::config::parse_size;
///
/// assert_eq!(parse_size("25M").unwrap(), 25 * 1024 * 1024);
/// assert_eq!(parse_size("1.5kb").unwrap(), 1536);
/// assert!(parse_size("lots").is_err());
/// ```
pub fn parse_size(input: &str) -> Result<u64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        bail!("Size cannot be empty");
    }

    let upper = trimmed.to_ascii_uppercase();
    let without_suffix = upper
        .strip_suffix("IB")
        .or_else(|| upper.strip_suffix('B'))
        .unwrap_or(&upper);

    let split = without_suffix
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(without_suffix.len());
    let (number, unit) = without_suffix.split_at(split);

    let multiplier: u64 = match unit.trim() {
        "" => 1,
        "K" => 1 << 10,
        "M" => 1 << 20,
        "G" => 1 << 30,
        other => bail!("Unknown size unit '{other}' in '{trimmed}'. Use K, M or G"),
    };

    let value: f64 = number
        .parse()
        .with_context(|| format!("Invalid size: {trimmed}"))?;

    Ok((value * multiplier as f64).round() as u64)
}
