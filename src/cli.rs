//! CLI argument parsing for pdfcombine.
//!
//! This module defines the command-line interface structure using `clap`.
//! It handles argument parsing, glob expansion and conversion into a
//! validated [`Config`].
//!
//! # Examples
//!
//! ```no_run
//! use pdfcombine::cli::Cli;
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! let config = cli.to_config().expect("invalid configuration");
//! println!("Combining {} file(s)", config.inputs.len());
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{CompressionLevel, Config, Metadata, OverwriteMode, parse_size};
use crate::error::Result;
use crate::ingest::SizeLimits;
use crate::utils::expand_inputs;

/// Compression choices accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CompressionArg {
    /// No compression (content streams written as they are)
    None,
    /// Compress uncompressed streams
    Standard,
    /// Compress streams and drop empty ones
    Maximum,
}

impl From<CompressionArg> for CompressionLevel {
    fn from(arg: CompressionArg) -> Self {
        match arg {
            CompressionArg::None => Self::None,
            CompressionArg::Standard => Self::Standard,
            CompressionArg::Maximum => Self::Maximum,
        }
    }
}

/// Combine PDF files into a single document.
///
/// Files are combined in the order given. Files that cannot be read as PDF
/// are skipped with a warning; the rest are still combined.
#[derive(Parser, Debug)]
#[command(name = "pdfcombine")]
#[command(version)]
#[command(about = "Combine PDF files into a single document", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input PDF files to combine (in order)
    ///
    /// Glob patterns are expanded; matches of one pattern are sorted.
    /// Arguments that do not end in .pdf are ignored.
    ///
    /// Examples:
    ///   pdfcombine cover.pdf body.pdf -o report.pdf
    ///   pdfcombine 'scans/*.pdf' -o scans.pdf
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Output PDF file path
    #[arg(short, long, value_name = "FILE", default_value = "combined.pdf")]
    pub output: PathBuf,

    /// Show the merge order without combining or writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Show each document's page count and extra statistics
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print a JSON report of the merge result on stdout
    #[arg(long)]
    pub json: bool,

    /// Overwrite an existing output file without asking
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite an existing output file
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Compression level for the output PDF
    #[arg(short, long, value_name = "LEVEL", value_enum, default_value_t = CompressionArg::Standard)]
    pub compression: CompressionArg,

    /// Set title metadata for the output PDF
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Set author metadata for the output PDF
    #[arg(long, value_name = "TEXT")]
    pub author: Option<String>,

    /// Set subject metadata for the output PDF
    #[arg(long, value_name = "TEXT")]
    pub subject: Option<String>,

    /// Set keywords metadata for the output PDF (comma-separated)
    #[arg(long, value_name = "TEXT")]
    pub keywords: Option<String>,

    /// Reject any input larger than this (e.g. 25M); 0 disables the check
    #[arg(long, value_name = "SIZE", env = "PDFCOMBINE_MAX_FILE_SIZE")]
    pub max_file_size: Option<String>,

    /// Reject inputs whose combined size exceeds this (e.g. 200M); 0 disables the check
    #[arg(long, value_name = "SIZE", env = "PDFCOMBINE_MAX_TOTAL_SIZE")]
    pub max_total_size: Option<String>,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A glob pattern is invalid or matches nothing
    /// - A size limit cannot be parsed
    /// - Configuration validation fails
    pub fn to_config(&self) -> Result<Config> {
        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let limits = SizeLimits {
            max_document_bytes: parse_limit(self.max_file_size.as_deref())?,
            max_total_bytes: parse_limit(self.max_total_size.as_deref())?,
        };

        let config = Config {
            inputs: expand_inputs(&self.inputs)?,
            output: self.output.clone(),
            dry_run: self.dry_run,
            verbose: self.verbose,
            quiet: self.quiet,
            json: self.json,
            overwrite_mode,
            compression: self.compression.into(),
            metadata: Metadata::new(
                self.title.clone(),
                self.author.clone(),
                self.subject.clone(),
                self.keywords.clone(),
            ),
            limits,
        };

        config.validate()?;
        Ok(config)
    }
}

fn parse_limit(value: Option<&str>) -> Result<u64> {
    Ok(value.map(parse_size).transpose()?.unwrap_or(0))
}
