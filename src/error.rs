//! Error types for pdfcombine.
//!
//! Every fallible operation in the crate returns [`CombineError`]. The
//! variants fall into a few groups:
//!
//! - **Validation**: a candidate file was missing or over a size limit
//! - **Decode / Encode**: the codec could not read an input or write the output
//! - **Delivery**: the finished artifact could not be handed over
//! - **Collection**: an index did not address a queued document
//!
//! Decode errors never escape a merge run; the orchestrator records them as
//! per-document failures instead.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias for pdfcombine operations.
pub type Result<T> = std::result::Result<T, CombineError>;

/// A single size limit that a candidate set exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LimitViolation {
    /// One document is larger than the per-document limit.
    Document {
        /// Name of the offending file.
        name: String,
        /// Its size in bytes.
        size: u64,
        /// The configured limit in bytes.
        limit: u64,
    },

    /// The queue would grow past the aggregate limit.
    Aggregate {
        /// Names of the files that were being added.
        names: Vec<String>,
        /// Total size the queue would reach, in bytes.
        total: u64,
        /// The configured limit in bytes.
        limit: u64,
    },
}

impl fmt::Display for LimitViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document { name, size, limit } => write!(
                f,
                "{name} is {size} bytes, exceeding the per-file limit of {limit} bytes"
            ),
            Self::Aggregate {
                names,
                total,
                limit,
            } => write!(
                f,
                "adding {} would bring the total to {total} bytes, exceeding the limit of {limit} bytes",
                names.join(", ")
            ),
        }
    }
}

/// Main error type for pdfcombine operations.
#[derive(Debug, thiserror::Error)]
pub enum CombineError {
    /// Input file does not exist.
    #[error("File not found: {}", .path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Candidate set exceeds a configured size limit.
    #[error("File set rejected:\n  {}", format_violations(.violations))]
    SizeLimitExceeded {
        /// Every limit that was exceeded.
        violations: Vec<LimitViolation>,
    },

    /// One document could not be read or parsed.
    #[error("Failed to decode {document}\n  Reason: {reason}")]
    Decode {
        /// Display name of the document.
        document: String,
        /// Codec error detail.
        reason: String,
    },

    /// The merged output could not be serialized.
    #[error("Failed to encode combined document: {reason}")]
    Encode {
        /// Codec error detail.
        reason: String,
    },

    /// The finished artifact could not be delivered.
    #[error("Failed to deliver {name}\n  Reason: {source}")]
    Delivery {
        /// Suggested name of the artifact.
        name: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Index does not address a queued document.
    #[error("Index {index} is out of range for a queue of {len} document(s)")]
    OutOfRange {
        /// Requested index.
        index: usize,
        /// Queue length at the time of the call.
        len: usize,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  Use --force to overwrite or choose a different output path",
        .path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

fn format_violations(violations: &[LimitViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n  ")
}

impl From<lopdf::Error> for CombineError {
    fn from(err: lopdf::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl From<anyhow::Error> for CombineError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<CombineError>() {
            Ok(err) => err,
            Err(err) => Self::invalid_config(format!("{err:#}")),
        }
    }
}

impl CombineError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a Decode error.
    pub fn decode(document: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            document: document.into(),
            reason: reason.into(),
        }
    }

    /// Create an Encode error.
    pub fn encode(reason: impl Into<String>) -> Self {
        Self::Encode {
            reason: reason.into(),
        }
    }

    /// Create a Delivery error.
    pub fn delivery(name: impl Into<String>, source: io::Error) -> Self {
        Self::Delivery {
            name: name.into(),
            source,
        }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::SizeLimitExceeded { .. } => 2,
            Self::FileNotFound { .. } => 2,
            Self::Decode { .. } => 3,
            Self::OutputExists { .. } => 4,
            Self::Delivery { .. } => 5,
            Self::Io { .. } => 5,
            Self::Encode { .. } => 6,
            Self::OutOfRange { .. } => 1,
            Self::InvalidConfig { .. } => 1,
            Self::Other { .. } => 1,
            Self::Cancelled => 130, // Standard exit code for SIGINT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_size_limit_display_names_files_and_limits() {
        let err = CombineError::SizeLimitExceeded {
            violations: vec![
                LimitViolation::Document {
                    name: "big.pdf".to_string(),
                    size: 2048,
                    limit: 1024,
                },
                LimitViolation::Aggregate {
                    names: vec!["big.pdf".to_string(), "small.pdf".to_string()],
                    total: 4096,
                    limit: 3000,
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("big.pdf is 2048 bytes"));
        assert!(msg.contains("1024"));
        assert!(msg.contains("big.pdf, small.pdf"));
        assert!(msg.contains("3000"));
    }

    #[test]
    fn test_out_of_range_display() {
        let err = CombineError::OutOfRange { index: 7, len: 3 };
        let msg = err.to_string();
        assert!(msg.contains('7'));
        assert!(msg.contains('3'));
    }

    #[test]
    fn test_output_exists_display() {
        let err = CombineError::output_exists(PathBuf::from("existing.pdf"));
        let msg = err.to_string();
        assert!(msg.contains("already exists"));
        assert!(msg.contains("existing.pdf"));
        assert!(msg.contains("--force"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            CombineError::file_not_found(PathBuf::from("x.pdf")).exit_code(),
            2
        );
        assert_eq!(CombineError::encode("x").exit_code(), 6);
        assert_eq!(
            CombineError::output_exists(PathBuf::from("x")).exit_code(),
            4
        );
        assert_eq!(CombineError::Cancelled.exit_code(), 130);
    }

    #[test]
    fn test_delivery_error_source() {
        let err = CombineError::delivery(
            "combined.pdf",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.source().is_some());
        assert!(CombineError::Cancelled.source().is_none());
    }

    #[test]
    fn test_from_anyhow_keeps_combine_error() {
        let err: CombineError = anyhow::Error::new(CombineError::Cancelled).into();
        assert!(matches!(err, CombineError::Cancelled));

        let err: CombineError = anyhow::anyhow!("bad size").into();
        assert!(matches!(err, CombineError::InvalidConfig { .. }));
    }
}
