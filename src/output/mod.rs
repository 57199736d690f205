//! Output formatting and display for pdfcombine.
//!
//! This module handles all user-facing output including:
//! - Formatted status messages
//! - The merge progress bar
//! - The merge plan and result summaries
//!
//! # Examples
//!
//! ```no_run
//! use pdfcombine::output::OutputFormatter;
//! use pdfcombine::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Combining 3 documents");
//! formatter.success("Saved combined.pdf");
//! # }
//! ```

pub mod formatter;
pub mod progress;

pub use formatter::{MessageLevel, OutputFormatter};
pub use progress::TerminalProgress;

use crate::collection::DocumentCollection;
use crate::merge::{DocumentOutcome, MergeResult, MergeStatus};
use crate::utils::format_file_size;

/// Display the queued documents in merge order.
pub fn display_plan(formatter: &OutputFormatter, collection: &DocumentCollection) {
    formatter.section("Merge order");
    for document in collection.iter() {
        formatter.list_item(
            document.position() + 1,
            &format!(
                "{} ({})",
                document.display_name(),
                format_file_size(document.size_bytes())
            ),
        );
    }
    formatter.info(&format!(
        "{} document(s), {} total",
        collection.len(),
        format_file_size(collection.total_size_bytes())
    ));
}

/// Display the outcome of a merge run.
pub fn display_merge_result(formatter: &OutputFormatter, result: &MergeResult) {
    for outcome in &result.outcomes {
        match outcome {
            DocumentOutcome::Success { name, pages, .. } => {
                formatter.debug(&format!("{name}: {pages} page(s)"));
            }
            DocumentOutcome::Failure { name, reason, .. } => {
                formatter.warning(&format!("Skipped {name}: {reason}"));
            }
        }
    }

    match result.status {
        MergeStatus::Completed => formatter.success(&format!(
            "Combined {} document(s) into {} page(s)",
            result.succeeded(),
            result.total_pages
        )),
        MergeStatus::PartiallyCompleted => formatter.warning(&format!(
            "Combined {} of {} document(s) into {} page(s)",
            result.succeeded(),
            result.outcomes.len(),
            result.total_pages
        )),
        MergeStatus::Failed => formatter.error(
            result
                .failure
                .as_deref()
                .unwrap_or("Combining failed"),
        ),
    }

    if let Some(size) = result.output_size() {
        formatter.detail("Output size", &format_file_size(size));
    }
}
