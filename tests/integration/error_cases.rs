//! Ingestion errors and edge cases.

use pdfcombine::MergeSession;
use pdfcombine::codec::LopdfCodec;
use pdfcombine::error::{CombineError, LimitViolation};
use pdfcombine::ingest::{Candidate, SizeLimits};
use std::path::PathBuf;
use tempfile::TempDir;

use super::common::{labelled_pdf, pdf_candidate, write_fixture};

#[tokio::test]
async fn test_error_nonexistent_input() {
    let result = Candidate::from_paths(&[PathBuf::from("/nonexistent/file.pdf")]).await;

    let err = result.unwrap_err();
    assert!(matches!(err, CombineError::FileNotFound { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_non_pdf_inputs_are_skipped() {
    let dir = TempDir::new().unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, b"plain text").unwrap();
    let pdf = write_fixture(dir.path(), "A", 1);

    let mut session = MergeSession::new(LopdfCodec::new(), SizeLimits::default());
    let added = session
        .add_candidates(Candidate::from_paths(&[notes, pdf]).await.unwrap())
        .unwrap();

    assert_eq!(added.ids.len(), 1);
    assert_eq!(added.skipped, ["notes.txt"]);
    assert_eq!(session.collection().len(), 1);
}

#[tokio::test]
async fn test_oversized_document_rejects_whole_batch() {
    let small = labelled_pdf("S", 1).len() as u64;
    let limits = SizeLimits {
        max_document_bytes: small + 16,
        max_total_bytes: 0,
    };
    let mut session = MergeSession::new(LopdfCodec::new(), limits);

    let err = session
        .add_candidates(vec![pdf_candidate("S", 1), pdf_candidate("Big", 40)])
        .unwrap_err();

    match err {
        CombineError::SizeLimitExceeded { violations } => {
            assert_eq!(violations.len(), 1);
            assert!(matches!(
                &violations[0],
                LimitViolation::Document { name, .. } if name == "Big.pdf"
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(session.collection().is_empty());
}

#[tokio::test]
async fn test_aggregate_limit_counts_queued_documents() {
    let one = labelled_pdf("A", 1).len() as u64;
    let limits = SizeLimits {
        max_document_bytes: 0,
        max_total_bytes: one * 2 + one / 2,
    };
    let mut session = MergeSession::new(LopdfCodec::new(), limits);

    session
        .add_candidates(vec![pdf_candidate("A", 1), pdf_candidate("B", 1)])
        .unwrap();

    let err = session
        .add_candidates(vec![pdf_candidate("C", 1)])
        .unwrap_err();

    assert!(matches!(err, CombineError::SizeLimitExceeded { .. }));
    assert_eq!(session.collection().len(), 2);
}
