//! End-to-end merge runs through a session with the real PDF codec.

use pdfcombine::MergeSession;
use pdfcombine::codec::LopdfCodec;
use pdfcombine::ingest::{Candidate, SizeLimits};
use pdfcombine::merge::{DocumentOutcome, MergeStatus, RecordingProgress};
use rstest::rstest;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use super::common::{
    corrupt_candidate, expected_labels, page_labels, pdf_candidate, write_fixture,
};

fn new_session() -> MergeSession<LopdfCodec> {
    MergeSession::new(LopdfCodec::new(), SizeLimits::default())
}

#[tokio::test]
async fn test_combines_pages_in_queue_order() {
    let mut session = new_session();
    session
        .add_candidates(vec![pdf_candidate("A", 2), pdf_candidate("B", 3)])
        .unwrap();

    let mut progress = RecordingProgress::new();
    let result = session
        .combine(&mut progress, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.status, MergeStatus::Completed);
    assert_eq!(result.total_pages, 5);
    assert_eq!(progress.values, [40, 80, 100]);

    let labels = page_labels(result.output.as_deref().unwrap());
    let expected: Vec<String> = expected_labels("A", 2)
        .into_iter()
        .chain(expected_labels("B", 3))
        .collect();
    assert_eq!(labels, expected);
}

#[tokio::test]
async fn test_corrupt_document_is_skipped() {
    let mut session = new_session();
    session
        .add_candidates(vec![
            pdf_candidate("A", 3),
            corrupt_candidate("broken.pdf"),
            pdf_candidate("C", 2),
        ])
        .unwrap();

    let mut progress = RecordingProgress::new();
    let result = session
        .combine(&mut progress, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.status, MergeStatus::PartiallyCompleted);
    assert_eq!(result.succeeded(), 2);
    assert_eq!(result.failed(), 1);
    assert!(matches!(
        &result.outcomes[1],
        DocumentOutcome::Failure { name, .. } if name == "broken.pdf"
    ));
    assert_eq!(progress.values, [27, 53, 80, 100]);

    let labels = page_labels(result.output.as_deref().unwrap());
    let expected: Vec<String> = expected_labels("A", 3)
        .into_iter()
        .chain(expected_labels("C", 2))
        .collect();
    assert_eq!(labels, expected);
}

#[tokio::test]
async fn test_single_document_is_a_valid_run() {
    let mut session = new_session();
    session.add_candidates(vec![pdf_candidate("A", 4)]).unwrap();
    assert!(!session.can_combine());

    let result = session
        .combine(&mut RecordingProgress::new(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.status, MergeStatus::Completed);
    assert_eq!(
        page_labels(result.output.as_deref().unwrap()),
        expected_labels("A", 4)
    );
}

#[tokio::test]
async fn test_empty_queue_fails_without_output() {
    let mut session = new_session();
    let mut progress = RecordingProgress::new();

    let result = session
        .combine(&mut progress, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.status, MergeStatus::Failed);
    assert!(result.output.is_none());
    assert!(result.failure.is_some());
    assert!(progress.values.is_empty());
}

#[tokio::test]
async fn test_all_documents_failing_is_failed() {
    let mut session = new_session();
    session
        .add_candidates(vec![corrupt_candidate("x.pdf"), corrupt_candidate("y.pdf")])
        .unwrap();

    let mut progress = RecordingProgress::new();
    let result = session
        .combine(&mut progress, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.status, MergeStatus::Failed);
    assert!(result.output.is_none());
    assert_eq!(result.failed(), 2);
    assert_eq!(progress.last(), Some(80));
}

#[rstest]
#[case::none("none")]
#[case::standard("standard")]
#[case::maximum("maximum")]
#[tokio::test]
async fn test_files_on_disk_with_each_compression(#[case] level: &str) {
    let dir = TempDir::new().unwrap();
    let paths = vec![
        write_fixture(dir.path(), "A", 1),
        write_fixture(dir.path(), "B", 2),
    ];

    let codec = LopdfCodec::new().with_compression(level.parse().unwrap());
    let mut session = MergeSession::new(codec, SizeLimits::default());
    session
        .add_candidates(Candidate::from_paths(&paths).await.unwrap())
        .unwrap();

    let result = session
        .combine(&mut RecordingProgress::new(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.status, MergeStatus::Completed);
    assert_eq!(
        page_labels(result.output.as_deref().unwrap()),
        ["A-Page-1", "B-Page-1", "B-Page-2"]
    );
}

#[tokio::test]
async fn test_pageless_document_is_merged_with_zero_pages() {
    let mut session = new_session();
    session
        .add_candidates(vec![pdf_candidate("Empty", 0), pdf_candidate("A", 2)])
        .unwrap();

    let result = session
        .combine(&mut RecordingProgress::new(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.status, MergeStatus::Completed);
    assert!(matches!(
        &result.outcomes[0],
        DocumentOutcome::Success { pages: 0, .. }
    ));
    assert_eq!(
        page_labels(result.output.as_deref().unwrap()),
        ["A-Page-1", "A-Page-2"]
    );
}

#[tokio::test]
async fn test_lone_pageless_document_completes() {
    let mut session = new_session();
    session.add_candidates(vec![pdf_candidate("Empty", 0)]).unwrap();

    let result = session
        .combine(&mut RecordingProgress::new(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.status, MergeStatus::Completed);
    assert_eq!(result.total_pages, 0);
    assert!(result.output.is_some());
}
