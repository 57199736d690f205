//! Queue edits between merge runs.

use pdfcombine::MergeSession;
use pdfcombine::codec::LopdfCodec;
use pdfcombine::error::CombineError;
use pdfcombine::ingest::SizeLimits;
use pdfcombine::merge::{MergeStatus, NoProgress};
use tokio_util::sync::CancellationToken;

use super::common::{page_labels, pdf_candidate};

fn session_with(labels: &[(&str, usize)]) -> MergeSession<LopdfCodec> {
    let mut session = MergeSession::new(LopdfCodec::new(), SizeLimits::default());
    session
        .add_candidates(
            labels
                .iter()
                .map(|&(label, pages)| pdf_candidate(label, pages))
                .collect(),
        )
        .unwrap();
    session
}

fn queued_names(session: &MergeSession<LopdfCodec>) -> Vec<String> {
    session
        .collection()
        .iter()
        .map(|doc| doc.display_name().to_string())
        .collect()
}

#[tokio::test]
async fn test_reordered_queue_changes_page_order() {
    let mut session = session_with(&[("A", 1), ("B", 1), ("C", 1)]);

    assert!(session.move_down(0).unwrap());
    assert!(session.move_up(2).unwrap());
    assert_eq!(queued_names(&session), ["B.pdf", "C.pdf", "A.pdf"]);

    let result = session
        .combine(&mut NoProgress, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(
        page_labels(result.output.as_deref().unwrap()),
        ["B-Page-1", "C-Page-1", "A-Page-1"]
    );
}

#[tokio::test]
async fn test_removed_document_is_not_merged() {
    let mut session = session_with(&[("A", 2), ("B", 1), ("C", 1)]);

    let removed = session.remove_at(1).unwrap();
    assert_eq!(removed.display_name(), "B.pdf");
    assert_eq!(session.collection().get(1).unwrap().position(), 1);

    let result = session
        .combine(&mut NoProgress, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(
        page_labels(result.output.as_deref().unwrap()),
        ["A-Page-1", "A-Page-2", "C-Page-1"]
    );
}

#[tokio::test]
async fn test_edit_after_merge_makes_result_stale() {
    let mut session = session_with(&[("A", 1), ("B", 1)]);
    assert!(session.can_combine());

    session
        .combine(&mut NoProgress, &CancellationToken::new())
        .await
        .unwrap();
    assert!(session.current_result().is_some());
    assert!(!session.can_combine());

    // Already first: nothing changes, result stays current
    assert!(!session.move_up(0).unwrap());
    assert!(session.current_result().is_some());

    session.move_down(0).unwrap();
    assert!(session.current_result().is_none());
    assert!(session.can_combine());
}

#[tokio::test]
async fn test_reset_clears_queue_and_result() {
    let mut session = session_with(&[("A", 1), ("B", 1)]);
    session
        .combine(&mut NoProgress, &CancellationToken::new())
        .await
        .unwrap();

    session.reset();

    assert!(session.collection().is_empty());
    assert_eq!(session.collection().total_size_bytes(), 0);
    assert!(session.current_result().is_none());

    let result = session
        .combine(&mut NoProgress, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(result.status, MergeStatus::Failed);
}

#[tokio::test]
async fn test_out_of_range_edits_leave_queue_untouched() {
    let mut session = session_with(&[("A", 1), ("B", 1)]);
    let revision = session.collection().revision();

    assert!(matches!(
        session.remove_at(2),
        Err(CombineError::OutOfRange { index: 2, len: 2 })
    ));
    assert!(session.move_up(5).is_err());
    assert!(session.move_down(2).is_err());

    assert_eq!(queued_names(&session), ["A.pdf", "B.pdf"]);
    assert_eq!(session.collection().revision(), revision);
}
