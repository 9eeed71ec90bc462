use chrono::{Duration, Utc};
use cli::render;
use triage_core::coordinator::RunSummary;
use triage_core::models::{QueueEntry, QueueStatus, Tag, VideoRecord};
use triage_core::query::VideoQuery;
use triage_core::review::DeletionReport;

#[test]
fn snapshot_shows_progress_and_statuses() {
    let snapshot = vec![
        QueueEntry {
            filename: "/a.mp4".into(),
            status: QueueStatus::Completed,
        },
        QueueEntry {
            filename: "/b.mp4".into(),
            status: QueueStatus::Processing,
        },
        QueueEntry {
            filename: "/c.mp4".into(),
            status: QueueStatus::Waiting,
        },
    ];
    let lines = render::snapshot_lines(&snapshot);
    assert_eq!(lines[0], "[1/3]");
    assert!(lines[2].contains("Currently Processing"));
    assert!(lines[2].ends_with("/b.mp4"));
    assert_eq!(render::snapshot_lines(&Vec::new()), vec!["queue is empty"]);
}

#[test]
fn page_footer_is_one_based() {
    let records = vec![
        VideoRecord::new("/a.mp4", "Other/Unsure", Tag::Pending),
        VideoRecord::new("/b.mp4", "Car Check|Confident", Tag::Delete),
    ];
    let page = VideoQuery::default().apply(records, 1);
    let lines = render::page_lines(&page);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Pending"));
    assert_eq!(lines[1], "page 1 of 2 (2 matching)");

    let empty = VideoQuery::default().apply(Vec::new(), 20);
    assert_eq!(render::page_lines(&empty), vec!["page 0 of 0 (0 matching)"]);
}

#[test]
fn summaries_count_outcomes() {
    let started_at = Utc::now();
    let summary = RunSummary {
        started_at,
        finished_at: started_at + Duration::milliseconds(1500),
        queued: 3,
        classified: vec![VideoRecord::new("/a.mp4", "x", Tag::Pending)],
        failed: vec!["/b.mp4".into()],
        cancelled: true,
    };
    assert_eq!(
        render::run_summary(&summary),
        "processed 2 of 3 queued: 1 classified, 1 failed in 1.5s (cancelled)"
    );

    let report = DeletionReport {
        trashed: vec!["/a.mp4".into()],
        missing: vec!["/b.mp4".into()],
        failed: Vec::new(),
        kept: 4,
    };
    assert_eq!(
        render::deletion_summary(&report),
        "deleted 2 tagged videos: 1 trashed, 1 already missing, 0 failed to trash; 4 kept"
    );
}
