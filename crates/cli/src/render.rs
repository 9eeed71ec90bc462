//! Plain-text rendering for terminal output.

use triage_core::coordinator::RunSummary;
use triage_core::models::{QueueSnapshot, QueueStatus, VideoRecord};
use triage_core::query::Page;
use triage_core::review::DeletionReport;

pub fn snapshot_lines(snapshot: &QueueSnapshot) -> Vec<String> {
    if snapshot.is_empty() {
        return vec!["queue is empty".to_string()];
    }
    let done = snapshot
        .iter()
        .filter(|e| e.status == QueueStatus::Completed)
        .count();
    let mut lines = vec![format!("[{}/{}]", done, snapshot.len())];
    for entry in snapshot {
        lines.push(format!("  {:<22} {}", entry.status.as_str(), entry.filename));
    }
    lines
}

pub fn record_line(record: &VideoRecord) -> String {
    format!(
        "{:<10} {:<24} {}  ({})",
        record.tag.as_str(),
        record.prediction,
        record.filename,
        record.id
    )
}

pub fn page_lines(page: &Page<VideoRecord>) -> Vec<String> {
    let mut lines: Vec<String> = page.items.iter().map(record_line).collect();
    let shown_page = if page.page_count == 0 { 0 } else { page.page + 1 };
    lines.push(format!(
        "page {} of {} ({} matching)",
        shown_page, page.page_count, page.total
    ));
    lines
}

pub fn run_summary(summary: &RunSummary) -> String {
    let elapsed = summary.finished_at - summary.started_at;
    let mut out = format!(
        "processed {} of {} queued: {} classified, {} failed in {:.1}s",
        summary.classified.len() + summary.failed.len(),
        summary.queued,
        summary.classified.len(),
        summary.failed.len(),
        elapsed.num_milliseconds() as f64 / 1000.0
    );
    if summary.cancelled {
        out.push_str(" (cancelled)");
    }
    out
}

pub fn deletion_summary(report: &DeletionReport) -> String {
    format!(
        "deleted {} tagged videos: {} trashed, {} already missing, {} failed to trash; {} kept",
        report.removed(),
        report.trashed.len(),
        report.missing.len(),
        report.failed.len(),
        report.kept
    )
}
