//! Sequential processing of pending videos.
//!
//! A [`Coordinator`] is built once per run. It owns the ephemeral queue,
//! classifies one path at a time, appends each result to the registry and
//! publishes a snapshot of the queue before and after every item.

use crate::classifier::{self, TagPolicy};
use crate::models::{QueueEntry, QueueSnapshot, QueueStatus, VideoRecord};
use crate::registry::VideoRegistry;
use anyhow::Context;
use chrono::{DateTime, Utc};
use providers::VideoClassifier;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub use_imagebind: bool,
    pub policy: TagPolicy,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub queued: usize,
    pub classified: Vec<VideoRecord>,
    pub failed: Vec<String>,
    pub cancelled: bool,
}

/// Shared stop flag, checked between items.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Read side of the in-flight queue. Empty whenever no run is active.
#[derive(Debug, Clone)]
pub struct QueueMonitor {
    rx: watch::Receiver<QueueSnapshot>,
}

impl QueueMonitor {
    pub fn current(&self) -> QueueSnapshot {
        self.rx.borrow().clone()
    }

    /// Waits for the next published snapshot. Errors once the coordinator is gone.
    pub async fn changed(&mut self) -> anyhow::Result<QueueSnapshot> {
        self.rx.changed().await.context("coordinator dropped")?;
        Ok(self.rx.borrow_and_update().clone())
    }
}

pub struct Coordinator {
    registry: Arc<dyn VideoRegistry>,
    classifier: Arc<dyn VideoClassifier>,
    options: RunOptions,
    state: watch::Sender<QueueSnapshot>,
    observer: Option<mpsc::Sender<QueueSnapshot>>,
    cancel: CancelToken,
}

impl Coordinator {
    pub fn new(
        registry: Arc<dyn VideoRegistry>,
        classifier: Arc<dyn VideoClassifier>,
        options: RunOptions,
    ) -> Self {
        let (state, _) = watch::channel(Vec::new());
        Self {
            registry,
            classifier,
            options,
            state,
            observer: None,
            cancel: CancelToken::default(),
        }
    }

    /// Sends every snapshot, in order, to a single consumer.
    pub fn with_observer(mut self, observer: mpsc::Sender<QueueSnapshot>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn monitor(&self) -> QueueMonitor {
        QueueMonitor {
            rx: self.state.subscribe(),
        }
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Runs the loop on a background task.
    pub fn spawn(self) -> RunHandle {
        let cancel = self.cancel.clone();
        let monitor = self.monitor();
        let task = tokio::spawn(async move { self.run().await });
        RunHandle {
            cancel,
            monitor,
            task,
        }
    }

    pub async fn run(&self) -> anyhow::Result<RunSummary> {
        let started_at = Utc::now();
        let pending = self
            .registry
            .list_unprocessed()
            .await
            .context("loading unprocessed videos")?;
        let mut queue: Vec<QueueEntry> = pending
            .into_iter()
            .map(|filename| QueueEntry {
                filename,
                status: QueueStatus::Waiting,
            })
            .collect();
        info!(
            queued = queue.len(),
            use_imagebind = self.options.use_imagebind,
            "starting processing run"
        );

        let mut classified = Vec::new();
        let mut failed = Vec::new();
        let mut cancelled = false;
        let queued = queue.len();

        for i in 0..queue.len() {
            if self.cancel.is_cancelled() {
                info!(remaining = queued - i, "processing run cancelled");
                cancelled = true;
                break;
            }
            queue[i].status = QueueStatus::Processing;
            if i > 0 {
                queue[i - 1].status = QueueStatus::Completed;
            }
            self.publish(&queue).await;

            let filename = queue[i].filename.clone();
            match self.process_one(&filename).await {
                Ok(record) => {
                    debug!(%filename, prediction = %record.prediction, tag = %record.tag, "classified");
                    classified.push(record);
                }
                Err(e) => {
                    warn!("failed to process {}: {:#}", filename, e);
                    failed.push(filename);
                }
            }

            self.publish(&queue).await;
        }

        queue.clear();
        self.publish(&queue).await;

        let summary = RunSummary {
            started_at,
            finished_at: Utc::now(),
            queued,
            classified,
            failed,
            cancelled,
        };
        info!(
            classified = summary.classified.len(),
            failed = summary.failed.len(),
            "processing run finished"
        );
        Ok(summary)
    }

    async fn process_one(&self, filename: &str) -> anyhow::Result<VideoRecord> {
        let outcome = classifier::classify(
            self.classifier.as_ref(),
            filename,
            self.options.use_imagebind,
            &self.options.policy,
        )
        .await
        .context("classification request")?;
        let record = VideoRecord::new(filename, outcome.prediction, outcome.tag);
        self.registry
            .append_record(&record)
            .await
            .context("appending record")?;
        Ok(record)
    }

    async fn publish(&self, queue: &[QueueEntry]) {
        let snapshot: QueueSnapshot = queue.to_vec();
        self.state.send_replace(snapshot.clone());
        if let Some(observer) = &self.observer {
            if observer.send(snapshot).await.is_err() {
                debug!("queue observer dropped");
            }
        }
    }
}

/// Handle to a spawned run.
pub struct RunHandle {
    cancel: CancelToken,
    monitor: QueueMonitor,
    task: JoinHandle<anyhow::Result<RunSummary>>,
}

impl RunHandle {
    /// Stops the run before its next item; the current classification finishes.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn monitor(&self) -> QueueMonitor {
        self.monitor.clone()
    }

    pub async fn wait(self) -> anyhow::Result<RunSummary> {
        self.task.await.context("processing task panicked")?
    }
}
