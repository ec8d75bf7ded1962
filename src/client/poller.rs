use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::client::notification::Notification;
use crate::client::ClientError;
use crate::models::upload_model::UploadResponse;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Anything that can hand back the full gallery, newest first.
#[async_trait]
pub trait GallerySource: Send + Sync {
    async fn fetch_uploads(&self) -> Result<Vec<UploadResponse>, ClientError>;
}

/// One fetched copy of the gallery.
#[derive(Debug, Clone, Default)]
pub struct GallerySnapshot {
    uploads: Vec<UploadResponse>,
    ids: HashSet<i64>,
}

impl GallerySnapshot {
    pub fn new(uploads: Vec<UploadResponse>) -> Self {
        let ids = uploads.iter().map(|u| u.id).collect();
        Self { uploads, ids }
    }

    pub fn uploads(&self) -> &[UploadResponse] {
        &self.uploads
    }

    pub fn len(&self) -> usize {
        self.uploads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uploads.is_empty()
    }

    /// Ids present here but absent from `previous`. Deletions do not cancel insertions.
    pub fn new_since(&self, previous: &GallerySnapshot) -> usize {
        self.ids.difference(&previous.ids).count()
    }
}

pub fn new_uploads_notification(count: usize) -> Option<Notification> {
    match count {
        0 => None,
        1 => Some(Notification::success("1 new memory added! 🎉")),
        n => Some(Notification::success(format!("{} new memories added! 🎉", n))),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    Updated(Vec<UploadResponse>),
    Notify(Notification),
}

pub struct GalleryPoller<S> {
    source: S,
    snapshot: GallerySnapshot,
    interval: Duration,
    last_update: Option<DateTime<Utc>>,
}

impl<S: GallerySource> GalleryPoller<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            snapshot: GallerySnapshot::default(),
            interval: DEFAULT_POLL_INTERVAL,
            last_update: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn snapshot(&self) -> &GallerySnapshot {
        &self.snapshot
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    /// Initial fetch. Failures are reported; new entries never are.
    pub async fn load(&mut self) -> Option<Notification> {
        match self.source.fetch_uploads().await {
            Ok(uploads) => {
                self.replace(uploads);
                None
            }
            Err(e) => {
                tracing::error!("Error fetching uploads: {}", e);
                Some(Notification::error("Failed to load memories"))
            }
        }
    }

    /// Background fetch. Failures keep the previous snapshot and stay quiet.
    pub async fn refresh(&mut self) -> Option<Notification> {
        let uploads = match self.source.fetch_uploads().await {
            Ok(uploads) => uploads,
            Err(e) => {
                tracing::warn!("Background refresh failed: {}", e);
                return None;
            }
        };

        let previous = self.replace(uploads);
        if previous.is_empty() {
            return None;
        }

        let added = self.snapshot.new_since(&previous);
        if added > 0 {
            tracing::info!(added, total = self.snapshot.len(), "New uploads detected");
        }
        new_uploads_notification(added)
    }

    fn replace(&mut self, uploads: Vec<UploadResponse>) -> GallerySnapshot {
        self.last_update = Some(Utc::now());
        std::mem::replace(&mut self.snapshot, GallerySnapshot::new(uploads))
    }

    /// Loads once, then refreshes every interval until `cancel` fires or the
    /// receiver goes away. A refresh already in flight is allowed to finish.
    pub async fn run(mut self, cancel: CancellationToken, events: mpsc::UnboundedSender<PollEvent>) {
        let first = self.load().await;
        if !self.emit(&events, first) {
            return;
        }

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let notification = self.refresh().await;
                    if !self.emit(&events, notification) {
                        break;
                    }
                }
            }
        }

        tracing::debug!("Gallery poller stopped");
    }

    fn emit(&self, events: &mpsc::UnboundedSender<PollEvent>, notification: Option<Notification>) -> bool {
        if events.send(PollEvent::Updated(self.snapshot.uploads().to_vec())).is_err() {
            return false;
        }
        match notification {
            Some(n) => events.send(PollEvent::Notify(n)).is_ok(),
            None => true,
        }
    }
}
