//! Status fan-out to interested observers.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::mpsc;
use tracing::debug;

use shortgen_models::{StatusEvent, VideoId};

/// Fans status events out to per-video subscribers.
///
/// Subscribers register an unbounded channel for a video ID; publishing
/// delivers the event to every live subscriber and prunes channels whose
/// receiver has been dropped.
#[derive(Default)]
pub struct StatusBroker {
    subscribers: Mutex<HashMap<VideoId, Vec<mpsc::UnboundedSender<StatusEvent>>>>,
}

impl StatusBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to status events for one video.
    pub fn subscribe(&self, video_id: &VideoId) -> mpsc::UnboundedReceiver<StatusEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut subscribers = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        subscribers.entry(video_id.clone()).or_default().push(tx);
        rx
    }

    /// Publish an event to all subscribers of its video.
    pub fn publish(&self, event: StatusEvent) {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(senders) = subscribers.get_mut(&event.video_id) {
            senders.retain(|tx| tx.send(event.clone()).is_ok());
            if senders.is_empty() {
                subscribers.remove(&event.video_id);
            }
        }
        debug!(video_id = %event.video_id, status = %event.status, "Published status");
    }

    /// Number of live subscriptions for a video.
    pub fn subscriber_count(&self, video_id: &VideoId) -> usize {
        let subscribers = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        subscribers.get(video_id).map_or(0, Vec::len)
    }
}
