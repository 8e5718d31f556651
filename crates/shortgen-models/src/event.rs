//! Status notification events.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::video::{VideoId, VideoStatus};

/// A status change notification published to observers of a video.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StatusEvent {
    /// Video the event concerns
    pub video_id: VideoId,

    /// New pipeline status
    pub status: VideoStatus,

    /// Optional human-readable detail (error text, phase note)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Event timestamp
    pub timestamp: DateTime<Utc>,
}

impl StatusEvent {
    /// Create a status event for a video.
    pub fn new(video_id: VideoId, status: VideoStatus) -> Self {
        Self {
            video_id,
            status,
            message: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a status event with a detail message.
    pub fn with_message(video_id: VideoId, status: VideoStatus, message: impl Into<String>) -> Self {
        Self {
            video_id,
            status,
            message: Some(message.into()),
            timestamp: Utc::now(),
        }
    }
}
