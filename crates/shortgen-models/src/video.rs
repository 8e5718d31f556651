//! Video metadata models.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// Unique identifier for a source video.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct VideoId(pub String);

impl VideoId {
    /// Generate a new random video ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for VideoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VideoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VideoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Video processing lifecycle status.
///
/// Transitions move strictly forward through the pipeline phases; `Error`
/// is terminal for the run and reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum VideoStatus {
    /// Submitted, processing not started
    #[default]
    Pending,
    /// Downloading the source media
    Downloading,
    /// Extracting audio and transcribing
    Transcribing,
    /// Analyzing the transcript for clip candidates
    Analyzing,
    /// Pipeline completed successfully
    Completed,
    /// Pipeline failed; the record persists for inspection
    Error,
}

impl VideoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStatus::Pending => "pending",
            VideoStatus::Downloading => "downloading",
            VideoStatus::Transcribing => "transcribing",
            VideoStatus::Analyzing => "analyzing",
            VideoStatus::Completed => "completed",
            VideoStatus::Error => "error",
        }
    }

    /// Whether this status ends the pipeline run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, VideoStatus::Completed | VideoStatus::Error)
    }
}

impl fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A submitted source video and its pipeline state.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Video {
    /// Unique video ID
    pub id: VideoId,

    /// Original source URL
    pub url: String,

    /// Resolved title (populated by the download phase)
    #[serde(default)]
    pub title: String,

    /// Duration in whole seconds (populated by the download phase)
    #[serde(default)]
    pub duration_secs: u32,

    /// Local path of the downloaded media file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,

    /// Thumbnail reference reported by the download backend
    #[serde(default)]
    pub thumbnail_url: String,

    /// Pipeline status
    #[serde(default)]
    pub status: VideoStatus,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Video {
    /// Create a new pending video record for a source URL.
    pub fn new(url: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: VideoId::new(),
            url: url.into(),
            title: String::new(),
            duration_secs: 0,
            file_path: None,
            thumbnail_url: String::new(),
            status: VideoStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to a new status, refreshing the update timestamp.
    pub fn set_status(&mut self, status: VideoStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}
