//! Clip models: AI-suggested candidates and rendered clips.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

use crate::subtitle::SubtitleCue;
use crate::video::VideoId;

/// Unique identifier for a rendered clip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ClipId(pub String);

impl ClipId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ClipId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ClipId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A clip suggestion as emitted by the analysis backend, before it is
/// attached to a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SuggestedClipDraft {
    /// Start of the suggested window, in seconds
    pub start_time: f64,

    /// End of the suggested window, in seconds
    pub end_time: f64,

    /// Suggested clip title
    pub title: String,

    /// Why this moment works as a short clip
    #[serde(default)]
    pub description: String,

    /// Viral potential score, 0-100
    #[serde(default)]
    pub score: f64,

    /// Model's reasoning for the score
    #[serde(default)]
    pub reason: String,
}

/// A stored clip suggestion for a specific video.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SuggestedClip {
    /// Unique suggestion ID
    pub id: String,

    /// Video the suggestion belongs to
    pub video_id: VideoId,

    /// Start of the suggested window, in seconds
    pub start_time: f64,

    /// End of the suggested window, in seconds
    pub end_time: f64,

    /// Suggested clip title
    pub title: String,

    /// Why this moment works as a short clip
    #[serde(default)]
    pub description: String,

    /// Viral potential score, 0-100
    #[serde(default)]
    pub score: f64,

    /// Model's reasoning for the score
    #[serde(default)]
    pub reason: String,
}

impl SuggestedClip {
    /// Attach a draft to a video, assigning a fresh ID.
    pub fn from_draft(video_id: VideoId, draft: SuggestedClipDraft) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            video_id,
            start_time: draft.start_time,
            end_time: draft.end_time,
            title: draft.title,
            description: draft.description,
            score: draft.score,
            reason: draft.reason,
        }
    }

    /// Suggested window duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// Rendered clip lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClipStatus {
    /// Render in progress
    #[default]
    Processing,
    /// Render finished, file available
    Completed,
    /// Render failed
    Error,
}

impl ClipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClipStatus::Processing => "processing",
            ClipStatus::Completed => "completed",
            ClipStatus::Error => "error",
        }
    }
}

impl fmt::Display for ClipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A rendered (or rendering) output clip.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Clip {
    /// Unique clip ID
    pub id: ClipId,

    /// Source video ID
    pub video_id: VideoId,

    /// Clip title
    pub title: String,

    /// Start of the rendered window, in seconds
    pub start_time: f64,

    /// End of the rendered window, in seconds
    pub end_time: f64,

    /// Output file path, set once the render completes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,

    /// Subtitle cues burned into this clip
    #[serde(default)]
    pub subtitles: Vec<SubtitleCue>,

    /// Render status
    #[serde(default)]
    pub status: ClipStatus,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Completion timestamp, set on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Clip {
    /// Create a new processing clip record for a render request.
    pub fn new(video_id: VideoId, title: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            id: ClipId::new(),
            video_id,
            title: title.into(),
            start_time,
            end_time,
            file_path: None,
            subtitles: Vec::new(),
            status: ClipStatus::Processing,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Mark the render as completed with its output file.
    pub fn complete(&mut self, file_path: PathBuf) {
        self.file_path = Some(file_path);
        self.status = ClipStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    /// Mark the render as failed.
    pub fn fail(&mut self) {
        self.status = ClipStatus::Error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_attachment_assigns_ids() {
        let draft = SuggestedClipDraft {
            start_time: 12.0,
            end_time: 42.0,
            title: "Big reveal".to_string(),
            description: "The moment everything clicks".to_string(),
            score: 87.0,
            reason: "Strong hook and payoff".to_string(),
        };
        let clip = SuggestedClip::from_draft(VideoId::from("vid1"), draft);
        assert!(!clip.id.is_empty());
        assert_eq!(clip.video_id.as_str(), "vid1");
        assert_eq!(clip.duration(), 30.0);
    }

    #[test]
    fn test_clip_lifecycle() {
        let mut clip = Clip::new(VideoId::from("vid1"), "Intro", 0.0, 15.0);
        assert_eq!(clip.status, ClipStatus::Processing);
        assert!(clip.completed_at.is_none());

        clip.complete(PathBuf::from("/tmp/out.mp4"));
        assert_eq!(clip.status, ClipStatus::Completed);
        assert!(clip.file_path.is_some());
        assert!(clip.completed_at.is_some());
    }

    #[test]
    fn test_draft_deserializes_with_missing_optionals() {
        let json = r#"{"start_time": 1.0, "end_time": 2.0, "title": "T"}"#;
        let draft: SuggestedClipDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.score, 0.0);
        assert_eq!(draft.reason, "");
    }
}
