//! Transcript models.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::video::VideoId;

/// A single timestamped span of transcribed speech.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Segment {
    /// Start time in seconds from the beginning of the video
    pub start: f64,

    /// End time in seconds
    pub end: f64,

    /// Transcribed text for this span
    pub text: String,
}

impl Segment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

/// Full transcript for a video. At most one per video.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Transcript {
    /// Unique transcript ID
    pub id: String,

    /// Video this transcript belongs to
    pub video_id: VideoId,

    /// Detected (or assumed) language code, e.g. "en"
    pub language: String,

    /// Ordered segments
    pub segments: Vec<Segment>,

    /// Concatenated segment texts
    pub full_text: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Transcript {
    /// Build a transcript from segments, deriving `full_text` by joining
    /// segment texts with single spaces.
    pub fn new(video_id: VideoId, language: impl Into<String>, segments: Vec<Segment>) -> Self {
        let full_text = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            id: Uuid::new_v4().to_string(),
            video_id,
            language: language.into(),
            segments,
            full_text,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_text_joins_segments() {
        let transcript = Transcript::new(
            VideoId::from("vid1"),
            "en",
            vec![
                Segment::new(0.0, 5.0, "Hello there."),
                Segment::new(5.0, 10.0, "General remarks."),
            ],
        );
        assert_eq!(transcript.full_text, "Hello there. General remarks.");
        assert_eq!(transcript.segments.len(), 2);
    }

    #[test]
    fn test_empty_transcript() {
        let transcript = Transcript::new(VideoId::from("vid1"), "en", vec![]);
        assert_eq!(transcript.full_text, "");
    }
}
