//! Shared data models for the ShortGen backend.
//!
//! This crate provides Serde-serializable types for:
//! - Videos and their processing lifecycle
//! - Transcripts and timestamped segments
//! - Suggested clips and rendered clips
//! - Subtitle cue styling
//! - Encoding configuration
//! - Status notification events

pub mod clip;
pub mod encoding;
pub mod event;
pub mod subtitle;
pub mod transcript;
pub mod video;

// Re-export common types
pub use clip::{Clip, ClipId, ClipStatus, SuggestedClip, SuggestedClipDraft};
pub use encoding::EncodingConfig;
pub use event::StatusEvent;
pub use subtitle::{SubtitleCue, SubtitlePosition};
pub use transcript::{Segment, Transcript};
pub use video::{Video, VideoId, VideoStatus};
