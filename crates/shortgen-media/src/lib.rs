//! Media processing for the ShortGen backend.
//!
//! Wraps FFmpeg and yt-dlp behind async functions:
//! - Source download and metadata probing
//! - Audio extraction for transcription
//! - Subtitle filter graph construction
//! - Vertical clip rendering

pub mod audio;
pub mod clip;
pub mod color;
pub mod command;
pub mod download;
pub mod error;
pub mod fonts;
pub mod subtitles;

pub use audio::extract_audio;
pub use clip::{extract_raw_clip, render_clip};
pub use command::{check_ffmpeg, check_ytdlp, FfmpegCommand, FfmpegRunner};
pub use download::{download_video, probe_metadata, SourceMetadata};
pub use error::{MediaError, MediaResult};
pub use fonts::resolve_font_path;
pub use subtitles::build_subtitle_filter;
