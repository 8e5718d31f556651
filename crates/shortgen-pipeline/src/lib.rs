//! Processing pipeline for the ShortGen backend.
//!
//! A submitted video moves through four phases: download (yt-dlp),
//! transcription (Whisper-compatible API, with a placeholder fallback),
//! analysis (DeepSeek or Ollama) and, on request, clip export (FFmpeg).
//! The [`Coordinator`] drives the first three; [`ClipExporter`] handles
//! renders. State lives behind the [`VideoStore`] trait and status
//! changes fan out through the [`StatusBroker`].

pub mod analysis;
pub mod config;
pub mod coordinator;
pub mod download_backend;
pub mod error;
pub mod export;
pub mod notify;
pub mod store;
pub mod telemetry;
pub mod transcription;

pub use analysis::{AnalysisBackend, AnalysisStage, DeepSeekClient, OllamaClient};
pub use config::PipelineConfig;
pub use coordinator::Coordinator;
pub use download_backend::{DownloadBackend, YtDlpBackend};
pub use error::{PipelineError, PipelineResult};
pub use export::{ClipExporter, ClipRenderer, FfmpegClipRenderer};
pub use notify::StatusBroker;
pub use store::{MemoryStore, VideoStore};
pub use telemetry::init_tracing;
pub use transcription::{
    placeholder_transcript, AudioTranscriber, Transcriber, TranscriptionBackend, WhisperClient,
};
