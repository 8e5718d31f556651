//! Audio transcription: Whisper-compatible API with a placeholder fallback.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use tracing::{info, warn};

use shortgen_media::extract_audio;
use shortgen_models::{Segment, Transcript, VideoId};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};

const WHISPER_MODEL: &str = "whisper-1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Speech-to-text backend.
#[async_trait]
pub trait TranscriptionBackend: Send + Sync {
    async fn transcribe(&self, audio: &Path, video_id: &VideoId) -> PipelineResult<Transcript>;
}

/// Client for the OpenAI audio transcription endpoint (or a compatible
/// server).
pub struct WhisperClient {
    api_url: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct WhisperResponse {
    #[serde(default)]
    text: String,
    #[serde(default)]
    language: String,
    #[serde(default)]
    segments: Vec<WhisperSegment>,
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    start: f64,
    end: f64,
    text: String,
}

impl WhisperClient {
    /// Create a client against an API base URL (e.g.
    /// `https://api.openai.com/v1`).
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> PipelineResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            client,
        })
    }
}

#[async_trait]
impl TranscriptionBackend for WhisperClient {
    async fn transcribe(&self, audio: &Path, video_id: &VideoId) -> PipelineResult<Transcript> {
        let url = format!("{}/audio/transcriptions", self.api_url);
        let file_name = audio
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio.wav".to_string());
        let bytes = tokio::fs::read(audio).await?;

        let form = multipart::Form::new()
            .part("file", multipart::Part::bytes(bytes).file_name(file_name))
            .text("model", WHISPER_MODEL)
            .text("response_format", "verbose_json");

        info!(video_id = %video_id, "Calling transcription API");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::transcription_failed(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let whisper: WhisperResponse = response.json().await?;

        let segments = whisper
            .segments
            .into_iter()
            .map(|s| Segment::new(s.start, s.end, s.text.trim()))
            .collect();

        let mut transcript = Transcript::new(video_id.clone(), whisper.language, segments);
        // The API's own full text is authoritative over the joined segments.
        transcript.full_text = whisper.text;
        Ok(transcript)
    }
}

/// Fixed transcript used when no speech-to-text backend is reachable, so
/// the rest of the pipeline can still be exercised.
pub fn placeholder_transcript(video_id: &VideoId) -> Transcript {
    Transcript::new(
        video_id.clone(),
        "en",
        vec![
            Segment::new(0.0, 5.0, "This is a sample transcript."),
            Segment::new(5.0, 10.0, "Whisper integration needed."),
        ],
    )
}

/// Transcription stage: demuxes audio and obtains a transcript.
///
/// Without a configured backend, or when the backend fails, the stage
/// degrades to the placeholder transcript rather than failing the run.
pub struct AudioTranscriber {
    backend: Option<Arc<dyn TranscriptionBackend>>,
}

/// Produces a transcript for a downloaded video file.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe_video(
        &self,
        video_file: &Path,
        video_id: &VideoId,
        audio_dir: &Path,
    ) -> PipelineResult<Transcript>;
}

impl AudioTranscriber {
    pub fn new(backend: Option<Arc<dyn TranscriptionBackend>>) -> Self {
        Self { backend }
    }

    /// Build from config: a Whisper client when an API key is present.
    pub fn from_config(config: &PipelineConfig) -> PipelineResult<Self> {
        let backend = match &config.openai_api_key {
            Some(key) => Some(
                Arc::new(WhisperClient::new(config.openai_api_url.clone(), key.clone())?)
                    as Arc<dyn TranscriptionBackend>,
            ),
            None => None,
        };
        Ok(Self::new(backend))
    }

    /// Transcribe already-extracted audio, falling back to the
    /// placeholder on any backend problem.
    pub async fn obtain_transcript(&self, audio: &Path, video_id: &VideoId) -> Transcript {
        match &self.backend {
            None => {
                warn!(video_id = %video_id, "No transcription credentials, using placeholder transcript");
                placeholder_transcript(video_id)
            }
            Some(backend) => match backend.transcribe(audio, video_id).await {
                Ok(transcript) => {
                    info!(
                        video_id = %video_id,
                        segments = transcript.segments.len(),
                        "Transcription completed"
                    );
                    transcript
                }
                Err(e) => {
                    warn!(video_id = %video_id, error = %e, "Transcription backend failed, using placeholder transcript");
                    placeholder_transcript(video_id)
                }
            },
        }
    }
}

#[async_trait]
impl Transcriber for AudioTranscriber {
    /// Extract audio from the video file and transcribe it.
    async fn transcribe_video(
        &self,
        video_file: &Path,
        video_id: &VideoId,
        audio_dir: &Path,
    ) -> PipelineResult<Transcript> {
        tokio::fs::create_dir_all(audio_dir).await?;
        let audio_path = audio_dir.join(format!("{}.wav", video_id));
        extract_audio(video_file, &audio_path).await?;
        Ok(self.obtain_transcript(&audio_path, video_id).await)
    }
}
