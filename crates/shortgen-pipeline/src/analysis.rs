//! Transcript analysis: LLM-backed viral clip suggestion.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use shortgen_models::{SuggestedClip, SuggestedClipDraft, Transcript, VideoId};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};

const DEEPSEEK_MODEL: &str = "deepseek-chat";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

const SYSTEM_PROMPT: &str = "You are a professional video editor with over a decade of experience creating viral content. \
Your specialty is identifying complete, coherent moments that work as standalone clips. \
You always prioritize narrative completeness over brevity. You respond only with valid JSON.";

/// Build the analysis prompt for a transcript.
fn build_prompt(full_text: &str) -> String {
    format!(
        r#"You are a professional video editor creating viral clips for TikTok, YouTube Shorts and Instagram Reels.

Analyze this full video transcript and identify the 5-8 best moments for short clips that make COMPLETE SENSE on their own.

VIDEO TRANSCRIPT:
{full_text}

CORE CRITERIA FOR EVERY CLIP:

1. NARRATIVE COHERENCE (highest priority):
   - The clip MUST have a beginning, development and a proper ending
   - Do NOT cut ideas in half or end on incomplete sentences
   - The story or concept must be self-contained and understandable

2. SMART DURATION:
   - Minimum: 15 seconds (only when the idea is concise and strong)
   - Ideal: 30-45 seconds (enough to develop the idea)
   - Maximum: 60 seconds (when needed to complete the concept)
   - Prefer coherence over brevity

3. STRATEGIC START AND END POINTS:
   - Start at the natural beginning of an idea, story or concept
   - End once the idea is fully expressed
   - Avoid abrupt openings or cut-off endings, respect natural speech pauses

4. HIGH-VALUE CONTENT:
   - Moments that teach something specific and useful
   - Complete stories with setup and payoff
   - Full revelations or insights, emotional moments with enough context

5. VIRAL POTENTIAL:
   - Content that hooks curiosity from the first second
   - Surprising or counter-intuitive information
   - Stories with a twist, content people want to share

RESPONSE FORMAT (JSON):
Return an array of 5-8 clips with exactly this structure:

[
  {{
    "start_time": 10.5,
    "end_time": 45.2,
    "title": "Compelling title reflecting the full content",
    "description": "Detailed description of what the clip covers start to finish",
    "score": 85,
    "reason": "Specific explanation of why this clip works: what makes it interesting, why it is self-contained, and its viral potential"
  }}
]

IMPORTANT:
- Timestamps must be precise (decimals allowed)
- Verify each clip has a complete narrative
- A coherent 60-second clip beats a truncated 30-second one
- Order clips from most viral (highest score) to least viral

Respond ONLY with the JSON array, no additional text."#
    )
}

/// Strip markdown code fences from model output, leaving the inner JSON.
fn strip_code_fences(content: &str) -> String {
    let content = content.trim();

    if let Some(start) = content.find("```json") {
        let inner = &content[start + 7..];
        if let Some(end) = inner.rfind("```") {
            return inner[..end].trim().to_string();
        }
    } else if let Some(start) = content.find("```") {
        let inner = &content[start + 3..];
        if let Some(end) = inner.rfind("```") {
            return inner[..end].trim().to_string();
        }
    }

    content.to_string()
}

/// Parse model output into suggestion drafts. An empty array is an error:
/// a run with no suggestions is not a usable result.
fn parse_drafts(content: &str) -> PipelineResult<Vec<SuggestedClipDraft>> {
    let cleaned = strip_code_fences(content);
    let drafts: Vec<SuggestedClipDraft> = serde_json::from_str(&cleaned)
        .map_err(|e| PipelineError::analysis_failed(format!("bad suggestions JSON: {}", e)))?;
    if drafts.is_empty() {
        return Err(PipelineError::EmptySuggestions);
    }
    Ok(drafts)
}

/// LLM backend producing clip suggestions from a transcript.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn analyze(&self, transcript: &Transcript) -> PipelineResult<Vec<SuggestedClipDraft>>;
}

/// Client for the DeepSeek chat completions API.
pub struct DeepSeekClient {
    api_url: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    error: Option<ChatError>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatError {
    message: String,
    #[serde(rename = "type", default)]
    kind: String,
}

impl DeepSeekClient {
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
impl AnalysisBackend for DeepSeekClient {
    async fn analyze(&self, transcript: &Transcript) -> PipelineResult<Vec<SuggestedClipDraft>> {
        let url = format!("{}/chat/completions", self.api_url);
        let body = json!({
            "model": DEEPSEEK_MODEL,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": build_prompt(&transcript.full_text)},
            ],
            "temperature": 0.7,
            "max_tokens": 4000,
            "stream": false,
        });

        info!(chars = transcript.full_text.len(), "Requesting clip suggestions");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::analysis_failed(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let chat: ChatResponse = response.json().await?;
        if let Some(error) = chat.error {
            return Err(PipelineError::analysis_failed(format!(
                "{} ({})",
                error.message, error.kind
            )));
        }

        let content = chat
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .unwrap_or_default();
        if content.is_empty() {
            return Err(PipelineError::analysis_failed("empty model response"));
        }

        parse_drafts(content)
    }
}

/// Client for a local Ollama instance.
pub struct OllamaClient {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl AnalysisBackend for OllamaClient {
    async fn analyze(&self, transcript: &Transcript) -> PipelineResult<Vec<SuggestedClipDraft>> {
        let url = format!("{}/api/generate", self.base_url);
        let body = json!({
            "model": self.model,
            "prompt": build_prompt(&transcript.full_text),
            "stream": false,
            "system": SYSTEM_PROMPT,
        });

        let response = self.client.post(&url).json(&body).send().await?;
        let ollama: OllamaResponse = response.json().await?;

        if ollama.response.is_empty() {
            return Err(PipelineError::analysis_failed("empty model response"));
        }

        parse_drafts(&ollama.response)
    }
}

/// Analysis stage: runs the configured backend and attaches the results
/// to a video. Analysis failures propagate; there is deliberately no
/// fallback here.
pub struct AnalysisStage {
    backend: Arc<dyn AnalysisBackend>,
}

impl std::fmt::Debug for AnalysisStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisStage").finish_non_exhaustive()
    }
}

impl AnalysisStage {
    pub fn new(backend: Arc<dyn AnalysisBackend>) -> Self {
        Self { backend }
    }

    /// Build from config: Ollama when enabled, DeepSeek otherwise.
    pub fn from_config(config: &PipelineConfig) -> PipelineResult<Self> {
        let backend: Arc<dyn AnalysisBackend> = if config.use_ollama {
            Arc::new(OllamaClient::new(
                config.ollama_url.clone(),
                config.ollama_model.clone(),
            ))
        } else {
            let key = config
                .deepseek_api_key
                .clone()
                .ok_or_else(|| PipelineError::config_error("DEEPSEEK_API_KEY not set"))?;
            Arc::new(DeepSeekClient::new(config.deepseek_api_url.clone(), key)?)
        };
        Ok(Self::new(backend))
    }

    /// Analyze a transcript and attach the suggestions to the video.
    pub async fn analyze(
        &self,
        transcript: &Transcript,
        video_id: &VideoId,
    ) -> PipelineResult<Vec<SuggestedClip>> {
        let drafts = self.backend.analyze(transcript).await?;
        info!(video_id = %video_id, count = drafts.len(), "Analysis completed");
        Ok(drafts
            .into_iter()
            .map(|draft| SuggestedClip::from_draft(video_id.clone(), draft))
            .collect())
    }
}
