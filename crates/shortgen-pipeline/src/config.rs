//! Pipeline configuration.

use std::path::PathBuf;

/// Pipeline configuration, sourced from environment variables.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root directory for downloaded videos, audio and rendered clips
    pub storage_path: PathBuf,
    /// OpenAI API key; transcription falls back to a placeholder without it
    pub openai_api_key: Option<String>,
    /// OpenAI-compatible API base URL
    pub openai_api_url: String,
    /// DeepSeek API key; analysis fails without it (unless Ollama is used)
    pub deepseek_api_key: Option<String>,
    /// DeepSeek API base URL
    pub deepseek_api_url: String,
    /// Use a local Ollama instance for analysis instead of DeepSeek
    pub use_ollama: bool,
    /// Ollama base URL
    pub ollama_url: String,
    /// Ollama model name
    pub ollama_model: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("./storage"),
            openai_api_key: None,
            openai_api_url: "https://api.openai.com/v1".to_string(),
            deepseek_api_key: None,
            deepseek_api_url: "https://api.deepseek.com".to_string(),
            use_ollama: false,
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "deepseek-r1:latest".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables, loading `.env` first.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            storage_path: std::env::var("STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./storage")),
            openai_api_key: std::env::var("OPENAI_API_KEY").ok().filter(|s| !s.is_empty()),
            openai_api_url: std::env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            deepseek_api_key: std::env::var("DEEPSEEK_API_KEY")
                .ok()
                .filter(|s| !s.is_empty()),
            deepseek_api_url: std::env::var("DEEPSEEK_API_URL")
                .unwrap_or_else(|_| "https://api.deepseek.com".to_string()),
            use_ollama: std::env::var("USE_OLLAMA")
                .map(|s| s == "true")
                .unwrap_or(false),
            ollama_url: std::env::var("OLLAMA_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            ollama_model: std::env::var("OLLAMA_MODEL")
                .unwrap_or_else(|_| "deepseek-r1:latest".to_string()),
        }
    }

    /// Directory for downloaded source videos.
    pub fn videos_dir(&self) -> PathBuf {
        self.storage_path.join("videos")
    }

    /// Directory for extracted audio files.
    pub fn audio_dir(&self) -> PathBuf {
        self.storage_path.join("audio")
    }

    /// Directory for rendered clips.
    pub fn clips_dir(&self) -> PathBuf {
        self.storage_path.join("clips")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.openai_api_url, "https://api.openai.com/v1");
        assert_eq!(config.deepseek_api_url, "https://api.deepseek.com");
        assert!(!config.use_ollama);
        assert!(config.openai_api_key.is_none());
    }

    #[test]
    fn test_storage_subdirectories() {
        let config = PipelineConfig::default();
        assert!(config.clips_dir().ends_with("clips"));
        assert!(config.videos_dir().ends_with("videos"));
    }
}
