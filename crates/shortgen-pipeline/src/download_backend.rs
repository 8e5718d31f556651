//! Download backend abstraction.

use std::path::Path;

use async_trait::async_trait;

use shortgen_media::{download_video, probe_metadata, SourceMetadata};

use crate::error::PipelineResult;

/// Fetches source videos and their metadata.
#[async_trait]
pub trait DownloadBackend: Send + Sync {
    /// Probe a URL for title, duration and thumbnail without downloading.
    async fn probe(&self, url: &str) -> PipelineResult<SourceMetadata>;

    /// Download the source to `dest` as mp4.
    async fn fetch(&self, url: &str, dest: &Path) -> PipelineResult<()>;
}

/// Production backend delegating to yt-dlp.
#[derive(Debug, Default, Clone, Copy)]
pub struct YtDlpBackend;

#[async_trait]
impl DownloadBackend for YtDlpBackend {
    async fn probe(&self, url: &str) -> PipelineResult<SourceMetadata> {
        Ok(probe_metadata(url).await?)
    }

    async fn fetch(&self, url: &str, dest: &Path) -> PipelineResult<()> {
        Ok(download_video(url, dest).await?)
    }
}
