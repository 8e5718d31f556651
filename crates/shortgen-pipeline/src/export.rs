//! Clip export: drives a render request through the clip lifecycle.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use shortgen_models::{Clip, SubtitleCue, VideoId};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::store::VideoStore;

/// Renders clip windows out of a source file.
#[async_trait]
pub trait ClipRenderer: Send + Sync {
    /// Render a delivery clip with burned-in subtitles.
    async fn render(
        &self,
        input: &Path,
        output: &Path,
        start: f64,
        end: f64,
        cues: &[SubtitleCue],
    ) -> PipelineResult<()>;

    /// Extract the raw reframed window without subtitles.
    async fn render_raw(
        &self,
        input: &Path,
        output: &Path,
        start: f64,
        end: f64,
    ) -> PipelineResult<()>;
}

/// Production renderer delegating to FFmpeg.
#[derive(Debug, Default, Clone, Copy)]
pub struct FfmpegClipRenderer;

#[async_trait]
impl ClipRenderer for FfmpegClipRenderer {
    async fn render(
        &self,
        input: &Path,
        output: &Path,
        start: f64,
        end: f64,
        cues: &[SubtitleCue],
    ) -> PipelineResult<()> {
        Ok(shortgen_media::render_clip(input, output, start, end, cues).await?)
    }

    async fn render_raw(
        &self,
        input: &Path,
        output: &Path,
        start: f64,
        end: f64,
    ) -> PipelineResult<()> {
        Ok(shortgen_media::extract_raw_clip(input, output, start, end).await?)
    }
}

/// Creates clip records and renders their output files.
///
/// Unlike the processing pipeline, export errors propagate to the
/// caller; the clip record is left in `Error` status for inspection.
pub struct ClipExporter {
    store: Arc<dyn VideoStore>,
    renderer: Arc<dyn ClipRenderer>,
    config: PipelineConfig,
}

impl ClipExporter {
    pub fn new(
        store: Arc<dyn VideoStore>,
        renderer: Arc<dyn ClipRenderer>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            renderer,
            config,
        }
    }

    /// Export a subtitled clip from a processed video.
    pub async fn export(
        &self,
        video_id: &VideoId,
        title: impl Into<String>,
        start: f64,
        end: f64,
        cues: &[SubtitleCue],
    ) -> PipelineResult<Clip> {
        let video = self.store.get_video(video_id).await?;
        let input = video
            .file_path
            .clone()
            .ok_or_else(|| PipelineError::MissingSourceFile(video_id.to_string()))?;

        let mut clip = Clip::new(video_id.clone(), title, start, end);
        clip.subtitles = cues.to_vec();
        self.store.create_clip(clip.clone()).await?;

        let clips_dir = self.config.clips_dir();
        tokio::fs::create_dir_all(&clips_dir).await?;
        let output = clips_dir.join(format!("{}.mp4", clip.id));

        info!(clip_id = %clip.id, video_id = %video_id, start, end, "Exporting clip");
        match self.renderer.render(&input, &output, start, end, cues).await {
            Ok(()) => {
                clip.complete(output);
                self.store.update_clip(clip.clone()).await?;
                info!(clip_id = %clip.id, "Clip export completed");
                Ok(clip)
            }
            Err(e) => {
                error!(clip_id = %clip.id, error = %e, "Clip export failed");
                clip.fail();
                self.store.update_clip(clip.clone()).await?;
                Err(e)
            }
        }
    }

    /// Extract a raw reframed window without subtitles. No clip record
    /// is kept; the output path is returned directly.
    pub async fn extract_raw(
        &self,
        video_id: &VideoId,
        start: f64,
        end: f64,
    ) -> PipelineResult<PathBuf> {
        let video = self.store.get_video(video_id).await?;
        let input = video
            .file_path
            .clone()
            .ok_or_else(|| PipelineError::MissingSourceFile(video_id.to_string()))?;

        let clips_dir = self.config.clips_dir();
        tokio::fs::create_dir_all(&clips_dir).await?;
        let output = clips_dir.join(format!("{}_raw_{:.0}-{:.0}.mp4", video_id, start, end));

        self.renderer.render_raw(&input, &output, start, end).await?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shortgen_models::{ClipStatus, Video};

    use crate::store::MemoryStore;

    struct StubRenderer;

    #[async_trait]
    impl ClipRenderer for StubRenderer {
        async fn render(
            &self,
            _input: &Path,
            output: &Path,
            _start: f64,
            _end: f64,
            _cues: &[SubtitleCue],
        ) -> PipelineResult<()> {
            tokio::fs::write(output, b"clip").await?;
            Ok(())
        }

        async fn render_raw(
            &self,
            _input: &Path,
            output: &Path,
            _start: f64,
            _end: f64,
        ) -> PipelineResult<()> {
            tokio::fs::write(output, b"raw").await?;
            Ok(())
        }
    }

    struct FailingRenderer;

    #[async_trait]
    impl ClipRenderer for FailingRenderer {
        async fn render(
            &self,
            _input: &Path,
            _output: &Path,
            _start: f64,
            _end: f64,
            _cues: &[SubtitleCue],
        ) -> PipelineResult<()> {
            Err(PipelineError::Media(shortgen_media::MediaError::ffmpeg_failed(
                "encode failed",
                Some("stderr output".to_string()),
                Some(1),
            )))
        }

        async fn render_raw(
            &self,
            _input: &Path,
            _output: &Path,
            _start: f64,
            _end: f64,
        ) -> PipelineResult<()> {
            Err(PipelineError::Media(shortgen_media::MediaError::ffmpeg_failed(
                "encode failed",
                None,
                Some(1),
            )))
        }
    }

    async fn store_with_video(dir: &Path) -> (Arc<MemoryStore>, VideoId) {
        let store = Arc::new(MemoryStore::new());
        let mut video = Video::new("https://example.com/v");
        let source = dir.join("source.mp4");
        tokio::fs::write(&source, b"video").await.unwrap();
        video.file_path = Some(source);
        let id = video.id.clone();
        store.create_video(video).await.unwrap();
        (store, id)
    }

    fn exporter(store: Arc<MemoryStore>, renderer: Arc<dyn ClipRenderer>, dir: &Path) -> ClipExporter {
        let config = PipelineConfig {
            storage_path: dir.to_path_buf(),
            ..PipelineConfig::default()
        };
        ClipExporter::new(store, renderer, config)
    }

    #[tokio::test]
    async fn test_export_completes_clip() {
        let dir = tempfile::tempdir().unwrap();
        let (store, video_id) = store_with_video(dir.path()).await;
        let exporter = exporter(store.clone(), Arc::new(StubRenderer), dir.path());

        let cues = vec![SubtitleCue::new("Hello", 0.0, 2.0)];
        let clip = exporter
            .export(&video_id, "Highlight", 10.0, 40.0, &cues)
            .await
            .unwrap();

        assert_eq!(clip.status, ClipStatus::Completed);
        assert!(clip.completed_at.is_some());
        assert!(clip.file_path.as_ref().map(|p| p.exists()).unwrap_or(false));

        let stored = store.get_clip(&clip.id).await.unwrap();
        assert_eq!(stored.status, ClipStatus::Completed);
        assert_eq!(stored.subtitles.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_render_marks_clip_error() {
        let dir = tempfile::tempdir().unwrap();
        let (store, video_id) = store_with_video(dir.path()).await;
        let exporter = exporter(store.clone(), Arc::new(FailingRenderer), dir.path());

        let err = exporter
            .export(&video_id, "Highlight", 10.0, 40.0, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Media(_)));

        let clips = store.list_clips(&video_id).await.unwrap();
        assert_eq!(clips.len(), 1);
        assert_eq!(clips[0].status, ClipStatus::Error);
        assert!(clips[0].file_path.is_none());
    }

    #[tokio::test]
    async fn test_export_requires_downloaded_source() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::new());
        let video = Video::new("https://example.com/v");
        let video_id = video.id.clone();
        store.create_video(video).await.unwrap();

        let exporter = exporter(store.clone(), Arc::new(StubRenderer), dir.path());
        let err = exporter
            .export(&video_id, "Highlight", 0.0, 10.0, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::MissingSourceFile(_)));

        // No clip record is created for an unexportable video.
        assert!(store.list_clips(&video_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_raw_extract_output_name() {
        let dir = tempfile::tempdir().unwrap();
        let (store, video_id) = store_with_video(dir.path()).await;
        let exporter = exporter(store, Arc::new(StubRenderer), dir.path());

        let output = exporter.extract_raw(&video_id, 12.0, 48.0).await.unwrap();
        let name = output.file_name().unwrap().to_string_lossy().to_string();
        assert_eq!(name, format!("{}_raw_12-48.mp4", video_id));
        assert!(output.exists());
    }
}
