//! Pipeline coordinator: drives a video through its processing phases.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use shortgen_models::{StatusEvent, Video, VideoId, VideoStatus};

use crate::analysis::AnalysisStage;
use crate::config::PipelineConfig;
use crate::download_backend::DownloadBackend;
use crate::error::{PipelineError, PipelineResult};
use crate::notify::StatusBroker;
use crate::store::VideoStore;
use crate::transcription::Transcriber;

/// Pause after announcing the download phase, giving observers time to
/// attach before the first long-running step.
const DOWNLOAD_ANNOUNCE_DELAY: Duration = Duration::from_millis(500);
/// Pause after announcing subsequent phases.
const PHASE_ANNOUNCE_DELAY: Duration = Duration::from_millis(300);

/// Runs the download → transcribe → analyze pipeline for submitted
/// videos, persisting state transitions and publishing status events.
pub struct Coordinator {
    store: Arc<dyn VideoStore>,
    broker: Arc<StatusBroker>,
    downloader: Arc<dyn DownloadBackend>,
    transcriber: Arc<dyn Transcriber>,
    analyzer: Arc<AnalysisStage>,
    config: PipelineConfig,
}

impl Coordinator {
    pub fn new(
        store: Arc<dyn VideoStore>,
        broker: Arc<StatusBroker>,
        downloader: Arc<dyn DownloadBackend>,
        transcriber: Arc<dyn Transcriber>,
        analyzer: Arc<AnalysisStage>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            broker,
            downloader,
            transcriber,
            analyzer,
            config,
        }
    }

    /// Register a new pending video for a source URL.
    pub async fn submit(&self, url: impl Into<String>) -> PipelineResult<Video> {
        let video = Video::new(url);
        self.store.create_video(video.clone()).await?;
        Ok(video)
    }

    /// Spawn the pipeline for a video as a background task.
    pub fn spawn_run(self: &Arc<Self>, video_id: VideoId) {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = coordinator.run(&video_id).await {
                error!(video_id = %video_id, error = %e, "Pipeline run failed");
            }
        });
    }

    /// Run the full pipeline for a previously submitted video.
    ///
    /// On failure the video is left in `Error` status and the error is
    /// also returned to the caller.
    pub async fn run(&self, video_id: &VideoId) -> PipelineResult<()> {
        let mut video = self.store.get_video(video_id).await?;

        // Download phase
        self.advance(&mut video, VideoStatus::Downloading).await;
        tokio::time::sleep(DOWNLOAD_ANNOUNCE_DELAY).await;

        info!(video_id = %video.id, url = %video.url, "Downloading video");
        if let Err(e) = self.download(&mut video).await {
            return self.fail(&mut video, e).await;
        }
        info!(video_id = %video.id, title = %video.title, "Download completed");

        // Transcription phase
        self.advance(&mut video, VideoStatus::Transcribing).await;
        tokio::time::sleep(PHASE_ANNOUNCE_DELAY).await;

        let file_path = match &video.file_path {
            Some(path) => path.clone(),
            None => {
                let e = PipelineError::MissingSourceFile(video.id.to_string());
                return self.fail(&mut video, e).await;
            }
        };
        let transcript = match self
            .transcriber
            .transcribe_video(&file_path, &video.id, &self.config.audio_dir())
            .await
        {
            Ok(transcript) => transcript,
            Err(e) => return self.fail(&mut video, e).await,
        };
        info!(
            video_id = %video.id,
            segments = transcript.segments.len(),
            "Transcription phase completed"
        );

        if let Err(e) = self.store.save_transcript(transcript.clone()).await {
            warn!(video_id = %video.id, error = %e, "Failed to save transcript");
        }

        // Analysis phase
        self.advance(&mut video, VideoStatus::Analyzing).await;
        tokio::time::sleep(PHASE_ANNOUNCE_DELAY).await;

        let suggestions = match self.analyzer.analyze(&transcript, &video.id).await {
            Ok(suggestions) => suggestions,
            Err(e) => return self.fail(&mut video, e).await,
        };

        if let Err(e) = self.store.save_suggested_clips(suggestions.clone()).await {
            warn!(video_id = %video.id, error = %e, "Failed to save suggested clips");
        }

        self.advance(&mut video, VideoStatus::Completed).await;
        info!(
            video_id = %video.id,
            title = %video.title,
            duration = video.duration_secs,
            clips = suggestions.len(),
            "Video processing completed"
        );
        Ok(())
    }

    async fn download(&self, video: &mut Video) -> PipelineResult<()> {
        let videos_dir = self.config.videos_dir();
        tokio::fs::create_dir_all(&videos_dir).await?;
        let dest = videos_dir.join(format!("{}.mp4", video.id));

        let metadata = self.downloader.probe(&video.url).await?;
        self.downloader.fetch(&video.url, &dest).await?;

        video.title = metadata.title;
        video.duration_secs = metadata.duration_secs;
        video.thumbnail_url = metadata.thumbnail_url;
        video.file_path = Some(dest);
        Ok(())
    }

    /// Persist and announce a status transition.
    async fn advance(&self, video: &mut Video, status: VideoStatus) {
        video.set_status(status);
        if let Err(e) = self.store.update_video(video.clone()).await {
            warn!(video_id = %video.id, error = %e, "Failed to persist status");
        }
        self.broker
            .publish(StatusEvent::new(video.id.clone(), status));
    }

    /// Mark the run as failed and surface the error.
    async fn fail(&self, video: &mut Video, e: PipelineError) -> PipelineResult<()> {
        error!(video_id = %video.id, error = %e, "Pipeline phase failed");
        video.set_status(VideoStatus::Error);
        if let Err(persist_err) = self.store.update_video(video.clone()).await {
            warn!(video_id = %video.id, error = %persist_err, "Failed to persist error status");
        }
        self.broker.publish(StatusEvent::with_message(
            video.id.clone(),
            VideoStatus::Error,
            e.to_string(),
        ));
        Err(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::Path;

    use shortgen_media::SourceMetadata;
    use shortgen_models::{SuggestedClipDraft, Transcript};

    use crate::analysis::AnalysisBackend;
    use crate::store::MemoryStore;
    use crate::transcription::placeholder_transcript;

    struct StubDownloader;

    #[async_trait]
    impl DownloadBackend for StubDownloader {
        async fn probe(&self, _url: &str) -> PipelineResult<SourceMetadata> {
            Ok(SourceMetadata {
                title: "Stub Video".to_string(),
                duration_secs: 120,
                thumbnail_url: "https://img.example/t.jpg".to_string(),
            })
        }

        async fn fetch(&self, _url: &str, dest: &Path) -> PipelineResult<()> {
            tokio::fs::write(dest, b"video").await?;
            Ok(())
        }
    }

    struct FailingDownloader;

    #[async_trait]
    impl DownloadBackend for FailingDownloader {
        async fn probe(&self, _url: &str) -> PipelineResult<SourceMetadata> {
            Err(PipelineError::download_failed("no such video"))
        }

        async fn fetch(&self, _url: &str, _dest: &Path) -> PipelineResult<()> {
            Err(PipelineError::download_failed("no such video"))
        }
    }

    struct StubTranscriber;

    #[async_trait]
    impl Transcriber for StubTranscriber {
        async fn transcribe_video(
            &self,
            _video_file: &Path,
            video_id: &VideoId,
            _audio_dir: &Path,
        ) -> PipelineResult<Transcript> {
            Ok(placeholder_transcript(video_id))
        }
    }

    struct StubAnalysis;

    #[async_trait]
    impl AnalysisBackend for StubAnalysis {
        async fn analyze(&self, _: &Transcript) -> PipelineResult<Vec<SuggestedClipDraft>> {
            Ok(vec![SuggestedClipDraft {
                start_time: 5.0,
                end_time: 35.0,
                title: "Best moment".to_string(),
                description: String::new(),
                score: 88.0,
                reason: String::new(),
            }])
        }
    }

    struct FailingAnalysis;

    #[async_trait]
    impl AnalysisBackend for FailingAnalysis {
        async fn analyze(&self, _: &Transcript) -> PipelineResult<Vec<SuggestedClipDraft>> {
            Err(PipelineError::EmptySuggestions)
        }
    }

    fn coordinator_with(
        store: Arc<MemoryStore>,
        broker: Arc<StatusBroker>,
        downloader: Arc<dyn DownloadBackend>,
        analysis: Arc<dyn AnalysisBackend>,
        storage: &Path,
    ) -> Coordinator {
        let config = PipelineConfig {
            storage_path: storage.to_path_buf(),
            ..PipelineConfig::default()
        };
        Coordinator::new(
            store,
            broker,
            downloader,
            Arc::new(StubTranscriber),
            Arc::new(AnalysisStage::new(analysis)),
            config,
        )
    }

    #[tokio::test]
    async fn test_successful_run_status_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::new());
        let broker = Arc::new(StatusBroker::new());
        let coordinator = coordinator_with(
            store.clone(),
            broker.clone(),
            Arc::new(StubDownloader),
            Arc::new(StubAnalysis),
            dir.path(),
        );

        let video = coordinator.submit("https://example.com/v").await.unwrap();
        let mut rx = broker.subscribe(&video.id);

        coordinator.run(&video.id).await.unwrap();

        let statuses: Vec<VideoStatus> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|e| e.status)
            .collect();
        assert_eq!(
            statuses,
            vec![
                VideoStatus::Downloading,
                VideoStatus::Transcribing,
                VideoStatus::Analyzing,
                VideoStatus::Completed,
            ]
        );

        let stored = store.get_video(&video.id).await.unwrap();
        assert_eq!(stored.status, VideoStatus::Completed);
        assert_eq!(stored.title, "Stub Video");
        assert_eq!(stored.duration_secs, 120);
        assert!(stored.file_path.as_ref().map(|p| p.exists()).unwrap_or(false));

        assert!(store.get_transcript(&video.id).await.unwrap().is_some());
        assert_eq!(store.get_suggested_clips(&video.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_download_failure_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::new());
        let broker = Arc::new(StatusBroker::new());
        let coordinator = coordinator_with(
            store.clone(),
            broker.clone(),
            Arc::new(FailingDownloader),
            Arc::new(StubAnalysis),
            dir.path(),
        );

        let video = coordinator.submit("https://example.com/v").await.unwrap();
        let mut rx = broker.subscribe(&video.id);

        let err = coordinator.run(&video.id).await.unwrap_err();
        assert!(matches!(err, PipelineError::DownloadFailed(_)));

        let stored = store.get_video(&video.id).await.unwrap();
        assert_eq!(stored.status, VideoStatus::Error);

        let statuses: Vec<VideoStatus> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|e| e.status)
            .collect();
        assert_eq!(statuses, vec![VideoStatus::Downloading, VideoStatus::Error]);

        // No transcript or suggestions were produced.
        assert!(store.get_transcript(&video.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_analysis_failure_marks_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::new());
        let broker = Arc::new(StatusBroker::new());
        let coordinator = coordinator_with(
            store.clone(),
            broker.clone(),
            Arc::new(StubDownloader),
            Arc::new(FailingAnalysis),
            dir.path(),
        );

        let video = coordinator.submit("https://example.com/v").await.unwrap();

        let err = coordinator.run(&video.id).await.unwrap_err();
        assert!(matches!(err, PipelineError::EmptySuggestions));

        let stored = store.get_video(&video.id).await.unwrap();
        assert_eq!(stored.status, VideoStatus::Error);

        // The transcript from the earlier phase is kept.
        assert!(store.get_transcript(&video.id).await.unwrap().is_some());
        assert!(store.get_suggested_clips(&video.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_unknown_video() {
        let dir = tempfile::tempdir().unwrap();
        let coordinator = coordinator_with(
            Arc::new(MemoryStore::new()),
            Arc::new(StatusBroker::new()),
            Arc::new(StubDownloader),
            Arc::new(StubAnalysis),
            dir.path(),
        );

        let err = coordinator.run(&VideoId::from("missing")).await.unwrap_err();
        assert!(matches!(err, PipelineError::VideoNotFound(_)));
    }
}
