//! Persistence trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use shortgen_models::{Clip, ClipId, SuggestedClip, Transcript, Video, VideoId};

use crate::error::{PipelineError, PipelineResult};

/// Storage operations the pipeline needs. One transcript and one set of
/// suggestions per video; clips are independent records keyed by video.
#[async_trait]
pub trait VideoStore: Send + Sync {
    async fn create_video(&self, video: Video) -> PipelineResult<()>;
    async fn get_video(&self, id: &VideoId) -> PipelineResult<Video>;
    async fn list_videos(&self) -> PipelineResult<Vec<Video>>;
    async fn update_video(&self, video: Video) -> PipelineResult<()>;
    /// Remove a video and everything derived from it.
    async fn delete_video(&self, id: &VideoId) -> PipelineResult<()>;

    async fn save_transcript(&self, transcript: Transcript) -> PipelineResult<()>;
    async fn get_transcript(&self, video_id: &VideoId) -> PipelineResult<Option<Transcript>>;

    async fn save_suggested_clips(&self, clips: Vec<SuggestedClip>) -> PipelineResult<()>;
    async fn get_suggested_clips(&self, video_id: &VideoId) -> PipelineResult<Vec<SuggestedClip>>;

    async fn create_clip(&self, clip: Clip) -> PipelineResult<()>;
    async fn get_clip(&self, id: &ClipId) -> PipelineResult<Clip>;
    async fn update_clip(&self, clip: Clip) -> PipelineResult<()>;
    async fn delete_clip(&self, id: &ClipId) -> PipelineResult<()>;
    async fn list_clips(&self, video_id: &VideoId) -> PipelineResult<Vec<Clip>>;
}

#[derive(Default)]
struct MemoryStoreInner {
    videos: HashMap<VideoId, Video>,
    transcripts: HashMap<VideoId, Transcript>,
    suggestions: HashMap<VideoId, Vec<SuggestedClip>>,
    clips: HashMap<ClipId, Clip>,
}

/// In-memory store. Suitable for tests and single-process deployments;
/// everything is lost on restart.
#[derive(Default, Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryStoreInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VideoStore for MemoryStore {
    async fn create_video(&self, video: Video) -> PipelineResult<()> {
        let mut inner = self.inner.write().await;
        inner.videos.insert(video.id.clone(), video);
        Ok(())
    }

    async fn get_video(&self, id: &VideoId) -> PipelineResult<Video> {
        let inner = self.inner.read().await;
        inner
            .videos
            .get(id)
            .cloned()
            .ok_or_else(|| PipelineError::VideoNotFound(id.to_string()))
    }

    async fn list_videos(&self) -> PipelineResult<Vec<Video>> {
        let inner = self.inner.read().await;
        let mut videos: Vec<Video> = inner.videos.values().cloned().collect();
        videos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(videos)
    }

    async fn update_video(&self, video: Video) -> PipelineResult<()> {
        let mut inner = self.inner.write().await;
        if !inner.videos.contains_key(&video.id) {
            return Err(PipelineError::VideoNotFound(video.id.to_string()));
        }
        inner.videos.insert(video.id.clone(), video);
        Ok(())
    }

    async fn delete_video(&self, id: &VideoId) -> PipelineResult<()> {
        let mut inner = self.inner.write().await;
        if inner.videos.remove(id).is_none() {
            return Err(PipelineError::VideoNotFound(id.to_string()));
        }
        inner.transcripts.remove(id);
        inner.suggestions.remove(id);
        inner.clips.retain(|_, clip| &clip.video_id != id);
        Ok(())
    }

    async fn save_transcript(&self, transcript: Transcript) -> PipelineResult<()> {
        let mut inner = self.inner.write().await;
        inner
            .transcripts
            .insert(transcript.video_id.clone(), transcript);
        Ok(())
    }

    async fn get_transcript(&self, video_id: &VideoId) -> PipelineResult<Option<Transcript>> {
        let inner = self.inner.read().await;
        Ok(inner.transcripts.get(video_id).cloned())
    }

    async fn save_suggested_clips(&self, clips: Vec<SuggestedClip>) -> PipelineResult<()> {
        // One batch per analysis run: replace any earlier batch wholesale.
        let mut batches: HashMap<VideoId, Vec<SuggestedClip>> = HashMap::new();
        for clip in clips {
            batches.entry(clip.video_id.clone()).or_default().push(clip);
        }
        let mut inner = self.inner.write().await;
        for (video_id, batch) in batches {
            inner.suggestions.insert(video_id, batch);
        }
        Ok(())
    }

    async fn get_suggested_clips(&self, video_id: &VideoId) -> PipelineResult<Vec<SuggestedClip>> {
        let inner = self.inner.read().await;
        let mut clips = inner.suggestions.get(video_id).cloned().unwrap_or_default();
        // Presentation order: most viral first.
        clips.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(clips)
    }

    async fn create_clip(&self, clip: Clip) -> PipelineResult<()> {
        let mut inner = self.inner.write().await;
        inner.clips.insert(clip.id.clone(), clip);
        Ok(())
    }

    async fn get_clip(&self, id: &ClipId) -> PipelineResult<Clip> {
        let inner = self.inner.read().await;
        inner
            .clips
            .get(id)
            .cloned()
            .ok_or_else(|| PipelineError::ClipNotFound(id.to_string()))
    }

    async fn update_clip(&self, clip: Clip) -> PipelineResult<()> {
        let mut inner = self.inner.write().await;
        if !inner.clips.contains_key(&clip.id) {
            return Err(PipelineError::ClipNotFound(clip.id.to_string()));
        }
        inner.clips.insert(clip.id.clone(), clip);
        Ok(())
    }

    async fn delete_clip(&self, id: &ClipId) -> PipelineResult<()> {
        let mut inner = self.inner.write().await;
        inner
            .clips
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| PipelineError::ClipNotFound(id.to_string()))
    }

    async fn list_clips(&self, video_id: &VideoId) -> PipelineResult<Vec<Clip>> {
        let inner = self.inner.read().await;
        let mut clips: Vec<Clip> = inner
            .clips
            .values()
            .filter(|c| &c.video_id == video_id)
            .cloned()
            .collect();
        clips.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(clips)
    }
}
