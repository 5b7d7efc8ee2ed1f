//! Remote video service abstraction.
//!
//! The service uploads videos, indexes their spoken words and scenes, and
//! hands back transcripts. [`VideoDbClient`] talks to VideoDB over HTTP.

mod source;
mod videodb;

pub use source::{MediaSource, VIDEO_EXTENSIONS};
pub use videodb::VideoDbClient;

use crate::error::Result;
use crate::transcript::{Transcript, TranscriptProvider};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A video known to the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoHandle {
    /// Service-assigned video ID.
    pub id: String,
    /// Collection the video lives in.
    #[serde(default)]
    pub collection_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub stream_url: Option<String>,
}

impl VideoHandle {
    /// A handle for a video ID obtained elsewhere (e.g. from the command line).
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            collection_id: None,
            title: None,
            stream_url: None,
        }
    }

    /// Title if known, otherwise the ID.
    pub fn display_name(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.id)
    }
}

/// Outcome of one indexing step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum StepOutcome {
    Indexed,
    Failed(String),
}

impl StepOutcome {
    pub fn from_result<T>(result: Result<T>) -> Self {
        match result {
            Ok(_) => StepOutcome::Indexed,
            Err(e) => StepOutcome::Failed(e.to_string()),
        }
    }

    pub fn is_indexed(&self) -> bool {
        matches!(self, StepOutcome::Indexed)
    }
}

/// Per-step result of indexing a video. Steps run independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexReport {
    pub spoken_words: StepOutcome,
    pub scenes: StepOutcome,
}

impl IndexReport {
    /// True when at least one step succeeded.
    pub fn any_indexed(&self) -> bool {
        self.spoken_words.is_indexed() || self.scenes.is_indexed()
    }

    pub fn all_indexed(&self) -> bool {
        self.spoken_words.is_indexed() && self.scenes.is_indexed()
    }

    /// Step name and outcome pairs, in execution order.
    pub fn steps(&self) -> [(&'static str, &StepOutcome); 2] {
        [("spoken words", &self.spoken_words), ("scenes", &self.scenes)]
    }
}

/// A remote video-intelligence service.
#[async_trait]
pub trait VideoService: Send + Sync {
    /// Upload a video from a URL or a local file.
    async fn upload(&self, source: &MediaSource) -> Result<VideoHandle>;

    /// Index spoken words and scenes; each step is attempted regardless of the other.
    async fn index(&self, video: &VideoHandle) -> IndexReport;

    /// Fetch the transcript of an indexed video.
    async fn transcript(&self, video: &VideoHandle) -> Result<Transcript>;
}

/// Transcript provider bound to one video on a service.
pub struct VideoTranscript {
    service: Arc<dyn VideoService>,
    video: VideoHandle,
}

impl VideoTranscript {
    pub fn new(service: Arc<dyn VideoService>, video: VideoHandle) -> Self {
        Self { service, video }
    }
}

#[async_trait]
impl TranscriptProvider for VideoTranscript {
    async fn fetch_transcript(&self) -> Result<Transcript> {
        self.service.transcript(&self.video).await
    }
}
