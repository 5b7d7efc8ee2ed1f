//! VideoDB REST client.

use super::{IndexReport, MediaSource, StepOutcome, VideoHandle, VideoService};
use crate::config::VideoDbSettings;
use crate::error::{Result, VidlearnError};
use crate::transcript::{Transcript, TranscriptSegment};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;
use std::time::Instant;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

const AUTH_HEADER: &str = "x-access-token";

/// Response envelope shared by every VideoDB endpoint.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    message: Option<String>,
    /// "processing" for jobs that finish later at `data.output_url`.
    #[serde(default)]
    status: Option<String>,
}

impl Envelope {
    fn is_processing(&self) -> bool {
        self.status.as_deref() == Some("processing")
    }

    fn output_url(&self) -> Option<String> {
        self.data
            .as_ref()
            .and_then(|d| d.get("output_url"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

#[derive(Debug, Deserialize)]
struct CollectionData {
    id: String,
}

#[derive(Debug, Deserialize)]
struct VideoData {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    collection_id: Option<String>,
    #[serde(default)]
    stream_url: Option<String>,
}

impl From<VideoData> for VideoHandle {
    fn from(data: VideoData) -> Self {
        Self {
            id: data.id,
            collection_id: data.collection_id,
            title: data.name,
            stream_url: data.stream_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionData {
    #[serde(default)]
    word_timestamps: Vec<TranscriptSegment>,
    #[serde(default)]
    text: Option<String>,
}

/// HTTP client for the VideoDB API.
pub struct VideoDbClient {
    http: reqwest::Client,
    api_key: String,
    settings: VideoDbSettings,
    collection_id: OnceCell<String>,
}

impl VideoDbClient {
    /// Create a client, taking the API key from settings or the environment.
    pub fn new(settings: &VideoDbSettings) -> Result<Self> {
        let api_key = settings.resolved_api_key().ok_or_else(|| {
            VidlearnError::Config(
                "VideoDB API key not found. Set VIDEODB_API_KEY or videodb.api_key.".to_string(),
            )
        })?;
        Self::with_api_key(settings, &api_key)
    }

    /// Create a client with an explicit API key.
    pub fn with_api_key(settings: &VideoDbSettings, api_key: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(VidlearnError::Config("VideoDB API key is empty".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| VidlearnError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key: api_key.trim().to_string(),
            settings: settings.clone(),
            collection_id: OnceCell::new(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Send an authenticated request and unwrap the envelope, waiting for
    /// background jobs to finish.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value> {
        let response = request.header(AUTH_HEADER, &self.api_key).send().await?;
        let envelope = read_envelope(response).await?;

        if envelope.is_processing() {
            if let Some(output_url) = envelope.output_url() {
                return self.wait_for_output(&output_url).await;
            }
        }

        Ok(envelope.data.unwrap_or(Value::Null))
    }

    /// Poll a job's output URL until it stops processing.
    async fn wait_for_output(&self, output_url: &str) -> Result<Value> {
        let deadline = Instant::now() + self.settings.timeout();
        debug!("Waiting for job output at {}", output_url);

        loop {
            tokio::time::sleep(self.settings.poll_interval()).await;

            let response = self
                .http
                .get(output_url)
                .header(AUTH_HEADER, &self.api_key)
                .send()
                .await?;
            let envelope = read_envelope(response).await?;

            if !envelope.is_processing() {
                return Ok(envelope.data.unwrap_or(Value::Null));
            }

            if Instant::now() >= deadline {
                return Err(VidlearnError::VideoService(format!(
                    "Timed out after {}s waiting for {}",
                    self.settings.timeout_secs, output_url
                )));
            }
        }
    }

    /// The collection uploads go to, resolved once per client.
    async fn collection_id(&self) -> Result<&str> {
        self.collection_id
            .get_or_try_init(|| self.resolve_collection())
            .await
            .map(String::as_str)
    }

    /// Use the first existing collection, creating one if there are none.
    async fn resolve_collection(&self) -> Result<String> {
        let existing = match self.send(self.http.get(self.endpoint("collection"))).await {
            Ok(data) => parse_collections(data),
            Err(e) => {
                warn!("Could not access collections: {}", e);
                Vec::new()
            }
        };

        if let Some(collection) = existing.into_iter().next() {
            debug!("Using collection {}", collection.id);
            return Ok(collection.id);
        }

        info!("Creating collection '{}'", self.settings.collection_name);
        let data = self
            .send(self.http.post(self.endpoint("collection")).json(&json!({
                "name": self.settings.collection_name,
                "description": self.settings.collection_description,
            })))
            .await?;
        let created: CollectionData = serde_json::from_value(data)?;
        Ok(created.id)
    }

    /// Push a local file to a presigned upload URL and return that URL.
    async fn upload_file(&self, collection_id: &str, path: &Path) -> Result<String> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("video")
            .to_string();

        let data = self
            .send(
                self.http
                    .get(self.endpoint(&format!("collection/{}/upload_url", collection_id)))
                    .query(&[("name", name.as_str())]),
            )
            .await?;
        let upload_url = data
            .get("url")
            .and_then(Value::as_str)
            .ok_or_else(|| VidlearnError::Upload("No upload URL returned".to_string()))?
            .to_string();

        let form = Form::new().part("file", file_part(path, name).await?);

        let response = self.http.post(&upload_url).multipart(form).send().await?;
        if !response.status().is_success() {
            return Err(VidlearnError::Upload(format!(
                "File upload returned {}",
                response.status()
            )));
        }

        Ok(upload_url)
    }
}

#[async_trait]
impl VideoService for VideoDbClient {
    #[instrument(skip(self), fields(source = %source))]
    async fn upload(&self, source: &MediaSource) -> Result<VideoHandle> {
        let collection_id = self.collection_id().await?.to_string();

        let url = match source {
            MediaSource::Url(url) => url.to_string(),
            MediaSource::File(path) => self.upload_file(&collection_id, path).await?,
        };

        let mut body = json!({ "url": url, "media_type": "video" });
        if let Some(name) = source.suggested_name() {
            body["name"] = Value::String(name);
        }

        let data = self
            .send(
                self.http
                    .post(self.endpoint(&format!("collection/{}/upload", collection_id)))
                    .json(&body),
            )
            .await
            .map_err(|e| VidlearnError::Upload(e.to_string()))?;

        let mut video: VideoHandle = serde_json::from_value::<VideoData>(data)?.into();
        if video.collection_id.is_none() {
            video.collection_id = Some(collection_id);
        }
        info!("Uploaded video {}", video.id);
        Ok(video)
    }

    #[instrument(skip(self), fields(video_id = %video.id))]
    async fn index(&self, video: &VideoHandle) -> IndexReport {
        let spoken_words = StepOutcome::from_result(
            self.send(
                self.http
                    .post(self.endpoint(&format!("video/{}/index", video.id)))
                    .json(&json!({ "index_type": "spoken_word" })),
            )
            .await
            .map_err(|e| VidlearnError::Indexing(e.to_string())),
        );

        let scenes = StepOutcome::from_result(
            self.send(
                self.http
                    .post(self.endpoint(&format!("video/{}/index/scene", video.id)))
                    .json(&json!({})),
            )
            .await
            .map_err(|e| VidlearnError::Indexing(e.to_string())),
        );

        let report = IndexReport {
            spoken_words,
            scenes,
        };
        for (step, outcome) in report.steps() {
            match outcome {
                StepOutcome::Indexed => info!("Indexed {}", step),
                StepOutcome::Failed(reason) => warn!("Could not index {}: {}", step, reason),
            }
        }
        report
    }

    #[instrument(skip(self), fields(video_id = %video.id))]
    async fn transcript(&self, video: &VideoHandle) -> Result<Transcript> {
        let data = self
            .send(
                self.http
                    .get(self.endpoint(&format!("video/{}/transcription", video.id))),
            )
            .await
            .map_err(|e| VidlearnError::Transcript(e.to_string()))?;

        let transcript = transcript_from_data(data)?;
        debug!(
            "Fetched transcript with {} segments",
            transcript.segments.len()
        );
        Ok(transcript)
    }
}

/// A multipart part that streams the file from disk instead of buffering it.
async fn file_part(path: &Path, name: String) -> Result<Part> {
    let file = tokio::fs::File::open(path).await?;
    let length = file.metadata().await?.len();
    debug!("Streaming {} bytes from {}", length, path.display());
    Ok(Part::stream_with_length(Body::from(file), length).file_name(name))
}

/// Check the HTTP status and decode the envelope.
async fn read_envelope(response: reqwest::Response) -> Result<Envelope> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<Envelope>(&body)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or(body);
        return Err(VidlearnError::VideoService(format!("{}: {}", status, message)));
    }

    let envelope: Envelope = serde_json::from_str(&body)?;
    if envelope.success == Some(false) {
        return Err(VidlearnError::VideoService(
            envelope
                .message
                .unwrap_or_else(|| "request was not successful".to_string()),
        ));
    }
    Ok(envelope)
}

/// Collections come back either as a bare list or under a "collections" key.
fn parse_collections(data: Value) -> Vec<CollectionData> {
    let list = match data {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => map.remove("collections").unwrap_or(Value::Null),
        _ => Value::Null,
    };
    serde_json::from_value(list).unwrap_or_default()
}

fn transcript_from_data(data: Value) -> Result<Transcript> {
    let parsed: TranscriptionData = serde_json::from_value(data)?;
    let mut transcript = Transcript::new(parsed.word_timestamps);
    if let Some(text) = parsed.text.filter(|t| !t.trim().is_empty()) {
        transcript.full_text = text.trim().to_string();
    }
    Ok(transcript)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_api_key_rejected() {
        let settings = VideoDbSettings::default();
        assert!(VideoDbClient::with_api_key(&settings, "  ").is_err());
        assert!(VideoDbClient::with_api_key(&settings, "key").is_ok());
    }

    #[test]
    fn test_endpoint_joining() {
        let settings = VideoDbSettings {
            base_url: "https://api.example.test/".to_string(),
            ..Default::default()
        };
        let client = VideoDbClient::with_api_key(&settings, "key").unwrap();
        assert_eq!(
            client.endpoint("/video/m-1/index"),
            "https://api.example.test/video/m-1/index"
        );
    }

    #[test]
    fn test_processing_envelope() {
        let envelope: Envelope = serde_json::from_str(
            r#"{"success": true, "status": "processing", "data": {"output_url": "https://api.example.test/async-response/abc"}}"#,
        )
        .unwrap();
        assert!(envelope.is_processing());
        assert_eq!(
            envelope.output_url().as_deref(),
            Some("https://api.example.test/async-response/abc")
        );
    }

    #[test]
    fn test_parse_collections_both_shapes() {
        let nested = parse_collections(json!({"collections": [{"id": "c-1", "name": "A"}]}));
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].id, "c-1");

        let bare = parse_collections(json!([{"id": "c-2"}, {"id": "c-3"}]));
        assert_eq!(bare.len(), 2);

        assert!(parse_collections(Value::Null).is_empty());
    }

    #[test]
    fn test_video_data_to_handle() {
        let data: VideoData = serde_json::from_value(json!({
            "id": "m-9",
            "name": "Kinetic Energy",
            "collection_id": "c-1",
            "stream_url": "https://stream.example.test/m-9.m3u8",
            "length": "121.5"
        }))
        .unwrap();
        let video = VideoHandle::from(data);
        assert_eq!(video.id, "m-9");
        assert_eq!(video.display_name(), "Kinetic Energy");
        assert_eq!(video.collection_id.as_deref(), Some("c-1"));
    }

    #[test]
    fn test_transcript_from_word_timestamps() {
        let transcript = transcript_from_data(json!({
            "word_timestamps": [
                {"text": "Energy", "start": 0.0, "end": 0.4},
                {"text": "is", "start": 0.4, "end": 0.5},
                {"text": "conserved.", "start": 0.5, "end": 1.2}
            ],
            "text": "Energy is conserved."
        }))
        .unwrap();
        assert_eq!(transcript.full_text, "Energy is conserved.");
        assert_eq!(transcript.segments.len(), 3);
        assert_eq!(transcript.duration_seconds(), 1.2);
    }

    #[test]
    fn test_transcript_text_without_words() {
        let transcript = transcript_from_data(json!({
            "text": "  Momentum is mass times velocity. "
        }))
        .unwrap();
        assert_eq!(transcript.full_text, "Momentum is mass times velocity.");
        assert!(transcript.segments.is_empty());
        assert!(!transcript.is_empty());
    }

    #[tokio::test]
    async fn test_file_part_streams_without_reading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lecture.mp4");
        std::fs::write(&path, vec![7u8; 4096]).unwrap();

        let part = file_part(&path, "lecture.mp4".to_string()).await.unwrap();
        let form = Form::new().part("file", part);
        assert!(!form.boundary().is_empty());

        assert!(file_part(&dir.path().join("missing.mp4"), "missing.mp4".to_string())
            .await
            .is_err());
    }

    #[test]
    fn test_transcript_without_words_is_empty() {
        let transcript = transcript_from_data(json!({})).unwrap();
        assert!(transcript.is_empty());
    }
}
