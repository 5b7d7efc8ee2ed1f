//! HTTP chat server.
//!
//! Exposes one chat session over REST so a web front end can ask questions
//! about the selected video.

use super::connect;
use crate::answer::{AnswerPolicy, AnswerSource, Reply};
use crate::cli::{AnswerOptions, Output};
use crate::config::Settings;
use crate::error::VidlearnError;
use crate::session::{ChatMessage, ChatSession};
use crate::video::{IndexReport, MediaSource, VideoHandle, VideoService, VideoTranscript};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

/// Shared application state.
struct AppState {
    service: Arc<dyn VideoService>,
    policy: AnswerPolicy,
    session: Mutex<ChatSession>,
}

/// Run the HTTP chat server.
pub async fn run_serve(
    host: &str,
    port: u16,
    video: Option<String>,
    options: &AnswerOptions,
    settings: Settings,
) -> anyhow::Result<()> {
    let service = connect(&settings)?;
    let policy = AnswerPolicy::from_settings(&settings, options.model.as_deref(), options.offline)?;
    if !policy.has_llm() && !options.offline {
        Output::warning("OpenAI service not available. Using fallback summarization.");
    }

    let mut session = ChatSession::new();
    if let Some(id) = video {
        session.add_video(VideoHandle::from_id(id));
    }

    let state = Arc::new(AppState {
        service,
        policy,
        session: Mutex::new(session),
    });

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("vidlearn Chat Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Ask", "POST /ask");
    Output::kv("History", "GET  /history");
    Output::kv("Reset", "POST /reset");
    Output::kv("Upload", "POST /upload");
    Output::kv("Videos", "GET  /videos");
    Output::kv("Select", "POST /videos/{id}/select");
    Output::kv("Remove", "DELETE /videos/{id}");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, router(state)).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/ask", post(ask))
        .route("/history", get(history))
        .route("/reset", post(reset))
        .route("/upload", post(upload))
        .route("/videos", get(list_videos))
        .route("/videos/{video_id}/select", post(select_video))
        .route("/videos/{video_id}", delete(remove_video))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct AskRequest {
    question: String,
    /// Overrides the session's selected video for this question.
    #[serde(default)]
    video_id: Option<String>,
}

#[derive(Serialize)]
struct AskResponse {
    answer: String,
    source: AnswerSource,
    warnings: Vec<String>,
}

impl From<Reply> for AskResponse {
    fn from(reply: Reply) -> Self {
        Self {
            answer: reply.text,
            source: reply.source,
            warnings: reply.warnings,
        }
    }
}

#[derive(Serialize)]
struct HistoryResponse {
    session_id: Uuid,
    selected_video: Option<String>,
    messages: Vec<ChatMessage>,
}

impl HistoryResponse {
    fn from_session(session: &ChatSession) -> Self {
        Self {
            session_id: session.id(),
            selected_video: session.selected_video().map(|v| v.id.clone()),
            messages: session.history().to_vec(),
        }
    }
}

#[derive(Deserialize)]
struct UploadRequest {
    /// http(s) URL, or a path to a video file on the server host
    source: String,
    #[serde(default = "default_index")]
    index: bool,
}

fn default_index() -> bool {
    true
}

#[derive(Serialize)]
struct UploadResponse {
    video: VideoHandle,
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<IndexReport>,
}

#[derive(Serialize)]
struct VideoListResponse {
    videos: Vec<VideoHandle>,
    selected: Option<String>,
}

impl VideoListResponse {
    fn from_session(session: &ChatSession) -> Self {
        Self {
            videos: session.videos().to_vec(),
            selected: session.selected_video().map(|v| v.id.clone()),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, error: impl ToString) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

fn bad_request(error: VidlearnError) -> axum::response::Response {
    error_response(StatusCode::BAD_REQUEST, error)
}

fn video_not_found(video_id: &str) -> axum::response::Response {
    error_response(
        StatusCode::NOT_FOUND,
        format!("Video not found: {}", video_id),
    )
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn ask(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> impl IntoResponse {
    if req.question.trim().is_empty() {
        return bad_request(VidlearnError::InvalidInput("question is empty".to_string()));
    }

    // Hold the session lock only to read the selection and to write the log.
    let video = {
        let mut session = state.session.lock().await;
        let video = match req.video_id {
            Some(id) => VideoHandle::from_id(id),
            None => match session.selected_video() {
                Some(video) => video.clone(),
                None => return bad_request(VidlearnError::NoVideoSelected),
            },
        };
        session.record_question(&req.question);
        video
    };

    let provider = VideoTranscript::new(state.service.clone(), video);
    let reply = state.policy.answer(&req.question, &provider).await;

    state.session.lock().await.record_reply(&reply);

    Json(AskResponse::from(reply)).into_response()
}

async fn upload(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UploadRequest>,
) -> impl IntoResponse {
    let source = match MediaSource::parse(&req.source) {
        Ok(source) => source,
        Err(e) => return bad_request(e),
    };

    let video = match state.service.upload(&source).await {
        Ok(video) => video,
        Err(e) => return error_response(StatusCode::BAD_GATEWAY, e),
    };

    let index = if req.index {
        Some(state.service.index(&video).await)
    } else {
        None
    };

    state.session.lock().await.add_video(video.clone());

    Json(UploadResponse { video, index }).into_response()
}

async fn list_videos(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.session.lock().await;
    Json(VideoListResponse::from_session(&session))
}

async fn select_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> impl IntoResponse {
    let mut session = state.session.lock().await;
    if !session.select(&video_id) {
        return video_not_found(&video_id);
    }
    Json(VideoListResponse::from_session(&session)).into_response()
}

async fn remove_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> impl IntoResponse {
    let mut session = state.session.lock().await;
    if session.remove_video(&video_id).is_none() {
        return video_not_found(&video_id);
    }
    Json(VideoListResponse::from_session(&session)).into_response()
}

async fn history(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut session = state.session.lock().await;
    session.ensure_welcome();
    Json(HistoryResponse::from_session(&session))
}

async fn reset(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut session = state.session.lock().await;
    session.reset_chat();
    session.ensure_welcome();
    Json(HistoryResponse::from_session(&session))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::transcript::{Transcript, TranscriptSegment};
    use crate::video::StepOutcome;
    use async_trait::async_trait;

    struct FakeService;

    #[async_trait]
    impl VideoService for FakeService {
        async fn upload(&self, source: &MediaSource) -> Result<VideoHandle> {
            let name = source.suggested_name().unwrap_or_default();
            if name.starts_with("broken") {
                return Err(VidlearnError::Upload("service rejected the video".to_string()));
            }
            Ok(VideoHandle::from_id(name))
        }

        async fn index(&self, _video: &VideoHandle) -> IndexReport {
            IndexReport {
                spoken_words: StepOutcome::Indexed,
                scenes: StepOutcome::Failed("scene index busy".to_string()),
            }
        }

        async fn transcript(&self, video: &VideoHandle) -> Result<Transcript> {
            if video.id == "broken" {
                return Err(VidlearnError::Transcript("not indexed".to_string()));
            }
            Ok(Transcript::new(vec![
                TranscriptSegment::new(0.0, 4.0, "Gravity pulls objects toward the earth."),
                TranscriptSegment::new(4.0, 9.0, "Friction slows moving objects down. Thanks for watching."),
            ]))
        }
    }

    fn state(selected: Option<&str>) -> Arc<AppState> {
        let mut session = ChatSession::new();
        if let Some(id) = selected {
            session.add_video(VideoHandle::from_id(id));
        }
        Arc::new(AppState {
            service: Arc::new(FakeService),
            policy: AnswerPolicy::heuristic_only(),
            session: Mutex::new(session),
        })
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn request(question: &str, video_id: Option<&str>) -> Json<AskRequest> {
        Json(AskRequest {
            question: question.to_string(),
            video_id: video_id.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn test_ask_without_video_is_bad_request() {
        let response = ask(State(state(None)), request("What is gravity?", None))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_ask_uses_selected_video() {
        let app = state(Some("m-1"));
        let response = ask(State(app.clone()), request("What does gravity do?", None))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["source"], "heuristic");
        assert!(body["answer"]
            .as_str()
            .unwrap()
            .starts_with("Based on the video: Gravity pulls"));

        let session = app.session.lock().await;
        assert_eq!(session.history().len(), 2);
    }

    #[tokio::test]
    async fn test_ask_reports_transcript_failure() {
        let response = ask(State(state(None)), request("Why?", Some("broken")))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["source"], "unavailable");
        assert_eq!(body["warnings"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_question_is_rejected() {
        let response = ask(State(state(Some("m-1"))), request("   ", None))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reset_keeps_only_welcome() {
        let app = state(Some("m-1"));
        ask(State(app.clone()), request("hello", None)).await;

        let body = body_json(reset(State(app.clone())).await.into_response()).await;
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "assistant");
        assert_eq!(body["selected_video"], "m-1");
    }

    /// Holds every transcript fetch until the gate is opened.
    struct GatedService {
        gate: Arc<tokio::sync::Notify>,
    }

    #[async_trait]
    impl VideoService for GatedService {
        async fn upload(&self, source: &MediaSource) -> Result<VideoHandle> {
            FakeService.upload(source).await
        }

        async fn index(&self, video: &VideoHandle) -> IndexReport {
            FakeService.index(video).await
        }

        async fn transcript(&self, video: &VideoHandle) -> Result<Transcript> {
            self.gate.notified().await;
            FakeService.transcript(video).await
        }
    }

    #[tokio::test]
    async fn test_history_is_available_while_answering() {
        let gate = Arc::new(tokio::sync::Notify::new());
        let mut session = ChatSession::new();
        session.add_video(VideoHandle::from_id("m-1"));
        let app = Arc::new(AppState {
            service: Arc::new(GatedService { gate: gate.clone() }),
            policy: AnswerPolicy::heuristic_only(),
            session: Mutex::new(session),
        });

        let pending = tokio::spawn(ask(
            State(app.clone()),
            request("What does gravity do?", None),
        ));
        while app.session.lock().await.history().is_empty() {
            tokio::task::yield_now().await;
        }

        let response = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            history(State(app.clone())),
        )
        .await
        .expect("history blocked by an in-flight question")
        .into_response();
        let body = body_json(response).await;
        assert_eq!(body["messages"][0]["text"], "What does gravity do?");
        assert!(!pending.is_finished());

        gate.notify_one();
        let response = pending.await.unwrap().into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let session = app.session.lock().await;
        let messages = session.history();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, crate::session::Role::Assistant);
    }

    fn upload_request(source: &str, index: bool) -> Json<UploadRequest> {
        Json(UploadRequest {
            source: source.to_string(),
            index,
        })
    }

    #[tokio::test]
    async fn test_upload_indexes_and_selects_video() {
        let app = state(None);
        let response = upload(
            State(app.clone()),
            upload_request("https://videos.example.test/optics", true),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["video"]["id"], "optics");
        assert_eq!(body["index"]["spoken_words"]["status"], "indexed");
        assert_eq!(body["index"]["scenes"]["status"], "failed");
        assert_eq!(body["index"]["scenes"]["reason"], "scene index busy");

        let body = body_json(list_videos(State(app.clone())).await.into_response()).await;
        assert_eq!(body["videos"].as_array().unwrap().len(), 1);
        assert_eq!(body["selected"], "optics");

        let response = ask(State(app), request("What does gravity do?", None))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_upload_without_index_skips_report() {
        let app = state(None);
        let body = body_json(
            upload(
                State(app),
                upload_request("https://videos.example.test/waves", false),
            )
            .await
            .into_response(),
        )
        .await;
        assert_eq!(body["video"]["id"], "waves");
        assert!(body.get("index").is_none());
    }

    #[tokio::test]
    async fn test_upload_errors() {
        let app = state(None);
        let response = upload(State(app.clone()), upload_request("/no/such/file.mp4", true))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = upload(
            State(app.clone()),
            upload_request("https://videos.example.test/broken", true),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        assert!(app.session.lock().await.videos().is_empty());
    }

    #[tokio::test]
    async fn test_select_and_remove_videos() {
        let app = state(Some("m-1"));
        app.session.lock().await.add_video(VideoHandle::from_id("m-2"));

        let body = body_json(
            select_video(State(app.clone()), Path("m-1".to_string()))
                .await
                .into_response(),
        )
        .await;
        assert_eq!(body["selected"], "m-1");

        let response = select_video(State(app.clone()), Path("m-9".to_string()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(
            remove_video(State(app.clone()), Path("m-1".to_string()))
                .await
                .into_response(),
        )
        .await;
        assert_eq!(body["videos"].as_array().unwrap().len(), 1);
        assert!(body["selected"].is_null());

        let response = remove_video(State(app.clone()), Path("m-1".to_string()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ask(State(app), request("What does gravity do?", None))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
