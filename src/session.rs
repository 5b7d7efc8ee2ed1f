//! Chat session state: uploaded videos, the selected video, and the chat log.
//!
//! One session per user conversation. It is passed explicitly to whatever
//! handles user input; nothing here is global.

use crate::answer::{AnswerPolicy, Reply};
use crate::transcript::TranscriptProvider;
use crate::video::VideoHandle;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, instrument};
use uuid::Uuid;

/// First message shown in an empty conversation.
pub const WELCOME_MESSAGE: &str = "👋 Hi! Ask me anything about the selected video.";

/// Who sent a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of the chat log.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }
}

/// A single user's conversation about their videos.
#[derive(Debug)]
pub struct ChatSession {
    id: Uuid,
    videos: Vec<VideoHandle>,
    selected: Option<String>,
    history: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            videos: Vec::new(),
            selected: None,
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Add a video and select it. Re-adding a known ID replaces the entry.
    pub fn add_video(&mut self, video: VideoHandle) {
        self.selected = Some(video.id.clone());
        match self.videos.iter_mut().find(|v| v.id == video.id) {
            Some(existing) => *existing = video,
            None => self.videos.push(video),
        }
    }

    pub fn videos(&self) -> &[VideoHandle] {
        &self.videos
    }

    /// Select a previously added video. Returns false if the ID is unknown.
    pub fn select(&mut self, video_id: &str) -> bool {
        if self.videos.iter().any(|v| v.id == video_id) {
            self.selected = Some(video_id.to_string());
            true
        } else {
            false
        }
    }

    pub fn selected_video(&self) -> Option<&VideoHandle> {
        let id = self.selected.as_deref()?;
        self.videos.iter().find(|v| v.id == id)
    }

    /// Remove a video, clearing the selection if it was selected.
    pub fn remove_video(&mut self, video_id: &str) -> Option<VideoHandle> {
        let index = self.videos.iter().position(|v| v.id == video_id)?;
        if self.selected.as_deref() == Some(video_id) {
            self.selected = None;
        }
        Some(self.videos.remove(index))
    }

    /// Chat log, oldest first.
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Start the conversation with the welcome message if it is empty.
    pub fn ensure_welcome(&mut self) -> Option<&ChatMessage> {
        if self.history.is_empty() {
            self.history.push(ChatMessage::assistant(WELCOME_MESSAGE));
            return self.history.last();
        }
        None
    }

    /// Clear the chat log. Videos and the selection are kept.
    pub fn reset_chat(&mut self) {
        self.history.clear();
    }

    /// Ask one question, recording both sides in the chat log.
    #[instrument(skip(self, provider, policy), fields(session = %self.id))]
    pub async fn ask(
        &mut self,
        question: &str,
        provider: &dyn TranscriptProvider,
        policy: &AnswerPolicy,
    ) -> Reply {
        self.record_question(question);
        let reply = policy.answer(question, provider).await;
        debug!(source = %reply.source, "Answered question");
        self.record_reply(&reply);
        reply
    }

    /// Append a user question to the chat log.
    pub fn record_question(&mut self, question: &str) {
        self.history.push(ChatMessage::user(question));
    }

    /// Append an assistant reply to the chat log.
    pub fn record_reply(&mut self, reply: &Reply) {
        self.history.push(ChatMessage::assistant(reply.text.clone()));
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
