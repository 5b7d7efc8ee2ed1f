//! Choosing where each answer comes from.

use super::{AnswerStrategy, HeuristicStrategy, LlmStrategy};
use crate::config::{Prompts, Settings};
use crate::error::Result;
use crate::openai;
use crate::transcript::TranscriptProvider;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Reply to small talk.
pub const GREETING_REPLY: &str = "😊 Got it! Feel free to ask me anything about the selected video.";

/// Reply when the transcript is missing or empty.
pub const NO_TRANSCRIPT_REPLY: &str = "❌ I couldn't fetch the video transcript.";

/// Conversational fillers, compared after trimming and lowercasing.
const SMALL_TALK: &[&str] = &[
    "hi",
    "hello",
    "okay",
    "ok",
    "thanks",
    "thank you",
    "how are you",
    "yo",
    "sup",
    "fine",
    "cool",
];

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerSource {
    /// Canned reply to small talk.
    Greeting,
    /// The transcript could not be fetched.
    Unavailable,
    Llm,
    Heuristic,
}

impl std::fmt::Display for AnswerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerSource::Greeting => write!(f, "greeting"),
            AnswerSource::Unavailable => write!(f, "unavailable"),
            AnswerSource::Llm => write!(f, "llm"),
            AnswerSource::Heuristic => write!(f, "heuristic"),
        }
    }
}

/// The answer to one question plus any non-fatal warnings raised on the way.
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    pub text: String,
    pub source: AnswerSource,
    pub warnings: Vec<String>,
}

impl Reply {
    fn new(text: impl Into<String>, source: AnswerSource, warnings: Vec<String>) -> Self {
        Self {
            text: text.into(),
            source,
            warnings,
        }
    }
}

/// Dispatches a question to a canned reply, the language model, or the
/// extractive fallback. Holds no per-question state.
pub struct AnswerPolicy {
    primary: Option<Arc<dyn AnswerStrategy>>,
    fallback: HeuristicStrategy,
}

impl AnswerPolicy {
    /// A policy that always answers locally.
    pub fn heuristic_only() -> Self {
        Self {
            primary: None,
            fallback: HeuristicStrategy::new(),
        }
    }

    /// A policy that tries `primary` first and falls back to the heuristic.
    pub fn with_primary(primary: Arc<dyn AnswerStrategy>) -> Self {
        Self {
            primary: Some(primary),
            fallback: HeuristicStrategy::new(),
        }
    }

    /// Build the policy from settings.
    ///
    /// The language model is used only when an OpenAI key is configured and
    /// `offline` is false.
    pub fn from_settings(settings: &Settings, model: Option<&str>, offline: bool) -> Result<Self> {
        if offline {
            info!("Offline mode: answering with extractive summaries");
            return Ok(Self::heuristic_only());
        }

        if !openai::api_key_configured() {
            warn!("OpenAI API key not set, using fallback summarization");
            return Ok(Self::heuristic_only());
        }

        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;
        let mut strategy = LlmStrategy::new(&settings.llm, &settings.topic, prompts)?;
        if let Some(model) = model {
            strategy = strategy.with_model(model);
        }
        info!("Answering with {} (fallback: extractive)", strategy.model());

        Ok(Self::with_primary(Arc::new(strategy)))
    }

    /// Whether a language model is configured.
    pub fn has_llm(&self) -> bool {
        self.primary.is_some()
    }

    /// True when the question is conversational filler rather than a question.
    pub fn is_small_talk(question: &str) -> bool {
        let normalized = question.trim().to_lowercase();
        SMALL_TALK.contains(&normalized.as_str())
    }

    /// Answer one question. Always produces a reply; failures become warnings.
    #[instrument(skip(self, provider), fields(question = %question))]
    pub async fn answer(&self, question: &str, provider: &dyn TranscriptProvider) -> Reply {
        if Self::is_small_talk(question) {
            debug!("Small talk, skipping transcript and model");
            return Reply::new(GREETING_REPLY, AnswerSource::Greeting, Vec::new());
        }

        let mut warnings = Vec::new();

        let transcript = match provider.fetch_transcript().await {
            Ok(transcript) => transcript,
            Err(e) => {
                warn!("Could not get transcript: {}", e);
                warnings.push(format!("Could not get transcript: {}", e));
                return Reply::new(NO_TRANSCRIPT_REPLY, AnswerSource::Unavailable, warnings);
            }
        };

        if transcript.is_empty() {
            return Reply::new(NO_TRANSCRIPT_REPLY, AnswerSource::Unavailable, warnings);
        }

        if let Some(primary) = &self.primary {
            match primary.answer(&transcript.full_text, question).await {
                Ok(text) if !text.trim().is_empty() => {
                    return Reply::new(text.trim(), AnswerSource::Llm, warnings);
                }
                Ok(_) => {
                    warn!("{} strategy returned an empty answer", primary.name());
                    warnings.push("OpenAI service unavailable: empty response".to_string());
                }
                Err(e) => {
                    warn!("{} strategy failed: {}", primary.name(), e);
                    warnings.push(format!("OpenAI service unavailable: {}", e));
                }
            }
        }

        let text = self.fallback.answer_now(&transcript.full_text, question);
        Reply::new(text, AnswerSource::Heuristic, warnings)
    }
}
