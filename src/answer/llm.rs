//! Language model answering through OpenAI chat completions.

use super::AnswerStrategy;
use crate::config::{LlmSettings, Prompts, TopicSettings};
use crate::error::{Result, VidlearnError};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// Topic reported when the model cannot be asked.
pub const DEFAULT_TOPIC: &str = "Educational content";

/// Answers questions with an OpenAI chat model.
pub struct LlmStrategy {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    max_tokens: u32,
    temperature: f32,
    topic: TopicSettings,
    prompts: Prompts,
}

impl LlmStrategy {
    /// Create a strategy from the configured model settings.
    pub fn new(llm: &LlmSettings, topic: &TopicSettings, prompts: Prompts) -> Result<Self> {
        Ok(Self {
            client: create_client(llm.timeout())?,
            model: llm.model.clone(),
            max_tokens: llm.max_tokens,
            temperature: llm.temperature,
            topic: topic.clone(),
            prompts,
        })
    }

    /// Override the chat model.
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Render the user prompt for a question.
    fn answer_prompt(&self, transcript: &str, question: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), question.to_string());
        vars.insert("transcript".to_string(), transcript.to_string());
        self.prompts.render_with_custom(&self.prompts.answer.user, &vars)
    }

    /// Render the user prompt for topic analysis from the transcript preview.
    fn topic_prompt(&self, transcript: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert(
            "transcript".to_string(),
            transcript_preview(transcript, self.topic.max_transcript_preview),
        );
        self.prompts.render_with_custom(&self.prompts.topic.user, &vars)
    }

    /// Describe what the video is about in a sentence or two.
    ///
    /// Falls back to [`DEFAULT_TOPIC`] on any failure.
    #[instrument(skip(self, transcript))]
    pub async fn analyze_topic(&self, transcript: &str) -> String {
        let messages = match build_messages(&self.prompts.topic.system, self.topic_prompt(transcript)) {
            Ok(m) => m,
            Err(e) => {
                warn!("Could not build topic request: {}", e);
                return DEFAULT_TOPIC.to_string();
            }
        };

        match self
            .complete(messages, self.topic.max_tokens, self.topic.temperature)
            .await
        {
            Ok(topic) => topic,
            Err(e) => {
                warn!("Topic analysis failed: {}", e);
                DEFAULT_TOPIC.to_string()
            }
        }
    }

    /// Run one chat completion and return the trimmed reply text.
    async fn complete(
        &self,
        messages: Vec<ChatCompletionRequestMessage>,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .max_completion_tokens(max_tokens)
            .temperature(temperature)
            .build()
            .map_err(|e| VidlearnError::Llm(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            VidlearnError::OpenAI(format!("Failed to generate response: {}", e))
        })?;

        let text = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(VidlearnError::Llm("Empty response from LLM".to_string()));
        }

        Ok(text.to_string())
    }
}

#[async_trait]
impl AnswerStrategy for LlmStrategy {
    fn name(&self) -> &'static str {
        "llm"
    }

    #[instrument(skip(self, transcript), fields(model = %self.model))]
    async fn answer(&self, transcript: &str, question: &str) -> Result<String> {
        let messages = build_messages(
            &self.prompts.answer.system,
            self.answer_prompt(transcript, question),
        )?;

        let answer = self
            .complete(messages, self.max_tokens, self.temperature)
            .await?;
        debug!("LLM answered with {} characters", answer.len());
        Ok(answer)
    }
}

/// Build a system + user message pair.
fn build_messages(system: &str, user: String) -> Result<Vec<ChatCompletionRequestMessage>> {
    Ok(vec![
        ChatCompletionRequestSystemMessageArgs::default()
            .content(system.to_string())
            .build()
            .map_err(|e| VidlearnError::Llm(e.to_string()))?
            .into(),
        ChatCompletionRequestUserMessageArgs::default()
            .content(user)
            .build()
            .map_err(|e| VidlearnError::Llm(e.to_string()))?
            .into(),
    ])
}

/// The first `max_chars` characters of the transcript.
fn transcript_preview(transcript: &str, max_chars: usize) -> String {
    transcript.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy() -> LlmStrategy {
        LlmStrategy::new(
            &LlmSettings::default(),
            &TopicSettings {
                max_transcript_preview: 12,
                ..Default::default()
            },
            Prompts::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_answer_prompt_contains_question_and_transcript() {
        let prompt = strategy().answer_prompt("Gears mesh together.", "What do gears do?");
        assert!(prompt.starts_with("Question: What do gears do?"));
        assert!(prompt.contains("Video transcript: Gears mesh together."));
        assert!(prompt.contains("2 lines or fewer"));
    }

    #[test]
    fn test_answer_prompt_keeps_placeholders_typed_in_question() {
        let prompts: std::collections::HashSet<String> = (0..20)
            .map(|_| strategy().answer_prompt("Gears mesh together.", "what is {{transcript}}?"))
            .collect();
        assert_eq!(prompts.len(), 1);

        let prompt = prompts.into_iter().next().unwrap();
        assert!(prompt.starts_with("Question: what is {{transcript}}?"));
        assert!(prompt.contains("Video transcript: Gears mesh together."));
    }

    #[test]
    fn test_topic_prompt_uses_preview() {
        let prompt = strategy().topic_prompt("Photosynthesis turns light into sugar.");
        assert_eq!(prompt, "Video transcript: Photosynthes...");
    }

    #[test]
    fn test_transcript_preview_respects_char_boundaries() {
        assert_eq!(transcript_preview("héllo wörld", 7), "héllo w");
        assert_eq!(transcript_preview("short", 500), "short");
    }

    #[test]
    fn test_model_override() {
        let strategy = strategy().with_model("gpt-4.1");
        assert_eq!(strategy.model(), "gpt-4.1");
        assert_eq!(strategy.name(), "llm");
    }
}
