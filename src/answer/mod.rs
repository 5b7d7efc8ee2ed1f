//! Answering questions about a video transcript.
//!
//! An [`AnswerPolicy`] picks the source of each answer: a canned reply for
//! small talk, the language model when one is configured, and the
//! [`ExtractiveSummarizer`] otherwise or when the model call fails.

mod llm;
mod policy;
pub mod summarizer;

pub use llm::{LlmStrategy, DEFAULT_TOPIC};
pub use policy::{AnswerPolicy, AnswerSource, Reply, GREETING_REPLY, NO_TRANSCRIPT_REPLY};
pub use summarizer::ExtractiveSummarizer;

use crate::error::Result;
use async_trait::async_trait;

/// A way of answering a question from transcript text.
#[async_trait]
pub trait AnswerStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Answer `question` using only `transcript`.
    ///
    /// Failures must be returned as errors, never as an empty answer.
    async fn answer(&self, transcript: &str, question: &str) -> Result<String>;
}

/// Local extractive answering; never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicStrategy {
    summarizer: ExtractiveSummarizer,
}

impl HeuristicStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer_now(&self, transcript: &str, question: &str) -> String {
        self.summarizer.summarize(transcript, question)
    }
}

#[async_trait]
impl AnswerStrategy for HeuristicStrategy {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn answer(&self, transcript: &str, question: &str) -> Result<String> {
        Ok(self.answer_now(transcript, question))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_heuristic_strategy_wraps_summarizer() {
        let strategy = HeuristicStrategy::new();
        let transcript = "Levers multiply force. A longer lever helps you lift more weight.";

        let answer = strategy.answer(transcript, "how do levers work").await.unwrap();
        assert_eq!(
            answer,
            ExtractiveSummarizer::new().summarize(transcript, "how do levers work")
        );
        assert_eq!(strategy.name(), "heuristic");
    }
}
