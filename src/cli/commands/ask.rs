//! Ask command implementation.

use crate::answer::AnswerPolicy;
use crate::cli::{AnswerOptions, Output, TranscriptTarget};
use crate::config::Settings;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    target: &TranscriptTarget,
    options: &AnswerOptions,
    settings: Settings,
) -> Result<()> {
    let provider = match target.provider(&settings) {
        Ok(p) => p,
        Err(e) => {
            Output::error(&format!("{}", e));
            Output::info("Run 'vidlearn doctor' for detailed diagnostics.");
            return Err(e.into());
        }
    };

    let policy = AnswerPolicy::from_settings(&settings, options.model.as_deref(), options.offline)?;
    if !policy.has_llm() && !options.offline {
        Output::warning("OpenAI service not available. Using fallback summarization.");
    }

    let spinner = Output::spinner(&format!("Thinking about {}...", target.label()));
    let reply = policy.answer(question, provider.as_ref()).await;
    spinner.finish_and_clear();

    Output::reply(&reply);

    Ok(())
}
