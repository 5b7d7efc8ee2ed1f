//! Topic command implementation.

use crate::answer::{LlmStrategy, DEFAULT_TOPIC};
use crate::cli::{Output, TranscriptTarget};
use crate::config::{Prompts, Settings};
use crate::openai;
use anyhow::Result;

/// Describe in a few words what a video is about.
pub async fn run_topic(target: &TranscriptTarget, settings: Settings) -> Result<()> {
    let provider = match target.provider(&settings) {
        Ok(p) => p,
        Err(e) => {
            Output::error(&format!("{}", e));
            return Err(e.into());
        }
    };

    let spinner = Output::spinner("Fetching transcript...");
    let transcript = provider.fetch_transcript().await;
    spinner.finish_and_clear();

    let transcript = match transcript {
        Ok(t) if !t.is_empty() => t,
        Ok(_) => {
            Output::warning("The transcript is empty.");
            println!("{}", DEFAULT_TOPIC);
            return Ok(());
        }
        Err(e) => {
            Output::error(&format!("Could not get transcript: {}", e));
            return Err(e.into());
        }
    };

    if !openai::api_key_configured() {
        Output::warning("OpenAI service not available. Using the default topic.");
        println!("{}", DEFAULT_TOPIC);
        return Ok(());
    }

    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;
    let strategy = LlmStrategy::new(&settings.llm, &settings.topic, prompts)?;

    let spinner = Output::spinner("Analyzing topic...");
    let topic = strategy.analyze_topic(&transcript.full_text).await;
    spinner.finish_and_clear();

    Output::kv("Topic", &topic);

    Ok(())
}
