//! Interactive chat command.

use crate::answer::AnswerPolicy;
use crate::cli::{AnswerOptions, Output, TranscriptTarget};
use crate::config::Settings;
use crate::session::ChatSession;
use crate::video::VideoHandle;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};
use tracing::debug;

/// Run the interactive chat command.
pub async fn run_chat(
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

    let mut session = ChatSession::new();
    if let Some(video_id) = &target.video {
        session.add_video(VideoHandle::from_id(video_id.as_str()));
    }
    debug!(session = %session.id(), "Chat session started");

    println!("\n{}", style("vidlearn Chat").bold().cyan());
    println!("{}", style(format!("Video: {}", target.label())).dim());
    println!(
        "{}\n",
        style("Type your questions, or 'exit' to quit. Use 'reset' to clear the chat.").dim()
    );
    print_welcome(&mut session);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("reset") || input.eq_ignore_ascii_case("clear") {
            session.reset_chat();
            Output::info("Chat cleared.");
            print_welcome(&mut session);
            continue;
        }

        let spinner = Output::spinner("Thinking...");
        let reply = session.ask(input, provider.as_ref(), &policy).await;
        spinner.finish_and_clear();

        Output::reply(&reply);
    }

    Ok(())
}

fn print_welcome(session: &mut ChatSession) {
    if let Some(message) = session.ensure_welcome() {
        println!("{} {}\n", style("Assistant:").cyan().bold(), message.text);
    }
}
