//! Transcript command implementation.

use super::connect;
use crate::cli::Output;
use crate::config::Settings;
use crate::video::{VideoHandle, VideoService};
use anyhow::Result;

/// Print a video's transcript, or save it as JSON for offline questions.
pub async fn run_transcript(
    video_id: &str,
    timestamps: bool,
    output: Option<String>,
    settings: Settings,
) -> Result<()> {
    let service = connect(&settings)?;

    let spinner = Output::spinner("Fetching transcript...");
    let transcript = service.transcript(&VideoHandle::from_id(video_id)).await;
    spinner.finish_and_clear();

    let transcript = match transcript {
        Ok(t) if !t.is_empty() => t,
        Ok(_) => {
            Output::warning("The transcript is empty. Has the video been indexed?");
            Output::info(&format!("Index it with: vidlearn index {}", video_id));
            return Ok(());
        }
        Err(e) => {
            Output::error(&format!("Could not get transcript: {}", e));
            return Err(e.into());
        }
    };

    match output {
        Some(path) => {
            let path = Settings::expand_path(&path);
            let json = serde_json::to_string_pretty(&transcript)?;
            std::fs::write(&path, json)?;
            Output::success(&format!(
                "Saved {} segments to {}",
                transcript.segments.len(),
                path.display()
            ));
            Output::info(&format!(
                "Ask offline with: vidlearn ask \"...\" --transcript-file {}",
                path.display()
            ));
        }
        None if timestamps && !transcript.segments.is_empty() => {
            println!("{}", transcript.format_with_timestamps())
        }
        None => println!("{}", transcript.full_text),
    }

    Ok(())
}
