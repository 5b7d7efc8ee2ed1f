//! Upload command implementation.

use super::connect;
use crate::cli::Output;
use crate::config::Settings;
use crate::video::{MediaSource, VideoService};
use anyhow::Result;

/// Upload a video and, unless told otherwise, index it.
pub async fn run_upload(source: &str, no_index: bool, settings: Settings) -> Result<()> {
    let source = match MediaSource::parse(source) {
        Ok(s) => s,
        Err(e) => {
            Output::error(&format!("{}", e));
            return Err(e.into());
        }
    };

    let service = connect(&settings)?;

    let spinner = Output::spinner(&format!("Uploading {}...", source));
    let video = match service.upload(&source).await {
        Ok(video) => {
            spinner.finish_and_clear();
            video
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to upload video: {}", e));
            return Err(e.into());
        }
    };
    Output::success(&format!("Video uploaded successfully! ID: {}", video.id));
    Output::video_info(&video);

    if no_index {
        Output::info(&format!("Index later with: vidlearn index {}", video.id));
        return Ok(());
    }

    let spinner = Output::spinner("Indexing video...");
    let report = service.index(&video).await;
    spinner.finish_and_clear();
    Output::index_report(&report);

    if !report.any_indexed() {
        Output::warning("Nothing was indexed; questions may not find a transcript.");
    }

    println!();
    Output::info(&format!("Ask about it with: vidlearn chat --video {}", video.id));

    Ok(())
}
