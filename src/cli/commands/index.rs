//! Index command implementation.

use super::connect;
use crate::cli::Output;
use crate::config::Settings;
use crate::video::{VideoHandle, VideoService};
use anyhow::Result;

/// Index spoken words and scenes of an uploaded video.
pub async fn run_index(video_id: &str, settings: Settings) -> Result<()> {
    let service = connect(&settings)?;
    let video = VideoHandle::from_id(video_id);

    let spinner = Output::spinner(&format!("Indexing {}...", video_id));
    let report = service.index(&video).await;
    spinner.finish_and_clear();

    Output::index_report(&report);

    if report.any_indexed() {
        Ok(())
    } else {
        Output::error("Indexing failed for every step.");
        anyhow::bail!("could not index video {}", video_id)
    }
}
