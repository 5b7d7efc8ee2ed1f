//! CLI command implementations.

mod ask;
mod chat;
mod config;
mod doctor;
mod index;
mod serve;
mod topic;
mod transcript;
mod upload;

pub use ask::run_ask;
pub use chat::run_chat;
pub use config::run_config;
pub use doctor::run_doctor;
pub use index::run_index;
pub use serve::run_serve;
pub use topic::run_topic;
pub use transcript::run_transcript;
pub use upload::run_upload;

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::video::VideoDbClient;
use std::sync::Arc;

/// Connect to VideoDB after checking the key is configured.
fn connect(settings: &Settings) -> anyhow::Result<Arc<VideoDbClient>> {
    if let Err(e) = preflight::check(Operation::VideoService, settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'vidlearn doctor' for detailed diagnostics.");
        return Err(e.into());
    }
    Ok(Arc::new(VideoDbClient::new(&settings.videodb)?))
}
