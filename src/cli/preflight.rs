//! Pre-flight checks before talking to external services.
//!
//! Validates that required configuration is available before starting
//! operations that would otherwise fail midway.

use crate::config::{Settings, VIDEODB_API_KEY_ENV};
use crate::error::{Result, VidlearnError};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Uploading, indexing, or fetching transcripts needs a VideoDB key.
    VideoService,
    /// Answering from a local transcript file needs nothing.
    LocalTranscript,
}

/// Run pre-flight checks for the given operation.
///
/// A missing OpenAI key is never an error: answers fall back to
/// extractive summaries.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::VideoService => check_videodb_key(settings)?,
        Operation::LocalTranscript => {}
    }
    Ok(())
}

/// Check if a VideoDB API key is configured.
fn check_videodb_key(settings: &Settings) -> Result<()> {
    match settings.videodb.resolved_api_key() {
        Some(_) => Ok(()),
        None => Err(VidlearnError::Config(format!(
            "VideoDB API key not found. Set it with: export {}='...' (get one at https://console.videodb.io)",
            VIDEODB_API_KEY_ENV
        ))),
    }
}
