//! OpenAI client configuration.

use crate::error::{Result, VidlearnError};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Environment variable holding the OpenAI API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Whether an OpenAI API key is present in the environment.
pub fn api_key_configured() -> bool {
    std::env::var(API_KEY_ENV).is_ok_and(|key| !key.trim().is_empty())
}

/// Create an OpenAI client whose requests time out after `timeout`.
pub fn create_client(timeout: Duration) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| VidlearnError::Config(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Client::with_config(OpenAIConfig::default()).with_http_client(http_client))
}
