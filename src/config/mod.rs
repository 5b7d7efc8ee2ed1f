//! Configuration module for vidlearn.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{AnswerPrompts, Prompts, TopicPrompts};
pub use settings::{
    GeneralSettings, LlmSettings, PromptSettings, Settings, TopicSettings, VideoDbSettings,
    VIDEODB_API_KEY_ENV,
};
