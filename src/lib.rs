//! vidlearn - Video Learning Assistant
//!
//! Upload a video, then ask questions about it in a chat. Answers are drawn
//! from the video's transcript.
//!
//! # Overview
//!
//! vidlearn allows you to:
//! - Upload videos from a URL or a local file to VideoDB
//! - Index their spoken words and scenes
//! - Ask questions answered by an OpenAI model from the transcript
//! - Keep getting answers offline through extractive summarization
//!
//! # Architecture
//!
//! - `config` - Configuration management and prompt templates
//! - `video` - Video service abstraction and the VideoDB client
//! - `transcript` - Transcript model and providers
//! - `answer` - Answer policy, language model and extractive strategies
//! - `session` - Per-user chat state
//! - `cli` - Command-line and HTTP front ends
//!
//! # Example
//!
//! ```rust,no_run
//! use vidlearn::answer::AnswerPolicy;
//! use vidlearn::config::Settings;
//! use vidlearn::session::ChatSession;
//! use vidlearn::transcript::Transcript;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let policy = AnswerPolicy::from_settings(&settings, None, false)?;
//!     let transcript = Transcript::load("lecture.json".as_ref())?;
//!
//!     let mut session = ChatSession::new();
//!     let reply = session.ask("Why do motors spin?", &transcript, &policy).await;
//!     println!("{} ({})", reply.text, reply.source);
//!
//!     Ok(())
//! }
//! ```

pub mod answer;
pub mod cli;
pub mod config;
pub mod error;
pub mod openai;
pub mod session;
pub mod transcript;
pub mod video;

pub use error::{Result, VidlearnError};
