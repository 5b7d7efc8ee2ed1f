//! CLI module for vidlearn.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use crate::config::Settings;
use crate::transcript::{Transcript, TranscriptProvider};
use crate::video::{VideoDbClient, VideoHandle, VideoTranscript};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

/// vidlearn - Video Learning Assistant
///
/// Upload a video to VideoDB, then ask questions answered from its transcript.
/// Answers come from an OpenAI model when OPENAI_API_KEY is set, and from a
/// local extractive summary otherwise.
#[derive(Parser, Debug)]
#[command(name = "vidlearn")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check API keys and configuration
    Doctor,

    /// Upload a video (URL or local file) and index it
    Upload {
        /// http(s) URL or path to a local video file
        source: String,

        /// Skip indexing after upload
        #[arg(long)]
        no_index: bool,
    },

    /// Index spoken words and scenes of an uploaded video
    Index {
        /// VideoDB video ID
        video_id: String,
    },

    /// Print or save the transcript of a video
    Transcript {
        /// VideoDB video ID
        video_id: String,

        /// Prefix each segment with its time range
        #[arg(short, long)]
        timestamps: bool,

        /// Save the transcript as JSON instead of printing it
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Ask a single question about a video
    Ask {
        /// The question to ask
        question: String,

        #[command(flatten)]
        target: TranscriptTarget,

        #[command(flatten)]
        answer: AnswerOptions,
    },

    /// Start an interactive chat about a video
    Chat {
        #[command(flatten)]
        target: TranscriptTarget,

        #[command(flatten)]
        answer: AnswerOptions,
    },

    /// Describe what a video is about
    Topic {
        #[command(flatten)]
        target: TranscriptTarget,
    },

    /// Start an HTTP chat server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Video to select at startup
        #[arg(long)]
        video: Option<String>,

        #[command(flatten)]
        answer: AnswerOptions,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Where the transcript for a question comes from.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct TranscriptTarget {
    /// VideoDB video ID
    #[arg(long)]
    pub video: Option<String>,

    /// Local transcript file (JSON saved by `vidlearn transcript --output`, or plain text)
    #[arg(long)]
    pub transcript_file: Option<PathBuf>,
}

impl TranscriptTarget {
    /// Build the transcript provider for this target.
    ///
    /// Video targets fetch from VideoDB on every question; file targets are
    /// loaded once.
    pub fn provider(&self, settings: &Settings) -> crate::Result<Box<dyn TranscriptProvider>> {
        if let Some(path) = &self.transcript_file {
            preflight::check(preflight::Operation::LocalTranscript, settings)?;
            let transcript = Transcript::load(path)?;
            return Ok(Box::new(transcript));
        }

        let video_id = self.video.as_deref().unwrap_or_default();
        preflight::check(preflight::Operation::VideoService, settings)?;
        let service = Arc::new(VideoDbClient::new(&settings.videodb)?);
        Ok(Box::new(VideoTranscript::new(
            service,
            VideoHandle::from_id(video_id),
        )))
    }

    /// Short label for display.
    pub fn label(&self) -> String {
        match (&self.video, &self.transcript_file) {
            (Some(id), _) => id.clone(),
            (None, Some(path)) => path.display().to_string(),
            (None, None) => String::new(),
        }
    }
}

/// Options controlling how answers are produced.
#[derive(Args, Debug, Clone, Default)]
pub struct AnswerOptions {
    /// Never call the language model; answer with extractive summaries
    #[arg(long)]
    pub offline: bool,

    /// OpenAI model to use instead of the configured one
    #[arg(short, long)]
    pub model: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_requires_exactly_one_target() {
        assert!(Cli::try_parse_from(["vidlearn", "ask", "why?"]).is_err());
        assert!(Cli::try_parse_from([
            "vidlearn",
            "ask",
            "why?",
            "--video",
            "m-1",
            "--transcript-file",
            "t.json"
        ])
        .is_err());

        let cli = Cli::try_parse_from(["vidlearn", "ask", "why?", "--video", "m-1", "--offline"])
            .unwrap();
        match cli.command {
            Commands::Ask {
                question,
                target,
                answer,
            } => {
                assert_eq!(question, "why?");
                assert_eq!(target.label(), "m-1");
                assert!(answer.offline);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_file_target_loads_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lesson.txt");
        std::fs::write(&path, "Inertia keeps objects moving.").unwrap();

        let target = TranscriptTarget {
            video: None,
            transcript_file: Some(path),
        };
        assert!(target.provider(&Settings::default()).is_ok());
    }

    #[test]
    fn test_verbosity_is_global() {
        let cli = Cli::try_parse_from(["vidlearn", "doctor", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
