//! Transcript types and the provider seam used by the answer policy.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A complete transcript with segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Full spoken-word text (segments joined by single spaces).
    #[serde(default)]
    pub full_text: String,
    /// Individual transcript segments with timestamps.
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    /// Create a new transcript from segments.
    pub fn new(segments: Vec<TranscriptSegment>) -> Self {
        let full_text = segments
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            full_text,
            segments,
        }
    }

    /// Create a transcript from plain text with no timing information.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            full_text: text.into().trim().to_string(),
            segments: Vec::new(),
        }
    }

    /// Load a transcript from a file.
    ///
    /// JSON files are parsed as a serialized [`Transcript`]; anything else is
    /// read as plain text.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            let mut transcript: Transcript = serde_json::from_str(&content)?;
            if transcript.full_text.trim().is_empty() && !transcript.segments.is_empty() {
                transcript = Transcript::new(transcript.segments);
            }
            Ok(transcript)
        } else {
            Ok(Self::from_text(content))
        }
    }

    /// True when there is no spoken text at all.
    pub fn is_empty(&self) -> bool {
        self.full_text.trim().is_empty()
    }

    /// Total duration in seconds (end of the last segment).
    pub fn duration_seconds(&self) -> f64 {
        self.segments.last().map(|s| s.end_seconds).unwrap_or(0.0)
    }

    /// Format the transcript with timestamps for display.
    pub fn format_with_timestamps(&self) -> String {
        self.segments
            .iter()
            .map(|s| {
                format!(
                    "[{} - {}] {}",
                    format_timestamp(s.start_seconds),
                    format_timestamp(s.end_seconds),
                    s.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A single segment of a transcript with timestamp information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Transcribed text content.
    pub text: String,
    /// Start time in seconds.
    #[serde(rename = "start", default)]
    pub start_seconds: f64,
    /// End time in seconds.
    #[serde(rename = "end", default)]
    pub end_seconds: f64,
}

impl TranscriptSegment {
    /// Create a new transcript segment.
    pub fn new(start_seconds: f64, end_seconds: f64, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start_seconds,
            end_seconds,
        }
    }
}

/// Format seconds as MM:SS or HH:MM:SS.
pub fn format_timestamp(seconds: f64) -> String {
    let total_seconds = seconds as u32;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Something that can produce the transcript a question should be answered from.
///
/// Fetched once per question; implementations must not cache on the caller's behalf.
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    async fn fetch_transcript(&self) -> Result<Transcript>;
}

/// An already-loaded transcript (e.g. from `--transcript-file`).
#[async_trait]
impl TranscriptProvider for Transcript {
    async fn fetch_transcript(&self) -> Result<Transcript> {
        Ok(self.clone())
    }
}
