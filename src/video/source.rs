//! Parsing user input into something the video service can upload.

use crate::config::Settings;
use crate::error::{Result, VidlearnError};
use std::path::{Path, PathBuf};
use url::Url;

/// Video file extensions accepted for upload.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "wmv", "flv", "webm", "mkv"];

/// Where a video comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaSource {
    Url(Url),
    File(PathBuf),
}

impl MediaSource {
    /// Parse an http(s) URL or a path to a local video file.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(VidlearnError::InvalidInput("Empty video source".to_string()));
        }

        if input.starts_with("http://") || input.starts_with("https://") {
            return Ok(MediaSource::Url(Url::parse(input)?));
        }

        let path = Settings::expand_path(input);
        if !path.exists() {
            return Err(VidlearnError::InvalidInput(format!(
                "File not found: {}",
                path.display()
            )));
        }
        if !Self::is_video_file(&path) {
            return Err(VidlearnError::InvalidInput(format!(
                "Unsupported file type: {}. Supported: {}",
                path.display(),
                VIDEO_EXTENSIONS.join(", ")
            )));
        }

        Ok(MediaSource::File(path))
    }

    /// Check if path has a supported video extension.
    fn is_video_file(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false)
    }

    /// Name to give the uploaded video: the file stem, or the last URL path segment.
    pub fn suggested_name(&self) -> Option<String> {
        match self {
            MediaSource::File(path) => path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string),
            MediaSource::Url(url) => url
                .path_segments()
                .and_then(|segments| segments.last())
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }
}

impl std::fmt::Display for MediaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaSource::Url(url) => write!(f, "{}", url),
            MediaSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}
