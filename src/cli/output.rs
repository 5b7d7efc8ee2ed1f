//! CLI output formatting utilities.

use crate::answer::Reply;
use crate::video::{IndexReport, StepOutcome, VideoHandle};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print video info.
    pub fn video_info(video: &VideoHandle) {
        println!(
            "  {} {} ({})",
            style("*").cyan(),
            style(video.display_name()).bold(),
            style(&video.id).dim()
        );
        if let Some(url) = &video.stream_url {
            println!("    {}", style(url).dim());
        }
    }

    /// Print each indexing step.
    pub fn index_report(report: &IndexReport) {
        for (step, outcome) in report.steps() {
            match outcome {
                StepOutcome::Indexed => Self::success(&format!("Indexed {}", step)),
                StepOutcome::Failed(reason) => {
                    Self::warning(&format!("Could not index {}: {}", step, reason))
                }
            }
        }
    }

    /// Print an assistant reply and its warnings.
    pub fn reply(reply: &Reply) {
        for warning in &reply.warnings {
            Self::warning(warning);
        }
        println!("\n{} {}\n", style("Assistant:").cyan().bold(), reply.text);
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}
