//! Doctor command - verify API keys and configuration.

use crate::cli::Output;
use crate::config::{Settings, VIDEODB_API_KEY_ENV};
use crate::openai::API_KEY_ENV;
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("vidlearn Doctor");
    println!();

    let mut checks = Vec::new();

    println!("{}", style("API Configuration").bold());
    let videodb = check_videodb_key(settings.videodb.resolved_api_key().as_deref());
    let openai = check_openai_key(std::env::var(API_KEY_ENV).ok().as_deref());
    videodb.print();
    openai.print();
    checks.push(videodb);
    checks.push(openai);

    println!();

    println!("{}", style("Services").bold());
    let endpoint = CheckResult::ok("VideoDB endpoint", &settings.videodb.base_url);
    let model = CheckResult::ok(
        "Answer model",
        &format!(
            "{} (max {} tokens, temperature {})",
            settings.llm.model, settings.llm.max_tokens, settings.llm.temperature
        ),
    );
    endpoint.print();
    model.print();

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before uploading videos.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! vidlearn is ready to use.");
    }

    Ok(())
}

/// The VideoDB key is required for everything except offline transcript files.
fn check_videodb_key(key: Option<&str>) -> CheckResult {
    match key {
        Some(key) if !key.trim().is_empty() => {
            CheckResult::ok(VIDEODB_API_KEY_ENV, &format!("configured ({})", mask(key)))
        }
        _ => CheckResult::error(
            VIDEODB_API_KEY_ENV,
            "not set",
            "Get a key from https://console.videodb.io and add it to .env or your shell",
        ),
    }
}

/// The OpenAI key is optional; without it answers use fallback summarization.
fn check_openai_key(key: Option<&str>) -> CheckResult {
    match key {
        Some(key) if key.starts_with("sk-") && key.len() > 20 => {
            CheckResult::ok(API_KEY_ENV, &format!("configured ({})", mask(key)))
        }
        Some(key) if !key.trim().is_empty() => CheckResult::warning(
            API_KEY_ENV,
            "set but format looks unusual",
            "Expected format: sk-... (OpenAI API key)",
        ),
        _ => CheckResult::warning(
            API_KEY_ENV,
            "not set, fallback summarization will be used",
            "Get a key from https://platform.openai.com/api-keys",
        ),
    }
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: vidlearn config edit",
        )
    }
}

/// Show only the first and last few characters of a secret.
fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "****".to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
