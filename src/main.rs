//! vidlearn CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vidlearn::cli::{commands, Cli, Commands};
use vidlearn::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config_path = cli.config.as_deref().map(Settings::expand_path);
    let settings = Settings::load_from(config_path.as_ref())?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.clone(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("vidlearn={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match &cli.command {
        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Upload { source, no_index } => {
            commands::run_upload(source, *no_index, settings).await?;
        }

        Commands::Index { video_id } => {
            commands::run_index(video_id, settings).await?;
        }

        Commands::Transcript {
            video_id,
            timestamps,
            output,
        } => {
            commands::run_transcript(video_id, *timestamps, output.clone(), settings).await?;
        }

        Commands::Ask {
            question,
            target,
            answer,
        } => {
            commands::run_ask(question, target, answer, settings).await?;
        }

        Commands::Chat { target, answer } => {
            commands::run_chat(target, answer, settings).await?;
        }

        Commands::Topic { target } => {
            commands::run_topic(target, settings).await?;
        }

        Commands::Serve {
            host,
            port,
            video,
            answer,
        } => {
            commands::run_serve(host, *port, video.clone(), answer, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, config_path, settings)?;
        }
    }

    Ok(())
}
