//! Social post demo entry point.

use social_cli::config::{Config, LogFormat};
use social_cli::error::AppError;
use social_cli::scenario;
use social_core::clock::SystemClock;
use social_core::id::RandomIds;
use social_event_store::InMemoryEventRepository;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;

    let subscriber = tracing_subscriber::fmt().with_env_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    );
    match config.log_format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.pretty().init(),
    }

    tracing::info!("Starting social post demo");

    let repo = InMemoryEventRepository::new();
    let report = scenario::run(&config, &SystemClock, &RandomIds, &repo).await?;

    tracing::info!(
        post_id = %report.post_id,
        rejected_steps = report.rejections.len(),
        "scenario finished"
    );

    Ok(())
}
