//! VoiceCal — voice-driven calendar assistant.
//!
//! Main entry point: logging, environment, configuration, context
//! construction, and the interactive session loop.

use anyhow::Context as _;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use voicecal_api::{session, AppContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging FIRST so .env loading is visible
    let _log_guard = init_logging().context("failed to initialize logging")?;

    match dotenvy::dotenv() {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(err) => warn!(error = %err, "no .env file loaded"),
    }

    let config = voicecal_infra::config::load(None).context("failed to load configuration")?;

    let ctx = AppContext::new(&config).context("failed to construct application context")?;
    info!("VoiceCal initialized successfully");

    session::run(&ctx).await;
    Ok(())
}

/// Console logging plus the local log artifact at `logs/voicecal.log`.
fn init_logging() -> anyhow::Result<tracing_appender::non_blocking::WorkerGuard> {
    std::fs::create_dir_all("logs").context("cannot create logs directory")?;
    let file_appender = tracing_appender::rolling::never("logs", "voicecal.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::fmt::layer().with_writer(file_writer).with_ansi(false))
        .init();

    Ok(guard)
}
