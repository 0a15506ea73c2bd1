//! Terminal demo entry point.
mod config;
mod demo;
mod input;
mod notices;
mod terminal;

use anyhow::Result;
use config::CliConfig;
use demo::Demo;
use message_log::MessageSession;
use notices::NoticeGenerator;
use terminal::{CrosstermTerminal, TerminalGuard};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = CliConfig::from_env();

    setup_logging(&config.session_id)?;

    let terminal = CrosstermTerminal::init()?;
    let _guard = TerminalGuard;

    let session = MessageSession::new(config.message_log.clone(), terminal);
    let mut demo = Demo::new(session, NoticeGenerator::seeded(config.demo_seed));
    demo.run()?;

    Ok(())
}

/// Setup file-only logging; stdout belongs to the terminal UI.
fn setup_logging(session_id: &Option<String>) -> Result<()> {
    use std::time::{SystemTime, UNIX_EPOCH};

    let log_dir = get_log_directory();

    let session_id = session_id.clone().unwrap_or_else(|| {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        format!("session_{}", timestamp)
    });

    let session_log_dir = log_dir.join(&session_id);
    std::fs::create_dir_all(&session_log_dir)?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, "message-log.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    // Leak the guard to keep file writer alive
    std::mem::forget(guard);

    tracing::info!("Logging initialized: session={}", session_id);
    tracing::info!("Log file: {}/message-log.log", session_log_dir.display());

    Ok(())
}

/// Platform cache directory for logs, e.g. `~/.cache/message-log/logs` on Linux.
fn get_log_directory() -> std::path::PathBuf {
    directories::ProjectDirs::from("", "", "message-log")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| std::path::PathBuf::from("/tmp/message-log"))
        .join("logs")
}
