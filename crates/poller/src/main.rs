use std::path::Path;

use review_common::config::AppConfig;
use review_engine::validator::ValidationPolicy;
use review_notifier::TelegramNotifier;
use review_poller::fetcher::HttpStatusSource;
use review_poller::poller::StatusPoller;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first so the log sink location is known
    let config = AppConfig::from_env();
    let log_target = config
        .as_ref()
        .map(|c| (c.log_dir.clone(), c.log_file.clone()))
        .unwrap_or_else(|_| (".".into(), "homework.log".to_string()));
    let guard = init_logging(&log_target.0, &log_target.1);

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(severity = "critical", error = %e, "Cannot start without configuration");
            // Flush the file writer before exiting
            drop(guard);
            std::process::exit(1);
        }
    };

    tracing::info!("Homework status notifier starting...");

    let source = HttpStatusSource::new(
        config.endpoint.clone(),
        config.source_api_token.clone(),
        config.request_timeout(),
    )?;
    let notifier = TelegramNotifier::new(
        config.telegram_api_url.clone(),
        config.transport_token.clone(),
        config.destination_id.clone(),
        config.request_timeout(),
    )?;
    let policy = ValidationPolicy {
        require_cursor_field: config.require_cursor_field,
        validate_element_types: config.validate_element_types,
    };

    let mut poller = StatusPoller::new(source, notifier, policy, config.poll_interval());

    tokio::select! {
        _ = poller.run() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping...");
        }
    }

    tracing::info!("Homework status notifier stopped.");
    Ok(())
}

/// Log to stdout and append to `<dir>/<file>`.
///
/// When the log file cannot be opened, logging continues on stdout only so
/// startup failures are still reported.
fn init_logging(dir: &Path, file: &str) -> Option<WorkerGuard> {
    let (file_layer, guard, file_error) = match open_log_file(dir, file) {
        Ok(appender) => {
            let (file_writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("review_poller=debug,review_engine=debug,review_notifier=debug")
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    if let Some(e) = file_error {
        tracing::warn!(
            dir = %dir.display(),
            file,
            error = %e,
            "Log file unavailable, logging to stdout only"
        );
    }

    guard
}

fn open_log_file(dir: &Path, file: &str) -> anyhow::Result<RollingFileAppender> {
    std::fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file)
        .build(dir)?;
    Ok(appender)
}
