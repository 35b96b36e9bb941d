use anyhow::Result;
use std::path::Path;
use std::time::Instant;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

use crate::config::LoggingConfig;

/// Initialize structured logging.
///
/// Console output goes to stderr so stdout stays clean for command output.
/// When `file_path` is set, a daily-rolling JSON log is written next to it;
/// keep the returned guard alive until exit or buffered lines are lost.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| anyhow::anyhow!("Failed to create log filter: {}", e))?;

    let console_layer = if config.format == "json" {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .json()
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(true)
            .boxed()
    };

    let registry = Registry::default().with(env_filter).with(console_layer);

    let guard = if let Some(log_path) = config.file_path.as_deref().map(Path::new) {
        let directory = log_path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = log_path
            .file_name()
            .map_or_else(|| "wellbeing.log".to_string(), |n| n.to_string_lossy().into_owned());
        let file_appender = rolling::daily(directory, file_name);
        let (non_blocking_appender, guard) = non_blocking(file_appender);

        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking_appender)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true)
            .json();

        registry
            .with(file_layer)
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to install subscriber: {}", e))?;
        Some(guard)
    } else {
        registry
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to install subscriber: {}", e))?;
        None
    };

    info!(level = %config.level, format = %config.format, "Logging system initialized");
    Ok(guard)
}

/// Logs how long a named operation took
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    /// Start timing `operation`
    #[must_use]
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    /// Log the elapsed time and return it in milliseconds
    pub fn finish(self) -> u128 {
        let duration = self.start.elapsed().as_millis();
        info!(operation = %self.operation, duration_ms = duration, "Operation completed");
        duration
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            let duration = self.start.elapsed().as_millis();
            tracing::debug!(operation = %self.operation, duration_ms = duration, "Operation finished");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_timer_reports_elapsed() {
        let timer = OperationTimer::new("unit");
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert!(timer.finish() >= 2);
    }
}
