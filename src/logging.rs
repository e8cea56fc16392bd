use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
    Registry,
};
use tracing_error::ErrorLayer;

use crate::config::{Config, LogFormat};

/// Initializes the logging and tracing system.
///
/// Everything goes to stderr through a non-blocking writer; stdout is left
/// for the program's result. `level` comes from the command line flags and
/// may be replaced by `UNTRACK_LOG` unless it is [`LevelFilter::OFF`].
///
/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init_logging(level: LevelFilter, config: &Config) -> WorkerGuard {
    let env_filter = if level == LevelFilter::OFF {
        EnvFilter::new("off")
    } else if let Some(directives) = &config.log_filter {
        EnvFilter::new(directives)
    } else {
        EnvFilter::new(format!("untrack={level}"))
    };

    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());

    let registry = Registry::default()
        .with(env_filter)
        .with(ErrorLayer::default());

    match config.log_format {
        LogFormat::Json => {
            let json_layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_target(true);

            registry.with(json_layer).init();
        }
        LogFormat::Text => {
            let fmt_layer = fmt::layer()
                .with_writer(writer)
                .with_target(false);

            registry.with(fmt_layer).init();
        }
    }

    tracing::debug!(format = ?config.log_format, %level, "Logging system initialized");
    guard
}

/// Debugging utility for tracking execution time of a block.
pub struct Timer {
    label: &'static str,
    start: std::time::Instant,
}

impl Timer {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        tracing::debug!(
            label = %self.label,
            duration_us = %duration.as_micros(),
            "Operation completed"
        );
    }
}
