//! Subscriber setup: stdout (pretty or JSON), optional rolling file, optional OTLP

use crate::config::{LogFormat, Settings};
use crate::telemetry;
use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

pub type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

// Target prefix match covers every pm2_manager_* crate
const DEFAULT_FILTER: &str = "warn,pm2_manager=info";
const LOG_FILE_PREFIX: &str = "pm2-manager.log";

/// Keeps background writers and exporters alive until dropped
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
    _telemetry: telemetry::TelemetryGuard,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber
pub fn init(settings: &Settings) -> Result<LoggingGuard> {
    let mut layers: Vec<BoxedLayer> = Vec::new();

    let stdout_layer = match settings.log_format {
        // Production: JSON structured logging
        LogFormat::Json => fmt::layer().json().with_filter(env_filter()).boxed(),
        // Development: Pretty formatting with colors
        LogFormat::Pretty => fmt::layer().pretty().with_filter(env_filter()).boxed(),
    };
    layers.push(stdout_layer);

    let file_guard = match &settings.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            layers.push(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_filter(env_filter())
                    .boxed(),
            );
            Some(guard)
        }
        None => None,
    };

    let (otel_layer, telemetry_guard) = telemetry::init_telemetry()?;
    if let Some(layer) = otel_layer {
        layers.push(layer);
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
        _telemetry: telemetry_guard,
    })
}
