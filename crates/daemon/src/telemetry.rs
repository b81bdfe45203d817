//! Telemetry setup for OpenTelemetry integration

use crate::logging::BoxedLayer;
use anyhow::Result;

/// Flushes the tracer provider on drop
#[derive(Default)]
pub struct TelemetryGuard {
    #[cfg(feature = "telemetry")]
    provider: Option<opentelemetry_sdk::trace::TracerProvider>,
}

#[cfg(feature = "telemetry")]
impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            let _ = provider.shutdown();
        }
    }
}

/// Whether an OTLP endpoint was configured
pub fn endpoint_configured() -> bool {
    std::env::var_os("OTEL_EXPORTER_OTLP_ENDPOINT").is_some()
}

/// Build the OpenTelemetry layer if enabled
///
/// # Environment Variables
///
/// - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (e.g., http://localhost:4317)
/// - `OTEL_SERVICE_NAME`: Service name (default: pm2-manager)
///
/// # Example
///
/// ```text
/// OTEL_EXPORTER_OTLP_ENDPOINT=http://localhost:4317 \
/// OTEL_SERVICE_NAME=pm2-manager-dev \
///     ./pm2-manager
/// ```
pub fn init_telemetry() -> Result<(Option<BoxedLayer>, TelemetryGuard)> {
    if !endpoint_configured() {
        return Ok((None, TelemetryGuard::default()));
    }
    init_telemetry_impl()
}

// Caller warns once logging is up
#[cfg(not(feature = "telemetry"))]
fn init_telemetry_impl() -> Result<(Option<BoxedLayer>, TelemetryGuard)> {
    Ok((None, TelemetryGuard::default()))
}

#[cfg(feature = "telemetry")]
fn init_telemetry_impl() -> Result<(Option<BoxedLayer>, TelemetryGuard)> {
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::{runtime, trace::TracerProvider, Resource};
    use tracing_subscriber::Layer;

    let service_name =
        std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "pm2-manager".to_string());
    let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")?;

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint)
        .build()?;

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, runtime::Tokio)
        .with_resource(Resource::new(vec![KeyValue::new(
            "service.name",
            service_name.clone(),
        )]))
        .build();

    let tracer = provider.tracer(service_name);
    let layer = tracing_opentelemetry::layer().with_tracer(tracer).boxed();

    Ok((
        Some(layer),
        TelemetryGuard {
            provider: Some(provider),
        },
    ))
}
