//! Tracing subscriber setup.

use super::tracer;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Name of the trace file inside the data directory.
pub const TRACE_FILE_NAME: &str = "flashdeck-trace.jsonl";

const SERVICE_NAME: &str = "flashdeck";

/// Installs the global subscriber: `EnvFilter` from `trace_level` (default
/// `info`) feeding an OpenTelemetry layer that exports to
/// `<data_dir>/flashdeck-trace.jsonl`.
///
/// Failing to create the data directory leaves tracing disabled. Calling it
/// twice is harmless; only the first subscriber is installed.
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.as_deref().unwrap_or("info");

    let data_dir = crate::infrastructure::paths::get_data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let provider = tracer::create_tracer_provider(data_dir.join(TRACE_FILE_NAME), SERVICE_NAME);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(otel_layer);

    let _ = subscriber.try_init();
}
