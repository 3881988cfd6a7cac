//! Tracing subscriber setup.

use super::tracer;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SERVICE_NAME: &str = "bookscout";

/// Name of the span file inside the data directory.
pub const SPAN_FILE: &str = "bookscout-spans.json";

/// Installs the global subscriber: an `EnvFilter` plus an OpenTelemetry layer
/// that writes spans to `<data dir>/bookscout-spans.json`.
///
/// The filter is `config.trace_level`, then `RUST_LOG`, then `"info"`. An
/// invalid directive falls back to `"info"`.
///
/// Observability is optional: if the data directory cannot be created this
/// returns without installing anything, and calling it twice is harmless.
///
/// # Example
///
/// ```rust
/// use bookscout::observability::init_tracing;
/// use bookscout::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let filter = match config.trace_level.as_deref() {
        Some(level) => EnvFilter::try_new(level).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new("info"));

    let data_dir = crate::infrastructure::get_data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![opentelemetry::KeyValue::new(
        "service.name",
        SERVICE_NAME,
    )]);
    let provider = tracer::create_tracer_provider(SERVICE_NAME, data_dir.join(SPAN_FILE), resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .try_init();
}
