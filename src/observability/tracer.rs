//! OpenTelemetry tracer provider backed by a local span file.

use super::file_writer::RotatingFile;
use super::span_record::SpanBatch;
use futures_util::future::BoxFuture;
use opentelemetry::trace::TraceError;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use std::path::PathBuf;

/// Writes each exported batch as one JSON line.
struct SpanFileExporter {
    service: String,
    writer: RotatingFile,
    is_shutdown: bool,
}

impl SpanFileExporter {
    fn new(service: &str, file_path: PathBuf) -> Self {
        Self {
            service: service.to_string(),
            writer: RotatingFile::new(file_path),
            is_shutdown: false,
        }
    }

    fn write_batch(&self, batch: &[SpanData]) -> ExportResult {
        if self.is_shutdown {
            return Err(TraceError::from("span exporter is shut down"));
        }

        let line = serde_json::to_string(&SpanBatch::new(&self.service, batch))
            .map_err(|e| TraceError::from(e.to_string()))?;
        self.writer
            .write_line(&line)
            .map_err(|e| TraceError::from(e.to_string()))
    }
}

impl SpanExporter for SpanFileExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let result = self.write_batch(&batch);
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.is_shutdown = true;
    }

    fn set_resource(&mut self, resource: &Resource) {
        if let Some(name) = resource.get(opentelemetry::Key::from_static_str("service.name")) {
            self.service = name.to_string();
        }
    }
}

impl std::fmt::Debug for SpanFileExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanFileExporter")
            .field("service", &self.service)
            .field("writer", &self.writer)
            .field("is_shutdown", &self.is_shutdown)
            .finish()
    }
}

/// Builds a tracer provider that exports every finished span to `file_path`.
///
/// Spans are exported synchronously as they end.
pub fn create_tracer_provider(service: &str, file_path: PathBuf, resource: Resource) -> TracerProvider {
    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(SpanFileExporter::new(service, file_path))
        .build()
}
