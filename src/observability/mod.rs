//! OpenTelemetry tracing with file-based span export.
//!
//! Spans created through `tracing` are bridged into OpenTelemetry and written as
//! JSON lines to a local file, so a session can be inspected after the fact
//! without running a collector.
//!
//! # Architecture
//!
//! ```text
//! tracing spans → tracing-opentelemetry → SDK TracerProvider → SpanFileExporter → RotatingFile
//! ```
//!
//! # Modules
//!
//! - `init`: subscriber setup
//! - `tracer`: tracer provider and exporter
//! - `span_record`: JSON shape of exported spans
//! - `file_writer`: size-based rotating writer (10 MB, 3 backups)

mod file_writer;
mod init;
mod span_record;
mod tracer;

pub use init::{init_tracing, SPAN_FILE};
