//! JSON-line encoding of exported spans.
//!
//! Each export batch becomes one line:
//!
//! ```json
//! {"service":"bookscout","exportedAt":"2026-01-01T12:00:00Z","spans":[
//!   {"traceId":"…","spanId":"…","name":"fetch","start":"…","durationUs":1840,
//!    "attributes":{"query":"rust","start_index":0},"events":[…]}
//! ]}
//! ```

use std::collections::BTreeMap;
use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};
use opentelemetry::trace::{SpanId, Status};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::SpanData;
use serde::Serialize;
use serde_json::Value as JsonValue;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanBatch {
    pub service: String,
    pub exported_at: String,
    pub spans: Vec<SpanRecord>,
}

impl SpanBatch {
    pub fn new(service: &str, spans: &[SpanData]) -> Self {
        Self {
            service: service.to_string(),
            exported_at: timestamp(SystemTime::now()),
            spans: spans.iter().map(SpanRecord::from_span).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanRecord {
    pub trace_id: String,
    pub span_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_span_id: Option<String>,
    pub name: String,
    pub start: String,
    pub duration_us: u64,
    pub attributes: BTreeMap<String, JsonValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<EventRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SpanRecord {
    fn from_span(span: &SpanData) -> Self {
        let duration = span
            .end_time
            .duration_since(span.start_time)
            .unwrap_or_default();

        Self {
            trace_id: format!("{:032x}", span.span_context.trace_id()),
            span_id: format!("{:016x}", span.span_context.span_id()),
            parent_span_id: (span.parent_span_id != SpanId::INVALID)
                .then(|| format!("{:016x}", span.parent_span_id)),
            name: span.name.to_string(),
            start: timestamp(span.start_time),
            duration_us: u64::try_from(duration.as_micros()).unwrap_or(u64::MAX),
            attributes: attributes(&span.attributes),
            events: span
                .events
                .iter()
                .map(|event| EventRecord {
                    at: timestamp(event.timestamp),
                    name: event.name.to_string(),
                    attributes: attributes(&event.attributes),
                })
                .collect(),
            error: match &span.status {
                Status::Error { description } => Some(description.to_string()),
                Status::Ok | Status::Unset => None,
            },
        }
    }
}

/// A `tracing` event recorded inside a span.
#[derive(Debug, Serialize)]
pub struct EventRecord {
    pub at: String,
    pub name: String,
    pub attributes: BTreeMap<String, JsonValue>,
}

fn timestamp(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn attributes(pairs: &[KeyValue]) -> BTreeMap<String, JsonValue> {
    pairs
        .iter()
        .map(|kv| (kv.key.to_string(), attribute_value(&kv.value)))
        .collect()
}

fn attribute_value(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::I64(i) => JsonValue::from(*i),
        Value::F64(f) => serde_json::Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
        Value::String(s) => JsonValue::String(s.to_string()),
        Value::Array(_) => JsonValue::String(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_values_keep_their_json_type() {
        let attrs = attributes(&[
            KeyValue::new("query", "rust"),
            KeyValue::new("start_index", 3_i64),
            KeyValue::new("favorite", true),
            KeyValue::new("ratio", f64::NAN),
        ]);

        assert_eq!(attrs["query"], JsonValue::from("rust"));
        assert_eq!(attrs["start_index"], JsonValue::from(3));
        assert_eq!(attrs["favorite"], JsonValue::Bool(true));
        assert_eq!(attrs["ratio"], JsonValue::Null);
    }

    #[test]
    fn timestamps_are_utc_rfc3339() {
        assert_eq!(timestamp(SystemTime::UNIX_EPOCH), "1970-01-01T00:00:00.000000Z");
    }
}
