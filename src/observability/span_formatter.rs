//! Span serialization to compact JSON lines.
//!
//! One span becomes one object:
//!
//! ```json
//! {"service":"flashdeck","name":"add_card","traceId":"…","spanId":"…",
//!  "parentSpanId":"","start":"2026-…Z","durationMicros":42,
//!  "attributes":{"deck_id":1},"events":[{"name":"card added","attributes":{}}],
//!  "status":"unset"}
//! ```

use chrono::{DateTime, Utc};
use opentelemetry::trace::{Event, SpanId, Status};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::SpanData;
use serde_json::{json, Map, Value as JsonValue};
use std::time::SystemTime;

/// Formats spans for the trace file.
pub struct SpanFormatter {
    service: String,
}

impl SpanFormatter {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn format_span(&self, span: &SpanData) -> JsonValue {
        let duration = span
            .end_time
            .duration_since(span.start_time)
            .unwrap_or_default();

        json!({
            "service": self.service,
            "name": span.name,
            "traceId": format!("{:032x}", span.span_context.trace_id()),
            "spanId": format!("{:016x}", span.span_context.span_id()),
            "parentSpanId": if span.parent_span_id == SpanId::INVALID {
                String::new()
            } else {
                format!("{:016x}", span.parent_span_id)
            },
            "start": timestamp(span.start_time),
            "durationMicros": u64::try_from(duration.as_micros()).unwrap_or(u64::MAX),
            "attributes": attributes(&span.attributes),
            "events": span.events.iter().map(format_event).collect::<Vec<_>>(),
            "status": match &span.status {
                Status::Unset => "unset".to_string(),
                Status::Ok => "ok".to_string(),
                Status::Error { description } => format!("error: {description}"),
            },
        })
    }
}

fn timestamp(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339()
}

fn format_event(event: &Event) -> JsonValue {
    json!({
        "time": timestamp(event.timestamp),
        "name": event.name,
        "attributes": attributes(&event.attributes),
    })
}

fn attributes(pairs: &[KeyValue]) -> JsonValue {
    let map: Map<String, JsonValue> = pairs
        .iter()
        .map(|kv| (kv.key.to_string(), attribute_value(&kv.value)))
        .collect();
    JsonValue::Object(map)
}

fn attribute_value(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => json!(b),
        Value::I64(i) => json!(i),
        Value::F64(f) => json!(f),
        Value::String(s) => json!(s.as_str()),
        Value::Array(_) => json!(format!("{value}")),
    }
}

impl std::fmt::Debug for SpanFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanFormatter")
            .field("service", &self.service)
            .finish()
    }
}
