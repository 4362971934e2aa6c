//! Tracing export to a rotating JSON-lines file.
//!
//! ```text
//! tracing → tracing-opentelemetry → OpenTelemetry SDK → FileSpanExporter → flashdeck-trace.jsonl
//! ```
//!
//! The file lives in the plugin data directory and rotates at 5 MiB, keeping
//! three numbered backups. The level comes from the `trace_level` plugin
//! option and defaults to `info`.
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`tracer`]: Tracer provider with the file exporter
//! - [`span_formatter`]: Span to JSON conversion
//! - [`file_writer`]: Rotating file writer

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use init::{init_tracing, TRACE_FILE_NAME};
