//! Audit sinks for user-management records.
//!
//! Records are written once and never rewritten. The server writes to a JSON
//! lines file when `audit_log_path` is configured and to the `audit` tracing
//! target otherwise.

mod json_lines;
mod tracing_sink;

pub use json_lines::JsonLinesAuditSink;
pub use tracing_sink::TracingAuditSink;
