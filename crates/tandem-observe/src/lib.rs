//! Observability helpers for Tandem.
//!
//! Tracing subscriber initialization (structured fmt logging with optional
//! OpenTelemetry trace export) plus GenAI semantic-convention attribute
//! constants and the span helper the provider adapters wrap their calls
//! in.

pub mod genai_attrs;
pub mod tracing_setup;
