//! Event Sink Implementations
//!
//! Provides concrete implementations of ConvergeEventSink:
//! - JsonEventSink: NDJSON output for CI/automation
//! - ConsoleEventSink: Human-readable progress

mod console;
mod json;

pub use console::ConsoleEventSink;
pub use json::JsonEventSink;
