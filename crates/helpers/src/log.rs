//! A labelled logger gated by the `TWILIO_DEBUG` flag
//!
//! `info` and `warn` only emit when the flag was on when the logger was built;
//! `error` always emits. Every line has the form
//! `<timestamp> [<label>] <LEVEL>: <message>`.

use runtime_helpers_common::iso_timestamp;
use std::sync::Arc;
use tracing::Level;

use crate::context::Context;

/// Destination for formatted log lines
pub trait LogSink: Send + Sync {
    fn emit(&self, level: Level, line: &str);
}

/// Standard output for `INFO`, standard error for everything else
#[derive(Debug, Clone, Copy, Default)]
pub struct Console;

impl LogSink for Console {
    fn emit(&self, level: Level, line: &str) {
        if level == Level::INFO {
            println!("{}", line);
        } else {
            eprintln!("{}", line);
        }
    }
}

/// Forward lines to the process-wide `tracing` subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, level: Level, line: &str) {
        match level {
            Level::ERROR => tracing::error!(target: "function", "{}", line),
            Level::WARN => tracing::warn!(target: "function", "{}", line),
            _ => tracing::info!(target: "function", "{}", line),
        }
    }
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    fn emit(&self, level: Level, line: &str) {
        (**self).emit(level, line)
    }
}

#[derive(Debug, Clone)]
pub struct Logger<S: LogSink = Console> {
    label: String,
    debug: bool,
    sink: S,
}

impl Logger<Console> {
    /// A console logger for `label`, enabled per the context's debug flag
    pub fn new(ctx: &Context, label: impl Into<String>) -> Self {
        Self::with_sink(ctx, label, Console)
    }
}

impl<S: LogSink> Logger<S> {
    pub fn with_sink(ctx: &Context, label: impl Into<String>, sink: S) -> Self {
        Self {
            label: label.into(),
            debug: ctx.is_debug(),
            sink,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.debug
    }

    pub fn info(&self, message: &str) {
        if self.debug {
            self.sink.emit(Level::INFO, &self.format("INFO", message));
        }
    }

    pub fn warn(&self, message: &str) {
        if self.debug {
            self.sink.emit(Level::WARN, &self.format("WARN", message));
        }
    }

    pub fn error(&self, message: &str) {
        self.sink.emit(Level::ERROR, &self.format("ERROR", message));
    }

    fn format(&self, level: &str, message: &str) -> String {
        format!("{} [{}] {}: {}", iso_timestamp(), self.label, level, message)
    }
}
