use std::error::Error;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};

use parking_lot::Mutex;

use crate::format;
use crate::level::LogLevel;
use crate::sink::{LogContext, LogSink};

/// Built-in fallback sink used when the registry is empty.
///
/// Writes one line per record to a generic text output stream (stderr by
/// default), rendered with the crate's own template formatter:
/// `[category] message` or `[category/context] message`.
pub struct ConsoleSink {
    minimum: AtomicU8,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    /// Console sink writing to stderr, accepting Information and above.
    #[must_use]
    pub fn new() -> Self {
        Self::with_writer(Box::new(io::stderr()))
    }

    /// Console sink writing to an arbitrary stream.
    #[must_use]
    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            minimum: AtomicU8::new(LogLevel::Information as u8),
            out: Mutex::new(out),
        }
    }

    fn write_line(&self, message: &str, category: &str, context: Option<&dyn LogContext>) {
        // Static templates with matching arity; the formatter cannot fail here.
        let line = match context {
            Some(ctx) => {
                let ctx = ctx.to_string();
                format::format("[{}/{}] {}", &[category, &ctx, message])
            }
            None => format::format("[{}] {}", &[category, message]),
        };
        let Ok(line) = line else { return };

        let mut out = self.out.lock();
        let _ = writeln!(out, "{line}");
        let _ = out.flush();
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for ConsoleSink {
    fn minimum_level(&self) -> LogLevel {
        LogLevel::from_u8(self.minimum.load(Ordering::Relaxed))
    }

    fn set_minimum_level(&self, level: LogLevel) {
        self.minimum.store(level as u8, Ordering::Relaxed);
    }

    fn message(&self, message: &str, category: &str, context: Option<&dyn LogContext>, _level: LogLevel) {
        self.write_line(message, category, context);
    }

    fn exception(
        &self,
        error: Option<&(dyn Error + 'static)>,
        category: &str,
        context: Option<&dyn LogContext>,
        _level: LogLevel,
    ) {
        // An absent error still produces a record.
        let text = error.map_or_else(|| "(none)".to_string(), ToString::to_string);
        self.write_line(&text, category, context);
    }
}
