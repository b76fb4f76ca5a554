use std::error::Error;

use crate::level::LogLevel;
use crate::sink::{LogContext, LogSink};

/// Sink that accepts nothing and writes nowhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    #[inline]
    fn minimum_level(&self) -> LogLevel {
        LogLevel::None
    }

    #[inline]
    fn set_minimum_level(&self, _level: LogLevel) {}

    #[inline]
    fn message(&self, _message: &str, _category: &str, _context: Option<&dyn LogContext>, _level: LogLevel) {}

    #[inline]
    fn exception(
        &self,
        _error: Option<&(dyn Error + 'static)>,
        _category: &str,
        _context: Option<&dyn LogContext>,
        _level: LogLevel,
    ) {
    }
}
