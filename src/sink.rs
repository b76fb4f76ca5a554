use std::error::Error;
use std::fmt;

use crate::level::LogLevel;

/// Opaque caller-supplied correlation data attached to a log call.
///
/// The dispatch core never inspects it; it is passed through to sinks
/// unmodified. The `Display` bound exists so sinks that render text (like
/// [`ConsoleSink`](crate::console::ConsoleSink)) can include it in output.
pub trait LogContext: fmt::Display + Send + Sync {}

impl<T: fmt::Display + Send + Sync> LogContext for T {}

/// A consumer of formatted log output.
///
/// Implementations are registered with a [`SinkRegistry`](crate::registry::SinkRegistry)
/// and receive every message or error whose level meets their threshold.
/// The dispatcher performs the `level >= minimum_level()` check before
/// delivery; sinks do not need to re-check it.
///
/// Two sink instances are distinct even if configured identically; registry
/// membership is by identity, not by configuration.
pub trait LogSink: Send + Sync {
    /// The minimum level this sink accepts. [`LogLevel::None`] disables it.
    fn minimum_level(&self) -> LogLevel;

    /// Updates the minimum level. Takes `&self`: implementations use
    /// interior mutability so a shared sink can be reconfigured live.
    fn set_minimum_level(&self, level: LogLevel);

    /// Accepts a formatted message.
    fn message(&self, message: &str, category: &str, context: Option<&dyn LogContext>, level: LogLevel);

    /// Accepts an error value. An absent (`None`) error must still produce
    /// a record, not a no-op.
    fn exception(
        &self,
        error: Option<&(dyn Error + 'static)>,
        category: &str,
        context: Option<&dyn LogContext>,
        level: LogLevel,
    );
}
