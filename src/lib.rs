//! fanlog is a leveled, categorized logging facade with multi-sink fan-out.
//!
//! Callers log through a [`Logger`] (or the process-wide [`global`] one)
//! without coupling to a specific output: registered [`LogSink`]s each carry
//! their own minimum [`LogLevel`], and every call is filtered per sink and
//! fanned out to the ones that qualify. While no sink is registered, a
//! single [`ConsoleSink`] fallback receives output.
//!
//! Messages built from templates use a two-pass formatter ([`format`]) that
//! measures the exact output size before allocating a single result buffer,
//! and templates are only materialized when some sink could actually accept
//! the call.

use std::sync::Arc;

use once_cell::sync::Lazy;

/// Case-insensitive per-category minimum levels and the unknown-category policy.
pub mod category;
/// Built-in console/stream sink used while the registry is empty.
pub mod console;
/// Two-pass template formatter.
pub mod format;
/// Severity levels.
pub mod level;
/// The dispatching logger.
pub mod logger;
/// Leveled, feature-gated logging macros.
pub mod macros;
/// Sink that discards everything.
pub mod noop_sink;
/// Thread-safe sink registry.
pub mod registry;
/// The sink and context contracts.
pub mod sink;

pub use category::{CategoryConfigError, CategoryLevels, UnknownCategoryPolicy};
pub use console::ConsoleSink;
pub use format::{FormatError, format, format_opt, measured_len};
pub use level::{LogLevel, ParseLevelError};
pub use logger::Logger;
pub use noop_sink::NoopSink;
pub use registry::{RegistryError, SinkRegistry};
pub use sink::{LogContext, LogSink};

static GLOBAL: Lazy<Logger> = Lazy::new(Logger::new);

/// The process-wide logger used by the `log_*!` macros.
///
/// Libraries that want isolation can construct their own [`Logger`] instead.
#[must_use]
pub fn global() -> &'static Logger {
    &GLOBAL
}

/// Registers a sink with the [`global`] logger.
///
/// # Errors
///
/// Returns [`RegistryError::NullSink`] for a dead reference.
pub fn register(sink: &Arc<dyn LogSink>) -> Result<(), RegistryError> {
    global().register(Arc::downgrade(sink))
}

/// Registers a sink with the [`global`] logger, reporting whether it was
/// newly added.
///
/// # Errors
///
/// Returns [`RegistryError::NullSink`] for a dead reference.
pub fn try_register(sink: &Arc<dyn LogSink>) -> Result<bool, RegistryError> {
    global().try_register(Arc::downgrade(sink))
}

/// Unregisters a sink from the [`global`] logger.
///
/// # Errors
///
/// Returns [`RegistryError::NotRegistered`] if the sink was never
/// registered.
pub fn unregister(sink: &Arc<dyn LogSink>) -> Result<(), RegistryError> {
    global().unregister(&Arc::downgrade(sink))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[test]
    fn global_facade_register_unregister_round_trip() {
        let sink: Arc<dyn LogSink> = Arc::new(NoopSink);

        register(&sink).unwrap();
        assert!(!try_register(&sink).unwrap());
        unregister(&sink).unwrap();
        assert_eq!(
            unregister(&sink).unwrap_err(),
            RegistryError::NotRegistered
        );
    }
}
