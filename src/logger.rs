use std::error::Error;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::category::CategoryLevels;
use crate::console::ConsoleSink;
use crate::format::{self, FormatError};
use crate::level::LogLevel;
use crate::registry::{RegistryError, SinkRegistry};
use crate::sink::{LogContext, LogSink};

/// What a single log call carries to qualifying sinks.
enum Payload<'a> {
    Message(&'a str),
    Exception(Option<&'a (dyn Error + 'static)>),
}

/// Filters and fans log calls out to every qualifying sink.
///
/// A `Logger` owns its [`SinkRegistry`] and a single default sink used only
/// while the registry is empty. It is explicitly constructed and injectable;
/// a process-wide instance is available via [`global`](crate::global).
///
/// Per call: drop [`LogLevel::None`], apply the category gate, then deliver
/// to every live sink whose minimum level is met. Delivery order across
/// sinks is unspecified, and a panicking sink does not suppress delivery to
/// the others.
pub struct Logger {
    registry: SinkRegistry,
    default_sink: Arc<dyn LogSink>,
    categories: RwLock<Option<CategoryLevels>>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Logger with an empty registry and a [`ConsoleSink`] fallback.
    #[must_use]
    pub fn new() -> Self {
        Self::with_default_sink(Arc::new(ConsoleSink::new()))
    }

    /// Logger with a custom fallback sink for the empty-registry case.
    #[must_use]
    pub fn with_default_sink(default_sink: Arc<dyn LogSink>) -> Self {
        Self {
            registry: SinkRegistry::new(),
            default_sink,
            categories: RwLock::new(None),
        }
    }

    /// The sink used while the registry is empty.
    #[must_use]
    pub fn default_sink(&self) -> &Arc<dyn LogSink> {
        &self.default_sink
    }

    /// Direct access to the sink registry.
    #[must_use]
    pub const fn registry(&self) -> &SinkRegistry {
        &self.registry
    }

    /// Installs (or clears) the per-category minimum levels consulted
    /// before each delivery.
    pub fn set_categories(&self, categories: Option<CategoryLevels>) {
        *self.categories.write() = categories;
    }

    /// Registers a sink. See [`SinkRegistry::register`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NullSink`] for a dead reference.
    pub fn register(&self, sink: Weak<dyn LogSink>) -> Result<(), RegistryError> {
        self.registry.register(sink)
    }

    /// Registers a sink, reporting whether it was newly added. See
    /// [`SinkRegistry::try_register`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NullSink`] for a dead reference.
    pub fn try_register(&self, sink: Weak<dyn LogSink>) -> Result<bool, RegistryError> {
        self.registry.try_register(sink)
    }

    /// Unregisters a sink. See [`SinkRegistry::unregister`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NullSink`] for a dead reference or
    /// [`RegistryError::NotRegistered`] for an unknown one.
    pub fn unregister(&self, sink: &Weak<dyn LogSink>) -> Result<(), RegistryError> {
        self.registry.unregister(sink)
    }

    /// Logs an already-materialized message.
    pub fn message(&self, message: &str, category: &str, context: Option<&dyn LogContext>, level: LogLevel) {
        self.dispatch(&Payload::Message(message), category, context, level);
    }

    /// Logs an error value. `None` still produces a record at each sink.
    pub fn exception(
        &self,
        error: Option<&(dyn Error + 'static)>,
        category: &str,
        context: Option<&dyn LogContext>,
        level: LogLevel,
    ) {
        self.dispatch(&Payload::Exception(error), category, context, level);
    }

    /// Formats a template and logs the result.
    ///
    /// The message is materialized only if some sink (or the default-sink
    /// fallback) could accept a call at this level, so a fully filtered call
    /// costs no allocation.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::ArgumentCountMismatch`] from the formatter;
    /// nothing is delivered in that case.
    pub fn format(
        &self,
        template: &str,
        args: &[&str],
        category: &str,
        context: Option<&dyn LogContext>,
        level: LogLevel,
    ) -> Result<(), FormatError> {
        if !self.would_deliver(level, category) {
            return Ok(());
        }
        let message = format::format(template, args)?;
        self.message(&message, category, context, level);
        Ok(())
    }

    /// [`format`](Self::format) over optional argument slots; absent slots
    /// substitute zero-length text.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::ArgumentCountMismatch`] from the formatter.
    pub fn format_opt(
        &self,
        template: &str,
        args: &[Option<&str>],
        category: &str,
        context: Option<&dyn LogContext>,
        level: LogLevel,
    ) -> Result<(), FormatError> {
        if !self.would_deliver(level, category) {
            return Ok(());
        }
        let message = format::format_opt(template, args)?;
        self.message(&message, category, context, level);
        Ok(())
    }

    /// Whether a call at `level` under `category` could currently reach at
    /// least one sink. Used to skip formatting for fully filtered calls.
    #[must_use]
    pub fn would_deliver(&self, level: LogLevel, category: &str) -> bool {
        if level == LogLevel::None || !self.category_allows(category, level) {
            return false;
        }
        let sinks = self.registry.snapshot();
        if sinks.is_empty() {
            level >= self.default_sink.minimum_level()
        } else {
            sinks.iter().any(|sink| level >= sink.minimum_level())
        }
    }

    /// Logs a Trace message.
    pub fn trace(&self, message: &str, category: &str, context: Option<&dyn LogContext>) {
        self.message(message, category, context, LogLevel::Trace);
    }

    /// Logs a Debug message.
    pub fn debug(&self, message: &str, category: &str, context: Option<&dyn LogContext>) {
        self.message(message, category, context, LogLevel::Debug);
    }

    /// Logs an Information message.
    pub fn information(&self, message: &str, category: &str, context: Option<&dyn LogContext>) {
        self.message(message, category, context, LogLevel::Information);
    }

    /// Logs a Warning message.
    pub fn warning(&self, message: &str, category: &str, context: Option<&dyn LogContext>) {
        self.message(message, category, context, LogLevel::Warning);
    }

    /// Logs an Error message.
    pub fn error(&self, message: &str, category: &str, context: Option<&dyn LogContext>) {
        self.message(message, category, context, LogLevel::Error);
    }

    /// Logs a Critical message.
    pub fn critical(&self, message: &str, category: &str, context: Option<&dyn LogContext>) {
        self.message(message, category, context, LogLevel::Critical);
    }

    fn category_allows(&self, category: &str, level: LogLevel) -> bool {
        self.categories
            .read()
            .as_ref()
            .is_none_or(|table| table.allows(category, level))
    }

    fn dispatch(&self, payload: &Payload<'_>, category: &str, context: Option<&dyn LogContext>, level: LogLevel) {
        // None is a filter threshold, never an emitted level.
        if level == LogLevel::None {
            return;
        }
        if !self.category_allows(category, level) {
            return;
        }

        let sinks = self.registry.snapshot();
        if sinks.is_empty() {
            if level >= self.default_sink.minimum_level() {
                Self::deliver(self.default_sink.as_ref(), payload, category, context, level);
            }
            return;
        }

        for sink in &sinks {
            if level >= sink.minimum_level() {
                Self::deliver(sink.as_ref(), payload, category, context, level);
            }
        }
    }

    fn deliver(
        sink: &dyn LogSink,
        payload: &Payload<'_>,
        category: &str,
        context: Option<&dyn LogContext>,
        level: LogLevel,
    ) {
        // A panicking sink must not suppress delivery to the others.
        let _ = panic::catch_unwind(AssertUnwindSafe(|| match payload {
            Payload::Message(message) => sink.message(message, category, context, level),
            Payload::Exception(error) => sink.exception(*error, category, context, level),
        }));
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::category::UnknownCategoryPolicy;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicU8, Ordering};

    struct RecordingSink {
        minimum: AtomicU8,
        messages: Mutex<Vec<(String, String, LogLevel)>>,
        exceptions: Mutex<Vec<Option<String>>>,
    }

    impl RecordingSink {
        fn with_minimum(level: LogLevel) -> Arc<Self> {
            Arc::new(Self {
                minimum: AtomicU8::new(level as u8),
                messages: Mutex::new(Vec::new()),
                exceptions: Mutex::new(Vec::new()),
            })
        }

        fn message_count(&self) -> usize {
            self.messages.lock().len()
        }
    }

    impl LogSink for RecordingSink {
        fn minimum_level(&self) -> LogLevel {
            LogLevel::from_u8(self.minimum.load(Ordering::Relaxed))
        }

        fn set_minimum_level(&self, level: LogLevel) {
            self.minimum.store(level as u8, Ordering::Relaxed);
        }

        fn message(&self, message: &str, category: &str, _context: Option<&dyn LogContext>, level: LogLevel) {
            self.messages
                .lock()
                .push((message.to_string(), category.to_string(), level));
        }

        fn exception(
            &self,
            error: Option<&(dyn Error + 'static)>,
            _category: &str,
            _context: Option<&dyn LogContext>,
            _level: LogLevel,
        ) {
            self.exceptions.lock().push(error.map(ToString::to_string));
        }
    }

    struct PanickingSink;

    impl LogSink for PanickingSink {
        fn minimum_level(&self) -> LogLevel {
            LogLevel::Trace
        }

        fn set_minimum_level(&self, _level: LogLevel) {}

        fn message(&self, _message: &str, _category: &str, _context: Option<&dyn LogContext>, _level: LogLevel) {
            panic!("broken sink");
        }

        fn exception(
            &self,
            _error: Option<&(dyn Error + 'static)>,
            _category: &str,
            _context: Option<&dyn LogContext>,
            _level: LogLevel,
        ) {
            panic!("broken sink");
        }
    }

    fn register(logger: &Logger, sink: &Arc<RecordingSink>) {
        let weak: Weak<RecordingSink> = Arc::downgrade(sink);
        logger.register(weak).unwrap();
    }

    #[test]
    fn severity_gates_fan_out_per_sink() {
        let logger = Logger::with_default_sink(Arc::new(crate::noop_sink::NoopSink));
        let info_sink = RecordingSink::with_minimum(LogLevel::Information);
        let error_sink = RecordingSink::with_minimum(LogLevel::Error);
        register(&logger, &info_sink);
        register(&logger, &error_sink);

        logger.message("warned", "", None, LogLevel::Warning);
        assert_eq!(info_sink.message_count(), 1);
        assert_eq!(error_sink.message_count(), 0);

        logger.message("failed", "", None, LogLevel::Error);
        assert_eq!(info_sink.message_count(), 2);
        assert_eq!(error_sink.message_count(), 1);
    }

    #[test]
    fn empty_registry_falls_back_to_exactly_one_default_delivery() {
        let default = RecordingSink::with_minimum(LogLevel::Information);
        let logger = Logger::with_default_sink(default.clone());

        logger.message("visible", "", None, LogLevel::Warning);
        assert_eq!(default.message_count(), 1);

        logger.message("filtered", "", None, LogLevel::Debug);
        assert_eq!(default.message_count(), 1);
    }

    #[test]
    fn default_sink_is_bypassed_once_a_sink_is_registered() {
        let default = RecordingSink::with_minimum(LogLevel::Trace);
        let logger = Logger::with_default_sink(default.clone());
        let sink = RecordingSink::with_minimum(LogLevel::Trace);
        register(&logger, &sink);

        logger.message("routed", "", None, LogLevel::Information);
        assert_eq!(default.message_count(), 0);
        assert_eq!(sink.message_count(), 1);
    }

    #[test]
    fn dropping_the_last_sink_restores_the_fallback() {
        let default = RecordingSink::with_minimum(LogLevel::Trace);
        let logger = Logger::with_default_sink(default.clone());
        let sink = RecordingSink::with_minimum(LogLevel::Trace);
        register(&logger, &sink);
        drop(sink);

        logger.message("back to default", "", None, LogLevel::Information);
        assert_eq!(default.message_count(), 1);
    }

    #[test]
    fn none_level_calls_are_dropped() {
        let sink = RecordingSink::with_minimum(LogLevel::Trace);
        let logger = Logger::with_default_sink(sink.clone());

        logger.message("never", "", None, LogLevel::None);
        assert_eq!(sink.message_count(), 0);
    }

    #[test]
    fn category_gate_applies_before_delivery() {
        let sink = RecordingSink::with_minimum(LogLevel::Trace);
        let logger = Logger::with_default_sink(sink.clone());

        let mut table = CategoryLevels::new();
        table.set("audio", LogLevel::Error);
        logger.set_categories(Some(table));

        logger.message("quiet", "Audio", None, LogLevel::Warning);
        assert_eq!(sink.message_count(), 0);

        logger.message("loud", "Audio", None, LogLevel::Error);
        assert_eq!(sink.message_count(), 1);

        // Unknown categories follow the Allow default.
        logger.message("other", "Video", None, LogLevel::Debug);
        assert_eq!(sink.message_count(), 2);
    }

    #[test]
    fn deny_policy_filters_unknown_categories() {
        let sink = RecordingSink::with_minimum(LogLevel::Trace);
        let logger = Logger::with_default_sink(sink.clone());
        logger.set_categories(Some(CategoryLevels::with_policy(UnknownCategoryPolicy::Deny)));

        logger.message("dropped", "Mystery", None, LogLevel::Critical);
        assert_eq!(sink.message_count(), 0);
    }

    #[test]
    fn format_skips_materialization_when_nothing_would_deliver() {
        let sink = RecordingSink::with_minimum(LogLevel::Error);
        let logger = Logger::with_default_sink(sink.clone());

        // The template is invalid for zero arguments, but the call is fully
        // filtered so the formatter never runs.
        logger.format("{}", &[], "", None, LogLevel::Debug).unwrap();
        assert_eq!(sink.message_count(), 0);

        // At a deliverable level the same call surfaces the mismatch.
        let err = logger.format("{}", &[], "", None, LogLevel::Error).unwrap_err();
        assert!(matches!(err, FormatError::ArgumentCountMismatch { .. }));
        assert_eq!(sink.message_count(), 0);
    }

    #[test]
    fn format_delivers_the_materialized_message() {
        let sink = RecordingSink::with_minimum(LogLevel::Trace);
        let logger = Logger::with_default_sink(sink.clone());

        logger
            .format("{} -> {}", &["a", "b"], "Net", None, LogLevel::Information)
            .unwrap();
        let messages = sink.messages.lock();
        assert_eq!(messages.as_slice(), &[(
            "a -> b".to_string(),
            "Net".to_string(),
            LogLevel::Information
        )]);
    }

    #[test]
    fn format_opt_substitutes_absent_slots() {
        let sink = RecordingSink::with_minimum(LogLevel::Trace);
        let logger = Logger::with_default_sink(sink.clone());

        logger
            .format_opt("[{}] {}", &[None, Some("up")], "", None, LogLevel::Information)
            .unwrap();
        assert_eq!(sink.messages.lock()[0].0, "[] up");
    }

    #[test]
    fn a_panicking_sink_does_not_suppress_the_others() {
        let logger = Logger::with_default_sink(Arc::new(crate::noop_sink::NoopSink));
        let broken: Arc<dyn LogSink> = Arc::new(PanickingSink);
        let healthy = RecordingSink::with_minimum(LogLevel::Trace);
        logger.register(Arc::downgrade(&broken)).unwrap();
        register(&logger, &healthy);

        logger.message("survives", "", None, LogLevel::Information);
        assert_eq!(healthy.message_count(), 1);
    }

    #[test]
    fn level_helpers_stamp_the_matching_level() {
        let sink = RecordingSink::with_minimum(LogLevel::Trace);
        let logger = Logger::with_default_sink(sink.clone());

        logger.trace("t", "", None);
        logger.debug("d", "", None);
        logger.information("i", "", None);
        logger.warning("w", "", None);
        logger.error("e", "", None);
        logger.critical("c", "", None);

        let levels: Vec<LogLevel> = sink.messages.lock().iter().map(|r| r.2).collect();
        assert_eq!(
            levels,
            vec![
                LogLevel::Trace,
                LogLevel::Debug,
                LogLevel::Information,
                LogLevel::Warning,
                LogLevel::Error,
                LogLevel::Critical,
            ]
        );
    }

    #[test]
    fn default_sink_threshold_is_adjustable_through_the_accessor() {
        let default = RecordingSink::with_minimum(LogLevel::Information);
        let logger = Logger::with_default_sink(default.clone());

        logger.default_sink().set_minimum_level(LogLevel::Error);
        logger.message("filtered", "", None, LogLevel::Warning);
        assert_eq!(default.message_count(), 0);
        assert!(!logger.would_deliver(LogLevel::Warning, ""));
        assert!(logger.would_deliver(LogLevel::Error, ""));
    }

    #[test]
    fn exception_with_absent_error_is_still_delivered() {
        let sink = RecordingSink::with_minimum(LogLevel::Trace);
        let logger = Logger::with_default_sink(sink.clone());

        logger.exception(None, "", None, LogLevel::Error);
        assert_eq!(sink.exceptions.lock().as_slice(), &[None]);
    }
}
