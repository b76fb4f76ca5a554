//! Leveled logging macros over the process-wide [`Logger`](crate::Logger).
//!
//! # Feature Flags
//! Specific log levels are controlled by cargo features:
//! `log-trace`, `log-debug`, `log-info`, `log-warn`, `log-error`,
//! `log-critical`.
//!
//! If a feature is disabled, the corresponding macros expand to `()`,
//! removing all formatting and allocation overhead at compile time.
//!
//! The message text is only built when some sink could accept the call, so
//! fully filtered calls cost no allocation at runtime either.

#[macro_export]
macro_rules! log_at {
    ($lvl:expr, $cat:expr; $($arg:tt)+) => {{
        let __logger = $crate::global();
        if __logger.would_deliver($lvl, $cat) {
            let __msg = format!($($arg)+);
            __logger.message(&__msg, $cat, ::core::option::Option::None, $lvl);
        }
    }};
    ($lvl:expr, $($arg:tt)+) => {
        $crate::log_at!($lvl, ""; $($arg)+)
    };
}

// ---------------------- TRACE ----------------------
#[cfg(feature = "log-trace")]
#[macro_export]
macro_rules! log_trace { ($($arg:tt)+) => { $crate::log_at!($crate::LogLevel::Trace, $($arg)+) } }

#[cfg(not(feature = "log-trace"))]
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {
        ()
    };
}

// ---------------------- DEBUG ----------------------
#[cfg(feature = "log-debug")]
#[macro_export]
macro_rules! log_debug { ($($arg:tt)+) => { $crate::log_at!($crate::LogLevel::Debug, $($arg)+) } }

#[cfg(not(feature = "log-debug"))]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        ()
    };
}

// ---------------------- INFO ----------------------
#[cfg(feature = "log-info")]
#[macro_export]
macro_rules! log_info { ($($arg:tt)+) => { $crate::log_at!($crate::LogLevel::Information, $($arg)+) } }

#[cfg(not(feature = "log-info"))]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        ()
    };
}

// ---------------------- WARN ----------------------
#[cfg(feature = "log-warn")]
#[macro_export]
macro_rules! log_warn { ($($arg:tt)+) => { $crate::log_at!($crate::LogLevel::Warning, $($arg)+) } }

#[cfg(not(feature = "log-warn"))]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        ()
    };
}

// ---------------------- ERROR ----------------------
#[cfg(feature = "log-error")]
#[macro_export]
macro_rules! log_error { ($($arg:tt)+) => { $crate::log_at!($crate::LogLevel::Error, $($arg)+) } }

#[cfg(not(feature = "log-error"))]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        ()
    };
}

// ---------------------- CRITICAL ----------------------
// Generally always enabled, but consistent structure allows user to disable if really needed.
#[cfg(feature = "log-critical")]
#[macro_export]
macro_rules! log_critical { ($($arg:tt)+) => { $crate::log_at!($crate::LogLevel::Critical, $($arg)+) } }

#[cfg(not(feature = "log-critical"))]
#[macro_export]
macro_rules! log_critical {
    ($($arg:tt)*) => {
        ()
    };
}
