use std::fmt;
use std::str::FromStr;

/// Defines the severity levels for log messages.
///
/// The ordering is total and numeric: `Trace < Debug < Information < Warning
/// < Error < Critical < None`. [`LogLevel::None`] is a filter threshold only
/// ("never emit") and is never used as the level of an emitted message.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Designates very fine-grained informational events.
    Trace,
    /// Designates fine-grained informational events that are most useful to debug an application.
    Debug,
    /// Designates informational messages that highlight the progress of the application at coarse-grained level.
    Information,
    /// Designates potentially harmful situations.
    Warning,
    /// Designates error events that might still allow the application to continue running.
    Error,
    /// Designates very severe error events that will presumably lead the application to abort.
    Critical,
    /// Filter threshold meaning "never emit". Not a valid level for a message.
    None,
}

impl LogLevel {
    /// Recovers a level from its `#[repr(u8)]` discriminant.
    ///
    /// For sinks that keep their threshold in an `AtomicU8`: store
    /// `level as u8`, load back through here. Out-of-range values map to
    /// [`LogLevel::None`].
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Trace,
            1 => Self::Debug,
            2 => Self::Information,
            3 => Self::Warning,
            4 => Self::Error,
            5 => Self::Critical,
            _ => Self::None,
        }
    }

    /// Returns the canonical name of the level (e.g. `"Information"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "Trace",
            Self::Debug => "Debug",
            Self::Information => "Information",
            Self::Warning => "Warning",
            Self::Error => "Error",
            Self::Critical => "Critical",
            Self::None => "None",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized level name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(pub String);

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized log level: {:?}", self.0)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    /// Case-insensitive parse used by the category config loader.
    /// Accepts the short aliases `info`, `warn` and `crit`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "information" | "info" => Ok(Self::Information),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "critical" | "crit" => Ok(Self::Critical),
            "none" => Ok(Self::None),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}
