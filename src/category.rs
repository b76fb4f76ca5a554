use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::level::LogLevel;

/// What to do with a category that has no configured minimum level.
///
/// The reference behavior is to log anyway, so [`Allow`](Self::Allow) is the
/// default; [`Deny`](Self::Deny) turns the table into an allow-list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownCategoryPolicy {
    #[default]
    Allow,
    Deny,
}

/// Errors raised while loading category configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryConfigError {
    /// The file could not be read.
    Read(String),
    /// A category entry names an unrecognized level.
    BadLevel { line: usize, value: String },
    /// The `unknown` key has a value other than `allow` or `deny`.
    BadPolicy { line: usize, value: String },
}

impl fmt::Display for CategoryConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(reason) => write!(f, "cannot read category config: {reason}"),
            Self::BadLevel { line, value } => {
                write!(f, "line {line}: unrecognized log level {value:?}")
            }
            Self::BadPolicy { line, value } => {
                write!(f, "line {line}: unknown-category policy must be allow or deny, got {value:?}")
            }
        }
    }
}

impl std::error::Error for CategoryConfigError {}

/// Per-category minimum levels supplied by the host, with case-insensitive
/// lookup.
///
/// Installed on a [`Logger`](crate::logger::Logger) this gates calls before
/// any formatting or sink delivery; when absent, only sink thresholds apply.
/// The dispatcher otherwise treats category names as opaque text.
#[derive(Debug, Clone, Default)]
pub struct CategoryLevels {
    levels: HashMap<String, LogLevel>,
    policy: UnknownCategoryPolicy,
}

impl CategoryLevels {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_policy(policy: UnknownCategoryPolicy) -> Self {
        Self {
            levels: HashMap::new(),
            policy,
        }
    }

    /// Sets the minimum level for a category, replacing any previous entry.
    pub fn set(&mut self, category: &str, level: LogLevel) -> &mut Self {
        self.levels.insert(category.to_ascii_lowercase(), level);
        self
    }

    /// The configured minimum level for `category`, if any.
    #[must_use]
    pub fn resolve(&self, category: &str) -> Option<LogLevel> {
        self.levels.get(&category.to_ascii_lowercase()).copied()
    }

    #[must_use]
    pub const fn policy(&self) -> UnknownCategoryPolicy {
        self.policy
    }

    /// Whether a call at `level` under `category` passes the category gate.
    ///
    /// An empty category never has an override and always passes.
    #[must_use]
    pub fn allows(&self, category: &str, level: LogLevel) -> bool {
        if category.is_empty() {
            return true;
        }
        match self.resolve(category) {
            Some(minimum) => level >= minimum,
            None => self.policy == UnknownCategoryPolicy::Allow,
        }
    }

    /// Parses an INI-style category table.
    ///
    /// ```ini
    /// # unknown categories: allow (default) or deny
    /// unknown = allow
    ///
    /// [categories]
    /// Networking = debug
    /// Audio = warning
    /// ```
    ///
    /// Lines outside a recognized key or section are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryConfigError::BadLevel`] or
    /// [`CategoryConfigError::BadPolicy`] with the offending line number.
    pub fn parse(text: &str) -> Result<Self, CategoryConfigError> {
        let mut table = Self::new();
        let mut current_section: Option<String> = None;

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                current_section = Some(line[1..line.len() - 1].to_ascii_lowercase());
                continue;
            }

            let Some(pos) = line.find('=') else { continue };
            let key = line[..pos].trim();
            let value = line[pos + 1..].trim().trim_matches('"');

            match current_section.as_deref() {
                None if key.eq_ignore_ascii_case("unknown") => {
                    table.policy = match value.to_ascii_lowercase().as_str() {
                        "allow" => UnknownCategoryPolicy::Allow,
                        "deny" => UnknownCategoryPolicy::Deny,
                        _ => {
                            return Err(CategoryConfigError::BadPolicy {
                                line: index + 1,
                                value: value.to_string(),
                            });
                        }
                    };
                }
                Some("categories") => {
                    let level = value.parse::<LogLevel>().map_err(|_| {
                        CategoryConfigError::BadLevel {
                            line: index + 1,
                            value: value.to_string(),
                        }
                    })?;
                    table.set(key, level);
                }
                _ => {}
            }
        }

        Ok(table)
    }

    /// Loads a category table from a file via [`parse`](Self::parse).
    ///
    /// # Errors
    ///
    /// Returns [`CategoryConfigError::Read`] if the file cannot be read,
    /// plus any [`parse`](Self::parse) error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CategoryConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| CategoryConfigError::Read(format!("{}: {e}", path.display())))?;
        Self::parse(&text)
    }
}
