use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::sink::LogSink;

/// Errors raised by registry mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// The supplied sink reference is dead (its owner already dropped it).
    NullSink,
    /// Unregister was called on a sink that is not currently registered.
    NotRegistered,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullSink => write!(f, "sink reference is dead"),
            Self::NotRegistered => write!(f, "sink is not registered"),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Thread-safe collection of registered sinks with identity-based
/// uniqueness.
///
/// The registry holds non-owning [`Weak`] references: a sink stays owned by
/// whoever registered it, and unregistering (or dropping the owner) breaks
/// the link without affecting the sink's lifetime. Membership is compared
/// by allocation identity, never by configuration.
///
/// Dispatch works on a snapshot taken under a short read lock, so
/// registration from other threads can interleave freely and the lock is
/// never held across a call into sink code.
pub struct SinkRegistry {
    sinks: RwLock<Vec<Weak<dyn LogSink>>>,
}

impl Default for SinkRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SinkRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sinks: RwLock::new(Vec::new()),
        }
    }

    /// Registers a sink. Registering the same instance again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NullSink`] if `sink` can no longer be
    /// upgraded (the owning `Arc` was dropped).
    pub fn register(&self, sink: Weak<dyn LogSink>) -> Result<(), RegistryError> {
        self.insert(sink).map(|_| ())
    }

    /// Registers a sink, reporting whether it was newly added.
    ///
    /// Returns `Ok(false)` (not an error) if the sink was already present.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NullSink`] if `sink` is dead.
    pub fn try_register(&self, sink: Weak<dyn LogSink>) -> Result<bool, RegistryError> {
        self.insert(sink)
    }

    /// Removes a sink. Registry state is unchanged on failure.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NullSink`] if `sink` is dead, or
    /// [`RegistryError::NotRegistered`] if it was never registered.
    pub fn unregister(&self, sink: &Weak<dyn LogSink>) -> Result<(), RegistryError> {
        if sink.upgrade().is_none() {
            return Err(RegistryError::NullSink);
        }

        let mut sinks = self.sinks.write();
        let before = sinks.len();
        sinks.retain(|registered| !Weak::ptr_eq(registered, sink));
        if sinks.len() == before {
            return Err(RegistryError::NotRegistered);
        }
        Ok(())
    }

    /// Number of live registered sinks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks
            .read()
            .iter()
            .filter(|sink| sink.strong_count() > 0)
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stable snapshot of the live sinks for one dispatch iteration.
    ///
    /// Entries whose owner has gone away are skipped; they are physically
    /// pruned on the next mutation, not here.
    pub(crate) fn snapshot(&self) -> Vec<Arc<dyn LogSink>> {
        self.sinks.read().iter().filter_map(Weak::upgrade).collect()
    }

    fn insert(&self, sink: Weak<dyn LogSink>) -> Result<bool, RegistryError> {
        if sink.upgrade().is_none() {
            return Err(RegistryError::NullSink);
        }

        let mut sinks = self.sinks.write();
        sinks.retain(|registered| registered.strong_count() > 0);
        if sinks.iter().any(|registered| Weak::ptr_eq(registered, &sink)) {
            return Ok(false);
        }
        sinks.push(sink);
        Ok(true)
    }
}
