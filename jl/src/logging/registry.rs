//! Lazily-initialized holder for the single [`LoggerHandle`].

use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use super::LoggerHandle;

static GLOBAL: LoggerRegistry = LoggerRegistry::new();

/// The process-wide registry behind [`super::init`] and [`super::logger`].
pub fn global() -> &'static LoggerRegistry {
    &GLOBAL
}

/// Owns at most one [`LoggerHandle`].
///
/// Construction uses double-checked locking: an unlocked `OnceLock` read on
/// the fast path, then the init lock and a second check before running the
/// configuration closure. The closure runs at most once successfully no
/// matter how many threads race on first access.
#[derive(Debug)]
pub struct LoggerRegistry {
    handle: OnceLock<Arc<LoggerHandle>>,
    init_lock: Mutex<()>,
    configurations: AtomicUsize,
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerRegistry {
    pub const fn new() -> Self {
        Self {
            handle: OnceLock::new(),
            init_lock: Mutex::new(()),
            configurations: AtomicUsize::new(0),
        }
    }

    /// The handle, if one has been configured.
    pub fn get(&self) -> Option<Arc<LoggerHandle>> {
        self.handle.get().cloned()
    }

    /// Return the handle, running `configure` if this is the first access.
    ///
    /// A failed configuration leaves the registry empty; the error is
    /// returned to the caller that ran it.
    pub fn get_or_try_init<E>(
        &self,
        configure: impl FnOnce() -> Result<LoggerHandle, E>,
    ) -> Result<Arc<LoggerHandle>, E> {
        if let Some(handle) = self.handle.get() {
            return Ok(Arc::clone(handle));
        }

        // The lock guards no data, so a panic in another configuration pass
        // leaves nothing inconsistent behind.
        let _guard = self.init_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = self.handle.get() {
            return Ok(Arc::clone(handle));
        }

        let handle = Arc::new(configure()?);
        self.configurations.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::clone(self.handle.get_or_init(|| handle)))
    }

    pub fn get_or_init(&self, configure: impl FnOnce() -> LoggerHandle) -> Arc<LoggerHandle> {
        match self.get_or_try_init(|| Ok::<_, Infallible>(configure())) {
            Ok(handle) => handle,
            Err(never) => match never {},
        }
    }

    /// Number of configuration passes that produced a handle (0 or 1).
    pub fn configuration_count(&self) -> usize {
        self.configurations.load(Ordering::SeqCst)
    }
}
