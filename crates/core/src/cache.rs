use once_cell::sync::Lazy;
use std::sync::{Mutex, MutexGuard};

use crate::services::portfolio_service::PortfolioSnapshot;

/// A memoized value with manual invalidation.
///
/// Readers get a clone, so whatever they do to it never reaches the cached
/// copy. The value stays until [`invalidate`](Self::invalidate) is called.
#[derive(Debug, Default)]
pub struct LoadCache<T> {
    slot: Mutex<Option<T>>,
}

impl<T: Clone> LoadCache<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// A clone of the cached value, if one is stored.
    pub fn get(&self) -> Option<T> {
        self.lock().clone()
    }

    pub fn store(&self, value: T) {
        *self.lock() = Some(value);
    }

    /// Drop the cached value. Returns whether there was one.
    pub fn invalidate(&self) -> bool {
        self.lock().take().is_some()
    }

    pub fn is_loaded(&self) -> bool {
        self.lock().is_some()
    }

    // Poisoning is ignored: the slot only ever holds a whole value or None.
    fn lock(&self) -> MutexGuard<'_, Option<T>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// The process-wide snapshot cache used by [`crate::Dashboard::load_cached`].
pub static SNAPSHOT_CACHE: Lazy<LoadCache<PortfolioSnapshot>> = Lazy::new(LoadCache::new);
