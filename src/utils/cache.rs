//! Process-wide lazily initialised asset slots.

use std::sync::{Arc, PoisonError, RwLock};

/// A value loaded at most once per process and shared immutably afterwards.
///
/// The first caller of [`AssetCache::get_or_init`] runs the initialiser; every
/// later caller receives the same `Arc` until [`AssetCache::invalidate`]
/// empties the slot again.
#[derive(Debug)]
pub struct AssetCache<T> {
    slot: RwLock<Option<Arc<T>>>,
}

impl<T> AssetCache<T> {
    /// Create an empty cache.
    pub const fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Return the cached value, initialising it with `init` on first use.
    ///
    /// Concurrent first callers serialise on the write lock; `init` runs once.
    pub fn get_or_init(&self, init: impl FnOnce() -> T) -> Arc<T> {
        if let Some(value) = self.get() {
            return value;
        }

        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = slot.as_ref() {
            return Arc::clone(value);
        }

        let value = Arc::new(init());
        *slot = Some(Arc::clone(&value));
        value
    }

    /// Return the cached value without initialising it.
    pub fn get(&self) -> Option<Arc<T>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(Arc::clone)
    }

    /// Drop the cached value so the next access reloads it.
    pub fn invalidate(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl<T> Default for AssetCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
