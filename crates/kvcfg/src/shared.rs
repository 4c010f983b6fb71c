//! Serialized access to one store from several threads
//!
//! The store has no internal locking. `SharedConfigStore` puts it behind a
//! mutex so each caller holds it exclusively for the duration of a call.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::error::Result;
use crate::store::ConfigStore;

/// Cloneable handle to a mutex-guarded [`ConfigStore`]
#[derive(Debug, Clone)]
pub struct SharedConfigStore {
    inner: Arc<Mutex<ConfigStore>>,
}

impl SharedConfigStore {
    /// Wrap an existing store
    pub fn new(store: ConfigStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Create an initialized store and wrap it
    pub fn with_capacity(cache_capacity: Option<usize>) -> Result<Self> {
        Ok(Self::new(ConfigStore::new(cache_capacity)?))
    }

    /// Take exclusive access
    pub fn lock(&self) -> MutexGuard<'_, ConfigStore> {
        self.inner.lock()
    }

    /// Run `f` with exclusive access
    pub fn with<T>(&self, f: impl FnOnce(&mut ConfigStore) -> T) -> T {
        f(&mut self.inner.lock())
    }

    /// Owned copy of the value for `key`
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        self.with(|store| Ok(store.get(key)?.map(str::to_string)))
    }
}
