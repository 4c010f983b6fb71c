//! Configuration engine
//!
//! `ConfigStore` owns the parsed entries and the lookup cache. Every
//! operation except initialization fails with [`Error::Init`] until the
//! store is initialized, and again after [`ConfigStore::teardown`].
//!
//! Keys and values are matched by hash only; see [`crate::hash`].

use std::path::Path;

use tracing::{debug, trace, warn};

use crate::cache::LookupCache;
use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::escape::unescape;
use crate::hash::hash;
use crate::loader::load_file;
use crate::numeric::{parse_f64, parse_i64, parse_u64};
use crate::parser::parse_entries;
use crate::stats::CacheStats;

/// Cache capacity used when none is requested
pub const DEFAULT_CACHE_CAPACITY: usize = 16;

/// Parsed configuration with a move-to-front lookup cache
#[derive(Debug, Default)]
pub struct ConfigStore {
    /// Entries in source order
    entries: Vec<Entry>,

    /// Recently resolved `(key hash, ordinal)` pairs
    cache: LookupCache,

    /// Cache counters since the last clear
    stats: CacheStats,

    /// Has `init` run since creation or the last teardown?
    initialized: bool,
}

impl ConfigStore {
    /// Create an initialized, empty store
    ///
    /// # Arguments
    /// * `cache_capacity` - Number of cache slots, `None` for
    ///   [`DEFAULT_CACHE_CAPACITY`]; zero disables the cache
    pub fn new(cache_capacity: Option<usize>) -> Result<Self> {
        let mut store = Self::uninit();
        store.init(cache_capacity)?;
        Ok(store)
    }

    /// Create a store that must be initialized before use
    pub fn uninit() -> Self {
        Self::default()
    }

    /// Initialize (or re-initialize) the store, dropping any entries
    pub fn init(&mut self, cache_capacity: Option<usize>) -> Result<()> {
        let capacity = cache_capacity.unwrap_or(DEFAULT_CACHE_CAPACITY);

        self.entries = Vec::new();
        self.stats.reset();
        self.initialized = false;
        self.cache = LookupCache::with_capacity(capacity)?;
        self.initialized = true;

        debug!(cache_capacity = capacity, "initialized config store");
        Ok(())
    }

    /// Is the store initialized?
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn ensure_init(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::Init)
        }
    }

    /// Load and parse a file, replacing all entries
    pub fn parse_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.ensure_init()?;
        let buf = load_file(path.as_ref())?;
        self.parse_buffer(buf)
    }

    /// Parse an in-memory source, replacing all entries
    ///
    /// The previous entries are discarded before parsing, so a failed parse
    /// leaves the store empty rather than half filled. The cache is cleared
    /// after a successful parse.
    pub fn parse_buffer<B: Into<Vec<u8>>>(&mut self, buf: B) -> Result<()> {
        self.ensure_init()?;

        self.entries = Vec::new();
        self.cache.clear();
        self.entries = parse_entries(buf.into())?;
        self.clear_cache()?;

        debug!(entries = self.entries.len(), "loaded entries");
        Ok(())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in source order
    pub fn entries(&self) -> Result<&[Entry]> {
        self.ensure_init()?;
        Ok(&self.entries)
    }

    /// Entry at `ordinal`, `None` when out of range
    pub fn entry(&self, ordinal: usize) -> Result<Option<&Entry>> {
        self.ensure_init()?;
        Ok(self.entries.get(ordinal))
    }

    /// Key at `ordinal`
    pub fn key(&self, ordinal: usize) -> Result<Option<&str>> {
        Ok(self.entry(ordinal)?.map(Entry::key))
    }

    /// Value at `ordinal`; `None` when out of range or the value is absent
    pub fn value(&self, ordinal: usize) -> Result<Option<&str>> {
        Ok(self.entry(ordinal)?.and_then(Entry::value))
    }

    fn scan_key_hash(&self, key_hash: u32) -> Option<usize> {
        self.entries.iter().position(|e| e.key_hash() == key_hash)
    }

    /// Ordinal of the first entry whose key hash matches `key`
    pub fn index_of(&self, key: &str) -> Result<Option<usize>> {
        self.ensure_init()?;
        if key.is_empty() || self.entries.is_empty() {
            return Ok(None);
        }
        Ok(self.scan_key_hash(hash(Some(key))))
    }

    /// Key of the first entry whose value hash matches `value`
    pub fn key_of(&self, value: &str) -> Result<Option<&str>> {
        self.ensure_init()?;
        if value.is_empty() || self.entries.is_empty() {
            return Ok(None);
        }

        let value_hash = hash(Some(value));
        Ok(self
            .entries
            .iter()
            .find(|e| e.value_hash() == value_hash)
            .map(Entry::key))
    }

    fn lookup_ordinal(&mut self, key: &str) -> Option<usize> {
        let key_hash = hash(Some(key));

        if let Some(ordinal) = self.cache.lookup(key_hash) {
            self.stats.record_hit();
            trace!(key, ordinal, "cache hit");
            return Some(ordinal);
        }

        self.stats.record_miss();
        let ordinal = self.scan_key_hash(key_hash)?;
        trace!(key, ordinal, "cache miss");

        if self.cache.capacity() > 0 {
            if self.cache.insert(key_hash, ordinal).is_some() {
                self.stats.record_eviction();
            }
            self.stats.record_insert();
        }
        Some(ordinal)
    }

    /// Value for `key`, consulting the cache before scanning every entry
    ///
    /// `None` when the key is unknown or its value is absent.
    pub fn get(&mut self, key: &str) -> Result<Option<&str>> {
        self.ensure_init()?;
        if key.is_empty() || self.entries.is_empty() {
            return Ok(None);
        }

        Ok(self
            .lookup_ordinal(key)
            .and_then(|ordinal| self.entries.get(ordinal))
            .and_then(Entry::value))
    }

    /// Value for `key` as a signed integer
    ///
    /// Zero both for a missing key and for a value that reads as zero.
    pub fn get_i64(&mut self, key: &str, base: u32) -> Result<i64> {
        // a missing key still has its base validated
        parse_i64(self.get(key)?.unwrap_or(""), base)
    }

    /// Value for `key` as an unsigned integer
    pub fn get_u64(&mut self, key: &str, base: u32) -> Result<u64> {
        parse_u64(self.get(key)?.unwrap_or(""), base)
    }

    /// Value for `key` as a float
    pub fn get_f64(&mut self, key: &str) -> Result<f64> {
        Ok(self.get(key)?.map_or(0.0, parse_f64))
    }

    /// Replace the value of an existing key
    ///
    /// Escape sequences in `value` are resolved before storing. Keys cannot
    /// be created this way.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.ensure_init()?;
        if key.is_empty() {
            return Err(Error::Critical("key must not be empty"));
        }
        if self.entries.is_empty() {
            return Err(Error::Critical("store has no entries"));
        }

        let ordinal = self
            .scan_key_hash(hash(Some(key)))
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))?;

        self.entries[ordinal].set_value(unescape(value));
        debug!(key, ordinal, "updated value");
        Ok(())
    }

    /// Number of cache slots
    pub fn cache_capacity(&self) -> usize {
        self.cache.capacity()
    }

    /// Cache counters since the last clear
    pub fn cache_stats(&self) -> CacheStats {
        self.stats
    }

    /// Resize the cache
    ///
    /// Accepts any integer; negative sizes are rejected. Growing keeps the
    /// cached pairs, shrinking keeps the newest ones, zero disables caching.
    pub fn set_cache_capacity<N: TryInto<usize>>(&mut self, capacity: N) -> Result<()> {
        self.ensure_init()?;
        let capacity = capacity
            .try_into()
            .map_err(|_| Error::Critical("cache capacity must not be negative"))?;

        self.cache.resize(capacity)?;
        debug!(cache_capacity = capacity, "resized cache");
        Ok(())
    }

    /// Empty every cache slot and reset the counters
    pub fn clear_cache(&mut self) -> Result<()> {
        self.ensure_init()?;
        self.cache.clear();
        self.stats.reset();
        Ok(())
    }

    /// Release entries and cache and return to the uninitialized state
    pub fn teardown(&mut self) -> Result<()> {
        self.ensure_init()?;

        if let Some(ordinal) = self.entries.iter().position(|e| e.key().is_empty()) {
            warn!(ordinal, "entry without key at teardown");
            return Err(Error::NullKey { ordinal });
        }

        *self = Self::uninit();
        debug!("tore down config store");
        Ok(())
    }
}
