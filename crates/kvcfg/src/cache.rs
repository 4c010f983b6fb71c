//! Move-to-front lookup cache
//!
//! A fixed number of slots, each remembering the key hash and ordinal of an
//! entry that was found by a full scan. New pairs go in the front slot and
//! push everything else back by one; the back slot falls off. Hits leave the
//! order alone.

use tracing::trace;

use crate::error::Result;

/// Occupied cache slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Key hash of the cached entry
    pub hash: u32,
    /// Ordinal of the cached entry
    pub ordinal: usize,
}

/// Fixed-capacity cache of `(hash, ordinal)` pairs, newest first
#[derive(Debug, Default)]
pub struct LookupCache {
    slots: Vec<Option<Slot>>,
}

impl LookupCache {
    /// Create a cache with `capacity` empty slots
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut cache = Self::default();
        cache.resize(capacity)?;
        Ok(cache)
    }

    /// Ordinal cached for `hash`, scanning front to back
    pub fn lookup(&self, hash: u32) -> Option<usize> {
        self.slots
            .iter()
            .flatten()
            .find(|slot| slot.hash == hash)
            .map(|slot| slot.ordinal)
    }

    /// Put a pair in the front slot, returning the occupant pushed off the back
    ///
    /// Does nothing when the capacity is zero.
    pub fn insert(&mut self, hash: u32, ordinal: usize) -> Option<Slot> {
        if self.slots.is_empty() {
            return None;
        }

        self.slots.rotate_right(1);
        let evicted = self.slots[0].replace(Slot { hash, ordinal });
        if let Some(old) = evicted {
            trace!(hash = old.hash, ordinal = old.ordinal, "evicted cache slot");
        }
        evicted
    }

    /// Change the number of slots
    ///
    /// Growing appends empty slots; shrinking keeps the front (newest)
    /// slots; zero releases the storage.
    pub fn resize(&mut self, capacity: usize) -> Result<()> {
        if capacity == 0 {
            self.slots = Vec::new();
            return Ok(());
        }

        if capacity > self.slots.len() {
            self.slots.try_reserve_exact(capacity - self.slots.len())?;
        }
        self.slots.resize(capacity, None);
        Ok(())
    }

    /// Empty every slot without changing the capacity
    pub fn clear(&mut self) {
        self.slots.fill(None);
    }

    /// Number of slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Check if no slot is occupied
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slots in front-to-back order
    pub fn slots(&self) -> &[Option<Slot>] {
        &self.slots
    }
}
