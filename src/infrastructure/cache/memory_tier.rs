//! Bounded in-process cache tier with least-recently-used eviction

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use crate::domain::cache::{CacheEntry, CacheKey};

/// Default number of entries held in process
pub const DEFAULT_MEMORY_CAPACITY: usize = 1000;

#[derive(Debug)]
struct Slot {
    entry: CacheEntry,
    /// Touch order, breaks ties between equal `last_used` values
    seq: u64,
}

type RecencyKey = (DateTime<Utc>, u64);

/// Slot arena with a key index and a recency index
///
/// Entries live in `slots`; `index` maps keys to slot positions and `recency`
/// orders occupied slots by `(last_used, seq)`, so the eviction victim is
/// always the first element. Every operation is O(log n).
#[derive(Debug)]
pub struct MemoryTier {
    capacity: usize,
    slots: Vec<Option<Slot>>,
    free: Vec<usize>,
    index: HashMap<CacheKey, usize>,
    recency: BTreeMap<RecencyKey, usize>,
    next_seq: u64,
}

impl MemoryTier {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            slots: Vec::new(),
            free: Vec::new(),
            index: HashMap::new(),
            recency: BTreeMap::new(),
            next_seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Looks up `key`, counting the hit and refreshing its recency
    pub fn get(&mut self, key: &CacheKey, now: DateTime<Utc>) -> Option<CacheEntry> {
        let idx = *self.index.get(key)?;
        let seq = self.bump_seq();
        let slot = self.slots[idx].as_mut()?;

        self.recency.remove(&(slot.entry.last_used, slot.seq));
        slot.entry.touch(now);
        slot.seq = seq;
        self.recency.insert((slot.entry.last_used, seq), idx);

        Some(slot.entry.clone())
    }

    /// Inserts or replaces the entry for its key, returning whatever was evicted
    pub fn insert(&mut self, entry: CacheEntry) -> Vec<CacheEntry> {
        let seq = self.bump_seq();
        let recency_key = (entry.last_used, seq);

        match self.index.get(&entry.key).copied() {
            Some(idx) => {
                if let Some(slot) = self.slots[idx].as_mut() {
                    self.recency.remove(&(slot.entry.last_used, slot.seq));
                    slot.entry = entry;
                    slot.seq = seq;
                    self.recency.insert(recency_key, idx);
                }
            }
            None => {
                let key = entry.key.clone();
                let slot = Some(Slot { entry, seq });
                let idx = match self.free.pop() {
                    Some(idx) => {
                        self.slots[idx] = slot;
                        idx
                    }
                    None => {
                        self.slots.push(slot);
                        self.slots.len() - 1
                    }
                };
                self.index.insert(key, idx);
                self.recency.insert(recency_key, idx);
            }
        }

        self.evict_overflow()
    }

    /// Drops every entry, returning how many there were
    pub fn clear(&mut self) -> usize {
        let cleared = self.len();
        self.slots.clear();
        self.free.clear();
        self.index.clear();
        self.recency.clear();
        cleared
    }

    fn evict_overflow(&mut self) -> Vec<CacheEntry> {
        let mut evicted = Vec::new();

        while self.index.len() > self.capacity {
            let Some((_, idx)) = self.recency.pop_first() else {
                break;
            };

            if let Some(slot) = self.slots[idx].take() {
                self.index.remove(&slot.entry.key);
                self.free.push(idx);
                evicted.push(slot.entry);
            }
        }

        evicted
    }

    fn bump_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}

impl Default for MemoryTier {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_CAPACITY)
    }
}
