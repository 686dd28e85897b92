use std::mem::size_of;

use log::{debug, trace};

use crate::{Record, TableConfig, TableError, TableStats};

/// Fixed-size hash table for memoizing search results.
///
/// Each position key maps to exactly one slot (`key % capacity`); there is no
/// chaining. When two positions compete for a slot, the replacement policy
/// prefers deeper results and always evicts records from an earlier search
/// generation.
///
/// <https://www.chessprogramming.org/Transposition_Table>
pub struct TranspositionTable<R> {
    slots: Vec<Option<R>>,
    filled: usize,
    collisions: u64,
}

impl<R: Record> TranspositionTable<R> {
    /// Creates a table able to address `entry_count` positions.
    ///
    /// One extra slot is allocated so the reduced key never equals the
    /// logical entry count. Fails if `entry_count` is zero or the slots
    /// cannot be allocated.
    pub fn new(entry_count: usize) -> Result<Self, TableError> {
        if entry_count == 0 {
            return Err(TableError::InvalidCapacity(entry_count));
        }

        let capacity = entry_count
            .checked_add(1)
            .ok_or(TableError::InvalidCapacity(entry_count))?;

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| TableError::Allocation { slots: capacity })?;
        slots.resize_with(capacity, || None);

        debug!(
            "Allocated transposition table: {} slots ({} KiB)",
            capacity,
            capacity.saturating_mul(size_of::<Option<R>>()) / 1024
        );

        Ok(Self {
            slots,
            filled: 0,
            collisions: 0,
        })
    }

    pub fn from_config(config: &TableConfig) -> Result<Self, TableError> {
        Self::new(config.entries.value)
    }

    /// Creates a table sized to fit in the given number of megabytes, with
    /// at least one entry.
    pub fn with_memory(mb: usize) -> Result<Self, TableError> {
        let bytes = mb.saturating_mul(1024 * 1024);
        let slot_size = size_of::<Option<R>>().max(1);
        Self::new((bytes / slot_size).saturating_sub(1).max(1))
    }

    /// Number of address slots.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Reduces a full key to its slot index, always in `[0, capacity)`.
    #[inline(always)]
    pub fn index(&self, key: u64) -> usize {
        (key % self.slots.len() as u64) as usize
    }

    /// Stores a search result using depth/staleness-based replacement.
    pub fn insert(&mut self, record: R) {
        let key = record.zobrist_key();
        let idx = self.index(key);

        let existing = match self.slots[idx].as_mut() {
            Some(existing) => existing,
            None => {
                self.slots[idx] = Some(record);
                self.filled += 1;
                return;
            }
        };

        // Same position: only a result at least as deep may overwrite it
        if existing.zobrist_key() == key {
            existing.set_stale(false);
            if existing.depth() <= record.depth() {
                *existing = record;
            }
            return;
        }

        // Different position on the same slot
        self.collisions += 1;
        trace!(
            "Slot {} collision: stored {:#018x} (depth {}, stale {}), incoming {:#018x} (depth {})",
            idx,
            existing.zobrist_key(),
            existing.depth(),
            existing.is_stale(),
            key,
            record.depth()
        );

        if existing.is_stale() || existing.depth() <= record.depth() {
            *existing = record;
        }
    }

    /// Returns the record stored for `key`, if the slot holds that exact position.
    #[inline(always)]
    pub fn probe(&self, key: u64) -> Option<&R> {
        self.slots[self.index(key)]
            .as_ref()
            .filter(|r| r.zobrist_key() == key)
    }

    /// Like [`probe`](Self::probe), but allows the caller to update the record in place.
    #[inline(always)]
    pub fn probe_mut(&mut self, key: u64) -> Option<&mut R> {
        let idx = self.index(key);
        self.slots[idx]
            .as_mut()
            .filter(|r| r.zobrist_key() == key)
    }

    /// Empties every slot. The collision counter is left untouched.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.filled = 0;
        debug!("Cleared transposition table");
    }

    /// Marks every stored record as stale. Called by the search loop when a
    /// new search generation begins (e.g. a new move).
    pub fn age(&mut self) {
        for record in self.slots.iter_mut().flatten() {
            record.set_stale(true);
        }
        debug!("Aged {} transposition table entries", self.filled);
    }

    /// Number of occupied slots.
    #[inline(always)]
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// Number of slot collisions between different positions seen by `insert`.
    #[inline(always)]
    pub fn collisions(&self) -> u64 {
        self.collisions
    }

    pub fn reset_collisions(&mut self) {
        self.collisions = 0;
    }

    /// Returns hash table fill rate in permille (0-1000).
    ///
    /// Samples the first 1000 slots to get an approximation of the fill rate.
    pub fn hashfull(&self) -> u16 {
        const MAX_SAMPLE: usize = 1000;

        let sample_size = self.slots.len().min(MAX_SAMPLE);
        let filled_count = self.slots[..sample_size]
            .iter()
            .filter(|slot| slot.is_some())
            .count();

        ((filled_count * 1000) / sample_size) as u16
    }

    pub fn stats(&self) -> TableStats {
        TableStats {
            capacity: self.capacity(),
            filled: self.filled,
            collisions: self.collisions,
            hashfull: self.hashfull(),
        }
    }
}
