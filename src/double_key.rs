//! Composite-key two-level open-addressing hash table.
//!
//! The outer level maps `key1` to a nested [`LinearProbeTable`] by linear
//! probing; the nested table maps `key2` to the value. Nested tables are
//! created lazily on the first insert under a new `key1` and torn down the
//! instant they become empty. The outer occupancy count tracks occupied
//! outer slots, not total `(key1, key2)` entries.

use std::fmt;

use crate::array::FixedArray;
use crate::error::TableError;
use crate::hash::polynomial_hash;
use crate::linear_probe::LinearProbeTable;
use crate::DEFAULT_TABLE_SIZES;

pub struct DoubleKeyTable<V> {
    sizes: Vec<usize>,
    internal_sizes: Vec<usize>,
    size_index: usize,
    count: usize,
    array: FixedArray<(String, LinearProbeTable<V>)>,
}

impl<V> DoubleKeyTable<V> {
    pub fn new() -> Self {
        Self::with_sizes(DEFAULT_TABLE_SIZES.to_vec(), DEFAULT_TABLE_SIZES.to_vec())
    }

    /// Create a table with explicit capacity sequences for the outer level
    /// and for every nested table. Both sequences must be non-empty,
    /// ascending, with capacities of at least 2.
    pub fn with_sizes(sizes: Vec<usize>, internal_sizes: Vec<usize>) -> Self {
        assert!(!sizes.is_empty(), "capacity sequence must be non-empty");
        assert!(
            !internal_sizes.is_empty(),
            "internal capacity sequence must be non-empty"
        );
        debug_assert!(sizes.iter().all(|&s| s >= 2));
        debug_assert!(sizes.windows(2).all(|w| w[0] < w[1]));
        let array = FixedArray::new(sizes[0]);
        Self {
            sizes,
            internal_sizes,
            size_index: 0,
            count: 0,
            array,
        }
    }

    /// Number of occupied outer slots (distinct `key1` values).
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.array.len()
    }

    /// Linear-probe the outer level for `key1`.
    ///
    /// With `is_insert` the first empty slot on the probe path is the answer
    /// (the caller creates the nested table there); otherwise an empty slot
    /// means the key is absent. A full cycle is `TableFull` when inserting
    /// and `KeyNotFound` otherwise.
    fn probe_outer(&self, key1: &str, is_insert: bool) -> Result<usize, TableError> {
        let capacity = self.capacity();
        let mut position = polynomial_hash(key1, capacity);
        for _ in 0..capacity {
            match self.array.get(position) {
                None => {
                    return if is_insert {
                        Ok(position)
                    } else {
                        Err(TableError::KeyNotFound(key1.to_string()))
                    }
                }
                Some((existing, _)) if existing == key1 => return Ok(position),
                Some(_) => position = (position + 1) % capacity,
            }
        }
        if is_insert {
            Err(TableError::TableFull)
        } else {
            Err(TableError::KeyNotFound(key1.to_string()))
        }
    }

    /// Insert or overwrite `(key1, key2) -> value`, returning the previous
    /// value for the pair.
    ///
    /// Inner-key placement, growth included, is entirely the nested table's
    /// responsibility. After the write, exceeding half outer occupancy
    /// advances the outer capacity sequence and reinserts every surviving
    /// `(key1, key2, value)` triple; an exhausted sequence is skipped
    /// silently.
    pub fn insert(&mut self, key1: &str, key2: &str, value: V) -> Result<Option<V>, TableError> {
        let position = self.probe_outer(key1, true)?;
        if self.array.get(position).is_none() {
            let nested = LinearProbeTable::with_sizes(self.internal_sizes.clone());
            self.array.set(position, (key1.to_string(), nested));
            self.count += 1;
        }
        let (_, nested) = self
            .array
            .get_mut(position)
            .ok_or_else(|| TableError::KeyNotFound(key1.to_string()))?;
        let old = nested.insert(key2, value)?;
        if self.count > self.capacity() / 2 {
            self.grow()?;
        }
        Ok(old)
    }

    pub fn get(&self, key1: &str, key2: &str) -> Result<&V, TableError> {
        let position = self.probe_outer(key1, false)?;
        let (_, nested) = self
            .array
            .get(position)
            .ok_or_else(|| TableError::KeyNotFound(key1.to_string()))?;
        nested.get(key2)
    }

    pub fn contains(&self, key1: &str, key2: &str) -> bool {
        self.get(key1, key2).is_ok()
    }

    /// Remove `(key1, key2)`, returning its value.
    ///
    /// When the nested table becomes empty its outer slot is cleared, and
    /// the cluster behind the freed slot is repaired: each following entry
    /// up to the next empty slot is taken out and its pairs reinserted
    /// through the normal insert path, so probing never crosses a hole on
    /// the way to a live key.
    pub fn remove(&mut self, key1: &str, key2: &str) -> Result<V, TableError> {
        let position = self.probe_outer(key1, false)?;
        let (_, nested) = self
            .array
            .get_mut(position)
            .ok_or_else(|| TableError::KeyNotFound(key1.to_string()))?;
        let removed = nested.remove(key2)?;
        if nested.is_empty() {
            self.array.take(position);
            self.count -= 1;
            self.repair_cluster(position)?;
        }
        Ok(removed)
    }

    fn repair_cluster(&mut self, freed: usize) -> Result<(), TableError> {
        let capacity = self.capacity();
        let mut position = (freed + 1) % capacity;
        while let Some((key1, nested)) = self.array.take(position) {
            self.count -= 1;
            for (key2, value) in nested {
                self.insert(&key1, &key2, value)?;
            }
            position = (position + 1) % capacity;
        }
        Ok(())
    }

    fn grow(&mut self) -> Result<(), TableError> {
        if self.size_index + 1 == self.sizes.len() {
            return Ok(());
        }
        self.size_index += 1;
        let old = std::mem::replace(&mut self.array, FixedArray::new(self.sizes[self.size_index]));
        self.count = 0;
        for slot in old {
            if let Some((key1, nested)) = slot {
                for (key2, value) in nested {
                    self.insert(&key1, &key2, value)?;
                }
            }
        }
        Ok(())
    }

    /// All top-level keys, in outer slot order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.array.occupied().map(|(key1, _)| key1.as_str())
    }

    /// All inner keys under `key1`.
    pub fn keys_for(&self, key1: &str) -> Result<impl Iterator<Item = &str>, TableError> {
        let position = self.probe_outer(key1, false)?;
        let (_, nested) = self
            .array
            .get(position)
            .ok_or_else(|| TableError::KeyNotFound(key1.to_string()))?;
        Ok(nested.keys())
    }

    /// All values in the table.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.array.occupied().flat_map(|(_, nested)| nested.values())
    }

    /// All values under `key1`.
    pub fn values_for(&self, key1: &str) -> Result<impl Iterator<Item = &V>, TableError> {
        let position = self.probe_outer(key1, false)?;
        let (_, nested) = self
            .array
            .get(position)
            .ok_or_else(|| TableError::KeyNotFound(key1.to_string()))?;
        Ok(nested.values())
    }

    /// Every `(key1, key2, value)` triple.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &V)> {
        self.array.occupied().flat_map(|(key1, nested)| {
            nested
                .iter()
                .map(move |(key2, value)| (key1.as_str(), key2, value))
        })
    }
}

impl<V> Default for DoubleKeyTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Display> fmt::Display for DoubleKeyTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key1, key2, value) in self.iter() {
            writeln!(f, "({key1},{key2},{value})")?;
        }
        Ok(())
    }
}
