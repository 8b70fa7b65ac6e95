//! Single-key open-addressing hash table with linear probing.
//!
//! This is the nested store used by [`DoubleKeyTable`](crate::DoubleKeyTable)
//! for its inner level, and a complete table in its own right. Growth follows
//! a fixed ascending capacity sequence owned by the instance; once the
//! sequence is exhausted the table stops growing and inserts fail with
//! [`TableError::TableFull`] when probing wraps all the way around.

use std::fmt;

use crate::array::FixedArray;
use crate::error::TableError;
use crate::hash::{polynomial_hash, HashFn};
use crate::DEFAULT_TABLE_SIZES;

pub struct LinearProbeTable<V> {
    sizes: Vec<usize>,
    size_index: usize,
    count: usize,
    hash: HashFn,
    array: FixedArray<(String, V)>,
}

impl<V> LinearProbeTable<V> {
    pub fn new() -> Self {
        Self::with_sizes(DEFAULT_TABLE_SIZES.to_vec())
    }

    /// Create a table with an explicit capacity sequence. The sequence must
    /// be non-empty, ascending, and every capacity must be at least 2.
    pub fn with_sizes(sizes: Vec<usize>) -> Self {
        assert!(!sizes.is_empty(), "capacity sequence must be non-empty");
        debug_assert!(sizes.iter().all(|&s| s >= 2));
        debug_assert!(sizes.windows(2).all(|w| w[0] < w[1]));
        let array = FixedArray::new(sizes[0]);
        Self {
            sizes,
            size_index: 0,
            count: 0,
            hash: polynomial_hash,
            array,
        }
    }

    /// Rebind the hash function. The replacement receives the table's
    /// current capacity on every call, so it stays correct across growth.
    pub fn with_hash(mut self, hash: HashFn) -> Self {
        self.hash = hash;
        self
    }

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

    /// Find the slot for `key` by linear probing from its hash position.
    ///
    /// With `is_insert` the first empty slot on the probe path is an
    /// acceptable answer; without it an empty slot means the key is absent.
    /// A full cycle without resolution is [`TableError::TableFull`] when
    /// inserting and [`TableError::KeyNotFound`] otherwise.
    pub fn probe(&self, key: &str, is_insert: bool) -> Result<usize, TableError> {
        let capacity = self.capacity();
        let mut position = (self.hash)(key, capacity);
        for _ in 0..capacity {
            match self.array.get(position) {
                None => {
                    return if is_insert {
                        Ok(position)
                    } else {
                        Err(TableError::KeyNotFound(key.to_string()))
                    }
                }
                Some((existing, _)) if existing == key => return Ok(position),
                Some(_) => position = (position + 1) % capacity,
            }
        }
        if is_insert {
            Err(TableError::TableFull)
        } else {
            Err(TableError::KeyNotFound(key.to_string()))
        }
    }

    /// Insert or overwrite, returning the previous value for the key.
    ///
    /// After a successful write, exceeding half occupancy advances the
    /// capacity sequence; an exhausted sequence is skipped silently.
    pub fn insert(&mut self, key: &str, value: V) -> Result<Option<V>, TableError> {
        let position = self.probe(key, true)?;
        let old = match self.array.take(position) {
            Some((existing, previous)) => {
                self.array.set(position, (existing, value));
                Some(previous)
            }
            None => {
                self.array.set(position, (key.to_string(), value));
                self.count += 1;
                None
            }
        };
        if self.count > self.capacity() / 2 {
            self.grow()?;
        }
        Ok(old)
    }

    pub fn get(&self, key: &str) -> Result<&V, TableError> {
        let position = self.probe(key, false)?;
        match self.array.get(position) {
            Some((_, value)) => Ok(value),
            None => Err(TableError::KeyNotFound(key.to_string())),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.probe(key, false).is_ok()
    }

    /// Remove `key`, returning its value.
    ///
    /// The freed slot leaves a hole that could strand later entries of the
    /// same cluster, so every entry between the hole and the next empty slot
    /// is taken out and reinserted through the normal probe path.
    pub fn remove(&mut self, key: &str) -> Result<V, TableError> {
        let position = self.probe(key, false)?;
        let removed = match self.array.take(position) {
            Some((_, value)) => value,
            None => return Err(TableError::KeyNotFound(key.to_string())),
        };
        self.count -= 1;

        let capacity = self.capacity();
        let mut current = (position + 1) % capacity;
        while let Some((k, v)) = self.array.take(current) {
            let new_position = self.probe(&k, true)?;
            self.array.set(new_position, (k, v));
            current = (current + 1) % capacity;
        }
        Ok(removed)
    }

    fn grow(&mut self) -> Result<(), TableError> {
        if self.size_index + 1 == self.sizes.len() {
            return Ok(());
        }
        self.size_index += 1;
        let old = std::mem::replace(&mut self.array, FixedArray::new(self.sizes[self.size_index]));
        self.count = 0;
        for slot in old {
            if let Some((key, value)) = slot {
                let position = self.probe(&key, true)?;
                self.array.set(position, (key, value));
                self.count += 1;
            }
        }
        Ok(())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.array.occupied().map(|(key, _)| key.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.array.occupied().map(|(_, value)| value)
    }

    /// Live entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.array.occupied().map(|(key, value)| (key.as_str(), value))
    }

    /// Raw slot sequence, empty slots included. Bulk reinsertion during
    /// growth and cluster repair walks this.
    pub fn slots(&self) -> impl Iterator<Item = Option<(&str, &V)>> {
        self.array
            .iter()
            .map(|slot| slot.map(|(key, value)| (key.as_str(), value)))
    }
}

impl<V> Default for LinearProbeTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> IntoIterator for LinearProbeTable<V> {
    type Item = (String, V);
    type IntoIter = std::iter::Flatten<<FixedArray<(String, V)> as IntoIterator>::IntoIter>;

    fn into_iter(self) -> Self::IntoIter {
        self.array.into_iter().flatten()
    }
}

impl<V: fmt::Display> fmt::Display for LinearProbeTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.iter() {
            writeln!(f, "({key},{value})")?;
        }
        Ok(())
    }
}
