//! Unbounded single-key table built as a trie of fixed-capacity slot arrays.
//!
//! Each node is a [`FixedArray`] of [`TABLE_SIZE`] slots. A slot holds a
//! leaf `(key, value)` pair or a child node one level deeper; depth grows
//! only as far as key collisions require. The hash of a key at depth `level`
//! is the code of its `level`-th character modulo `TABLE_SIZE - 1`; the last
//! slot is reserved for keys already exhausted at that depth, which can no
//! longer be distinguished by a next character.
//!
//! Every node counts the keys stored beneath it. An internal node is kept
//! only while that count is at least 2: when a removal drops it to 1, the
//! sole remaining leaf is relocated into the parent's slot and the node is
//! discarded, repeating upward while the parent also drops to a single key.

use std::fmt;

use smallvec::SmallVec;

use crate::array::FixedArray;
use crate::error::TableError;

/// Slot count of every trie node.
pub const TABLE_SIZE: usize = 27;

enum Entry<V> {
    Leaf(String, V),
    Child {
        /// Leading characters of the keys below, one per consumed level.
        prefix: String,
        node: Box<Node<V>>,
    },
}

struct Node<V> {
    slots: FixedArray<Entry<V>>,
    /// Keys stored beneath this node.
    count: usize,
}

impl<V> Node<V> {
    fn new() -> Self {
        Self {
            slots: FixedArray::new(TABLE_SIZE),
            count: 0,
        }
    }

    /// Take the node's single remaining leaf, if that is what it holds.
    fn take_sole_leaf(&mut self) -> Option<Entry<V>> {
        let position = (0..self.slots.len()).find(|&i| self.slots.get(i).is_some())?;
        match self.slots.take(position) {
            Some(leaf @ Entry::Leaf(..)) => Some(leaf),
            Some(other) => {
                self.slots.set(position, other);
                None
            }
            None => None,
        }
    }
}

pub struct InfiniteHashTable<V> {
    root: Node<V>,
    count: usize,
}

impl<V> InfiniteHashTable<V> {
    pub fn new() -> Self {
        Self {
            root: Node::new(),
            count: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Slot index of `key` in a node at depth `level`.
    fn hash_at(key: &str, level: usize) -> usize {
        match key.chars().nth(level) {
            Some(c) => (c as usize) % (TABLE_SIZE - 1),
            None => TABLE_SIZE - 1,
        }
    }

    /// Insert or overwrite, returning the previous value for the key.
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        let old = Self::insert_at(&mut self.root, key, value, 0);
        if old.is_none() {
            self.count += 1;
        }
        old
    }

    fn insert_at(node: &mut Node<V>, key: &str, value: V, level: usize) -> Option<V> {
        let position = Self::hash_at(key, level);
        let old = match node.slots.take(position) {
            None => {
                node.slots.set(position, Entry::Leaf(key.to_string(), value));
                None
            }
            Some(Entry::Leaf(existing_key, existing_value)) => {
                if existing_key == key {
                    // Overwrite in place; no counter changes anywhere.
                    node.slots.set(position, Entry::Leaf(existing_key, value));
                    return Some(existing_value);
                }
                // Split: push the existing leaf one level down and keep
                // probing for the new key inside the fresh child.
                let mut child = Node::new();
                let child_position = Self::hash_at(&existing_key, level + 1);
                child
                    .slots
                    .set(child_position, Entry::Leaf(existing_key, existing_value));
                child.count = 1;
                let old = Self::insert_at(&mut child, key, value, level + 1);
                debug_assert!(old.is_none());
                node.slots.set(
                    position,
                    Entry::Child {
                        prefix: key.chars().take(level + 1).collect(),
                        node: Box::new(child),
                    },
                );
                old
            }
            Some(Entry::Child { prefix, node: mut child }) => {
                let old = Self::insert_at(&mut child, key, value, level + 1);
                node.slots.set(position, Entry::Child { prefix, node: child });
                old
            }
        };
        if old.is_none() {
            node.count += 1;
        }
        old
    }

    pub fn get(&self, key: &str) -> Result<&V, TableError> {
        let mut node = &self.root;
        let mut level = 0;
        loop {
            let position = Self::hash_at(key, level);
            match node.slots.get(position) {
                Some(Entry::Leaf(existing, value)) if existing == key => return Ok(value),
                Some(Entry::Child { node: child, .. }) => {
                    node = child;
                    level += 1;
                }
                _ => return Err(TableError::KeyNotFound(key.to_string())),
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_ok()
    }

    /// Slot indices visited on the way to `key`, root node first.
    pub fn get_location(&self, key: &str) -> Result<SmallVec<[usize; 8]>, TableError> {
        let mut location = SmallVec::new();
        let mut node = &self.root;
        let mut level = 0;
        loop {
            let position = Self::hash_at(key, level);
            match node.slots.get(position) {
                Some(Entry::Leaf(existing, _)) if existing == key => {
                    location.push(position);
                    return Ok(location);
                }
                Some(Entry::Child { node: child, .. }) => {
                    location.push(position);
                    node = child;
                    level += 1;
                }
                _ => return Err(TableError::KeyNotFound(key.to_string())),
            }
        }
    }

    /// Remove `key`, returning its value, collapsing any chain of ancestors
    /// left holding a single key.
    pub fn remove(&mut self, key: &str) -> Result<V, TableError> {
        let removed = Self::remove_at(&mut self.root, key, 0)?;
        self.count -= 1;
        Ok(removed)
    }

    fn remove_at(node: &mut Node<V>, key: &str, level: usize) -> Result<V, TableError> {
        let position = Self::hash_at(key, level);
        match node.slots.take(position) {
            None => Err(TableError::KeyNotFound(key.to_string())),
            Some(Entry::Leaf(existing_key, existing_value)) => {
                if existing_key == key {
                    node.count -= 1;
                    Ok(existing_value)
                } else {
                    node.slots
                        .set(position, Entry::Leaf(existing_key, existing_value));
                    Err(TableError::KeyNotFound(key.to_string()))
                }
            }
            Some(Entry::Child { prefix, node: mut child }) => {
                match Self::remove_at(&mut child, key, level + 1) {
                    Ok(value) => {
                        node.count -= 1;
                        if child.count == 1 {
                            // The child is down to a single key; deeper
                            // collapses already ran, so it sits in a leaf.
                            match child.take_sole_leaf() {
                                Some(leaf) => {
                                    node.slots.set(position, leaf);
                                }
                                None => {
                                    node.slots
                                        .set(position, Entry::Child { prefix, node: child });
                                }
                            }
                        } else {
                            node.slots.set(position, Entry::Child { prefix, node: child });
                        }
                        Ok(value)
                    }
                    Err(err) => {
                        node.slots.set(position, Entry::Child { prefix, node: child });
                        Err(err)
                    }
                }
            }
        }
    }
}

impl<V> Default for InfiniteHashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Display> fmt::Display for InfiniteHashTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn render<V: fmt::Display>(
            node: &Node<V>,
            depth: usize,
            f: &mut fmt::Formatter<'_>,
        ) -> fmt::Result {
            for (i, slot) in node.slots.iter().enumerate() {
                match slot {
                    None => {}
                    Some(Entry::Leaf(key, value)) => {
                        writeln!(f, "{:indent$}{i}: ({key},{value})", "", indent = depth * 2)?;
                    }
                    Some(Entry::Child { prefix, node }) => {
                        writeln!(f, "{:indent$}{i}: {prefix}*", "", indent = depth * 2)?;
                        render(node, depth + 1, f)?;
                    }
                }
            }
            Ok(())
        }
        render(&self.root, 0, f)
    }
}
