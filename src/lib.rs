//! # probemap
//!
//! Two self-contained associative containers over string keys:
//!
//! - [`DoubleKeyTable`]: a composite-key two-level open-addressing hash
//!   table. The outer level maps `key1` to a nested [`LinearProbeTable`]
//!   created lazily; the nested table maps `key2` to the value. Both levels
//!   grow along fixed ascending capacity sequences and repair their probe
//!   clusters on deletion.
//! - [`InfiniteHashTable`]: an unbounded single-key table built as a trie of
//!   fixed-capacity slot arrays. Depth grows only as far as key collisions
//!   require, and deletions collapse single-key chains back toward the root.
//!
//! Both tables are synchronous and single-threaded; callers serialize
//! concurrent mutation.
//!
//! ## Example
//!
//! ```rust
//! use probemap::{DoubleKeyTable, InfiniteHashTable};
//!
//! let mut dk: DoubleKeyTable<u64> = DoubleKeyTable::new();
//! dk.insert("user", "alice", 1).unwrap();
//! dk.insert("user", "bob", 2).unwrap();
//! assert_eq!(dk.get("user", "alice"), Ok(&1));
//!
//! let mut trie: InfiniteHashTable<u64> = InfiniteHashTable::new();
//! trie.insert("lin", 1);
//! trie.insert("lim", 2);
//! assert_eq!(trie.get("lim"), Ok(&2));
//! ```

pub mod array;
pub mod double_key;
pub mod error;
pub mod hash;
pub mod infinite;
pub mod linear_probe;

pub use array::FixedArray;
pub use double_key::DoubleKeyTable;
pub use error::TableError;
pub use infinite::InfiniteHashTable;
pub use linear_probe::LinearProbeTable;

/// Default capacity sequence for the open-addressed tables. Growth walks
/// this left to right and never wraps; no table using it should exceed a
/// million entries.
pub const DEFAULT_TABLE_SIZES: &[usize] = &[
    5, 13, 29, 53, 97, 193, 389, 769, 1543, 3079, 6151, 12289, 24593, 49157, 98317, 196613,
    393241, 786433, 1572869,
];

#[cfg(test)]
mod proptests;
