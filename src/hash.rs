//! Polynomial rolling hash shared by both open-addressed tables.

/// Signature of a table hash function. The target capacity is an explicit
/// argument so a freshly sized table rehashes correctly; hash functions must
/// never capture a capacity.
pub type HashFn = fn(&str, usize) -> usize;

/// Multiplier folded into the coefficient on every character.
pub const HASH_BASE: u64 = 31;

/// Polynomial rolling hash of `key` into `0..capacity`.
///
/// `value = (code(c) + a * value) % capacity` with `a` starting at 31415 and
/// stepping by `a = a * 31 % (capacity - 1)` per character. Character codes
/// are Unicode scalar values.
///
/// `capacity` must be at least 2.
pub fn polynomial_hash(key: &str, capacity: usize) -> usize {
    debug_assert!(capacity >= 2);
    let capacity = capacity as u64;
    let mut value: u64 = 0;
    let mut a: u64 = 31415;
    for c in key.chars() {
        value = (c as u64 + a * value) % capacity;
        a = a * HASH_BASE % (capacity - 1);
    }
    value as usize
}
