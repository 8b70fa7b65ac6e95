use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::{DoubleKeyTable, InfiniteHashTable, TableError};

#[derive(Clone, Debug)]
enum PairOp {
    Insert(String, String, u64),
    Remove(String, String),
    Get(String, String),
}

#[derive(Clone, Debug)]
enum KeyOp {
    Insert(String, u64),
    Remove(String),
    Get(String),
}

// A tiny alphabet keeps probe chains and trie slots colliding constantly,
// which is where the repair and collapse logic lives.
fn key_strategy() -> impl Strategy<Value = String> + Clone {
    "[a-e]{0,5}"
}

fn pair_ops_strategy() -> impl Strategy<Value = Vec<PairOp>> {
    let key = key_strategy();
    let op = prop_oneof![
        50 => (key.clone(), key.clone(), any::<u64>())
            .prop_map(|(k1, k2, v)| PairOp::Insert(k1, k2, v)),
        25 => (key.clone(), key.clone()).prop_map(|(k1, k2)| PairOp::Remove(k1, k2)),
        25 => (key.clone(), key.clone()).prop_map(|(k1, k2)| PairOp::Get(k1, k2)),
    ];
    prop::collection::vec(op, 0..=500)
}

fn key_ops_strategy() -> impl Strategy<Value = Vec<KeyOp>> {
    let key = key_strategy();
    let op = prop_oneof![
        50 => (key.clone(), any::<u64>()).prop_map(|(k, v)| KeyOp::Insert(k, v)),
        25 => key.clone().prop_map(KeyOp::Remove),
        25 => key.clone().prop_map(KeyOp::Get),
    ];
    prop::collection::vec(op, 0..=500)
}

/// Every modelled pair must resolve through both probe levels, and the outer
/// count must equal the number of distinct live key1 values.
fn validate_double(t: &DoubleKeyTable<u64>, model: &HashMap<(String, String), u64>) {
    let outer: HashSet<&String> = model.keys().map(|(k1, _)| k1).collect();
    assert_eq!(t.len(), outer.len());
    for ((key1, key2), value) in model {
        assert_eq!(t.get(key1, key2), Ok(value));
    }
    assert_eq!(t.iter().count(), model.len());
    for key1 in &outer {
        let inner: HashSet<String> = t
            .keys_for(key1.as_str())
            .expect("live key1 must enumerate")
            .map(str::to_string)
            .collect();
        let expected: HashSet<String> = model
            .keys()
            .filter(|(k1, _)| k1 == *key1)
            .map(|(_, k2)| k2.clone())
            .collect();
        assert_eq!(inner, expected);
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_double_key_equivalence(ops in pair_ops_strategy()) {
        let mut t: DoubleKeyTable<u64> = DoubleKeyTable::new();
        let mut m: HashMap<(String, String), u64> = HashMap::new();

        for op in ops {
            match op {
                PairOp::Insert(key1, key2, value) => {
                    let old_t = t.insert(&key1, &key2, value).expect("capacity never exhausts");
                    let old_m = m.insert((key1, key2), value);
                    prop_assert_eq!(old_t, old_m);
                }
                PairOp::Remove(key1, key2) => {
                    let old_t = t.remove(&key1, &key2).ok();
                    let old_m = m.remove(&(key1, key2));
                    prop_assert_eq!(old_t, old_m);
                }
                PairOp::Get(key1, key2) => {
                    let got_t = t.get(&key1, &key2).ok().copied();
                    let got_m = m.get(&(key1.clone(), key2.clone())).copied();
                    prop_assert_eq!(got_t, got_m);
                    prop_assert_eq!(t.contains(&key1, &key2), got_m.is_some());
                }
            }
        }

        validate_double(&t, &m);
    }

    #[test]
    fn prop_infinite_equivalence(ops in key_ops_strategy()) {
        let mut t: InfiniteHashTable<u64> = InfiniteHashTable::new();
        let mut m: HashMap<String, u64> = HashMap::new();

        for op in ops {
            match op {
                KeyOp::Insert(key, value) => {
                    let old_t = t.insert(&key, value);
                    let old_m = m.insert(key, value);
                    prop_assert_eq!(old_t, old_m);
                }
                KeyOp::Remove(key) => {
                    let old_t = t.remove(&key).ok();
                    let old_m = m.remove(&key);
                    prop_assert_eq!(old_t, old_m);
                }
                KeyOp::Get(key) => {
                    let got_t = t.get(&key).ok().copied();
                    let got_m = m.get(&key).copied();
                    prop_assert_eq!(got_t, got_m);
                }
            }

            prop_assert_eq!(t.len(), m.len());
        }

        // Live keys must stay reachable, and their locations must agree with
        // a fresh walk.
        for (key, value) in &m {
            prop_assert_eq!(t.get(key), Ok(value));
            prop_assert!(t.get_location(key).is_ok());
        }
    }

    #[test]
    fn prop_absent_keys_error(key1 in key_strategy(), key2 in key_strategy()) {
        let t: DoubleKeyTable<u64> = DoubleKeyTable::new();
        prop_assert_eq!(
            t.get(&key1, &key2),
            Err(TableError::KeyNotFound(key1.clone()))
        );
        let trie: InfiniteHashTable<u64> = InfiniteHashTable::new();
        prop_assert_eq!(
            trie.get(&key1),
            Err(TableError::KeyNotFound(key1.clone()))
        );
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_trie_remove_orders() {
    let keys: Vec<&str> = vec!["a", "b", "aa", "ab", "ba", "li"];

    for_each_permutation(&keys, |perm| {
        let mut t: InfiniteHashTable<u64> = InfiniteHashTable::new();
        for (i, k) in keys.iter().enumerate() {
            assert_eq!(t.insert(k, i as u64), None);
        }

        let mut live: HashMap<&str, u64> =
            keys.iter().enumerate().map(|(i, k)| (*k, i as u64)).collect();
        for k in perm {
            assert_eq!(t.remove(k).ok(), live.remove(k));
            assert_eq!(t.len(), live.len());
            for (key, value) in &live {
                assert_eq!(t.get(key), Ok(value), "sibling {key} lost");
            }
        }
        assert!(t.is_empty());
    });
}

#[test]
fn exhaustive_double_key_remove_orders() {
    let pairs: Vec<(&str, &str)> = vec![("a", "x"), ("a", "y"), ("b", "x"), ("c", "z"), ("ca", "x")];

    for_each_permutation(&pairs, |perm| {
        let mut t: DoubleKeyTable<u64> = DoubleKeyTable::with_sizes(
            vec![5, 13],
            vec![5, 13],
        );
        for (i, (k1, k2)) in pairs.iter().enumerate() {
            assert_eq!(t.insert(k1, k2, i as u64), Ok(None));
        }

        let mut live: HashMap<(&str, &str), u64> = pairs
            .iter()
            .enumerate()
            .map(|(i, p)| (*p, i as u64))
            .collect();
        for pair in perm {
            assert_eq!(t.remove(pair.0, pair.1).ok(), live.remove(&pair));
            for ((k1, k2), value) in &live {
                assert_eq!(t.get(k1, k2), Ok(value), "sibling ({k1},{k2}) lost");
            }
        }
        assert!(t.is_empty());
    });
}
