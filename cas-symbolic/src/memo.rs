//! Memoization of expensive derived computations.
//!
//! The same subexpressions recur heavily across the recursive algorithms in this crate, so the
//! results of some per-expression computations are cached. Each cached operation owns one
//! process-wide [`Memo`] (see [`decompose`](crate::decompose)), so entries are keyed by the
//! operation and its arguments.
//!
//! Entries live for the lifetime of the process and are never evicted. Two threads may compute
//! the same entry concurrently; the second insertion overwrites the first with an equal value.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::hash::Hash;

/// A thread-safe cache from keys to computed values.
#[derive(Debug)]
pub struct Memo<K, V> {
    entries: RwLock<FxHashMap<K, V>>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(FxHashMap::default()),
        }
    }
}

impl<K: Hash + Eq, V: Clone> Memo<K, V> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a cached value.
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.read().get(key).cloned()
    }

    /// Inserts a value into the cache.
    pub fn insert(&self, key: K, value: V) {
        self.entries.write().insert(key, value);
    }

    /// Returns the cached value for `key`, computing and caching it with `f` if it is missing.
    ///
    /// The lock is not held while `f` runs, so `f` may itself use this cache.
    pub fn get_or_insert_with(&self, key: K, f: impl FnOnce() -> V) -> V {
        if let Some(value) = self.get(&key) {
            return value;
        }
        let value = f();
        self.insert(key, value.clone());
        value
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use std::{cell::Cell, sync::Arc, thread};
    use super::*;

    #[test]
    fn computes_once() {
        let memo = Memo::new();
        let calls = Cell::new(0);
        for _ in 0..3 {
            let value = memo.get_or_insert_with(7, || {
                calls.set(calls.get() + 1);
                49
            });
            assert_eq!(value, 49);
        }
        assert_eq!(calls.get(), 1);
        assert_eq!(memo.len(), 1);
    }

    #[test]
    fn reentrant() {
        let memo: Memo<u32, u32> = Memo::new();
        let outer = memo.get_or_insert_with(2, || memo.get_or_insert_with(1, || 10) + 1);
        assert_eq!(outer, 11);
        assert_eq!(memo.get(&1), Some(10));
    }

    #[test]
    fn concurrent_population() {
        let memo = Arc::new(Memo::new());
        let handles = (0..8)
            .map(|t| {
                let memo = Arc::clone(&memo);
                thread::spawn(move || {
                    for key in 0..100u64 {
                        assert_eq!(memo.get_or_insert_with(key, || key * key), key * key);
                    }
                    t
                })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(memo.len(), 100);
    }
}
