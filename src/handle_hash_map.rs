//! HandleHashMap: unique-key hash store with stable handles and a debug
//! reentrancy guard.
//!
//! Keys live in a `SlotMap` arena; a hashbrown `HashTable` indexes arena
//! keys by the hash stored next to each entry. Removal goes through the
//! stored hash and the handle, so `K: Hash` is never invoked after insert.

use crate::error::InsertError;
use crate::reentrancy::DebugReentrancy;
use crate::store::{BaseMap, Handle, Lookup, UniqueKeys};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use hashbrown::hash_table::Entry as TableEntry;
use hashbrown::HashTable;
use slotmap::{DefaultKey, SlotMap};
use std::collections::hash_map::RandomState;

#[derive(Clone, Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    hash: u64,
}

pub struct HandleHashMap<K, V, S = RandomState> {
    hasher: S,
    index: HashTable<DefaultKey>,
    slots: SlotMap<DefaultKey, Entry<K, V>>, // storage using generational keys
    reentrancy: DebugReentrancy,
}

impl<K, V> HandleHashMap<K, V> {
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl<K, V, S> HandleHashMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            index: HashTable::new(),
            slots: SlotMap::with_key(),
            reentrancy: DebugReentrancy::new(),
        }
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }
}

impl<K, V, S: Default> Default for HandleHashMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

// Cloning keeps every arena key, so handles into the original resolve to
// the matching entries of the clone.
impl<K: Clone, V: Clone, S: Clone> Clone for HandleHashMap<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            hasher: self.hasher.clone(),
            index: self.index.clone(),
            slots: self.slots.clone(),
            reentrancy: DebugReentrancy::new(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for HandleHashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.slots.values().map(|e| (&e.key, &e.value)))
            .finish()
    }
}

/// Iterator over entries of a `HandleHashMap`, in arena order.
pub struct Iter<'a, K, V> {
    it: slotmap::basic::Iter<'a, DefaultKey, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (Handle, &'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it
            .next()
            .map(|(k, e)| (Handle::new(k), &e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V, S> BaseMap for HandleHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    type Key = K;
    type Value = V;

    const MULTI: bool = false;

    type Iter<'a> = Iter<'a, K, V> where Self: 'a;
    type Handles<'a> = core::option::IntoIter<Handle> where Self: 'a;

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn insert(&mut self, key: K, value: V) -> Result<Handle, InsertError> {
        let _g = self.reentrancy.enter();
        let hash = self.hasher.hash_one(&key);
        match self.index.entry(
            hash,
            |&kk| {
                self.slots
                    .get(kk)
                    .map(|e| e.hash == hash && e.key == key)
                    .unwrap_or(false)
            },
            |&kk| self.slots.get(kk).map(|e| e.hash).unwrap_or(0),
        ) {
            TableEntry::Occupied(_) => Err(InsertError::DuplicateKey),
            TableEntry::Vacant(v) => {
                let k = self.slots.insert(Entry { key, value, hash });
                v.insert(k);
                Ok(Handle::new(k))
            }
        }
    }

    fn remove(&mut self, handle: Handle) -> Option<(K, V)> {
        let _g = self.reentrancy.enter();
        let k = handle.raw();
        let entry = self.slots.remove(k)?;
        // Unlink from the index by identity; the stored hash picks the bucket.
        let _ = self
            .index
            .find_entry(entry.hash, |&kk| kk == k)
            .map(|slot| slot.remove());
        Some((entry.key, entry.value))
    }

    fn key(&self, handle: Handle) -> Option<&K> {
        let _g = self.reentrancy.enter();
        self.slots.get(handle.raw()).map(|e| &e.key)
    }

    fn value(&self, handle: Handle) -> Option<&V> {
        let _g = self.reentrancy.enter();
        self.slots.get(handle.raw()).map(|e| &e.value)
    }

    fn value_mut(&mut self, handle: Handle) -> Option<&mut V> {
        let _g = self.reentrancy.enter();
        self.slots.get_mut(handle.raw()).map(|e| &mut e.value)
    }

    fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            it: self.slots.iter(),
        }
    }

    fn clear(&mut self) {
        let _g = self.reentrancy.enter();
        self.index.clear();
        self.slots.clear();
    }

    fn reserve(&mut self, additional: usize) {
        let _g = self.reentrancy.enter();
        self.slots.reserve(additional);
        self.index.reserve(additional, |&kk| {
            self.slots.get(kk).map(|e| e.hash).unwrap_or(0)
        });
    }
}

impl<K, V, S, Q> Lookup<Q> for HandleHashMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
    S: BuildHasher + Default,
{
    fn find(&self, q: &Q) -> Option<Handle> {
        let _g = self.reentrancy.enter();
        let hash = self.hasher.hash_one(q);
        self.index
            .find(hash, |&k| {
                self.slots
                    .get(k)
                    .map(|e| e.key.borrow() == q)
                    .unwrap_or(false)
            })
            .map(|&k| Handle::new(k))
    }

    fn equal_range(&self, q: &Q) -> core::option::IntoIter<Handle> {
        self.find(q).into_iter()
    }
}

impl<K, V, S> UniqueKeys for HandleHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
}
