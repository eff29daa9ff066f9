//! HandleSortedMap: ordered store with stable handles.
//!
//! Keys live in a `SlotMap` arena; `order` lists arena keys sorted by key.
//! Equal keys (multi-valued flavour only) stay in insertion order. Lookups
//! are binary searches, iteration walks `order` in either direction.
//! Insert and remove shift the tail of `order`, so they cost O(n); building
//! a large map in descending key order is quadratic.

use crate::error::InsertError;
use crate::reentrancy::DebugReentrancy;
use crate::store::{BaseMap, Handle, Lookup, OrderedLookup, UniqueKeys};
use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;
use core::ops::{Bound, RangeBounds};
use slotmap::{DefaultKey, SlotMap};

#[derive(Clone, Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// Ordered store. With `DUPLICATES = true` equal keys are kept side by side.
///
/// Lookups and bound queries are O(log n). `insert` and `remove` are O(n) in
/// the worst case because they shift the sorted `order` vector.
pub struct HandleSortedMap<K, V, const DUPLICATES: bool = false> {
    order: Vec<DefaultKey>,
    slots: SlotMap<DefaultKey, Entry<K, V>>,
    reentrancy: DebugReentrancy,
}

/// Ordered store that accepts equal keys.
pub type HandleSortedMultiMap<K, V> = HandleSortedMap<K, V, true>;

impl<K, V, const DUPLICATES: bool> HandleSortedMap<K, V, DUPLICATES> {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            slots: SlotMap::with_key(),
            reentrancy: DebugReentrancy::new(),
        }
    }

    // First position whose key is not less than `q`.
    fn lower_index<Q>(&self, q: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.order.partition_point(|&k| {
            let key: &Q = self.slots[k].key.borrow();
            key < q
        })
    }

    // First position whose key is greater than `q`.
    fn upper_index<Q>(&self, q: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.order.partition_point(|&k| {
            let key: &Q = self.slots[k].key.borrow();
            key <= q
        })
    }

    fn iter_between(&self, lo: usize, hi: usize) -> Iter<'_, K, V> {
        Iter {
            order: self.order[lo..hi].iter(),
            slots: &self.slots,
        }
    }
}

impl<K: Ord, V, const DUPLICATES: bool> HandleSortedMap<K, V, DUPLICATES> {
    // Position of arena key `k` in `order`: binary search to its equal run,
    // then match by identity.
    fn position(&self, k: DefaultKey) -> Option<usize> {
        let key = &self.slots.get(k)?.key;
        let lo = self.order.partition_point(|&o| self.slots[o].key < *key);
        self.order[lo..]
            .iter()
            .take_while(|&&o| self.slots[o].key == *key)
            .position(|&o| o == k)
            .map(|offset| lo + offset)
    }
}

impl<K, V, const DUPLICATES: bool> Default for HandleSortedMap<K, V, DUPLICATES> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone, const DUPLICATES: bool> Clone for HandleSortedMap<K, V, DUPLICATES> {
    fn clone(&self) -> Self {
        Self {
            order: self.order.clone(),
            slots: self.slots.clone(),
            reentrancy: DebugReentrancy::new(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, const DUPLICATES: bool> fmt::Debug
    for HandleSortedMap<K, V, DUPLICATES>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter_between(0, self.order.len()).map(|(_, k, v)| (k, v)))
            .finish()
    }
}

/// Iterator over entries of a `HandleSortedMap`, in key order.
pub struct Iter<'a, K, V> {
    order: core::slice::Iter<'a, DefaultKey>,
    slots: &'a SlotMap<DefaultKey, Entry<K, V>>,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            order: self.order.clone(),
            slots: self.slots,
        }
    }
}

impl<'a, K, V> Iter<'a, K, V> {
    fn resolve(&self, k: DefaultKey) -> (Handle, &'a K, &'a V) {
        let slots: &'a SlotMap<DefaultKey, Entry<K, V>> = self.slots;
        let e = &slots[k];
        (Handle::new(k), &e.key, &e.value)
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (Handle, &'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let &k = self.order.next()?;
        Some(self.resolve(k))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let &k = self.order.next_back()?;
        Some(self.resolve(k))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Handles of an equal range, in key order.
#[derive(Clone)]
pub struct Handles<'a> {
    order: core::slice::Iter<'a, DefaultKey>,
}

impl Iterator for Handles<'_> {
    type Item = Handle;

    fn next(&mut self) -> Option<Handle> {
        self.order.next().map(|&k| Handle::new(k))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl DoubleEndedIterator for Handles<'_> {
    fn next_back(&mut self) -> Option<Handle> {
        self.order.next_back().map(|&k| Handle::new(k))
    }
}

impl ExactSizeIterator for Handles<'_> {}

impl<K: Ord, V, const DUPLICATES: bool> BaseMap for HandleSortedMap<K, V, DUPLICATES> {
    type Key = K;
    type Value = V;

    const MULTI: bool = DUPLICATES;

    type Iter<'a> = Iter<'a, K, V> where Self: 'a;
    type Handles<'a> = Handles<'a> where Self: 'a;

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn insert(&mut self, key: K, value: V) -> Result<Handle, InsertError> {
        let _g = self.reentrancy.enter();
        let pos = if DUPLICATES {
            // Equal keys go after the existing run.
            self.order.partition_point(|&k| self.slots[k].key <= key)
        } else {
            let pos = self.order.partition_point(|&k| self.slots[k].key < key);
            let taken = self
                .order
                .get(pos)
                .map(|&k| self.slots[k].key == key)
                .unwrap_or(false);
            if taken {
                return Err(InsertError::DuplicateKey);
            }
            pos
        };
        let k = self.slots.insert(Entry { key, value });
        self.order.insert(pos, k);
        Ok(Handle::new(k))
    }

    fn remove(&mut self, handle: Handle) -> Option<(K, V)> {
        let _g = self.reentrancy.enter();
        let k = handle.raw();
        let pos = self.position(k)?;
        self.order.remove(pos);
        let entry = self.slots.remove(k)?;
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
        self.iter_between(0, self.order.len())
    }

    fn clear(&mut self) {
        let _g = self.reentrancy.enter();
        self.order.clear();
        self.slots.clear();
    }

    fn reserve(&mut self, additional: usize) {
        let _g = self.reentrancy.enter();
        self.order.reserve(additional);
        self.slots.reserve(additional);
    }
}

impl<K, V, Q, const DUPLICATES: bool> Lookup<Q> for HandleSortedMap<K, V, DUPLICATES>
where
    K: Ord + Borrow<Q>,
    Q: ?Sized + Ord,
{
    fn find(&self, q: &Q) -> Option<Handle> {
        let _g = self.reentrancy.enter();
        let &k = self.order.get(self.lower_index(q))?;
        let key: &Q = self.slots[k].key.borrow();
        (key == q).then(|| Handle::new(k))
    }

    fn equal_range(&self, q: &Q) -> Handles<'_> {
        let _g = self.reentrancy.enter();
        let lo = self.lower_index(q);
        let hi = self.upper_index(q);
        Handles {
            order: self.order[lo..hi].iter(),
        }
    }
}

impl<K, V, Q, const DUPLICATES: bool> OrderedLookup<Q> for HandleSortedMap<K, V, DUPLICATES>
where
    K: Ord + Borrow<Q>,
    Q: ?Sized + Ord,
{
    fn lower_bound(&self, q: &Q) -> Iter<'_, K, V> {
        let _g = self.reentrancy.enter();
        self.iter_between(self.lower_index(q), self.order.len())
    }

    fn upper_bound(&self, q: &Q) -> Iter<'_, K, V> {
        let _g = self.reentrancy.enter();
        self.iter_between(self.upper_index(q), self.order.len())
    }

    fn range<B>(&self, bounds: B) -> Iter<'_, K, V>
    where
        B: RangeBounds<Q>,
    {
        let _g = self.reentrancy.enter();
        let lo = match bounds.start_bound() {
            Bound::Included(q) => self.lower_index(q),
            Bound::Excluded(q) => self.upper_index(q),
            Bound::Unbounded => 0,
        };
        let hi = match bounds.end_bound() {
            Bound::Included(q) => self.upper_index(q),
            Bound::Excluded(q) => self.lower_index(q),
            Bound::Unbounded => self.order.len(),
        };
        self.iter_between(lo, hi.max(lo))
    }
}

impl<K: Ord, V> UniqueKeys for HandleSortedMap<K, V, false> {}
