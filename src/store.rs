//! Capability traits for the single-direction stores a `BiMap` is built on.
//!
//! A store is an associative container that owns its keys in an arena and
//! hands out [`Handle`]s to them. Handles are generational indices: they stay
//! valid across unrelated insertions and removals and never alias a slot
//! that was freed and reused. `BiMap` keeps, next to every key, the handle of
//! the partner key in the sibling store; that handle is the cross-reference.

use crate::error::InsertError;
use core::ops::RangeBounds;
use slotmap::{DefaultKey, Key};

/// Stable reference to one slot of one store.
///
/// A handle is only meaningful for the store (or the `BiMap` orientation)
/// that produced it. The null handle resolves to nothing.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle(DefaultKey);

impl Handle {
    pub(crate) fn new(k: DefaultKey) -> Self {
        Handle(k)
    }

    pub(crate) fn raw(&self) -> DefaultKey {
        self.0
    }

    /// A handle that never resolves.
    pub fn null() -> Self {
        Handle(DefaultKey::null())
    }

    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }
}

impl Default for Handle {
    fn default() -> Self {
        Self::null()
    }
}

/// Base associative container: key storage plus per-key value, addressed by
/// stable handles.
pub trait BaseMap: Default {
    type Key;
    type Value;

    /// Whether equal keys may be stored more than once.
    const MULTI: bool;

    /// Iterator over `(handle, key, value)` in the store's own order.
    type Iter<'a>: Iterator<Item = (Handle, &'a Self::Key, &'a Self::Value)>
    where
        Self: 'a;

    /// Iterator over the handles of an equal range.
    type Handles<'a>: Iterator<Item = Handle>
    where
        Self: 'a;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a key. Unique stores reject a key equal to a present one;
    /// multi-valued stores always accept.
    fn insert(&mut self, key: Self::Key, value: Self::Value) -> Result<Handle, InsertError>;

    /// Unlink and return the slot's contents. The slot is located by handle
    /// identity, so among equal keys exactly this one is removed.
    fn remove(&mut self, handle: Handle) -> Option<(Self::Key, Self::Value)>;

    fn key(&self, handle: Handle) -> Option<&Self::Key>;

    fn value(&self, handle: Handle) -> Option<&Self::Value>;

    fn value_mut(&mut self, handle: Handle) -> Option<&mut Self::Value>;

    fn iter(&self) -> Self::Iter<'_>;

    fn clear(&mut self);

    fn reserve(&mut self, additional: usize);
}

/// Lookup by a borrowed form `Q` of the key.
pub trait Lookup<Q: ?Sized>: BaseMap {
    fn find(&self, q: &Q) -> Option<Handle>;

    fn contains(&self, q: &Q) -> bool {
        self.find(q).is_some()
    }

    /// All slots whose key equals `q`; at most one for unique stores.
    fn equal_range(&self, q: &Q) -> Self::Handles<'_>;
}

/// Positional lookup for stores that keep their keys sorted.
pub trait OrderedLookup<Q: ?Sized>: Lookup<Q> {
    /// Iterate from the first key not less than `q`.
    fn lower_bound(&self, q: &Q) -> Self::Iter<'_>;

    /// Iterate from the first key greater than `q`.
    fn upper_bound(&self, q: &Q) -> Self::Iter<'_>;

    /// Iterate over the keys inside `bounds`. An inverted range is empty.
    fn range<B>(&self, bounds: B) -> Self::Iter<'_>
    where
        B: RangeBounds<Q>;
}

/// Marker for stores that reject duplicate keys.
pub trait UniqueKeys: BaseMap {}
