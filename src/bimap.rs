//! BiMap: owner of the forward and inverse stores.
//!
//! Every query and mutation goes through a [`BiMapRef`] / [`BiMapMut`]
//! borrowed from the owner; the methods here are thin forwards to the
//! forward-oriented view.

use crate::error::NotFound;
use crate::handle_hash_map::HandleHashMap;
use crate::handle_sorted_map::HandleSortedMap;
use crate::iter::{Iter, Range};
use crate::store::{BaseMap, Handle, Lookup, OrderedLookup, UniqueKeys};
use crate::view::{BiMapMut, BiMapRef};
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::marker::PhantomData;
use core::ops::RangeBounds;

/// Bidirectional map from `L` to `R`.
///
/// `F` indexes the left keys, `I` the right keys. Each store's values are
/// handles to the partner slot in the other store. The defaults are unique
/// hash stores; see [`OrderedBiMap`] for the sorted flavour.
pub struct BiMap<L, R, F = HandleHashMap<L, Handle>, I = HandleHashMap<R, Handle>> {
    forward: F,
    inverse: I,
    _keys: PhantomData<fn() -> (L, R)>,
}

/// Bidirectional map with both directions kept sorted.
pub type OrderedBiMap<L, R> = BiMap<L, R, HandleSortedMap<L, Handle>, HandleSortedMap<R, Handle>>;

impl<L, R> BiMap<L, R>
where
    L: Eq + Hash,
    R: Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut map = Self::default();
        map.reserve(capacity);
        map
    }
}

impl<L, R, S> BiMap<L, R, HandleHashMap<L, Handle, S>, HandleHashMap<R, Handle, S>>
where
    L: Eq + Hash,
    R: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    /// Both directions hash with clones of `hasher`.
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_stores(
            HandleHashMap::with_hasher(hasher.clone()),
            HandleHashMap::with_hasher(hasher),
        )
    }
}

impl<L, R, F, I> BiMap<L, R, F, I> {
    // Callers hand in stores that are already cross-linked (or both empty).
    pub(crate) fn from_stores(forward: F, inverse: I) -> Self {
        Self {
            forward,
            inverse,
            _keys: PhantomData,
        }
    }

    /// Exchange contents with `other`.
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    /// Re-label the map as its inverse without touching the stores.
    pub fn into_inverse(self) -> BiMap<R, L, I, F> {
        BiMap::from_stores(self.inverse, self.forward)
    }
}

impl<L, R, F, I> BiMap<L, R, F, I>
where
    F: BaseMap<Key = L, Value = Handle>,
    I: BaseMap<Key = R, Value = Handle>,
{
    pub fn view(&self) -> BiMapRef<'_, F, I> {
        BiMapRef::new(&self.forward, &self.inverse)
    }

    pub fn view_mut(&mut self) -> BiMapMut<'_, F, I> {
        BiMapMut::new(&mut self.forward, &mut self.inverse)
    }

    /// Look up and iterate by right key.
    pub fn inverse(&self) -> BiMapRef<'_, I, F> {
        self.view().inverse()
    }

    /// Mutate through the right-keyed orientation.
    pub fn inverse_mut(&mut self) -> BiMapMut<'_, I, F> {
        self.view_mut().inverse()
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn find<Q: ?Sized>(&self, q: &Q) -> Option<Handle>
    where
        F: Lookup<Q>,
    {
        self.view().find(q)
    }

    pub fn contains<Q: ?Sized>(&self, q: &Q) -> bool
    where
        F: Lookup<Q>,
    {
        self.view().contains(q)
    }

    /// Right key paired with the left key `q`.
    pub fn get<Q: ?Sized>(&self, q: &Q) -> Option<&R>
    where
        F: Lookup<Q>,
    {
        self.view().get(q)
    }

    /// Right key paired with `q`, or `NotFound`. Unique left stores only.
    pub fn at<Q: ?Sized>(&self, q: &Q) -> Result<&R, NotFound>
    where
        F: Lookup<Q> + UniqueKeys,
    {
        self.view().at(q)
    }

    pub fn pair(&self, handle: Handle) -> Option<(&L, &R)> {
        self.view().pair(handle)
    }

    pub fn key(&self, handle: Handle) -> Option<&L> {
        self.view().key(handle)
    }

    /// Handle of the right slot paired with `handle`; resolves through
    /// [`inverse`](Self::inverse).
    pub fn partner(&self, handle: Handle) -> Option<Handle> {
        self.view().partner(handle)
    }

    pub fn equal_range<Q: ?Sized>(&self, q: &Q) -> Range<'_, F, I>
    where
        F: Lookup<Q>,
    {
        self.view().equal_range(q)
    }

    pub fn lower_bound<Q: ?Sized>(&self, q: &Q) -> Iter<'_, F, I>
    where
        F: OrderedLookup<Q>,
    {
        self.view().lower_bound(q)
    }

    pub fn upper_bound<Q: ?Sized>(&self, q: &Q) -> Iter<'_, F, I>
    where
        F: OrderedLookup<Q>,
    {
        self.view().upper_bound(q)
    }

    pub fn range<Q: ?Sized, B>(&self, bounds: B) -> Iter<'_, F, I>
    where
        F: OrderedLookup<Q>,
        B: RangeBounds<Q>,
    {
        self.view().range(bounds)
    }

    pub fn iter(&self) -> Iter<'_, F, I> {
        self.view().iter()
    }

    /// Insert `(left, right)`. Returns the new pair's handle and `true`, or
    /// the handle of the pair already holding one of the keys and `false`.
    pub fn emplace(&mut self, left: L, right: R) -> (Handle, bool)
    where
        F: Lookup<L>,
        I: Lookup<R>,
    {
        self.view_mut().emplace(left, right)
    }

    pub fn remove(&mut self, handle: Handle) -> Option<(L, R)> {
        self.view_mut().remove(handle)
    }

    /// Remove every pair with left key `q`; returns how many were removed.
    pub fn remove_key<Q: ?Sized>(&mut self, q: &Q) -> usize
    where
        F: Lookup<Q>,
    {
        self.view_mut().remove_key(q)
    }

    pub fn remove_range<Q: ?Sized, B>(&mut self, bounds: B) -> usize
    where
        F: OrderedLookup<Q>,
        B: RangeBounds<Q>,
    {
        self.view_mut().remove_range(bounds)
    }

    pub fn retain<P>(&mut self, keep: P) -> usize
    where
        P: FnMut(&L, &R) -> bool,
    {
        self.view_mut().retain(keep)
    }

    pub fn clear(&mut self) {
        self.view_mut().clear();
    }

    pub fn reserve(&mut self, additional: usize) {
        self.view_mut().reserve(additional);
    }
}

/// Exchange the contents of two maps.
pub fn swap<L, R, F, I>(a: &mut BiMap<L, R, F, I>, b: &mut BiMap<L, R, F, I>) {
    a.swap(b);
}

impl<L, R, F, I> Default for BiMap<L, R, F, I>
where
    F: BaseMap<Key = L, Value = Handle>,
    I: BaseMap<Key = R, Value = Handle>,
{
    fn default() -> Self {
        Self::from_stores(F::default(), I::default())
    }
}

// Stores clone arena slots in place, so partner handles stay valid in the
// copy and nothing is shared with the original.
impl<L, R, F: Clone, I: Clone> Clone for BiMap<L, R, F, I> {
    fn clone(&self) -> Self {
        Self::from_stores(self.forward.clone(), self.inverse.clone())
    }
}

impl<L, R, F, I> PartialEq for BiMap<L, R, F, I>
where
    F: BaseMap<Key = L, Value = Handle> + Lookup<L>,
    I: BaseMap<Key = R, Value = Handle> + Lookup<R>,
    L: PartialEq,
    R: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.view() == other.view()
    }
}

impl<L, R, F, I> Eq for BiMap<L, R, F, I>
where
    F: BaseMap<Key = L, Value = Handle> + Lookup<L>,
    I: BaseMap<Key = R, Value = Handle> + Lookup<R>,
    L: Eq,
    R: Eq,
{
}

impl<L, R, F, I> fmt::Debug for BiMap<L, R, F, I>
where
    F: BaseMap<Key = L, Value = Handle>,
    I: BaseMap<Key = R, Value = Handle>,
    L: fmt::Debug,
    R: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<L, R, F, I> Extend<(L, R)> for BiMap<L, R, F, I>
where
    F: BaseMap<Key = L, Value = Handle> + Lookup<L>,
    I: BaseMap<Key = R, Value = Handle> + Lookup<R>,
{
    /// Pairs rejected by a unique store are dropped, as with `emplace`.
    fn extend<T: IntoIterator<Item = (L, R)>>(&mut self, iter: T) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        let mut view = self.view_mut();
        for (left, right) in iter {
            view.emplace(left, right);
        }
    }
}

impl<L, R, F, I> FromIterator<(L, R)> for BiMap<L, R, F, I>
where
    F: BaseMap<Key = L, Value = Handle> + Lookup<L>,
    I: BaseMap<Key = R, Value = Handle> + Lookup<R>,
{
    fn from_iter<T: IntoIterator<Item = (L, R)>>(iter: T) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<L, R, F, I, const N: usize> From<[(L, R); N]> for BiMap<L, R, F, I>
where
    F: BaseMap<Key = L, Value = Handle> + Lookup<L>,
    I: BaseMap<Key = R, Value = Handle> + Lookup<R>,
{
    fn from(pairs: [(L, R); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<'a, L, R, F, I> IntoIterator for &'a BiMap<L, R, F, I>
where
    F: BaseMap<Key = L, Value = Handle>,
    I: BaseMap<Key = R, Value = Handle>,
{
    type Item = (&'a L, &'a R);
    type IntoIter = Iter<'a, F, I>;

    fn into_iter(self) -> Iter<'a, F, I> {
        self.iter()
    }
}
