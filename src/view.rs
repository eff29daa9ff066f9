//! Borrowed views over the two stores of a bidirectional map.
//!
//! A view holds one reference to each store and labels them forward and
//! inverse. Flipping the labels is all `inverse()` does, so a view and its
//! inverse always see the same pairs. Every algorithm that keeps the stores
//! in step lives here; `BiMap` only hands out views.
//!
//! Cross-references are handles: a forward slot's value is the handle of its
//! partner in the inverse store, and vice versa.

use crate::bimap::BiMap;
use crate::error::NotFound;
use crate::iter::{partner_key, Iter, Range};
use crate::store::{BaseMap, Handle, Lookup, OrderedLookup, UniqueKeys};
use core::fmt;
use core::ops::RangeBounds;
use scopeguard::ScopeGuard;
use tracing::{trace, warn};

/// Shared view of a bidirectional map in one orientation.
pub struct BiMapRef<'a, F, I> {
    forward: &'a F,
    inverse: &'a I,
}

impl<F, I> Clone for BiMapRef<'_, F, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F, I> Copy for BiMapRef<'_, F, I> {}

/// Exclusive view of a bidirectional map in one orientation.
pub struct BiMapMut<'a, F, I> {
    forward: &'a mut F,
    inverse: &'a mut I,
}

impl<'a, F, I> BiMapRef<'a, F, I>
where
    F: BaseMap<Value = Handle>,
    I: BaseMap<Value = Handle>,
{
    pub(crate) fn new(forward: &'a F, inverse: &'a I) -> Self {
        Self { forward, inverse }
    }

    /// The same pairs with the key roles swapped.
    pub fn inverse(self) -> BiMapRef<'a, I, F> {
        BiMapRef {
            forward: self.inverse,
            inverse: self.forward,
        }
    }

    pub fn len(self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(self) -> bool {
        self.forward.is_empty()
    }

    /// Handle of a pair whose forward key equals `q`.
    pub fn find<Q: ?Sized>(self, q: &Q) -> Option<Handle>
    where
        F: Lookup<Q>,
    {
        self.forward.find(q)
    }

    pub fn contains<Q: ?Sized>(self, q: &Q) -> bool
    where
        F: Lookup<Q>,
    {
        self.forward.contains(q)
    }

    /// Partner of the forward key `q`.
    pub fn get<Q: ?Sized>(self, q: &Q) -> Option<&'a I::Key>
    where
        F: Lookup<Q>,
    {
        let h = self.forward.find(q)?;
        self.pair(h).map(|(_, r)| r)
    }

    /// Like `get`, but a miss is an error.
    pub fn at<Q: ?Sized>(self, q: &Q) -> Result<&'a I::Key, NotFound>
    where
        F: Lookup<Q> + UniqueKeys,
    {
        self.get(q).ok_or(NotFound)
    }

    /// Both keys of the pair at `handle`; `None` for stale or null handles.
    pub fn pair(self, handle: Handle) -> Option<(&'a F::Key, &'a I::Key)> {
        let forward: &'a F = self.forward;
        let key = forward.key(handle)?;
        let &partner = forward.value(handle)?;
        Some((key, partner_key(self.inverse, partner)))
    }

    pub fn key(self, handle: Handle) -> Option<&'a F::Key> {
        let forward: &'a F = self.forward;
        forward.key(handle)
    }

    /// Handle of the partner slot, valid in the inverse orientation.
    pub fn partner(self, handle: Handle) -> Option<Handle> {
        self.forward.value(handle).copied()
    }

    /// All pairs whose forward key equals `q`.
    pub fn equal_range<Q: ?Sized>(self, q: &Q) -> Range<'a, F, I>
    where
        F: Lookup<Q>,
    {
        let forward: &'a F = self.forward;
        Range::new(forward.equal_range(q), forward, self.inverse)
    }

    pub fn lower_bound<Q: ?Sized>(self, q: &Q) -> Iter<'a, F, I>
    where
        F: OrderedLookup<Q>,
    {
        let forward: &'a F = self.forward;
        Iter::new(forward.lower_bound(q), self.inverse)
    }

    pub fn upper_bound<Q: ?Sized>(self, q: &Q) -> Iter<'a, F, I>
    where
        F: OrderedLookup<Q>,
    {
        let forward: &'a F = self.forward;
        Iter::new(forward.upper_bound(q), self.inverse)
    }

    pub fn range<Q: ?Sized, B>(self, bounds: B) -> Iter<'a, F, I>
    where
        F: OrderedLookup<Q>,
        B: RangeBounds<Q>,
    {
        let forward: &'a F = self.forward;
        Iter::new(forward.range(bounds), self.inverse)
    }

    pub fn iter(self) -> Iter<'a, F, I> {
        let forward: &'a F = self.forward;
        Iter::new(forward.iter(), self.inverse)
    }

    /// Copy the pairs into a new owned map in this view's orientation.
    pub fn to_owned(self) -> BiMap<F::Key, I::Key, F, I>
    where
        F: Clone,
        I: Clone,
    {
        BiMap::from_stores(self.forward.clone(), self.inverse.clone())
    }
}

impl<'a, F, I> IntoIterator for BiMapRef<'a, F, I>
where
    F: BaseMap<Value = Handle>,
    I: BaseMap<Value = Handle>,
{
    type Item = (&'a F::Key, &'a I::Key);
    type IntoIter = Iter<'a, F, I>;

    fn into_iter(self) -> Iter<'a, F, I> {
        self.iter()
    }
}

impl<F, I> fmt::Debug for BiMapRef<'_, F, I>
where
    F: BaseMap<Value = Handle>,
    I: BaseMap<Value = Handle>,
    F::Key: fmt::Debug,
    I::Key: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

// One direction of equality: same keys with the same partners. Unique stores
// match keys by lookup; multi-valued stores compare position by position, so
// insertion order among equal keys matters there.
fn side_eq<F, I>(a: &F, a_partners: &I, b: &F, b_partners: &I) -> bool
where
    F: BaseMap<Value = Handle> + Lookup<<F as BaseMap>::Key>,
    I: BaseMap,
    I::Key: PartialEq,
    F::Key: PartialEq,
{
    if a.len() != b.len() {
        return false;
    }
    if F::MULTI {
        return a
            .iter()
            .zip(b.iter())
            .all(|((_, ka, &pa), (_, kb, &pb))| {
                ka == kb && partner_key(a_partners, pa) == partner_key(b_partners, pb)
            });
    }
    a.iter().all(|(_, k, &pa)| {
        b.find(k)
            .and_then(|h| b.value(h))
            .map(|&pb| partner_key(a_partners, pa) == partner_key(b_partners, pb))
            .unwrap_or(false)
    })
}

impl<'b, F, I> PartialEq<BiMapRef<'b, F, I>> for BiMapRef<'_, F, I>
where
    F: BaseMap<Value = Handle> + Lookup<<F as BaseMap>::Key>,
    I: BaseMap<Value = Handle> + Lookup<<I as BaseMap>::Key>,
    F::Key: PartialEq,
    I::Key: PartialEq,
{
    fn eq(&self, other: &BiMapRef<'b, F, I>) -> bool {
        side_eq(self.forward, self.inverse, other.forward, other.inverse)
            && side_eq(self.inverse, self.forward, other.inverse, other.forward)
    }
}

impl<'a, F, I> BiMapMut<'a, F, I>
where
    F: BaseMap<Value = Handle>,
    I: BaseMap<Value = Handle>,
{
    pub(crate) fn new(forward: &'a mut F, inverse: &'a mut I) -> Self {
        Self { forward, inverse }
    }

    /// Shorter-lived copy of this view, for chaining without consuming it.
    pub fn reborrow(&mut self) -> BiMapMut<'_, F, I> {
        BiMapMut {
            forward: &mut *self.forward,
            inverse: &mut *self.inverse,
        }
    }

    pub fn as_ref(&self) -> BiMapRef<'_, F, I> {
        BiMapRef::new(&*self.forward, &*self.inverse)
    }

    /// The same pairs with the key roles swapped.
    pub fn inverse(self) -> BiMapMut<'a, I, F> {
        BiMapMut {
            forward: self.inverse,
            inverse: self.forward,
        }
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Insert the pair `(left, right)` unless a unique store already holds
    /// one of the keys.
    ///
    /// Returns the handle of the new pair and `true`, or the handle of the
    /// pair that blocked the insertion and `false`. A blocking inverse key is
    /// reported through the handle of its forward partner.
    pub fn emplace(&mut self, left: F::Key, right: I::Key) -> (Handle, bool)
    where
        F: Lookup<<F as BaseMap>::Key>,
        I: Lookup<<I as BaseMap>::Key>,
    {
        if !F::MULTI {
            if let Some(h) = self.forward.find(&left) {
                trace!("emplace rejected: forward key already present");
                return (h, false);
            }
        }
        if !I::MULTI {
            if let Some(p) = self.inverse.find(&right) {
                trace!("emplace rejected: inverse key already present");
                let h = self.inverse.value(p).copied().unwrap_or_default();
                return (h, false);
            }
        }

        // Forward slot first, with a placeholder partner.
        let h = match self.forward.insert(left, Handle::null()) {
            Ok(h) => h,
            Err(err) => {
                warn!(%err, "forward store rejected a key its lookup missed");
                return (Handle::null(), false);
            }
        };

        // If the inverse insert unwinds, drop the half-built pair.
        let mut forward = scopeguard::guard_on_unwind(&mut *self.forward, move |store| {
            warn!("inverse insert panicked; rolling back forward slot");
            let _ = store.remove(h);
        });
        match self.inverse.insert(right, h) {
            Ok(p) => {
                if let Some(slot) = forward.value_mut(h) {
                    *slot = p;
                }
                (h, true)
            }
            Err(err) => {
                let store = ScopeGuard::into_inner(forward);
                let _ = store.remove(h);
                warn!(%err, "inverse store rejected a key its lookup missed; rolled back");
                (Handle::null(), false)
            }
        }
    }

    /// Remove the pair at `handle` from both stores. Stale and null handles
    /// are a no-op, as is a forward slot whose partner is missing.
    pub fn remove(&mut self, handle: Handle) -> Option<(F::Key, I::Key)> {
        let &partner = self.forward.value(handle)?;
        if self.inverse.key(partner).is_none() {
            warn!("inverse store lost the partner of a pair; leaving it in place");
            return None;
        }
        let (left, _) = self.forward.remove(handle)?;
        let (right, _) = self.inverse.remove(partner)?;
        Some((left, right))
    }

    /// Remove every pair whose forward key equals `q`; returns how many.
    pub fn remove_key<Q: ?Sized>(&mut self, q: &Q) -> usize
    where
        F: Lookup<Q>,
    {
        let doomed: Vec<Handle> = self.forward.equal_range(q).collect();
        self.remove_all(doomed)
    }

    /// Remove every pair whose forward key lies inside `bounds`.
    pub fn remove_range<Q: ?Sized, B>(&mut self, bounds: B) -> usize
    where
        F: OrderedLookup<Q>,
        B: RangeBounds<Q>,
    {
        let doomed: Vec<Handle> = self.forward.range(bounds).map(|(h, _, _)| h).collect();
        self.remove_all(doomed)
    }

    /// Keep only the pairs for which `keep` returns `true`.
    pub fn retain<P>(&mut self, mut keep: P) -> usize
    where
        P: FnMut(&F::Key, &I::Key) -> bool,
    {
        let inverse: &I = &*self.inverse;
        let doomed: Vec<Handle> = self
            .forward
            .iter()
            .filter(|(_, k, &p)| !keep(*k, partner_key(inverse, p)))
            .map(|(h, _, _)| h)
            .collect();
        self.remove_all(doomed)
    }

    fn remove_all(&mut self, doomed: Vec<Handle>) -> usize {
        let removed = doomed
            .into_iter()
            .filter(|&h| self.remove(h).is_some())
            .count();
        trace!(removed, "bulk erase");
        removed
    }

    pub fn clear(&mut self) {
        trace!(len = self.forward.len(), "clearing bidirectional map");
        self.forward.clear();
        self.inverse.clear();
    }

    pub fn reserve(&mut self, additional: usize) {
        self.forward.reserve(additional);
        self.inverse.reserve(additional);
    }
}

impl<F, I> fmt::Debug for BiMapMut<'_, F, I>
where
    F: BaseMap<Value = Handle>,
    I: BaseMap<Value = Handle>,
    F::Key: fmt::Debug,
    I::Key: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_ref().fmt(f)
    }
}
