//! Pair iterators over one orientation of a bidirectional map.
//!
//! Both iterators walk the forward store and resolve each slot's partner
//! handle in the inverse store on the fly. Nothing is copied; items borrow
//! the keys in place.

use crate::store::{BaseMap, Handle};
use core::fmt;
use core::iter::FusedIterator;

// A forward slot whose partner handle does not resolve means the two stores
// disagree, which every mutating path rules out.
#[inline]
pub(crate) fn partner_key<I: BaseMap>(inverse: &I, partner: Handle) -> &I::Key {
    inverse
        .key(partner)
        .expect("bimap stores out of sync: dangling partner handle")
}

/// Iterator over `(&forward, &inverse)` pairs, in the forward store's order.
///
/// Double-ended and exact-size whenever the forward store's iterator is.
pub struct Iter<'a, F: BaseMap + 'a, I: 'a> {
    base: F::Iter<'a>,
    inverse: &'a I,
}

impl<'a, F: BaseMap + 'a, I: 'a> Iter<'a, F, I> {
    pub(crate) fn new(base: F::Iter<'a>, inverse: &'a I) -> Self {
        Self { base, inverse }
    }
}

impl<'a, F, I> Clone for Iter<'a, F, I>
where
    F: BaseMap + 'a,
    F::Iter<'a>: Clone,
{
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            inverse: self.inverse,
        }
    }
}

impl<'a, F, I> Iterator for Iter<'a, F, I>
where
    F: BaseMap<Value = Handle> + 'a,
    I: BaseMap + 'a,
{
    type Item = (&'a F::Key, &'a I::Key);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let inverse: &'a I = self.inverse;
        let (_, key, &partner) = self.base.next()?;
        Some((key, partner_key(inverse, partner)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.base.size_hint()
    }
}

impl<'a, F, I> DoubleEndedIterator for Iter<'a, F, I>
where
    F: BaseMap<Value = Handle> + 'a,
    F::Iter<'a>: DoubleEndedIterator,
    I: BaseMap + 'a,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let inverse: &'a I = self.inverse;
        let (_, key, &partner) = self.base.next_back()?;
        Some((key, partner_key(inverse, partner)))
    }
}

impl<'a, F, I> ExactSizeIterator for Iter<'a, F, I>
where
    F: BaseMap<Value = Handle> + 'a,
    F::Iter<'a>: ExactSizeIterator,
    I: BaseMap + 'a,
{
}

impl<'a, F, I> FusedIterator for Iter<'a, F, I>
where
    F: BaseMap<Value = Handle> + 'a,
    F::Iter<'a>: FusedIterator,
    I: BaseMap + 'a,
{
}

impl<'a, F, I> fmt::Debug for Iter<'a, F, I>
where
    F: BaseMap + 'a,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").finish_non_exhaustive()
    }
}

/// Pairs whose forward key equals a query, as returned by `equal_range`.
pub struct Range<'a, F: BaseMap + 'a, I: 'a> {
    handles: F::Handles<'a>,
    forward: &'a F,
    inverse: &'a I,
}

impl<'a, F: BaseMap + 'a, I: 'a> Range<'a, F, I> {
    pub(crate) fn new(handles: F::Handles<'a>, forward: &'a F, inverse: &'a I) -> Self {
        Self {
            handles,
            forward,
            inverse,
        }
    }
}

impl<'a, F, I> Range<'a, F, I>
where
    F: BaseMap<Value = Handle> + 'a,
    I: BaseMap + 'a,
{
    fn resolve(&self, handle: Handle) -> (&'a F::Key, &'a I::Key) {
        let forward: &'a F = self.forward;
        let inverse: &'a I = self.inverse;
        let key = forward
            .key(handle)
            .expect("equal_range yielded a handle its store does not hold");
        let &partner = forward
            .value(handle)
            .expect("equal_range yielded a handle its store does not hold");
        (key, partner_key(inverse, partner))
    }
}

impl<'a, F, I> Iterator for Range<'a, F, I>
where
    F: BaseMap<Value = Handle> + 'a,
    I: BaseMap + 'a,
{
    type Item = (&'a F::Key, &'a I::Key);

    fn next(&mut self) -> Option<Self::Item> {
        let h = self.handles.next()?;
        Some(self.resolve(h))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.handles.size_hint()
    }
}

impl<'a, F, I> DoubleEndedIterator for Range<'a, F, I>
where
    F: BaseMap<Value = Handle> + 'a,
    F::Handles<'a>: DoubleEndedIterator,
    I: BaseMap + 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        let h = self.handles.next_back()?;
        Some(self.resolve(h))
    }
}

impl<'a, F, I> ExactSizeIterator for Range<'a, F, I>
where
    F: BaseMap<Value = Handle> + 'a,
    F::Handles<'a>: ExactSizeIterator,
    I: BaseMap + 'a,
{
}
