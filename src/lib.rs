//! bidi-map: a bidirectional map that stores each key once and looks up
//! pairs from either side.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep two single-direction stores in lockstep so that every left
//!   key maps to exactly one right key and back, without copying keys.
//! - Layers:
//!   - Stores (`HandleHashMap`, `HandleSortedMap`, `HandleSortedMultiMap`):
//!     associative containers over a `slotmap` arena that return stable,
//!     generational `Handle`s; each carries a debug-only reentrancy guard.
//!   - Views (`BiMapRef`, `BiMapMut`): borrow both stores and label one
//!     forward and one inverse. All synchronization logic lives here.
//!   - `BiMap<L, R, F, I>`: owns both stores and hands out views. The
//!     inverse view is the same pair of stores with the labels swapped.
//!
//! Cross-references
//! - A store's value for each key is the handle of the partner slot in
//!   the sibling store. Handles are arena indices, not addresses, so
//!   moving or cloning a `BiMap` needs no fix-up and cannot dangle.
//! - Removal locates the partner slot through the stored handle, never by
//!   comparing keys, so exactly one slot goes even among equal keys.
//!
//! Invariants (after every public call)
//! - Both stores hold the same number of keys.
//! - For each forward slot `h -> p`, the inverse slot `p` holds `h`.
//! - Unique stores keep their direction injective; a multi-valued store
//!   relaxes only its own direction.
//!
//! Insertion is two-phase: the left key goes in with a null partner, then
//! the right key, then the left slot is back-patched. If the right insert
//! panics, a scope guard removes the left slot before the panic continues.
//!
//! Constraints
//! - Single-threaded; stores are `!Send`/`!Sync`.
//! - Keys are immutable once inserted; there is no `key_mut`.
//! - Panics from user `Hash`/`Eq`/`Ord` propagate unchanged. In debug
//!   builds a store panics if such a callback reenters it.
//!
//! Feature `serde` adds `Serialize`/`Deserialize` for `BiMap` as a
//! sequence of pairs.

mod bimap;
mod error;
pub mod handle_hash_map;
pub mod handle_sorted_map;
mod iter;
mod reentrancy;
#[cfg(feature = "serde")]
mod serde_impl;
mod store;
mod store_proptest;
mod view;

// Public surface
pub use bimap::{swap, BiMap, OrderedBiMap};
pub use error::{InsertError, NotFound};
pub use handle_hash_map::HandleHashMap;
pub use handle_sorted_map::{HandleSortedMap, HandleSortedMultiMap};
pub use iter::{Iter, Range};
pub use store::{BaseMap, Handle, Lookup, OrderedLookup, UniqueKeys};
pub use view::{BiMapMut, BiMapRef};
