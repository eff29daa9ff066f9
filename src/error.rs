//! Error types surfaced by stores and the map facade.

use thiserror::Error;

/// Returned by [`BaseMap::insert`](crate::BaseMap::insert) on a unique-key
/// store when an equal key is already present. The rejected key is dropped.
#[derive(Error, Copy, Clone, Debug, Eq, PartialEq)]
pub enum InsertError {
    #[error("key is already present in the store")]
    DuplicateKey,
}

/// Returned by `at` when no pair has the requested key.
#[derive(Error, Copy, Clone, Debug, Default, Eq, PartialEq)]
#[error("bidirectional map key not found")]
pub struct NotFound;
