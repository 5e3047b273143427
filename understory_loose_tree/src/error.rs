// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by [`LooseTree`](crate::LooseTree).

use crate::tree::EntryId;

/// Everything that can go wrong when building or mutating a tree.
///
/// All variants except [`Error::Corrupted`] are validation failures: they are detected
/// before any state changes, so the tree is exactly as it was before the call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The world size has a zero, negative, or NaN component.
    #[error("tree size must be bigger than zero in all dimensions")]
    InvalidWorldSize,
    /// The requested depth is zero or yields more nodes than a slot index can address.
    #[error("tree depth {depth} is not supported for this dimensionality")]
    InvalidDepth {
        /// The rejected depth.
        depth: u32,
    },
    /// The dimensionality is zero or too large to enumerate child slots.
    #[error("trees with {0} dimensions are not supported")]
    InvalidDimensions(usize),
    /// The id is already present in the tree.
    #[error("cannot add id {0} twice")]
    DuplicateId(EntryId),
    /// The id is not present in the tree.
    #[error("id {0} does not exist")]
    UnknownId(EntryId),
    /// The position lies outside `[0, world size]` in some dimension.
    #[error("id {0} is out of the tree's bounds")]
    OutOfBounds(EntryId),
    /// The entry size has a zero, negative, or NaN component.
    #[error("id {0} must have a size bigger than zero")]
    NonPositiveSize(EntryId),
    /// The entry size exceeds the world size in some dimension.
    #[error("id {0} is larger than the tree")]
    TooLarge(EntryId),
    /// An entry was recorded at a node whose entry set does not contain it.
    ///
    /// This means the tree was already inconsistent before the call. It is never a normal
    /// outcome; callers should treat it as a bug and stop using the tree.
    #[error("internal invariant violated: id {id} recorded at node {node} but missing from it")]
    Corrupted {
        /// The entry being removed.
        id: EntryId,
        /// The node the entry was recorded under.
        node: u32,
    },
}

impl Error {
    /// True for internal invariant violations, false for ordinary validation errors.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Corrupted { .. })
    }
}
