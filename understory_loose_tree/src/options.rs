// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction parameters for [`LooseTree`](crate::LooseTree).

/// How the node pool is populated.
///
/// The mode is fixed for the lifetime of a tree.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Allocation {
    /// Every node of the complete tree is allocated and wired at construction.
    ///
    /// Descent is plain indexing; nodes are never created or recycled. Memory grows as
    /// `2^(D * (depth - 1))`, so this suits shallow trees over densely populated worlds.
    Static,
    /// Nodes are created on demand while descending and recycled when they become empty.
    ///
    /// The pool starts small and doubles whenever it runs out of free slots.
    #[default]
    Dynamic,
}

/// Options used by [`LooseTree::with_options`](crate::LooseTree::with_options).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TreeOptions {
    /// Number of levels. Nodes live at levels `0..depth`, so entries are placed at most at `depth - 1`.
    pub depth: u32,
    /// Node pool strategy.
    pub allocation: Allocation,
    /// Initial pool capacity in nodes for [`Allocation::Dynamic`]. Ignored for static trees.
    pub initial_capacity: usize,
}

impl TreeOptions {
    /// Default initial capacity of a dynamic pool.
    pub const DEFAULT_CAPACITY: usize = 8;

    /// Options for a tree with the given number of levels and default everything else.
    pub const fn new(depth: u32) -> Self {
        Self {
            depth,
            allocation: Allocation::Dynamic,
            initial_capacity: Self::DEFAULT_CAPACITY,
        }
    }

    /// Set the number of levels.
    #[must_use]
    pub const fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Set the node pool strategy.
    #[must_use]
    pub const fn with_allocation(mut self, allocation: Allocation) -> Self {
        self.allocation = allocation;
        self
    }

    /// Set the initial dynamic pool capacity. Values below one are treated as one.
    #[must_use]
    pub const fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self::new(4)
    }
}
