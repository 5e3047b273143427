// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_loose_tree --heading-base-level=0

//! Understory Loose Tree: a fixed-depth, N-dimensional loose quadtree/octree.
//!
//! Understory Loose Tree is a broad-phase building block for games and simulations.
//!
//! - Add, move, and remove entries identified by caller-chosen `u32` ids, each with a position and a size.
//! - Query by point or axis-aligned range; results are every entry whose node's *loose* cell matches.
//! - Pick between a fully pre-allocated node pool and a dynamically grown one at construction.
//!
//! The tree covers a fixed world `[0, world_size]` in `D` dimensions and subdivides each cell into
//! `2^D` children, down to a fixed number of levels. Each entry is stored at the deepest level whose
//! cell is still at least as large as the entry. Queries test loose cells (nominal cells grown by half
//! a cell on every side), so an entry overlapping a split never has to be pushed towards the root, and
//! small moves rarely change which node owns it.
//!
//! # Example
//!
//! ```rust
//! use understory_loose_tree::{Allocation, LooseTree, Vector};
//!
//! // A 100×100 world with three levels.
//! let mut tree: LooseTree<f32, 2> =
//!     LooseTree::new(Vector::new([100.0, 100.0]), 3, Allocation::Dynamic).unwrap();
//!
//! tree.add(1, Vector::new([10.0, 10.0]), Vector::new([5.0, 5.0])).unwrap();
//! tree.add(2, Vector::new([90.0, 90.0]), Vector::new([50.0, 50.0])).unwrap();
//!
//! assert_eq!(tree.query_point(Vector::new([10.0, 10.0])), [1]);
//!
//! let mut all = tree.query_range(Vector::new([0.0, 0.0]), Vector::new([100.0, 100.0]));
//! all.sort();
//! assert_eq!(all, [1, 2]);
//!
//! tree.remove(1).unwrap();
//! assert!(tree.query_point(Vector::new([10.0, 10.0])).is_empty());
//! ```
//!
//! ## Choosing an allocation mode
//!
//! - [`Allocation::Dynamic`] (default): starts with the root only, creates nodes along the path of each
//!   insertion, and frees nodes that end up empty. The pool grows by doubling and stays dense: a freed
//!   slot is filled by the last live node. Good for deep trees and sparse worlds.
//! - [`Allocation::Static`]: allocates and wires the complete tree up front and never frees anything.
//!   Descent is plain indexing. Good for shallow trees over densely populated worlds.
//!
//! Both modes answer every query identically.
//!
//! ## Moves keep their level
//!
//! [`LooseTree::move_entry`] only changes the path below the root. The entry's level is the one chosen
//! when it was added, even if it is moved somewhere a fresh insertion would pick differently. Remove and
//! re-add an entry whose size changed.
//!
//! ## Errors
//!
//! Invalid input (duplicate or unknown ids, positions outside the world, empty or oversized entries) is
//! reported through [`Error`] before anything is modified. [`Error::Corrupted`] is different: it means the
//! tree's bookkeeping was already inconsistent, and [`Error::is_fatal`] singles it out.
//!
//! ### Float semantics
//!
//! Coordinates are assumed finite. NaN positions and sizes fail validation.
//!
//! With the `kurbo` feature (on by default), 2D trees over `f64` also accept Kurbo points, sizes, and
//! rectangles.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod error;
pub mod options;
pub mod tree;
pub mod types;

mod pool;

#[cfg(feature = "kurbo")]
mod kurbo_interop;


pub use error::Error;
pub use options::{Allocation, TreeOptions};
pub use tree::{EntryId, LooseTree, MAX_DIMENSIONS};
pub use types::{Scalar, Vector};
