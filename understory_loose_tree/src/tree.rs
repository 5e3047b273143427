// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `LooseTree` API: insertion, removal, moves, and loose point/range queries.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::error::Error;
use crate::options::{Allocation, TreeOptions};
use crate::pool::{NO_CHILD, NodeIdx, NodePool, ROOT, node_count};
use crate::types::{Scalar, Vector, le};

/// Caller-supplied identifier of an entry. The tree only records where it lives.
pub type EntryId = u32;

/// Largest supported dimensionality (`2^16` child slots per node).
pub const MAX_DIMENSIONS: usize = 16;

/// A fixed-depth loose tree over a `D`-dimensional world `[0, world_size]`.
///
/// `D = 2` gives a loose quadtree and `D = 3` a loose octree. Every node subdivides its cell in
/// half along each axis, and tests its *loose* cell (the nominal cell grown by half a cell on
/// every side) during queries. An entry is stored at the deepest level whose cell is still at
/// least as large as the entry, so entries straddling a split never need to be pushed up.
///
/// Queries report every entry whose node's loose cell contains the point or overlaps the range.
/// This is a broad phase: results may include entries whose own bounds miss the query.
pub struct LooseTree<T: Scalar, const D: usize> {
    world: Vector<T, D>,
    depth: u32,
    allocation: Allocation,
    pool: NodePool,
    locations: BTreeMap<EntryId, NodeIdx>,
    // Per child slot, where that child's loose cell starts in its parent's percentage space.
    offsets: Vec<Vector<T, D>>,
}

impl<T: Scalar, const D: usize> core::fmt::Debug for LooseTree<T, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LooseTree")
            .field("world", &self.world)
            .field("depth", &self.depth)
            .field("allocation", &self.allocation)
            .field("entries", &self.locations.len())
            .field("used_nodes", &self.pool.used())
            .field("allocated_nodes", &self.pool.allocated())
            .finish_non_exhaustive()
    }
}

impl<T: Scalar, const D: usize> LooseTree<T, D> {
    /// Create a tree with `depth` levels over `[0, world]`.
    pub fn new(world: Vector<T, D>, depth: u32, allocation: Allocation) -> Result<Self, Error> {
        Self::with_options(world, TreeOptions::new(depth).with_allocation(allocation))
    }

    /// Create a tree from explicit [`TreeOptions`].
    pub fn with_options(world: Vector<T, D>, options: TreeOptions) -> Result<Self, Error> {
        if D == 0 || D > MAX_DIMENSIONS {
            return Err(Error::InvalidDimensions(D));
        }
        if !world.is_positive() {
            return Err(Error::InvalidWorldSize);
        }
        let depth = options.depth;
        if depth == 0 {
            return Err(Error::InvalidDepth { depth });
        }

        let fanout = 1_usize << D;
        let pool = match options.allocation {
            Allocation::Static => {
                let count = node_count(depth, D)
                    .filter(|&count| NodeIdx::try_from(count).is_ok())
                    .ok_or(Error::InvalidDepth { depth })?;
                let interior = node_count(depth - 1, D).ok_or(Error::InvalidDepth { depth })?;
                NodePool::new_static(fanout, count, interior)
            }
            Allocation::Dynamic => NodePool::new_dynamic(fanout, options.initial_capacity),
        };

        let quarter = T::half() * T::half();
        let offsets = (0..fanout)
            .map(|slot| {
                Vector::new(core::array::from_fn(|dim| {
                    if (slot >> dim) & 1 == 1 {
                        quarter
                    } else {
                        T::zero() - quarter
                    }
                }))
            })
            .collect();

        log::debug!(
            "created {:?} loose tree: {} dimensions, {} levels, {} nodes allocated",
            options.allocation,
            D,
            depth,
            pool.allocated()
        );

        Ok(Self {
            world,
            depth,
            allocation: options.allocation,
            pool,
            locations: BTreeMap::new(),
            offsets,
        })
    }

    /// Size of the indexed world.
    pub fn world_size(&self) -> Vector<T, D> {
        self.world
    }

    /// Number of levels.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Node pool strategy.
    pub fn allocation(&self) -> Allocation {
        self.allocation
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// True if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// True if `id` is stored.
    pub fn contains(&self, id: EntryId) -> bool {
        self.locations.contains_key(&id)
    }

    /// Index of the node that owns `id`.
    pub fn node_of(&self, id: EntryId) -> Option<u32> {
        self.locations.get(&id).copied()
    }

    /// Level of the node that owns `id` (0 is the root).
    pub fn depth_of(&self, id: EntryId) -> Option<u32> {
        self.locations.get(&id).map(|&node| self.pool.level_of(node))
    }

    /// Entries stored directly at `node`. Empty for unused or out-of-range indices.
    pub fn entries_at(&self, node: u32) -> &[EntryId] {
        if self.pool.is_used(node) {
            self.pool.entries(node)
        } else {
            &[]
        }
    }

    /// Number of live nodes, the root included.
    pub fn used_nodes(&self) -> usize {
        self.pool.used()
    }

    /// Number of node slots backing the pool.
    pub fn allocated_nodes(&self) -> usize {
        self.pool.allocated()
    }

    /// Insert `id` at `position` with extent `size`.
    ///
    /// The entry lands at the deepest level whose loose bound (`world / 2^level`) still
    /// contains `size`, and below the root along the cells containing `position`.
    pub fn add(
        &mut self,
        id: EntryId,
        position: Vector<T, D>,
        size: Vector<T, D>,
    ) -> Result<(), Error> {
        if !size.is_positive() {
            return Err(Error::NonPositiveSize(id));
        }
        if self.locations.contains_key(&id) {
            return Err(Error::DuplicateId(id));
        }
        if !position.is_within_extent(&self.world) {
            return Err(Error::OutOfBounds(id));
        }
        let level = self.level_for_size(&size).ok_or(Error::TooLarge(id))?;
        self.place(id, &position, level);
        Ok(())
    }

    /// Remove `id`, pruning nodes left empty in dynamic trees.
    pub fn remove(&mut self, id: EntryId) -> Result<(), Error> {
        let node = *self.locations.get(&id).ok_or(Error::UnknownId(id))?;
        self.detach(id, node)?;
        self.prune(node);
        Ok(())
    }

    /// Move `id` to `position`.
    ///
    /// The entry keeps the level it was placed at: its depth is not re-derived from its size,
    /// only the path below the root changes. Removing and re-adding the entry is the way to
    /// re-evaluate the level.
    pub fn move_entry(&mut self, id: EntryId, position: Vector<T, D>) -> Result<(), Error> {
        let node = *self.locations.get(&id).ok_or(Error::UnknownId(id))?;
        if !position.is_within_extent(&self.world) {
            return Err(Error::OutOfBounds(id));
        }
        let level = self.pool.level_of(node);
        self.detach(id, node)?;
        self.place(id, &position, level);
        self.prune(node);
        Ok(())
    }

    /// Remove every entry. Node topology, including nodes that are now empty, is kept.
    pub fn clear(&mut self) {
        self.locations.clear();
        self.pool.clear_entries();
    }

    /// Entries whose loose cell contains `point`, in no particular order.
    pub fn query_point(&self, point: Vector<T, D>) -> Vec<EntryId> {
        let mut out = Vec::new();
        self.collect_point(point / self.world, ROOT, &mut out);
        out
    }

    /// Entries whose loose cell overlaps the box `[start, end]`, in no particular order.
    ///
    /// `start` is expected to be componentwise at most `end`; inverted ranges are not
    /// normalized. Root entries are always reported.
    pub fn query_range(&self, start: Vector<T, D>, end: Vector<T, D>) -> Vec<EntryId> {
        let mut out = Vec::new();
        self.collect_range(start / self.world, end / self.world, ROOT, &mut out);
        out
    }

    fn level_for_size(&self, size: &Vector<T, D>) -> Option<u32> {
        let mut bound = self.world;
        for level in 0..self.depth {
            if !size.fits_within(&bound) {
                return level.checked_sub(1);
            }
            bound = bound / T::two();
        }
        Some(self.depth - 1)
    }

    fn place(&mut self, id: EntryId, position: &Vector<T, D>, level: u32) {
        let mut percent = *position / self.world;
        let mut node = ROOT;
        for _ in 0..level {
            let slot = descend(&mut percent);
            node = match self.allocation {
                Allocation::Static => self.pool.child(node, slot),
                Allocation::Dynamic => self.pool.child_or_create(node, slot),
            };
            debug_assert_ne!(node, NO_CHILD, "descent ran past the deepest level");
        }
        self.pool.push_entry(node, id);
        self.locations.insert(id, node);
    }

    fn detach(&mut self, id: EntryId, node: NodeIdx) -> Result<(), Error> {
        if !self.pool.take_entry(node, id) {
            log::error!("id {id} is recorded at node {node} but the node does not hold it");
            return Err(Error::Corrupted { id, node });
        }
        self.locations.remove(&id);
        Ok(())
    }

    /// Free empty leaves from `node` upwards. Stops at the first node that must stay.
    fn prune(&mut self, node: NodeIdx) {
        if self.allocation == Allocation::Static {
            return;
        }
        let mut chain = self.pool.ancestry(node);
        for i in 0..chain.len() {
            let current = chain[i];
            if !self.pool.is_prunable(current) {
                break;
            }
            // Indices further up the chain may name the node relocated into `current`.
            let (_, rest) = chain.split_at_mut(i + 1);
            if self.pool.free(current, rest).is_some() {
                for &entry in self.pool.entries(current) {
                    self.locations.insert(entry, current);
                }
            }
        }
    }

    fn collect_point(&self, percent: Vector<T, D>, node: NodeIdx, out: &mut Vec<EntryId>) {
        out.extend_from_slice(self.pool.entries(node));
        for (slot, &child) in self.pool.children(node).iter().enumerate() {
            if child == NO_CHILD {
                continue;
            }
            let offset = &self.offsets[slot];
            let inside = (0..D).all(|dim| {
                le(offset[dim], percent[dim]) && le(percent[dim], T::one() + offset[dim])
            });
            if inside {
                self.collect_point(into_child(percent, slot), child, out);
            }
        }
    }

    fn collect_range(
        &self,
        start: Vector<T, D>,
        end: Vector<T, D>,
        node: NodeIdx,
        out: &mut Vec<EntryId>,
    ) {
        out.extend_from_slice(self.pool.entries(node));
        for (slot, &child) in self.pool.children(node).iter().enumerate() {
            if child == NO_CHILD {
                continue;
            }
            let offset = &self.offsets[slot];
            let overlaps = (0..D).all(|dim| {
                le(offset[dim], end[dim]) && le(start[dim], T::one() + offset[dim])
            });
            if overlaps {
                self.collect_range(into_child(start, slot), into_child(end, slot), child, out);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &NodePool {
        &self.pool
    }

    #[cfg(test)]
    pub(crate) fn locations(&self) -> &BTreeMap<EntryId, NodeIdx> {
        &self.locations
    }
}

/// Pick the child cell containing `percent` and rescale `percent` into that child's frame.
///
/// A component above one half selects the upper half of its axis and sets bit `dim` of the slot.
fn descend<T: Scalar, const D: usize>(percent: &mut Vector<T, D>) -> usize {
    let mut slot = 0;
    for dim in 0..D {
        if percent[dim] > T::half() {
            slot |= 1 << dim;
            percent[dim] = (percent[dim] - T::half()) * T::two();
        } else {
            percent[dim] = percent[dim] * T::two();
        }
    }
    slot
}

fn into_child<T: Scalar, const D: usize>(mut percent: Vector<T, D>, slot: usize) -> Vector<T, D> {
    for dim in 0..D {
        percent[dim] = if (slot >> dim) & 1 == 1 {
            (percent[dim] - T::half()) * T::two()
        } else {
            percent[dim] * T::two()
        };
    }
    percent
}
