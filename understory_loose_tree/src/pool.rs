// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Index-addressed node pool shared by both allocation modes.
//!
//! Nodes are never referenced by address. Child slots, parent links, and the entry map all
//! store plain indices, so growing the backing vectors cannot leave anything dangling.

use alloc::vec;
use alloc::vec::Vec;

use crate::tree::EntryId;

/// Index of a node in the pool.
pub(crate) type NodeIdx = u32;

/// The root always lives at index 0 and is never freed.
pub(crate) const ROOT: NodeIdx = 0;

/// Marks an empty child slot. The root can never be a child, so 0 is free to mean "none".
pub(crate) const NO_CHILD: NodeIdx = 0;

/// Number of nodes in a complete tree with `levels` levels and `2^dims` children per node.
pub(crate) fn node_count(levels: u32, dims: usize) -> Option<usize> {
    let fanout = 1_usize.checked_shl(u32::try_from(dims).ok()?)?;
    let mut total = 0_usize;
    let mut level_nodes = 1_usize;
    for level in 0..levels {
        if level > 0 {
            level_nodes = level_nodes.checked_mul(fanout)?;
        }
        total = total.checked_add(level_nodes)?;
    }
    Some(total)
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Pool sizes are bounded by the u32 slot index; static counts are validated at construction."
)]
const fn to_idx(i: usize) -> NodeIdx {
    i as NodeIdx
}

/// Node storage: `2^D` child slots and one parent per node, plus the entries each node owns.
///
/// Slots `[0, used)` are live. Slots `[used, allocated)` are clean: no children, no entries.
#[derive(Clone, Debug)]
pub(crate) struct NodePool {
    fanout: usize,
    children: Vec<NodeIdx>,
    parents: Vec<NodeIdx>,
    entries: Vec<Vec<EntryId>>,
    used: usize,
}

impl NodePool {
    /// A pool holding only the root, with room for `capacity` nodes before it must grow.
    pub(crate) fn new_dynamic(fanout: usize, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            fanout,
            children: vec![NO_CHILD; capacity * fanout],
            parents: vec![ROOT; capacity],
            entries: vec![Vec::new(); capacity],
            used: 1,
        }
    }

    /// A fully wired complete tree of `count` nodes, all considered used.
    ///
    /// `interior` is the number of nodes that have children, i.e. every level except the last.
    pub(crate) fn new_static(fanout: usize, count: usize, interior: usize) -> Self {
        let mut pool = Self {
            fanout,
            children: vec![NO_CHILD; count * fanout],
            parents: vec![ROOT; count],
            entries: vec![Vec::new(); count],
            used: count,
        };
        // Breadth-first numbering: children of node `i` are the next `fanout` unclaimed indices.
        let mut next = 1_usize;
        for node in 0..interior {
            for slot in 0..fanout {
                pool.children[node * fanout + slot] = to_idx(next);
                pool.parents[next] = to_idx(node);
                next += 1;
            }
        }
        debug_assert_eq!(next, count, "static wiring must cover every node");
        pool
    }

    pub(crate) fn used(&self) -> usize {
        self.used
    }

    pub(crate) fn allocated(&self) -> usize {
        self.parents.len()
    }

    pub(crate) fn is_used(&self, node: NodeIdx) -> bool {
        (node as usize) < self.used
    }

    pub(crate) fn children(&self, node: NodeIdx) -> &[NodeIdx] {
        let start = node as usize * self.fanout;
        &self.children[start..start + self.fanout]
    }

    pub(crate) fn child(&self, node: NodeIdx, slot: usize) -> NodeIdx {
        self.children[node as usize * self.fanout + slot]
    }

    pub(crate) fn parent(&self, node: NodeIdx) -> NodeIdx {
        self.parents[node as usize]
    }

    /// Number of levels between `node` and the root.
    pub(crate) fn level_of(&self, mut node: NodeIdx) -> u32 {
        let mut level = 0;
        while node != ROOT {
            level += 1;
            node = self.parents[node as usize];
        }
        level
    }

    /// Indices from `node` up to, but excluding, the root.
    pub(crate) fn ancestry(&self, mut node: NodeIdx) -> Vec<NodeIdx> {
        let mut chain = Vec::new();
        while node != ROOT {
            chain.push(node);
            node = self.parents[node as usize];
        }
        chain
    }

    pub(crate) fn entries(&self, node: NodeIdx) -> &[EntryId] {
        &self.entries[node as usize]
    }

    pub(crate) fn push_entry(&mut self, node: NodeIdx, id: EntryId) {
        self.entries[node as usize].push(id);
    }

    /// Remove `id` from the node's entry set. Returns false if it was not there.
    pub(crate) fn take_entry(&mut self, node: NodeIdx, id: EntryId) -> bool {
        let Some(list) = self.entries.get_mut(node as usize) else {
            return false;
        };
        match list.iter().position(|&e| e == id) {
            Some(pos) => {
                list.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    /// Drop every entry while keeping the node topology intact.
    pub(crate) fn clear_entries(&mut self) {
        for list in &mut self.entries {
            list.clear();
        }
    }

    /// Return the child in `slot` of `parent`, creating it from the next free slot if missing.
    ///
    /// May grow the pool. Callers hold indices only, so growth never invalidates them.
    pub(crate) fn child_or_create(&mut self, parent: NodeIdx, slot: usize) -> NodeIdx {
        let existing = self.child(parent, slot);
        if existing != NO_CHILD {
            return existing;
        }
        if self.used == self.allocated() {
            self.grow();
        }
        let idx = to_idx(self.used);
        self.children[parent as usize * self.fanout + slot] = idx;
        self.parents[idx as usize] = parent;
        self.used += 1;
        log::trace!("created node {idx} under {parent} in slot {slot}");
        idx
    }

    /// True if `node` may be freed: not the root, owns no entries, has no children.
    pub(crate) fn is_prunable(&self, node: NodeIdx) -> bool {
        node != ROOT
            && self.entries[node as usize].is_empty()
            && self.children(node).iter().all(|&c| c == NO_CHILD)
    }

    /// Free `node` and keep the live range dense by moving the last used node into its slot.
    ///
    /// The relocation updates the moved node's parent slot, its children's parent links, and
    /// carries its entries along. Any index in `pending` equal to the relocated node is rewritten
    /// to its new slot. Returns the old index of the relocated node, if one moved; the caller must
    /// then repoint the entries now stored at `node`.
    pub(crate) fn free(&mut self, node: NodeIdx, pending: &mut [NodeIdx]) -> Option<NodeIdx> {
        debug_assert!(self.is_prunable(node), "only empty leaves can be freed");
        debug_assert!(self.is_used(node), "node {node} is not live");

        let parent = self.parents[node as usize];
        self.replace_child(parent, node, NO_CHILD);
        self.parents[node as usize] = ROOT;

        self.used -= 1;
        let last = to_idx(self.used);
        if last == node {
            log::trace!("freed node {node} (last slot)");
            return None;
        }

        for p in pending.iter_mut() {
            if *p == last {
                *p = node;
            }
        }

        let last_parent = self.parents[last as usize];
        self.replace_child(last_parent, last, node);

        let fanout = self.fanout;
        let from = last as usize * fanout;
        let to = node as usize * fanout;
        for slot in 0..fanout {
            let child = self.children[from + slot];
            if child != NO_CHILD {
                self.parents[child as usize] = node;
            }
        }
        self.children.copy_within(from..from + fanout, to);
        self.children[from..from + fanout].fill(NO_CHILD);

        self.parents[node as usize] = last_parent;
        self.parents[last as usize] = ROOT;

        // `node` owned nothing, so swapping leaves the vacated slot clean.
        self.entries.swap(node as usize, last as usize);

        log::trace!("freed node {node}, relocated node {last} into its slot");
        Some(last)
    }

    fn replace_child(&mut self, parent: NodeIdx, from: NodeIdx, to: NodeIdx) {
        let start = parent as usize * self.fanout;
        if let Some(slot) = self.children[start..start + self.fanout]
            .iter_mut()
            .find(|c| **c == from)
        {
            *slot = to;
        }
    }

    fn grow(&mut self) {
        let old = self.allocated();
        let new = old * 2;
        self.children.resize(new * self.fanout, NO_CHILD);
        self.parents.resize(new, ROOT);
        self.entries.resize_with(new, Vec::new);
        log::debug!("grew node pool from {old} to {new} nodes");
    }
}
