// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kurbo conversions for 2D trees.
//!
//! Rectangles are anchored at their center, which is the convention loose trees rely on:
//! an entry no larger than a cell and centered inside it stays within the cell's loose bounds.

use alloc::vec::Vec;
use kurbo::{Point, Rect, Size, Vec2};

use crate::error::Error;
use crate::tree::{EntryId, LooseTree};
use crate::types::Vector;

impl From<Point> for Vector<f64, 2> {
    fn from(p: Point) -> Self {
        Self::new([p.x, p.y])
    }
}

impl From<Vec2> for Vector<f64, 2> {
    fn from(v: Vec2) -> Self {
        Self::new([v.x, v.y])
    }
}

impl From<Size> for Vector<f64, 2> {
    fn from(s: Size) -> Self {
        Self::new([s.width, s.height])
    }
}

impl LooseTree<f64, 2> {
    /// Insert `id` covering `rect`: positioned at its center, sized by its extent.
    pub fn add_rect(&mut self, id: EntryId, rect: Rect) -> Result<(), Error> {
        let rect = rect.abs();
        self.add(id, rect.center().into(), rect.size().into())
    }

    /// Move `id` so it is centered on `rect`. The entry keeps its level, see [`LooseTree::move_entry`].
    pub fn move_entry_to_rect(&mut self, id: EntryId, rect: Rect) -> Result<(), Error> {
        self.move_entry(id, rect.abs().center().into())
    }

    /// Entries whose loose cell overlaps `rect`.
    pub fn query_rect(&self, rect: Rect) -> Vec<EntryId> {
        let rect = rect.abs();
        self.query_range(
            Point::new(rect.x0, rect.y0).into(),
            Point::new(rect.x1, rect.y1).into(),
        )
    }
}
