// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Understory Loose Tree: add, move, query, and remove.

use understory_loose_tree::{Allocation, LooseTree, Vector};

fn main() {
    let mut tree: LooseTree<f32, 2> =
        LooseTree::new(Vector::new([100.0, 100.0]), 4, Allocation::Dynamic)
            .expect("valid world");

    tree.add(1, Vector::new([10.0, 10.0]), Vector::new([5.0, 5.0]))
        .expect("small entry");
    tree.add(2, Vector::new([90.0, 90.0]), Vector::new([50.0, 50.0]))
        .expect("large entry");
    println!(
        "levels: id1={:?}, id2={:?}; nodes used={} allocated={}",
        tree.depth_of(1),
        tree.depth_of(2),
        tree.used_nodes(),
        tree.allocated_nodes()
    );

    // Move entry 1 across the world; it keeps its level.
    tree.move_entry(1, Vector::new([70.0, 20.0])).expect("in bounds");
    println!("hits at (70,20): {:?}", tree.query_point(Vector::new([70.0, 20.0])));
    println!(
        "hits in [0,0]-[50,50]: {:?}",
        tree.query_range(Vector::new([0.0, 0.0]), Vector::new([50.0, 50.0]))
    );

    // Errors are reported without touching the tree.
    if let Err(err) = tree.add(2, Vector::new([1.0, 1.0]), Vector::new([1.0, 1.0])) {
        println!("rejected: {err}");
    }

    tree.remove(1).expect("present");
    println!("after removal: nodes used={}", tree.used_nodes());
}
