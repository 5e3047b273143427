// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_loose_tree::{Allocation, LooseTree, Vector};

const WORLD: f32 = 2048.0;
const DEPTH: u32 = 6;

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f32(&mut self) -> f32 {
        let v = self.next_u64() >> 40;
        (v as f32) / ((1u64 << 24) as f32)
    }
}

struct Item {
    pos: Vector<f32, 2>,
    size: Vector<f32, 2>,
}

fn gen_grid_items(n: usize) -> Vec<Item> {
    let cell = WORLD / n as f32;
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            out.push(Item {
                pos: Vector::new([(x as f32 + 0.5) * cell, (y as f32 + 0.5) * cell]),
                size: Vector::splat(cell * 0.8),
            });
        }
    }
    out
}

fn gen_random_items(count: usize, min_size: f32, max_size: f32) -> Vec<Item> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let s = min_size + rng.next_f32() * (max_size - min_size);
        out.push(Item {
            pos: Vector::new([rng.next_f32() * WORLD, rng.next_f32() * WORLD]),
            size: Vector::splat(s),
        });
    }
    out
}

fn gen_clustered_items(n_clusters: usize, per_cluster: usize, spread: f32) -> Vec<Item> {
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    for _ in 0..n_clusters {
        let (cx, cy) = (rng.next_f32() * WORLD, rng.next_f32() * WORLD);
        for _ in 0..per_cluster {
            let x = (cx + (rng.next_f32() - 0.5) * spread).clamp(0.0, WORLD);
            let y = (cy + (rng.next_f32() - 0.5) * spread).clamp(0.0, WORLD);
            out.push(Item {
                pos: Vector::new([x, y]),
                size: Vector::splat(12.0),
            });
        }
    }
    out
}

fn new_tree(allocation: Allocation) -> LooseTree<f32, 2> {
    LooseTree::new(Vector::splat(WORLD), DEPTH, allocation).unwrap()
}

fn filled(allocation: Allocation, items: &[Item]) -> LooseTree<f32, 2> {
    let mut tree = new_tree(allocation);
    for (id, item) in (0_u32..).zip(items) {
        tree.add(id, item.pos, item.size).unwrap();
    }
    tree
}

fn mode_name(allocation: Allocation) -> &'static str {
    match allocation {
        Allocation::Static => "static",
        Allocation::Dynamic => "dynamic",
    }
}

const MODES: [Allocation; 2] = [Allocation::Static, Allocation::Dynamic];

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");
    for &n in &[32usize, 64, 128] {
        let items = gen_grid_items(n);
        group.throughput(Throughput::Elements((n * n) as u64));
        for mode in MODES {
            group.bench_function(format!("{}_grid_n{}", mode_name(mode), n), |b| {
                b.iter_batched(
                    || new_tree(mode),
                    |mut tree| {
                        for (id, item) in (0_u32..).zip(&items) {
                            tree.add(id, item.pos, item.size).unwrap();
                        }
                        black_box(tree.used_nodes());
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    let items = gen_random_items(4096, 2.0, 40.0);
    for mode in MODES {
        let tree = filled(mode, &items);
        group.bench_function(format!("{}_point_random", mode_name(mode)), |b| {
            let mut rng = Rng::new(0x1234_5678_9ABC_DEF0);
            b.iter(|| {
                let p = Vector::new([rng.next_f32() * WORLD, rng.next_f32() * WORLD]);
                black_box(tree.query_point(p).len());
            })
        });
        group.bench_function(format!("{}_range_random", mode_name(mode)), |b| {
            let mut rng = Rng::new(0x0FED_CBA9_8765_4321);
            b.iter(|| {
                let x = rng.next_f32() * (WORLD - 400.0);
                let y = rng.next_f32() * (WORLD - 400.0);
                let hits = tree.query_range(
                    Vector::new([x, y]),
                    Vector::new([x + 400.0, y + 400.0]),
                );
                black_box(hits.len());
            })
        });
    }
    group.finish();
}

fn bench_move_heavy(c: &mut Criterion) {
    let mut group = c.benchmark_group("move_heavy");
    let items = gen_clustered_items(32, 64, 200.0);
    group.throughput(Throughput::Elements(items.len() as u64));
    for mode in MODES {
        group.bench_function(format!("{}_clustered", mode_name(mode)), |b| {
            b.iter_batched(
                || (filled(mode, &items), Rng::new(0xBADC_F00D_1234_5678)),
                |(mut tree, mut rng)| {
                    for (id, item) in (0_u32..).zip(&items) {
                        let dx = (rng.next_f32() - 0.5) * 64.0;
                        let dy = (rng.next_f32() - 0.5) * 64.0;
                        let p = Vector::new([
                            (item.pos[0] + dx).clamp(0.0, WORLD),
                            (item.pos[1] + dy).clamp(0.0, WORLD),
                        ]);
                        tree.move_entry(id, p).unwrap();
                    }
                    black_box(tree.used_nodes());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    let items = gen_random_items(2048, 1.0, 8.0);
    group.throughput(Throughput::Elements(items.len() as u64));
    for mode in MODES {
        group.bench_function(format!("{}_remove_readd", mode_name(mode)), |b| {
            b.iter_batched(
                || filled(mode, &items),
                |mut tree| {
                    for id in (0_u32..).take(items.len()).step_by(2) {
                        tree.remove(id).unwrap();
                    }
                    for (id, item) in (0_u32..).zip(&items).step_by(2) {
                        tree.add(id, item.pos, item.size).unwrap();
                    }
                    black_box(tree.used_nodes());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_add, bench_query, bench_move_heavy, bench_churn);
criterion_main!(benches);
