// Copyright 2025 the Quadforest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use quadforest_quadrant::{D2, Dim, Quadrant2};
use quadforest_search::{ChildSplit, Tree, find_lower_bound, search};

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
    fn next_coord(&mut self) -> i32 {
        (self.next_u64() >> 33) as i32 & (D2::ROOT_LEN - 1)
    }
}

/// Leaves of a quadtree refined down to `max_level` near the origin and
/// kept coarse elsewhere.
fn gen_graded_leaves(max_level: i8) -> Vec<Quadrant2> {
    fn go(q: Quadrant2, max_level: i8, out: &mut Vec<Quadrant2>) {
        let len = q.side_len();
        let near = q.coord(0) - len < len && q.coord(1) - len < len;
        if q.level() < max_level && (near || q.level() < 4) {
            for c in q.children() {
                go(c, max_level, out);
            }
        } else {
            out.push(q);
        }
    }
    let mut out = Vec::new();
    go(Quadrant2::root(), max_level, &mut out);
    out
}

fn gen_uniform_leaves(level: i8) -> Vec<Quadrant2> {
    (0..1_u64 << (2 * level)).map(|id| Quadrant2::from_linear_id(level, id)).collect()
}

fn inside(q: &Quadrant2, p: &[i32; 2]) -> bool {
    (0..2).all(|a| q.coord(a) <= p[a] && p[a] < q.coord(a) + q.side_len())
}

fn bench_bounds(c: &mut Criterion) {
    let mut group = c.benchmark_group("bounds");
    let leaves = gen_uniform_leaves(7);
    let mut rng = Rng::new(11);
    let queries: Vec<Quadrant2> = (0..1024)
        .map(|_| {
            let id = rng.next_u64() % (1 << 20);
            Quadrant2::from_linear_id(10, id)
        })
        .collect();
    let mut sorted = queries.clone();
    sorted.sort();
    group.throughput(Throughput::Elements(queries.len() as u64));

    group.bench_function("lower_bound_no_hint", |b| {
        b.iter(|| {
            for q in &queries {
                black_box(find_lower_bound(&leaves, q, 0));
            }
        });
    });
    group.bench_function("lower_bound_sweep_hint", |b| {
        b.iter(|| {
            let mut hint = 0;
            for q in &sorted {
                if let Some(i) = find_lower_bound(&leaves, q, hint) {
                    hint = i;
                }
                black_box(hint);
            }
        });
    });
    group.bench_function("std_partition_point", |b| {
        b.iter(|| {
            for q in &queries {
                black_box(leaves.partition_point(|x| x < q));
            }
        });
    });
    group.finish();
}

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("split");
    let leaves = gen_graded_leaves(12);
    group.throughput(Throughput::Elements(leaves.len() as u64));
    group.bench_function("split_root", |b| {
        b.iter(|| black_box(ChildSplit::<D2>::new(&leaves, 0)));
    });
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let cases = [
        ("uniform_l6", gen_uniform_leaves(6)),
        ("graded_l12", gen_graded_leaves(12)),
    ];
    for (name, leaves) in &cases {
        let mut rng = Rng::new(leaves.len() as u64);
        let points: Vec<[i32; 2]> = (0..512)
            .map(|_| [rng.next_coord() / 64, rng.next_coord() / 64])
            .collect();
        group.throughput(Throughput::Elements(points.len() as u64));

        group.bench_function(format!("recursive_{}", name), |b| {
            let trees = [Tree::new(0, leaves)];
            b.iter(|| {
                let mut query = |_: usize, q: &Quadrant2, _: bool, p: &[i32; 2]| inside(q, p);
                black_box(search(&trees, &points, &mut query))
            });
        });
        group.bench_function(format!("linear_scan_{}", name), |b| {
            b.iter(|| {
                let mut hits = 0_usize;
                for p in &points {
                    hits += leaves.iter().filter(|q| inside(q, p)).count();
                }
                black_box(hits)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_bounds, bench_split, bench_search);
criterion_main!(benches);
