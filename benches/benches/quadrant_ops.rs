// Copyright 2025 the Quadforest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use quadforest_quadrant::{D2, D3, Dim, FixedArray, Octant, Quadrant, Quadrant2};

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
}

fn gen_random_quadrants<D: Dim>(count: usize, max_level: i8, rng: &mut Rng) -> Vec<Quadrant<D>> {
    (0..count)
        .map(|_| {
            let level = (rng.next_u64() % (max_level as u64 + 1)) as i8;
            let mask = !(D::quadrant_len(level) - 1);
            let coords =
                D::Coords::from_fn(|_| (rng.next_u64() as i32 & (D::ROOT_LEN - 1)) & mask);
            Quadrant::new(coords, level)
        })
        .collect()
}

fn bench_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare");
    let mut rng = Rng::new(0x9e37_79b9_7f4a_7c15);
    let quads2 = gen_random_quadrants::<D2>(4096, D2::QMAX_LEVEL, &mut rng);
    let quads3 = gen_random_quadrants::<D3>(4096, D3::QMAX_LEVEL, &mut rng);
    group.throughput(Throughput::Elements(4095));

    group.bench_function("cmp_2d", |b| {
        b.iter(|| {
            let less = quads2.windows(2).filter(|w| w[0] < w[1]).count();
            black_box(less);
        });
    });
    group.bench_function("cmp_3d", |b| {
        b.iter(|| {
            let less = quads3.windows(2).filter(|w| w[0] < w[1]).count();
            black_box(less);
        });
    });
    group.bench_function("linear_id_cmp_3d", |b| {
        b.iter(|| {
            let less = quads3
                .windows(2)
                .filter(|w| {
                    let level = w[0].level().min(w[1].level());
                    w[0].linear_id(level) < w[1].linear_id(level)
                })
                .count();
            black_box(less);
        });
    });
    group.finish();
}

fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort");
    for &n in &[1_000_usize, 10_000] {
        let mut rng = Rng::new(n as u64);
        let quads = gen_random_quadrants::<D3>(n, 12, &mut rng);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("sort_unstable_n{}", n), |b| {
            b.iter_batched(
                || quads.clone(),
                |mut v| {
                    v.sort_unstable();
                    black_box(v);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_relations(c: &mut Criterion) {
    let mut group = c.benchmark_group("relations");
    let mut rng = Rng::new(42);
    let quads = gen_random_quadrants::<D2>(4096, D2::QMAX_LEVEL, &mut rng);
    group.throughput(Throughput::Elements(4095));

    group.bench_function("nearest_common_ancestor", |b| {
        b.iter(|| {
            for w in quads.windows(2) {
                black_box(w[0].nearest_common_ancestor(&w[1]));
            }
        });
    });
    group.bench_function("nearest_common_ancestor_reference", |b| {
        b.iter(|| {
            for w in quads.windows(2) {
                black_box(w[0].nearest_common_ancestor_reference(&w[1]));
            }
        });
    });
    group.bench_function("is_ancestor", |b| {
        b.iter(|| {
            let n = quads.windows(2).filter(|w| w[0].is_ancestor(&w[1])).count();
            black_box(n);
        });
    });
    group.bench_function("digest", |b| {
        b.iter(|| {
            let mut acc = 0_u32;
            for q in &quads {
                acc ^= q.digest();
            }
            black_box(acc);
        });
    });
    group.finish();
}

fn bench_neighbors(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbors");
    let mut rng = Rng::new(7);
    let quads = gen_random_quadrants::<D3>(4096, 10, &mut rng);
    group.throughput(Throughput::Elements(4096));

    group.bench_function("face_neighbors_3d", |b| {
        b.iter(|| {
            for q in &quads {
                for face in 0..D3::FACES {
                    black_box(q.face_neighbor(face));
                }
            }
        });
    });
    group.bench_function("shift_corner_3d", |b| {
        b.iter(|| {
            for q in &quads {
                black_box(q.shift_corner(7));
            }
        });
    });
    let quads2: Vec<Quadrant2> = (0..4096)
        .map(|i| Quadrant2::from_linear_id(6, i % 4096))
        .collect();
    group.bench_function("all_face_neighbors_2d", |b| {
        b.iter(|| {
            for q in &quads2 {
                black_box(q.all_face_neighbors(1));
            }
        });
    });
    let root = Octant::<()>::root();
    group.bench_function("children_3d", |b| {
        b.iter(|| black_box(root.child(5).child(2).children()));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_compare,
    bench_sort,
    bench_relations,
    bench_neighbors,
);
criterion_main!(benches);
