// Copyright 2025 the Quadforest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point search.
//!
//! Refine a quadtree around a circle, then locate a handful of points with
//! the recursive search and report which part of the root each leaf range
//! touches.
//!
//! Run:
//! - `cargo run -p quadforest_demos --example point_search`

use quadforest_quadrant::{D2, Dim, Quadrant2};
use quadforest_search::{RangeBoundaries, Tree, search};

/// Refine every quadrant the circle boundary passes through, up to `max_level`.
fn refine(q: Quadrant2, center: [f64; 2], radius: f64, max_level: i8, out: &mut Vec<Quadrant2>) {
    let len = f64::from(q.side_len());
    let lo = [f64::from(q.coord(0)), f64::from(q.coord(1))];
    let nearest = [0, 1].map(|a| center[a].clamp(lo[a], lo[a] + len));
    let farthest = [0, 1].map(|a| {
        if center[a] - lo[a] > lo[a] + len - center[a] {
            lo[a]
        } else {
            lo[a] + len
        }
    });
    let dist = |p: [f64; 2]| ((p[0] - center[0]).powi(2) + (p[1] - center[1]).powi(2)).sqrt();
    let crosses = dist(nearest) <= radius && radius <= dist(farthest);
    if q.level() < max_level && crosses {
        for c in q.children() {
            refine(c, center, radius, max_level, out);
        }
    } else {
        out.push(q);
    }
}

fn main() {
    let root_len = f64::from(D2::ROOT_LEN);
    let mut leaves = Vec::new();
    refine(
        Quadrant2::root(),
        [root_len / 2.0, root_len / 2.0],
        root_len / 3.0,
        6,
        &mut leaves,
    );
    println!("{} leaves", leaves.len());

    let points = [
        [0.5, 0.5],
        [0.01, 0.99],
        [0.5 + 1.0 / 3.0, 0.5],
        [0.75, 0.125],
    ]
    .map(|[x, y]: [f64; 2]| [(x * root_len) as i32, (y * root_len) as i32]);

    let trees = [Tree::new(0, &leaves)];
    let mut visits = 0;
    let mut query = |_: usize, q: &Quadrant2, _: bool, p: &[i32; 2]| {
        visits += 1;
        (0..2).all(|a| q.coord(a) <= p[a] && p[a] < q.coord(a) + q.side_len())
    };
    let found = search(&trees, &points, &mut query);
    println!("{visits} query calls");
    for m in &found {
        println!("point {} in leaf {} = {}", m.point, m.leaf, leaves[m.leaf]);
    }
    assert_eq!(found.len(), points.len());

    // Split the leaves into two halves, as two processes would own them.
    let mid = leaves.len() / 2;
    for (name, range) in [("front", 0..mid), ("back", mid..leaves.len())] {
        let b = RangeBoundaries::<D2>::find(
            leaves.get(range.start),
            leaves.get(range.end - 1),
            0,
        );
        println!(
            "{name}: faces {:?}, corners {:?}",
            b.faces(),
            b.corners()
        );
    }
}
