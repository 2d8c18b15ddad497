// Copyright 2025 the Quadforest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadrant basics.
//!
//! Walk the family of a quadrant, compare along the Morton curve, and step
//! across a tree boundary into a rotated neighbor tree.
//!
//! Run:
//! - `cargo run -p quadforest_demos --example quadrant_basics`

use quadforest_quadrant::{D2, Dim, FaceTransform, Quadrant2};

fn main() {
    // The level 2 quadrant in the second column of the bottom row.
    let q = Quadrant2::<()>::try_new([1 << 28, 0], 2).unwrap();
    println!("quadrant: {q}");

    for (id, c) in q.children().into_iter().enumerate() {
        println!(
            "  child {id}: {c}  linear id at level 3 = {}",
            c.linear_id(3)
        );
        assert_eq!(c.parent(), q);
    }
    assert!(Quadrant2::is_family(&q.children()));

    // Ancestors sort first; the last descendant sorts after every other one.
    let last = q.last_descendant(D2::QMAX_LEVEL);
    assert!(q < q.child(0) && q.child(3) < last);
    println!("nearest common ancestor with its neighbor: {}", {
        let n = q.face_neighbor(2);
        q.nearest_common_ancestor(&n)
    });

    // Across the -y face the neighbor leaves the root.
    let n = q.face_neighbor(0);
    assert!(n.is_outside_face());
    println!("neighbor across -y: {n} (inside root: {})", n.is_inside_root());

    // Suppose the tree below is attached with a quarter turn. Move the
    // neighbor into that tree's frame and back.
    let moved = n.translate_face(0);
    let t = FaceTransform::Rotate90;
    let there = moved.transform_face(t);
    println!("in the neighbor tree: {there}");
    assert!(there.is_valid());
    assert_eq!(there.transform_face(t.inverse()), moved);

    // The corner where the neighbor tree's own corner 0 lands.
    println!("corner 0 maps to corner {}", t.node(0));
}
