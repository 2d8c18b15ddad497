// Copyright 2025 the Quadforest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dimension markers and the constants and lookup tables that depend on them.
//!
//! Every algorithm in this crate is written once against [`Dim`] and
//! instantiated for [`D2`] (quadtrees) and [`D3`] (octrees).
//!
//! ## Numbering conventions
//!
//! - Children and corners use z-order: bit `k` of the id is set iff the child
//!   (or corner) lies on the high side of axis `k`.
//! - 2D faces run counter-clockwise starting at the bottom:
//!   `0: -y`, `1: +x`, `2: +y`, `3: -x`.
//! - 3D faces come in axis pairs: `0: -x`, `1: +x`, `2: -y`, `3: +y`, `4: -z`, `5: +z`.
//! - 3D edges `0..4` are parallel to x, `4..8` to y and `8..12` to z. Inside a
//!   group, bit 0 picks the side of the lower remaining axis and bit 1 the side
//!   of the higher one.

use core::fmt::Debug;
use core::hash::Hash;
use core::ops::{Index, IndexMut};

use crate::contact::Contact;

mod sealed {
    #[allow(unreachable_pub, reason = "Sealed trait pattern; never nameable outside the crate.")]
    pub trait Sealed {}
    impl Sealed for super::D2 {}
    impl Sealed for super::D3 {}
}

/// A fixed-size array whose length is determined by the dimension.
///
/// Implemented for every `[T; N]`; [`Dim`] picks the `N`.
pub trait FixedArray<T>:
    Copy
    + Debug
    + PartialEq
    + AsRef<[T]>
    + AsMut<[T]>
    + Index<usize, Output = T>
    + IndexMut<usize>
    + IntoIterator<Item = T>
{
    /// Build the array by calling `f` with each index in order.
    fn from_fn(f: impl FnMut(usize) -> T) -> Self;
}

impl<T: Copy + Debug + PartialEq, const N: usize> FixedArray<T> for [T; N] {
    #[inline]
    fn from_fn(f: impl FnMut(usize) -> T) -> Self {
        core::array::from_fn(f)
    }
}

/// Outward normal of a face: the axis it is perpendicular to and which side.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FaceNormal {
    /// Axis perpendicular to the face.
    pub axis: usize,
    /// True for the face on the high side of `axis`.
    pub upper: bool,
}

impl FaceNormal {
    const fn new(axis: usize, upper: bool) -> Self {
        Self { axis, upper }
    }

    /// `+1` for an upper face, `-1` for a lower one.
    #[inline]
    pub const fn sign(self) -> i32 {
        if self.upper { 1 } else { -1 }
    }
}

/// Compile-time description of a 2D or 3D domain.
pub trait Dim: sealed::Sealed + Copy + Debug + Default + Eq + Hash + Ord + Send + Sync + 'static {
    /// Number of axes.
    const DIM: usize;
    /// Children per quadrant, also the number of corners.
    const CHILDREN: usize = 1 << Self::DIM;
    /// Faces per quadrant.
    const FACES: usize = 2 * Self::DIM;
    /// Edges per quadrant (zero in 2D).
    const EDGES: usize;
    /// Number of half-size neighbors that tile one face.
    const HALF_FACE: usize = 1 << (Self::DIM - 1);
    /// Level of point-sized nodes.
    const MAX_LEVEL: i8;
    /// Deepest level usable for ordinary quadrants.
    const QMAX_LEVEL: i8;
    /// Side length of the root.
    const ROOT_LEN: i32 = 1 << Self::MAX_LEVEL;

    /// Outward normal of each face, indexed by face id.
    const FACE_NORMALS: &'static [FaceNormal];
    /// Root faces touched by the quadrant placed in each corner, indexed by corner id.
    const CORNER_CONTACT: &'static [Contact];
    /// Bitmask of the parent faces that each child touches, indexed by child id.
    const CHILD_FACES: &'static [u8];

    /// Coordinates of a quadrant, one signed word per axis.
    type Coords: FixedArray<i32> + Default + Eq + Hash + Send + Sync;
    /// One value per axis.
    type PerAxis<T: Copy + Debug + PartialEq>: FixedArray<T>;
    /// One value per child or corner.
    type PerChild<T: Copy + Debug + PartialEq>: FixedArray<T>;
    /// One value per face.
    type PerFace<T: Copy + Debug + PartialEq>: FixedArray<T>;
    /// One value per edge.
    type PerEdge<T: Copy + Debug + PartialEq>: FixedArray<T>;
    /// One value per half-size neighbor across a face.
    type PerHalfFace<T: Copy + Debug + PartialEq>: FixedArray<T>;

    /// Side length of a quadrant at `level`.
    #[inline]
    fn quadrant_len(level: i8) -> i32 {
        debug_assert!(
            (0..=Self::MAX_LEVEL).contains(&level),
            "level {level} out of range"
        );
        1 << (Self::MAX_LEVEL - level)
    }

    /// Largest coordinate a quadrant at `level` can have inside the root.
    #[inline]
    fn last_offset(level: i8) -> i32 {
        Self::ROOT_LEN - Self::quadrant_len(level)
    }
}

/// Two-dimensional domain (quadtrees).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct D2;

/// Three-dimensional domain (octrees).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct D3;

impl Dim for D2 {
    const DIM: usize = 2;
    const EDGES: usize = 0;
    const MAX_LEVEL: i8 = 30;
    const QMAX_LEVEL: i8 = 29;

    const FACE_NORMALS: &'static [FaceNormal] = &[
        FaceNormal::new(1, false),
        FaceNormal::new(0, true),
        FaceNormal::new(1, true),
        FaceNormal::new(0, false),
    ];
    const CORNER_CONTACT: &'static [Contact] = &[
        Contact::from_bits_retain(0x05),
        Contact::from_bits_retain(0x06),
        Contact::from_bits_retain(0x09),
        Contact::from_bits_retain(0x0a),
    ];
    const CHILD_FACES: &'static [u8] = &[0b1001, 0b0011, 0b1100, 0b0110];

    type Coords = [i32; 2];
    type PerAxis<T: Copy + Debug + PartialEq> = [T; 2];
    type PerChild<T: Copy + Debug + PartialEq> = [T; 4];
    type PerFace<T: Copy + Debug + PartialEq> = [T; 4];
    type PerEdge<T: Copy + Debug + PartialEq> = [T; 0];
    type PerHalfFace<T: Copy + Debug + PartialEq> = [T; 2];
}

impl Dim for D3 {
    const DIM: usize = 3;
    const EDGES: usize = 12;
    const MAX_LEVEL: i8 = 19;
    const QMAX_LEVEL: i8 = 18;

    const FACE_NORMALS: &'static [FaceNormal] = &[
        FaceNormal::new(0, false),
        FaceNormal::new(0, true),
        FaceNormal::new(1, false),
        FaceNormal::new(1, true),
        FaceNormal::new(2, false),
        FaceNormal::new(2, true),
    ];
    const CORNER_CONTACT: &'static [Contact] = &[
        Contact::from_bits_retain(0x15),
        Contact::from_bits_retain(0x16),
        Contact::from_bits_retain(0x19),
        Contact::from_bits_retain(0x1a),
        Contact::from_bits_retain(0x25),
        Contact::from_bits_retain(0x26),
        Contact::from_bits_retain(0x29),
        Contact::from_bits_retain(0x2a),
    ];
    const CHILD_FACES: &'static [u8] = &[0x15, 0x16, 0x19, 0x1a, 0x25, 0x26, 0x29, 0x2a];

    type Coords = [i32; 3];
    type PerAxis<T: Copy + Debug + PartialEq> = [T; 3];
    type PerChild<T: Copy + Debug + PartialEq> = [T; 8];
    type PerFace<T: Copy + Debug + PartialEq> = [T; 6];
    type PerEdge<T: Copy + Debug + PartialEq> = [T; 12];
    type PerHalfFace<T: Copy + Debug + PartialEq> = [T; 4];
}

/// Whether child or corner `id` lies on the high side of `axis`.
///
/// Bit `axis` of a child or corner id selects the upper half along that axis.
#[inline]
pub const fn high_side(id: usize, axis: usize) -> bool {
    (id >> axis) & 1 == 1
}

/// The two `(axis, upper)` constraints that pin 3D edge `edge`.
///
/// Only meaningful when `D::EDGES > 0`.
pub fn edge_constraints(edge: usize) -> [FaceNormal; 2] {
    debug_assert!(edge < 12, "edge {edge} out of range");
    let parallel = edge / 4;
    let (lo, hi) = match parallel {
        0 => (1, 2),
        1 => (0, 2),
        2 => (0, 1),
        _ => unreachable!("edge {edge} out of range"),
    };
    [
        FaceNormal::new(lo, high_side(edge, 0)),
        FaceNormal::new(hi, high_side(edge, 1)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_counts() {
        assert_eq!(D2::CHILDREN, 4);
        assert_eq!(D2::FACES, 4);
        assert_eq!(D2::HALF_FACE, 2);
        assert_eq!(D2::ROOT_LEN, 1 << 30);
        assert_eq!(D3::CHILDREN, 8);
        assert_eq!(D3::FACES, 6);
        assert_eq!(D3::HALF_FACE, 4);
        assert_eq!(D3::ROOT_LEN, 1 << 19);
    }

    #[test]
    fn child_faces_match_corner_contact_in_3d() {
        for (child, &mask) in D3::CHILD_FACES.iter().enumerate() {
            assert_eq!(mask, D3::CORNER_CONTACT[child].bits(), "child {child}");
        }
    }

    #[test]
    fn child_faces_follow_face_normals() {
        fn check<D: Dim>() {
            for child in 0..D::CHILDREN {
                for (face, normal) in D::FACE_NORMALS.iter().enumerate() {
                    let touches = high_side(child, normal.axis) == normal.upper;
                    let listed = D::CHILD_FACES[child] & (1 << face) != 0;
                    assert_eq!(touches, listed, "child {child} face {face}");
                }
            }
        }
        check::<D2>();
        check::<D3>();
    }

    #[test]
    fn high_side_reads_id_bits() {
        assert_eq!([0, 1, 2].map(|axis| high_side(5, axis)), [true, false, true]);
        assert_eq!([0, 1].map(|axis| high_side(2, axis)), [false, true]);
    }

    #[test]
    fn edge_constraints_are_perpendicular() {
        for edge in 0..D3::EDGES {
            let [a, b] = edge_constraints(edge);
            assert_ne!(a.axis, edge / 4);
            assert_ne!(b.axis, edge / 4);
            assert!(a.axis < b.axis);
        }
        assert_eq!(
            edge_constraints(5),
            [FaceNormal::new(0, true), FaceNormal::new(2, false)]
        );
    }

    #[test]
    fn quadrant_len_and_last_offset() {
        assert_eq!(D2::quadrant_len(0), D2::ROOT_LEN);
        assert_eq!(D2::quadrant_len(30), 1);
        assert_eq!(D2::last_offset(0), 0);
        assert_eq!(D3::last_offset(1), 1 << 18);
    }
}
