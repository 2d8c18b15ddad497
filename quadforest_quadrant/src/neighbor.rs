// Copyright 2025 the Quadforest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Face and corner neighbors, boundary translation, and corner placement.
//!
//! Neighbors are computed in the frame of the quadrant's own tree and may land
//! in the halo. Moving them into an adjacent tree's frame is the job of
//! [`Quadrant::translate_face`] or a [transform](crate::AxisTransform).

use core::fmt::Debug;

use crate::contact::Contact;
use crate::dim::{Dim, FixedArray, high_side};
use crate::quadrant::Quadrant;

/// Every candidate neighbor across one face, as returned by
/// [`Quadrant::all_face_neighbors`].
#[derive(Clone, Copy, Debug)]
pub struct AllFaceNeighbors<D: Dim, P: Copy + Debug> {
    /// Half-size neighbors tiling the face, in z-order along the face.
    /// `None` when the quadrant is already at [`Dim::QMAX_LEVEL`].
    pub half: D::PerHalfFace<Option<Quadrant<D, P>>>,
    /// The same-size neighbor.
    pub same: Quadrant<D, P>,
    /// The double-size neighbor. `None` at the root or when the face is
    /// interior to the parent.
    pub larger: Option<Quadrant<D, P>>,
}

impl<D: Dim, P: Copy> Quadrant<D, P> {
    /// The same-size neighbor across `face`.
    pub fn face_neighbor(&self, face: usize) -> Self {
        debug_assert!(self.is_extended(), "not an extended quadrant: {self}");
        let normal = D::FACE_NORMALS[face];
        let len = self.side_len();
        let n = self.derive(
            self.map_coords(|axis, c| {
                if axis == normal.axis {
                    c + normal.sign() * len
                } else {
                    c
                }
            }),
            self.level,
        );
        debug_assert!(n.is_extended(), "face neighbor {n} left the halo");
        n
    }

    /// The half-size neighbors across `face`, in z-order of the remaining axes.
    pub fn half_face_neighbors(&self, face: usize) -> D::PerHalfFace<Self>
    where
        P: Debug,
    {
        debug_assert!(self.is_valid(), "not a valid quadrant: {self}");
        debug_assert!(self.level < D::QMAX_LEVEL, "{self} cannot be refined");
        let normal = D::FACE_NORMALS[face];
        let len = self.side_len();
        let half = len / 2;
        FixedArray::from_fn(|j| {
            let mut bit = 0;
            let coords = self.map_coords(|axis, c| {
                if axis == normal.axis {
                    if normal.upper { c + len } else { c - half }
                } else {
                    let offset = if high_side(j, bit) { half } else { 0 };
                    bit += 1;
                    c + offset
                }
            });
            self.derive(coords, self.level + 1)
        })
    }

    /// [`Quadrant::half_face_neighbors`] together with, for each neighbor, the
    /// [`Dim::QMAX_LEVEL`] quadrant in its far upper corner.
    pub fn half_face_neighbors_with_corners(
        &self,
        face: usize,
    ) -> (D::PerHalfFace<Self>, D::PerHalfFace<Self>)
    where
        P: Debug,
    {
        let n = self.half_face_neighbors(face);
        let inset = D::quadrant_len(self.level + 1) - D::quadrant_len(D::QMAX_LEVEL);
        let corners: D::PerHalfFace<Self> = FixedArray::from_fn(|j| {
            n[j].derive(n[j].map_coords(|_, c| c + inset), D::QMAX_LEVEL)
        });
        (n, corners)
    }

    /// Half-size, same-size and double-size neighbors across `face` in one call.
    ///
    /// Candidates that cannot exist are `None`.
    pub fn all_face_neighbors(&self, face: usize) -> AllFaceNeighbors<D, P>
    where
        P: Debug,
    {
        debug_assert!(self.is_valid(), "not a valid quadrant: {self}");
        let half: D::PerHalfFace<Option<Self>> = if self.level == D::QMAX_LEVEL {
            FixedArray::from_fn(|_| None)
        } else {
            let n = self.half_face_neighbors(face);
            FixedArray::from_fn(|j| Some(n[j]))
        };
        let larger = (self.level > 0 && D::CHILD_FACES[self.child_id()] & (1 << face) != 0)
            .then(|| self.parent().face_neighbor(face));
        AllFaceNeighbors {
            half,
            same: self.face_neighbor(face),
            larger,
        }
    }

    /// The same-size neighbor diagonally across `corner`.
    pub fn corner_neighbor(&self, corner: usize) -> Self {
        debug_assert!(self.is_valid(), "not a valid quadrant: {self}");
        debug_assert!(corner < D::CHILDREN, "corner {corner} out of range");
        let len = self.side_len();
        let n = self.derive(
            self.map_coords(|axis, c| if high_side(corner, axis) { c + len } else { c - len }),
            self.level,
        );
        debug_assert!(n.is_extended(), "corner neighbor {n} left the halo");
        n
    }

    /// The unclamped node at `corner` of this quadrant.
    pub fn corner_node(&self, corner: usize) -> Self {
        debug_assert!(self.is_valid(), "not a valid quadrant: {self}");
        debug_assert!(corner < D::CHILDREN, "corner {corner} out of range");
        let len = self.side_len();
        let n = self.derive(
            self.map_coords(|axis, c| if high_side(corner, axis) { c + len } else { c }),
            D::MAX_LEVEL,
        );
        debug_assert!(n.is_node(false), "corner node {n}");
        n
    }

    /// Move a full root length inward across `face`.
    ///
    /// A neighbor computed across `face` lands in the halo; this brings it to
    /// the matching position in a tree attached at that face with the same
    /// orientation.
    pub fn translate_face(&self, face: usize) -> Self {
        let normal = D::FACE_NORMALS[face];
        self.derive(
            self.map_coords(|axis, c| {
                if axis == normal.axis {
                    c - normal.sign() * D::ROOT_LEN
                } else {
                    c
                }
            }),
            self.level,
        )
    }

    /// Extent of positions against which corner contact is measured.
    fn corner_bounds(&self, inside: bool) -> (i32, i32) {
        if self.level == D::MAX_LEVEL {
            debug_assert!(self.is_node(inside), "not a node: {self}");
            (0, D::ROOT_LEN - i32::from(inside))
        } else if inside {
            debug_assert!(self.is_valid(), "not a valid quadrant: {self}");
            (0, D::last_offset(self.level))
        } else {
            debug_assert!(self.is_extended(), "not an extended quadrant: {self}");
            (-self.side_len(), D::ROOT_LEN)
        }
    }

    /// Whether this quadrant touches root corner `corner`.
    ///
    /// With `inside`, the quadrant must sit in the corner inside the root;
    /// otherwise it must sit diagonally outside it, in the halo.
    pub fn touches_corner(&self, corner: usize, inside: bool) -> bool {
        debug_assert!(corner < D::CHILDREN, "corner {corner} out of range");
        let (lower, upper) = self.corner_bounds(inside);
        (0..D::DIM).all(|axis| {
            let target = if high_side(corner, axis) { upper } else { lower };
            self.coords[axis] == target
        })
    }

    /// Move this quadrant so that it touches root corner `corner`, keeping its level.
    pub fn transform_corner(&self, corner: usize, inside: bool) -> Self {
        debug_assert!(corner < D::CHILDREN, "corner {corner} out of range");
        let (lower, upper) = if self.level == D::MAX_LEVEL {
            debug_assert!(!inside, "nodes are placed unclamped");
            (0, D::ROOT_LEN)
        } else {
            debug_assert!(
                (0..=D::QMAX_LEVEL).contains(&self.level),
                "level out of range: {self}"
            );
            if inside {
                (0, D::last_offset(self.level))
            } else {
                (-self.side_len(), D::ROOT_LEN)
            }
        };
        let r = self.derive(
            self.map_coords(|axis, _| if high_side(corner, axis) { upper } else { lower }),
            self.level,
        );
        debug_assert!(r.touches_corner(corner, inside), "{r} misses corner {corner}");
        r
    }

    /// The smallest quadrant at or above this level, placed in the root, that
    /// touches `corner` from the inside.
    ///
    /// The sibling in the requested corner position is tried first. If it does
    /// not reproduce the corner's contact pattern, the search continues from
    /// the parent, shifted one parent length toward the corner.
    pub fn shift_corner(&self, corner: usize) -> Self {
        debug_assert!(self.is_valid(), "not a valid quadrant: {self}");
        debug_assert!(corner < D::CHILDREN, "corner {corner} out of range");
        let contact = D::CORNER_CONTACT[corner];
        let mut quad = *self;
        let (mut r, th) = loop {
            let th = D::last_offset(quad.level);
            if quad.level == 0 {
                break (quad, th);
            }
            let r = quad.sibling(corner);
            let mut outface = Contact::empty();
            for axis in 0..D::DIM {
                let c = r.coords[axis];
                outface.set(Contact::side(axis, false), c <= 0);
                outface.set(Contact::side(axis, true), c >= th);
            }
            if outface == contact {
                break (r, th);
            }
            quad = quad.parent();
            let len = quad.side_len();
            quad.coords =
                quad.map_coords(|axis, c| if high_side(corner, axis) { c + len } else { c - len });
            debug_assert!(quad.is_extended(), "corner shift left the halo: {quad}");
        };
        r.coords = r.map_coords(|_, c| {
            if c < 0 {
                0
            } else if c >= D::ROOT_LEN {
                th
            } else {
                c
            }
        });
        debug_assert!(r.touches_corner(corner, true), "{r} misses corner {corner}");
        r
    }
}
