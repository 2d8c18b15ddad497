// Copyright 2025 the Quadforest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Which parts of a containing quadrant's boundary a range of leaves touches.
//!
//! A process that owns a contiguous run of leaves often needs to know which
//! faces, edges and corners of the tree (or of a coarser quadrant) its run
//! reaches, for example to decide which neighboring trees it must talk to.

use core::fmt;
use core::marker::PhantomData;

use quadforest_quadrant::{Dim, FixedArray, Quadrant, edge_constraints, high_side};

/// Faces, edges and corners of a containing quadrant touched by a range.
///
/// The packed form has one bit per entity: faces in the lowest
/// [`Dim::FACES`] bits, then [`Dim::EDGES`] edge bits, then
/// [`Dim::CHILDREN`] corner bits.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RangeBoundaries<D: Dim> {
    bits: u32,
    dim: PhantomData<D>,
}

impl<D: Dim> RangeBoundaries<D> {
    const EDGE_SHIFT: usize = D::FACES;
    const CORNER_SHIFT: usize = D::FACES + D::EDGES;

    /// Every face, edge and corner.
    pub const fn all() -> Self {
        Self::from_bits((1 << (D::FACES + D::EDGES + D::CHILDREN)) - 1)
    }

    const fn from_bits(bits: u32) -> Self {
        Self {
            bits,
            dim: PhantomData,
        }
    }

    /// Classify the range from `lower` to `upper` within their ancestor at `level`.
    ///
    /// `lower` stands for its first descendant and `upper` for its last, so the
    /// range covers both endpoint quadrants completely. `None` opens that end
    /// of the range to the start or end of the containing quadrant.
    pub fn find<P: Copy>(
        lower: Option<&Quadrant<D, P>>,
        upper: Option<&Quadrant<D, P>>,
        level: i8,
    ) -> Self {
        let lower = lower.map(|q| q.first_descendant(D::QMAX_LEVEL));
        let upper = upper.map(|q| q.last_descendant(D::QMAX_LEVEL));
        let container = match (&lower, &upper) {
            (None, None) => return Self::all(),
            (Some(q), _) | (None, Some(q)) => q.ancestor(level),
        };
        if let (Some(l), Some(u)) = (&lower, &upper) {
            debug_assert!(l <= u, "empty range from {l} to {u}");
            debug_assert!(
                u.ancestor(level) == container,
                "{l} and {u} lie in different quadrants at level {level}"
            );
        }
        Self::from_bits(touched(&container, lower.as_ref(), upper.as_ref()))
    }

    /// The packed bitfield.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Whether face `face` is touched.
    pub fn touches_face(&self, face: usize) -> bool {
        debug_assert!(face < D::FACES, "face {face} out of range");
        self.bits & (1 << face) != 0
    }

    /// Whether edge `edge` is touched. Always false in 2D.
    pub fn touches_edge(&self, edge: usize) -> bool {
        debug_assert!(edge < D::EDGES, "edge {edge} out of range");
        self.bits & (1 << (Self::EDGE_SHIFT + edge)) != 0
    }

    /// Whether corner `corner` is touched.
    pub fn touches_corner(&self, corner: usize) -> bool {
        debug_assert!(corner < D::CHILDREN, "corner {corner} out of range");
        self.bits & (1 << (Self::CORNER_SHIFT + corner)) != 0
    }

    /// Per-face flags.
    pub fn faces(&self) -> D::PerFace<bool> {
        FixedArray::from_fn(|f| self.touches_face(f))
    }

    /// Per-edge flags.
    pub fn edges(&self) -> D::PerEdge<bool> {
        FixedArray::from_fn(|e| self.touches_edge(e))
    }

    /// Per-corner flags.
    pub fn corners(&self) -> D::PerChild<bool> {
        FixedArray::from_fn(|c| self.touches_corner(c))
    }
}

impl<D: Dim> fmt::Debug for RangeBoundaries<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeBoundaries")
            .field("faces", &self.faces())
            .field("edges", &self.edges())
            .field("corners", &self.corners())
            .finish()
    }
}

/// Shorthand for [`RangeBoundaries::find`].
pub fn find_range_boundaries<D: Dim, P: Copy>(
    lower: Option<&Quadrant<D, P>>,
    upper: Option<&Quadrant<D, P>>,
    level: i8,
) -> RangeBoundaries<D> {
    RangeBoundaries::find(lower, upper, level)
}

/// Entities of the parent's boundary that child `child` can reach.
fn contact_mask<D: Dim>(child: usize) -> u32 {
    let mut mask = u32::from(D::CHILD_FACES[child]);
    for edge in 0..D::EDGES {
        if edge_constraints(edge)
            .iter()
            .all(|c| high_side(child, c.axis) == c.upper)
        {
            mask |= 1 << (RangeBoundaries::<D>::EDGE_SHIFT + edge);
        }
    }
    mask | 1 << (RangeBoundaries::<D>::CORNER_SHIFT + child)
}

/// Boundary bits of `b` touched by the smallest quadrants from `lo` to `hi`,
/// both at [`Dim::QMAX_LEVEL`] and inside `b`.
fn touched<D: Dim, P: Copy>(
    b: &Quadrant<D, P>,
    lo: Option<&Quadrant<D, P>>,
    hi: Option<&Quadrant<D, P>>,
) -> u32 {
    let all = RangeBoundaries::<D>::all().bits;
    if (lo.is_none() && hi.is_none()) || b.level() == D::QMAX_LEVEL {
        return all;
    }
    let next = b.level() + 1;
    let first = lo.map_or(0, |q| q.ancestor_id(next));
    let last = hi.map_or(D::CHILDREN - 1, |q| q.ancestor_id(next));
    let mut bits = 0;
    for child in first..=last {
        let c = b.child(child);
        let lo = lo.filter(|q| child == first && **q != c.first_descendant(D::QMAX_LEVEL));
        let hi = hi.filter(|q| child == last && **q != c.last_descendant(D::QMAX_LEVEL));
        bits |= touched(&c, lo, hi) & contact_mask::<D>(child);
    }
    bits
}
