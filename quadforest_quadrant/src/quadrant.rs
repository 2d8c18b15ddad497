// Copyright 2025 the Quadforest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The quadrant value type, its coordinate system, and validity predicates.

use core::fmt;

use crate::dim::{D2, D3, Dim, FixedArray};
use crate::error::QuadrantError;

/// An axis-aligned cell of a recursively bisected root, or a node (vertex).
///
/// A quadrant at level `L` has side length `ROOT_LEN >> L` and coordinates that
/// are multiples of that length. Coordinates are signed so that a quadrant may
/// sit in the halo `[-ROOT_LEN, 2 * ROOT_LEN)` around the root, which is where a
/// neighbor lands before it is transformed into the adjacent tree's frame.
///
/// Level [`Dim::MAX_LEVEL`] is reserved for nodes: zero-size points on the
/// maximal-level lattice. Ordinary quadrants stop at [`Dim::QMAX_LEVEL`].
///
/// ## Layout
///
/// The layout is `#[repr(C)]` with fields in the order coordinates (one `i32`
/// per axis), level (`i8`), payload. Code that shares quadrant arrays with other
/// subsystems relies on this order.
///
/// ## Payload
///
/// `payload` is opaque: geometry ignores it, derived quadrants inherit the
/// payload of the quadrant they were computed from, and only the `*_piggy`
/// operations look at it. Equality, ordering and hashing through the standard
/// traits consider coordinates and level only.
#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct Quadrant<D: Dim, P = ()> {
    pub(crate) coords: D::Coords,
    pub(crate) level: i8,
    /// Caller-owned data carried along with the quadrant.
    pub payload: P,
}

/// A 2D quadrant.
pub type Quadrant2<P = ()> = Quadrant<D2, P>;

/// A 3D octant.
pub type Octant<P = ()> = Quadrant<D3, P>;

impl<D: Dim, P: Copy> Quadrant<D, P> {
    #[inline]
    pub(crate) const fn from_parts(coords: D::Coords, level: i8, payload: P) -> Self {
        Self {
            coords,
            level,
            payload,
        }
    }

    /// Create a quadrant from raw coordinates and level with a default payload.
    ///
    /// Debug builds assert that the result is an extended quadrant or an unclamped node.
    /// Use [`Quadrant::try_new`] for data that has not been validated.
    pub fn new(coords: D::Coords, level: i8) -> Self
    where
        P: Default,
    {
        let q = Self::from_parts(coords, level, P::default());
        debug_assert!(
            q.is_extended() || q.is_node(false),
            "not a quadrant or node: {q}"
        );
        q
    }

    /// The level 0 quadrant covering the whole root.
    pub fn root() -> Self
    where
        P: Default,
    {
        Self::from_parts(D::Coords::default(), 0, P::default())
    }

    /// Create a node (a point at [`Dim::MAX_LEVEL`]).
    pub fn node(coords: D::Coords) -> Self
    where
        P: Default,
    {
        let n = Self::from_parts(coords, D::MAX_LEVEL, P::default());
        debug_assert!(n.is_node(false), "not a node: {n}");
        n
    }

    /// Checked constructor for an extended quadrant.
    pub fn try_new(coords: D::Coords, level: i8) -> Result<Self, QuadrantError>
    where
        P: Default,
    {
        if !(0..=D::QMAX_LEVEL).contains(&level) {
            return Err(QuadrantError::LevelOutOfRange {
                level,
                max: D::QMAX_LEVEL,
            });
        }
        let mask = D::quadrant_len(level) - 1;
        for (axis, &value) in coords.as_ref().iter().enumerate() {
            if !in_halo::<D>(value) {
                return Err(QuadrantError::OutsideHalo { axis, value });
            }
            if value & mask != 0 {
                return Err(QuadrantError::Misaligned { axis, value, level });
            }
        }
        Ok(Self::from_parts(coords, level, P::default()))
    }

    /// Checked constructor for a node; `inside` requests a clamped node.
    pub fn try_node(coords: D::Coords, inside: bool) -> Result<Self, QuadrantError>
    where
        P: Default,
    {
        for (axis, &value) in coords.as_ref().iter().enumerate() {
            if !node_coord_ok::<D>(value, inside) {
                return Err(QuadrantError::NotANode {
                    axis,
                    value,
                    inside,
                });
            }
        }
        Ok(Self::from_parts(coords, D::MAX_LEVEL, P::default()))
    }

    /// Replace the payload, keeping the geometry.
    #[inline]
    pub fn with_payload<Q: Copy>(self, payload: Q) -> Quadrant<D, Q> {
        Quadrant::from_parts(self.coords, self.level, payload)
    }

    /// All coordinates.
    #[inline]
    pub fn coords(&self) -> D::Coords {
        self.coords
    }

    /// Coordinate along `axis`.
    #[inline]
    pub fn coord(&self, axis: usize) -> i32 {
        self.coords[axis]
    }

    /// Refinement level.
    #[inline]
    pub fn level(&self) -> i8 {
        self.level
    }

    /// Side length.
    #[inline]
    pub fn side_len(&self) -> i32 {
        D::quadrant_len(self.level)
    }

    /// Same payload, new geometry.
    #[inline]
    pub(crate) fn derive(&self, coords: D::Coords, level: i8) -> Self {
        Self::from_parts(coords, level, self.payload)
    }

    /// Apply `f(axis, coordinate)` to every axis.
    #[inline]
    pub(crate) fn map_coords(&self, mut f: impl FnMut(usize, i32) -> i32) -> D::Coords {
        D::Coords::from_fn(|axis| f(axis, self.coords[axis]))
    }

    #[inline]
    fn all_coords(&self, mut f: impl FnMut(i32) -> bool) -> bool {
        self.coords.as_ref().iter().all(|&c| f(c))
    }

    #[inline]
    fn is_aligned(&self) -> bool {
        let mask = D::quadrant_len(self.level) - 1;
        self.all_coords(|c| c & mask == 0)
    }

    /// Whether every coordinate lies in `[0, ROOT_LEN)`.
    pub fn is_inside_root(&self) -> bool {
        self.all_coords(|c| (0..D::ROOT_LEN).contains(&c))
    }

    /// Whether every coordinate lies in the halo `[-ROOT_LEN, 2 * ROOT_LEN)`.
    pub fn is_inside_halo(&self) -> bool {
        self.all_coords(in_halo::<D>)
    }

    /// Aligned, at most [`Dim::QMAX_LEVEL`], and inside the root.
    pub fn is_valid(&self) -> bool {
        (0..=D::QMAX_LEVEL).contains(&self.level) && self.is_aligned() && self.is_inside_root()
    }

    /// Aligned, at most [`Dim::QMAX_LEVEL`], and inside the halo.
    pub fn is_extended(&self) -> bool {
        (0..=D::QMAX_LEVEL).contains(&self.level) && self.is_aligned() && self.is_inside_halo()
    }

    /// Whether this is a node.
    ///
    /// Unclamped nodes (`inside == false`) may sit on the upper root boundary
    /// `ROOT_LEN`; clamped nodes replace that value with `ROOT_LEN - 1`.
    /// Node coordinates otherwise lie on the [`Dim::QMAX_LEVEL`] lattice.
    pub fn is_node(&self, inside: bool) -> bool {
        self.level == D::MAX_LEVEL && self.all_coords(|c| node_coord_ok::<D>(c, inside))
    }

    /// Outside the root along exactly one axis.
    pub fn is_outside_face(&self) -> bool {
        self.coords
            .as_ref()
            .iter()
            .filter(|&&c| !(0..D::ROOT_LEN).contains(&c))
            .count()
            == 1
    }

    /// Outside the root along every axis.
    pub fn is_outside_corner(&self) -> bool {
        self.all_coords(|c| !(0..D::ROOT_LEN).contains(&c))
    }

    /// Clamp an unclamped node into the root: `ROOT_LEN` becomes `ROOT_LEN - 1`.
    pub fn clamp_inside(&self) -> Self {
        debug_assert!(self.is_node(false), "not an unclamped node: {self}");
        let r = self.derive(
            self.map_coords(|_, c| if c == D::ROOT_LEN { D::ROOT_LEN - 1 } else { c }),
            D::MAX_LEVEL,
        );
        debug_assert!(r.is_node(true), "clamping produced {r}");
        r
    }

    /// Undo [`Quadrant::clamp_inside`].
    pub fn unclamp(&self) -> Self {
        debug_assert!(self.is_node(true), "not a clamped node: {self}");
        let r = self.derive(
            self.map_coords(|_, c| if c == D::ROOT_LEN - 1 { D::ROOT_LEN } else { c }),
            D::MAX_LEVEL,
        );
        debug_assert!(r.is_node(false), "unclamping produced {r}");
        r
    }

    /// The quadrant at `level` that contains this clamped node.
    pub fn node_to_quadrant(&self, level: i8) -> Self {
        debug_assert!(self.is_node(true), "not a clamped node: {self}");
        debug_assert!(
            (0..=D::QMAX_LEVEL).contains(&level),
            "level {level} out of range"
        );
        let mask = !(D::quadrant_len(level) - 1);
        let q = self.derive(self.map_coords(|_, c| c & mask), level);
        debug_assert!(q.is_valid(), "node to quadrant produced {q}");
        q
    }

    /// Whether the clamped node `n` lies inside this quadrant.
    pub fn contains_node<Q: Copy>(&self, n: &Quadrant<D, Q>) -> bool {
        debug_assert!(self.is_valid(), "not a valid quadrant: {self}");
        debug_assert!(n.is_node(true), "not a clamped node: {n}");
        let len = self.side_len();
        self.coords
            .as_ref()
            .iter()
            .zip(n.coords.as_ref())
            .all(|(&q, &c)| q <= c && c < q + len)
    }
}

/// `2 * ROOT_LEN` does not fit in `i32` for [`D2`], so the upper end is inclusive.
#[inline]
fn in_halo<D: Dim>(c: i32) -> bool {
    (-D::ROOT_LEN..=D::ROOT_LEN + (D::ROOT_LEN - 1)).contains(&c)
}

#[inline]
fn node_coord_ok<D: Dim>(c: i32, inside: bool) -> bool {
    let upper = D::ROOT_LEN - i32::from(inside);
    let lattice = (1 << (D::MAX_LEVEL - D::QMAX_LEVEL)) - 1;
    (0..=upper).contains(&c) && (c & lattice == 0 || (inside && c == D::ROOT_LEN - 1))
}

const AXIS_NAMES: [char; 3] = ['x', 'y', 'z'];

impl<D: Dim, P> fmt::Display for Quadrant<D, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (axis, c) in self.coords.as_ref().iter().enumerate() {
            write!(f, "{} {:#x} ", AXIS_NAMES[axis], c)?;
        }
        write!(f, "level {}", self.level)
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;

    use super::*;
    use alloc::string::ToString;

    const R2: i32 = D2::ROOT_LEN;
    const R3: i32 = D3::ROOT_LEN;

    #[test]
    fn validity_and_extension() {
        let q = Quadrant2::<()>::new([1 << 28, 0], 2);
        assert!(q.is_valid());
        assert!(q.is_extended());
        assert!(q.is_inside_root());

        let halo = Quadrant2::<()>::new([-(1 << 28), 0], 2);
        assert!(!halo.is_valid());
        assert!(halo.is_extended());
        assert!(halo.is_inside_halo());
        assert!(halo.is_outside_face());
        assert!(!halo.is_outside_corner());

        let corner = Octant::<()>::new([R3, -R3, R3], 1);
        assert!(corner.is_extended());
        assert!(corner.is_outside_corner());
        assert!(!corner.is_outside_face());
    }

    #[test]
    fn outer_halo_edge_of_a_quadtree() {
        assert!(Quadrant2::<()>::root().is_extended());
        for level in [0, 3, D2::QMAX_LEVEL] {
            let top = R2 + (R2 - D2::quadrant_len(level));
            let q = Quadrant2::<()>::try_new([top, -R2], level).unwrap();
            assert!(q.is_extended());
            assert!(q.is_outside_corner());
        }
        // The largest i32 is still in the halo, so alignment is what rejects it.
        assert_eq!(
            Quadrant2::<()>::try_new([0, i32::MAX], D2::QMAX_LEVEL).unwrap_err(),
            QuadrantError::Misaligned {
                axis: 1,
                value: i32::MAX,
                level: D2::QMAX_LEVEL
            }
        );
        assert_eq!(
            Quadrant2::<()>::try_new([-R2 - 2, 0], D2::QMAX_LEVEL).unwrap_err(),
            QuadrantError::OutsideHalo {
                axis: 0,
                value: -R2 - 2
            }
        );
    }

    #[test]
    fn misaligned_is_neither_valid_nor_extended() {
        let q = Quadrant2::<()>::from_parts([1 << 27, 0], 2, ());
        assert!(!q.is_valid());
        assert!(!q.is_extended());
    }

    #[test]
    fn node_predicates() {
        let on_boundary = Quadrant2::<()>::node([R2, 0]);
        assert!(on_boundary.is_node(false));
        assert!(!on_boundary.is_node(true));

        let clamped = on_boundary.clamp_inside();
        assert_eq!(clamped.coords(), [R2 - 1, 0]);
        assert!(clamped.is_node(true));
        assert_eq!(clamped.unclamp().coords(), [R2, 0]);

        // Odd coordinates are off the node lattice.
        let off = Quadrant2::<()>::from_parts([3, 0], D2::MAX_LEVEL, ());
        assert!(!off.is_node(false));
        assert!(!off.is_node(true));
    }

    #[test]
    fn node_to_quadrant_contains_node() {
        let n = Quadrant2::<()>::node([R2, 6]).clamp_inside();
        for level in 0..=D2::QMAX_LEVEL {
            let q = n.node_to_quadrant(level);
            assert!(q.is_valid());
            assert_eq!(q.level(), level);
            assert!(q.contains_node(&n));
        }
        let q = n.node_to_quadrant(1);
        assert_eq!(q.coords(), [R2 / 2, 0]);
    }

    #[test]
    fn checked_constructors() {
        assert!(Quadrant2::<()>::try_new([0, 0], 0).is_ok());
        assert_eq!(
            Quadrant2::<()>::try_new([0, 0], 30).unwrap_err(),
            QuadrantError::LevelOutOfRange { level: 30, max: 29 }
        );
        assert_eq!(
            Quadrant2::<()>::try_new([1, 0], 3).unwrap_err(),
            QuadrantError::Misaligned {
                axis: 0,
                value: 1,
                level: 3
            }
        );
        assert_eq!(
            Octant::<()>::try_new([0, 2 * R3, 0], 0).unwrap_err(),
            QuadrantError::OutsideHalo {
                axis: 1,
                value: 2 * R3
            }
        );
        assert!(Octant::<()>::try_node([R3, R3, 0], false).is_ok());
        assert!(matches!(
            Octant::<()>::try_node([R3, R3, 0], true),
            Err(QuadrantError::NotANode { axis: 0, .. })
        ));
    }

    #[test]
    fn payload_is_carried() {
        let q = Quadrant2::<()>::new([0, 0], 1).with_payload(7_u32);
        assert_eq!(q.payload, 7);
        assert_eq!(q.with_payload(()).level(), 1);
    }

    #[test]
    fn display_prints_hex_coordinates() {
        let q = Quadrant2::<()>::new([1 << 28, 0], 2);
        assert_eq!(q.to_string(), "x 0x10000000 y 0x0 level 2");
        let o = Octant::<()>::new([0, 0, -(1 << 18)], 1);
        assert_eq!(o.to_string(), "x 0x0 y 0x0 z 0xfffc0000 level 1");
    }
}
