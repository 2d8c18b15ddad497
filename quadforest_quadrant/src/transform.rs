// Copyright 2025 the Quadforest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rigid motions between the local frames of adjacent trees.
//!
//! Two trees may meet with any relative orientation. Every such orientation is
//! a symmetry of the root square or cube, written here as a signed permutation
//! of the axes: output axis `i` reads input axis `source[i]`, mirrored when
//! `flip[i]` is set. In 2D these are the eight [`FaceTransform`]s; in 3D there
//! are 48 and they are only available as [`AxisTransform<D3>`].

use core::fmt;

use crate::dim::{D2, Dim, FixedArray, high_side};
use crate::error::QuadrantError;
use crate::quadrant::Quadrant;

/// A symmetry of the root: a signed permutation of the axes.
#[derive(Copy, Clone)]
pub struct AxisTransform<D: Dim> {
    source: D::PerAxis<usize>,
    flip: D::PerAxis<bool>,
}

impl<D: Dim> AxisTransform<D> {
    /// The transform that changes nothing.
    pub fn identity() -> Self {
        Self {
            source: FixedArray::from_fn(|i| i),
            flip: FixedArray::from_fn(|_| false),
        }
    }

    /// Build a transform from its permutation and mirror flags.
    ///
    /// `source` must be a permutation of the axes.
    pub fn new(source: D::PerAxis<usize>, flip: D::PerAxis<bool>) -> Self {
        debug_assert!(is_permutation::<D>(source.as_ref()), "not a permutation: {source:?}");
        Self { source, flip }
    }

    /// Every symmetry of the root, identity first.
    ///
    /// Permutations vary slowest, in lexicographic order; within a permutation
    /// the flags count up with axis 0 as the low bit.
    pub fn all() -> impl Iterator<Item = Self> {
        let perms: usize = (0..D::DIM).map(|_| D::DIM).product();
        (0..perms)
            .map(|code| {
                let mut code = code;
                let mut source: D::PerAxis<usize> = FixedArray::from_fn(|_| 0);
                for i in (0..D::DIM).rev() {
                    source[i] = code % D::DIM;
                    code /= D::DIM;
                }
                source
            })
            .filter(|source| is_permutation::<D>(source.as_ref()))
            .flat_map(|source| {
                (0..D::CHILDREN).map(move |bits| Self {
                    source,
                    flip: FixedArray::from_fn(|i| high_side(bits, i)),
                })
            })
    }

    /// The input axis read by output axis `axis`.
    pub fn source(&self, axis: usize) -> usize {
        self.source[axis]
    }

    /// Whether output axis `axis` is mirrored.
    pub fn flip(&self, axis: usize) -> bool {
        self.flip[axis]
    }

    /// Whether this is the identity.
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Apply `self`, then `next`.
    #[must_use]
    pub fn then(&self, next: &Self) -> Self {
        Self {
            source: FixedArray::from_fn(|j| self.source[next.source[j]]),
            flip: FixedArray::from_fn(|j| next.flip[j] ^ self.flip[next.source[j]]),
        }
    }

    /// The transform that undoes this one.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let mut source: D::PerAxis<usize> = FixedArray::from_fn(|_| 0);
        let mut flip: D::PerAxis<bool> = FixedArray::from_fn(|_| false);
        for i in 0..D::DIM {
            source[self.source[i]] = i;
            flip[self.source[i]] = self.flip[i];
        }
        Self { source, flip }
    }

    /// Map quadrant or node `q` into the target frame.
    ///
    /// Nodes mirror around `ROOT_LEN`; quadrants mirror around their last offset
    /// so that the low corner stays the low corner.
    pub fn apply<P: Copy>(&self, q: &Quadrant<D, P>) -> Quadrant<D, P> {
        let th = if q.is_node(false) {
            D::ROOT_LEN
        } else {
            debug_assert!(q.is_extended(), "not an extended quadrant or node: {q}");
            D::last_offset(q.level)
        };
        let r = q.derive(
            FixedArray::from_fn(|i| {
                let c = q.coords[self.source[i]];
                if self.flip[i] { th - c } else { c }
            }),
            q.level,
        );
        debug_assert!(r.is_node(false) || r.is_extended(), "transformed to {r}");
        r
    }

    /// The target-frame id of corner `corner`.
    pub fn transform_corner(&self, corner: usize) -> usize {
        debug_assert!(corner < D::CHILDREN, "corner {corner} out of range");
        (0..D::DIM)
            .filter(|&i| high_side(corner, self.source[i]) ^ self.flip[i])
            .fold(0, |id, i| id | 1 << i)
    }
}

fn is_permutation<D: Dim>(source: &[usize]) -> bool {
    (0..D::DIM).all(|axis| source.iter().filter(|&&s| s == axis).count() == 1)
}

impl<D: Dim> Default for AxisTransform<D> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<D: Dim> PartialEq for AxisTransform<D> {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flip == other.flip
    }
}

impl<D: Dim> Eq for AxisTransform<D> {}

impl<D: Dim> fmt::Debug for AxisTransform<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxisTransform")
            .field("source", &self.source)
            .field("flip", &self.flip)
            .finish()
    }
}

impl<D: Dim, P: Copy> Quadrant<D, P> {
    /// Map this quadrant or node through `t`.
    pub fn transform(&self, t: &AxisTransform<D>) -> Self {
        t.apply(self)
    }
}

/// One of the eight rigid motions joining two 2D trees across a face.
///
/// Rotation angles follow the sign convention of connectivity tables, which
/// describe how the source frame turns. Mirrors are named by the angle of
/// their fixed line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FaceTransform {
    /// No change.
    Identity = 0,
    /// Rotate by -90 degrees.
    RotateNeg90 = 1,
    /// Rotate by 180 degrees.
    Rotate180 = 2,
    /// Rotate by 90 degrees.
    Rotate90 = 3,
    /// Mirror across the 0 degree (horizontal) line.
    Mirror0 = 4,
    /// Mirror across the 45 degree diagonal.
    Mirror45 = 5,
    /// Mirror across the 90 degree (vertical) line.
    Mirror90 = 6,
    /// Mirror across the 135 degree diagonal.
    Mirror135 = 7,
}

/// `(source, flip)` for each [`FaceTransform`], by id.
const FACE_TRANSFORMS: [([usize; 2], [bool; 2]); 8] = [
    ([0, 1], [false, false]),
    ([1, 0], [true, false]),
    ([0, 1], [true, true]),
    ([1, 0], [false, true]),
    ([0, 1], [false, true]),
    ([1, 0], [false, false]),
    ([0, 1], [true, false]),
    ([1, 0], [true, true]),
];

/// Image of each corner under each [`FaceTransform`], by id.
const NODE_TRANSFORM: [[usize; 4]; 8] = [
    [0, 1, 2, 3],
    [1, 3, 0, 2],
    [3, 2, 1, 0],
    [2, 0, 3, 1],
    [2, 3, 0, 1],
    [0, 2, 1, 3],
    [1, 0, 3, 2],
    [3, 1, 2, 0],
];

impl FaceTransform {
    /// All transforms in id order.
    pub const ALL: [Self; 8] = [
        Self::Identity,
        Self::RotateNeg90,
        Self::Rotate180,
        Self::Rotate90,
        Self::Mirror0,
        Self::Mirror45,
        Self::Mirror90,
        Self::Mirror135,
    ];

    /// Numeric id used by connectivity tables.
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// The equivalent signed axis permutation.
    pub fn axis_transform(self) -> AxisTransform<D2> {
        let (source, flip) = FACE_TRANSFORMS[usize::from(self.id())];
        AxisTransform::new(source, flip)
    }

    /// The transform that undoes this one.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::RotateNeg90 => Self::Rotate90,
            Self::Rotate90 => Self::RotateNeg90,
            other => other,
        }
    }

    /// Image of corner `node` under this transform.
    pub fn node(self, node: usize) -> usize {
        debug_assert!(node < D2::CHILDREN, "corner {node} out of range");
        NODE_TRANSFORM[usize::from(self.id())][node]
    }
}

impl TryFrom<u8> for FaceTransform {
    type Error = QuadrantError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(id))
            .copied()
            .ok_or(QuadrantError::InvalidTransform(id))
    }
}

impl From<FaceTransform> for AxisTransform<D2> {
    fn from(t: FaceTransform) -> Self {
        t.axis_transform()
    }
}

impl<P: Copy> Quadrant<D2, P> {
    /// Map this quadrant or node into a face-adjacent tree's frame.
    pub fn transform_face(&self, t: FaceTransform) -> Self {
        t.axis_transform().apply(self)
    }
}
