// Copyright 2025 the Quadforest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parent, child, sibling, ancestor and descendant relations.
//!
//! Relations that have a bit-twiddling fast path also have a `*_reference`
//! version that walks parents one level at a time; both must agree.

use crate::dim::{Dim, FixedArray, high_side};
use crate::order::{bits, log2};
use crate::quadrant::Quadrant;

impl<D: Dim, P: Copy> Quadrant<D, P> {
    /// The quadrant one level up that contains this one.
    pub fn parent(&self) -> Self {
        debug_assert!(self.is_extended(), "not an extended quadrant: {self}");
        debug_assert!(self.level > 0, "the root has no parent");
        let bit = D::quadrant_len(self.level);
        self.derive(self.map_coords(|_, c| c & !bit), self.level - 1)
    }

    /// The ancestor at `level`, which may equal this quadrant's level.
    pub fn ancestor(&self, level: i8) -> Self {
        debug_assert!(self.is_extended(), "not an extended quadrant: {self}");
        debug_assert!(
            (0..=self.level).contains(&level),
            "level {level} is not above {self}"
        );
        let mask = !(D::quadrant_len(level) - 1);
        self.derive(self.map_coords(|_, c| c & mask), level)
    }

    /// Child `id` in z-order.
    pub fn child(&self, id: usize) -> Self {
        debug_assert!(self.is_extended(), "not an extended quadrant: {self}");
        debug_assert!(self.level < D::QMAX_LEVEL, "{self} cannot be refined");
        debug_assert!(id < D::CHILDREN, "child id {id} out of range");
        let len = D::quadrant_len(self.level + 1);
        self.derive(
            self.map_coords(|axis, c| if high_side(id, axis) { c + len } else { c }),
            self.level + 1,
        )
    }

    /// All children in z-order.
    pub fn children(&self) -> D::PerChild<Self>
    where
        P: core::fmt::Debug,
    {
        FixedArray::from_fn(|id| self.child(id))
    }

    /// The sibling with child id `id` (possibly this quadrant).
    pub fn sibling(&self, id: usize) -> Self {
        debug_assert!(self.is_extended(), "not an extended quadrant: {self}");
        debug_assert!(self.level > 0, "the root has no siblings");
        debug_assert!(id < D::CHILDREN, "child id {id} out of range");
        let bit = D::quadrant_len(self.level);
        self.derive(
            self.map_coords(|axis, c| if high_side(id, axis) { c | bit } else { c & !bit }),
            self.level,
        )
    }

    /// Position of this quadrant among its siblings, `0` for the root.
    pub fn child_id(&self) -> usize {
        self.ancestor_id(self.level)
    }

    /// Child id of the ancestor at `level` within its own parent, `0` at level 0.
    pub fn ancestor_id(&self, level: i8) -> usize {
        debug_assert!(self.is_extended(), "not an extended quadrant: {self}");
        debug_assert!(
            (0..=self.level).contains(&level),
            "level {level} is not above {self}"
        );
        if level == 0 {
            return 0;
        }
        let bit = D::quadrant_len(level);
        self.coords
            .as_ref()
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c & bit != 0)
            .fold(0, |id, (axis, _)| id | 1 << axis)
    }

    /// Whether `quads` is a complete family in z-order: the children of one
    /// parent, at a level below the root.
    pub fn is_family(quads: &[Self]) -> bool {
        quads.len() == D::CHILDREN && Self::family_of(|i| &quads[i])
    }

    /// [`Quadrant::is_family`] over borrowed quadrants.
    pub fn is_family_refs(quads: &[&Self]) -> bool {
        quads.len() == D::CHILDREN && Self::family_of(|i| quads[i])
    }

    fn family_of<'a>(get: impl Fn(usize) -> &'a Self) -> bool
    where
        Self: 'a,
    {
        let first = get(0);
        let level = first.level;
        if level == 0 || first.child_id() != 0 {
            return false;
        }
        let inc = D::quadrant_len(level);
        (0..D::CHILDREN).all(|i| {
            let q = get(i);
            debug_assert!(q.is_extended(), "not an extended quadrant: {q}");
            q.level == level
                && (0..D::DIM).all(|axis| {
                    let offset = if high_side(i, axis) { inc } else { 0 };
                    q.coords[axis] == first.coords[axis] + offset
                })
        })
    }

    /// Whether `r` is a different child of the same parent.
    pub fn is_sibling(&self, r: &Self) -> bool {
        debug_assert!(self.is_extended(), "not an extended quadrant: {self}");
        debug_assert!(r.is_extended(), "not an extended quadrant: {r}");
        if self.level == 0 || self.level != r.level {
            return false;
        }
        let bit = D::quadrant_len(self.level);
        let mut differ = false;
        for axis in 0..D::DIM {
            let x = self.coords[axis] ^ r.coords[axis];
            if x & !bit != 0 {
                return false;
            }
            differ |= x != 0;
        }
        differ
    }

    /// Parent-walking version of [`Quadrant::is_sibling`].
    pub fn is_sibling_reference(&self, r: &Self) -> bool {
        if self.level == 0 || r.level == 0 || self == r {
            return false;
        }
        self.parent() == r.parent()
    }

    /// Whether this quadrant is the parent of `r`.
    pub fn is_parent(&self, r: &Self) -> bool {
        debug_assert!(self.is_extended(), "not an extended quadrant: {self}");
        debug_assert!(r.is_extended(), "not an extended quadrant: {r}");
        if self.level + 1 != r.level {
            return false;
        }
        let bit = D::quadrant_len(r.level);
        (0..D::DIM).all(|axis| self.coords[axis] == r.coords[axis] & !bit)
    }

    /// Parent-walking version of [`Quadrant::is_parent`].
    pub fn is_parent_reference(&self, r: &Self) -> bool {
        r.level > 0 && *self == r.parent()
    }

    /// Whether this quadrant is a strict ancestor of `r`.
    pub fn is_ancestor(&self, r: &Self) -> bool {
        debug_assert!(self.is_extended(), "not an extended quadrant: {self}");
        debug_assert!(r.is_extended(), "not an extended quadrant: {r}");
        if self.level >= r.level {
            return false;
        }
        let shift = D::MAX_LEVEL - self.level;
        (0..D::DIM).all(|axis| (self.coords[axis] ^ r.coords[axis]) >> shift == 0)
    }

    /// Parent-walking version of [`Quadrant::is_ancestor`].
    pub fn is_ancestor_reference(&self, r: &Self) -> bool {
        self.level < r.level && r.ancestor(self.level) == *self
    }

    /// The smallest quadrant containing both `self` and `r`.
    ///
    /// The result carries `self`'s payload. Both quadrants must lie in the same
    /// root-sized block of the halo.
    pub fn nearest_common_ancestor(&self, r: &Self) -> Self {
        debug_assert!(self.is_extended(), "not an extended quadrant: {self}");
        debug_assert!(r.is_extended(), "not an extended quadrant: {r}");
        let differ = (0..D::DIM).fold(0, |acc, axis| {
            acc | bits(self.coords[axis] ^ r.coords[axis])
        });
        let top = log2(differ) + 1;
        debug_assert!(
            top <= i32::from(D::MAX_LEVEL),
            "{self} and {r} have no common ancestor"
        );
        let mask = !((1 << top) - 1);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "top is at most MAX_LEVEL, which fits in i8."
        )]
        let level = (D::MAX_LEVEL - top as i8).min(self.level).min(r.level);
        let a = self.derive(self.map_coords(|_, c| c & mask), level);
        debug_assert!(a.is_extended(), "nearest common ancestor {a}");
        a
    }

    /// Parent-walking version of [`Quadrant::nearest_common_ancestor`].
    pub fn nearest_common_ancestor_reference(&self, r: &Self) -> Self {
        let mut a = *self;
        let mut b = *r;
        while a.level > b.level {
            a = a.parent();
        }
        while b.level > a.level {
            b = b.parent();
        }
        while a != b {
            a = a.parent();
            b = b.parent();
        }
        a
    }

    /// The first (smallest in Morton order) descendant at `level`.
    pub fn first_descendant(&self, level: i8) -> Self {
        debug_assert!(self.is_extended(), "not an extended quadrant: {self}");
        debug_assert!(
            (self.level..=D::QMAX_LEVEL).contains(&level),
            "level {level} is not below {self}"
        );
        self.derive(self.coords, level)
    }

    /// The last (largest in Morton order) descendant at `level`.
    pub fn last_descendant(&self, level: i8) -> Self {
        debug_assert!(self.is_extended(), "not an extended quadrant: {self}");
        debug_assert!(
            (self.level..=D::QMAX_LEVEL).contains(&level),
            "level {level} is not below {self}"
        );
        let shift = D::quadrant_len(self.level) - D::quadrant_len(level);
        self.derive(self.map_coords(|_, c| c + shift), level)
    }
}
