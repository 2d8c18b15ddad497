// Copyright 2025 the Quadforest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Morton order: linear ids, the comparator, equality, and hashing.
//!
//! The total order on quadrants is the order of their positions along the
//! z-order (Morton) curve, with ancestors sorting before their descendants.
//! [`Ord`] computes it in `O(D)` from the most significant differing
//! coordinate bit, without building the interleaved id.

use core::cmp::Ordering;
use core::hash::{Hash, Hasher};

use crate::dim::Dim;
use crate::quadrant::Quadrant;

/// Position of `c` in the unsigned order of `(MAX_LEVEL + 2)`-bit two's complement values.
///
/// Halo coordinates `[-ROOT_LEN, 0)` map above `2 * ROOT_LEN`, which is where the
/// Morton id places them when it keeps two extra high bits per axis.
#[inline]
fn biased<D: Dim>(c: i32) -> i64 {
    let c = i64::from(c);
    if c >= 0 { c } else { c + (1_i64 << (D::MAX_LEVEL + 2)) }
}

/// Index of the highest set bit, `-1` for zero.
#[inline]
pub(crate) fn log2(x: u32) -> i32 {
    31 - x.leading_zeros() as i32
}

/// Reinterpret a coordinate as raw bits.
#[inline]
pub(crate) const fn bits(c: i32) -> u32 {
    c as u32
}

impl<D: Dim, P: Copy> Quadrant<D, P> {
    /// Position along the Morton curve among all quadrants of `level`.
    ///
    /// Coordinates are truncated to `level` and interleaved most significant
    /// bit first, keeping two bits above the root so that halo quadrants get
    /// distinct ids. Requires `level <= self.level()`.
    pub fn linear_id(&self, level: i8) -> u64 {
        debug_assert!(self.is_extended(), "not an extended quadrant: {self}");
        debug_assert!(
            (0..=self.level).contains(&level),
            "level {level} is deeper than {self}"
        );
        let shift = D::MAX_LEVEL - level;
        let bits_per_axis = (level + 2) as usize;
        let mut id = 0_u64;
        for axis in 0..D::DIM {
            // Arithmetic shift keeps the halo sign bits.
            let c = i64::from(self.coords[axis] >> shift) as u64;
            for i in 0..bits_per_axis {
                id |= (c & (1 << i)) << ((D::DIM - 1) * i + axis);
            }
        }
        id
    }

    /// Inverse of [`Quadrant::linear_id`] at `level`.
    ///
    /// The high bits are sign-extended so that ids of halo quadrants come back
    /// with negative coordinates.
    pub fn from_linear_id(level: i8, id: u64) -> Self
    where
        P: Default,
    {
        debug_assert!(
            (0..=D::QMAX_LEVEL).contains(&level),
            "level {level} out of range"
        );
        let bits_per_axis = (level + 2) as usize;
        if level < D::QMAX_LEVEL {
            debug_assert!(
                id < 1 << (D::DIM * bits_per_axis),
                "id {id:#x} too large for level {level}"
            );
        }
        let shift = D::MAX_LEVEL - level;
        let sign_bit = 1_i64 << (D::MAX_LEVEL + 1);
        let coords = Self::root().map_coords(|axis, _| {
            let mut c = 0_i64;
            for i in 0..bits_per_axis {
                c |= (((id >> (D::DIM * i + axis)) & 1) as i64) << i;
            }
            c <<= shift;
            if c >= sign_bit {
                c -= sign_bit << 1;
            }
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Sign extension leaves a value inside the halo, which fits in i32."
            )]
            let c = c as i32;
            c
        });
        let q = Self::from_parts(coords, level, P::default());
        debug_assert!(q.is_extended(), "id {id:#x} decoded to {q}");
        q
    }

    /// Extended quadrants and clamped nodes are the values the order is defined on.
    #[inline]
    fn is_comparable(&self) -> bool {
        self.is_extended() || self.is_node(true)
    }

    /// Morton order first by payload, then by geometry.
    pub fn cmp_piggy(&self, other: &Self) -> Ordering
    where
        P: Ord,
    {
        debug_assert!(self.is_comparable(), "not a quadrant or clamped node: {self}");
        debug_assert!(other.is_comparable(), "not a quadrant or clamped node: {other}");
        self.payload
            .cmp(&other.payload)
            .then_with(|| self.cmp(other))
    }

    /// Geometric equality plus equal payloads.
    pub fn eq_piggy(&self, other: &Self) -> bool
    where
        P: PartialEq,
    {
        self.payload == other.payload && self == other
    }

    /// 32-bit digest of coordinates and level for hash tables of quadrants.
    pub fn digest(&self) -> u32 {
        debug_assert!(self.is_extended(), "not an extended quadrant: {self}");
        mix_words::<D>(self.coords.as_ref(), bits(i32::from(self.level)))
    }

    /// 32-bit digest of coordinates and payload word, for hash tables of nodes
    /// that belong to different trees.
    pub fn digest_piggy(&self) -> u32
    where
        P: PayloadWord,
    {
        debug_assert!(self.is_node(true), "not a clamped node: {self}");
        mix_words::<D>(self.coords.as_ref(), self.payload.payload_word())
    }

    /// Whether `r` immediately follows `self` in a complete, non-overlapping sequence.
    ///
    /// At the coarser of the two levels, `r` must be the next Morton position.
    /// If `self` is finer than `r`, it must also be the last child of every
    /// ancestor up to `r`'s level.
    pub fn is_next(&self, r: &Self) -> bool {
        debug_assert!(self.is_extended(), "not an extended quadrant: {self}");
        debug_assert!(r.is_extended(), "not an extended quadrant: {r}");
        let min_level = if self.level > r.level {
            let mask = D::quadrant_len(r.level) - D::quadrant_len(self.level);
            if !self.coords.as_ref().iter().all(|&c| c & mask == mask) {
                return false;
            }
            r.level
        } else {
            self.level
        };
        self.linear_id(min_level).wrapping_add(1) == r.linear_id(min_level)
    }

    /// Parent-walking version of [`Quadrant::is_next`].
    pub fn is_next_reference(&self, r: &Self) -> bool {
        if self.cmp(r) != Ordering::Less {
            return false;
        }
        let mut a = *self;
        while a.level > r.level {
            if a.child_id() != D::CHILDREN - 1 {
                return false;
            }
            a = a.parent();
        }
        a.linear_id(a.level).wrapping_add(1) == r.linear_id(a.level)
    }
}

/// Single word extracted from a payload for [`Quadrant::digest_piggy`].
pub trait PayloadWord {
    /// The word mixed into the digest, usually an owning tree id.
    fn payload_word(&self) -> u32;
}

macro_rules! impl_payload_word {
    ($($t:ty),*) => {
        $(
            impl PayloadWord for $t {
                #[allow(
                    clippy::cast_possible_truncation,
                    trivial_numeric_casts,
                    reason = "Only the low word feeds the digest."
                )]
                #[inline]
                fn payload_word(&self) -> u32 {
                    *self as u32
                }
            }
        )*
    };
}

impl_payload_word!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl PayloadWord for () {
    #[inline]
    fn payload_word(&self) -> u32 {
        0
    }
}

/// Word-wise avalanche mix (Jenkins' lookup3 `mix` and `final`) over
/// coordinates followed by one extra word.
fn mix_words<D: Dim>(coords: &[i32], extra: u32) -> u32 {
    let mut words = [0_u32; 4];
    for (w, &c) in words.iter_mut().zip(coords) {
        *w = bits(c);
    }
    words[D::DIM] = extra;

    let [mut a, mut b, mut c] = [words[0], words[1], words[2]];
    if D::DIM == 3 {
        mix(&mut a, &mut b, &mut c);
        a = a.wrapping_add(words[3]);
    }
    finalize(&mut a, &mut b, &mut c);
    c
}

#[inline]
fn mix(a: &mut u32, b: &mut u32, c: &mut u32) {
    *a = a.wrapping_sub(*c);
    *a ^= c.rotate_left(4);
    *c = c.wrapping_add(*b);
    *b = b.wrapping_sub(*a);
    *b ^= a.rotate_left(6);
    *a = a.wrapping_add(*c);
    *c = c.wrapping_sub(*b);
    *c ^= b.rotate_left(8);
    *b = b.wrapping_add(*a);
    *a = a.wrapping_sub(*c);
    *a ^= c.rotate_left(16);
    *c = c.wrapping_add(*b);
    *b = b.wrapping_sub(*a);
    *b ^= a.rotate_left(19);
    *a = a.wrapping_add(*c);
    *c = c.wrapping_sub(*b);
    *c ^= b.rotate_left(4);
    *b = b.wrapping_add(*a);
}

#[inline]
fn finalize(a: &mut u32, b: &mut u32, c: &mut u32) {
    *c ^= *b;
    *c = c.wrapping_sub(b.rotate_left(14));
    *a ^= *c;
    *a = a.wrapping_sub(c.rotate_left(11));
    *b ^= *a;
    *b = b.wrapping_sub(a.rotate_left(25));
    *c ^= *b;
    *c = c.wrapping_sub(b.rotate_left(16));
    *a ^= *c;
    *a = a.wrapping_sub(c.rotate_left(4));
    *b ^= *a;
    *b = b.wrapping_sub(a.rotate_left(14));
    *c ^= *b;
    *c = c.wrapping_sub(b.rotate_left(24));
}

impl<D: Dim, P: Copy> PartialEq for Quadrant<D, P> {
    fn eq(&self, other: &Self) -> bool {
        debug_assert!(self.is_comparable(), "not a quadrant or clamped node: {self}");
        debug_assert!(other.is_comparable(), "not a quadrant or clamped node: {other}");
        self.level == other.level && self.coords == other.coords
    }
}

impl<D: Dim, P: Copy> Eq for Quadrant<D, P> {}

impl<D: Dim, P> Hash for Quadrant<D, P> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coords.hash(state);
        self.level.hash(state);
    }
}

impl<D: Dim, P: Copy> PartialOrd for Quadrant<D, P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<D: Dim, P: Copy> Ord for Quadrant<D, P> {
    /// Morton order; equal coordinates order coarser before finer.
    ///
    /// The axis whose coordinates differ in the highest bit decides; on a tie
    /// the higher axis wins, matching the interleaving order of the linear id.
    fn cmp(&self, other: &Self) -> Ordering {
        debug_assert!(self.is_comparable(), "not a quadrant or clamped node: {self}");
        debug_assert!(other.is_comparable(), "not a quadrant or clamped node: {other}");
        let mut axis = None;
        let mut top = -1;
        for k in 0..D::DIM {
            let x = bits(self.coords[k] ^ other.coords[k]);
            if x != 0 && log2(x) >= top {
                top = log2(x);
                axis = Some(k);
            }
        }
        match axis {
            None => self.level.cmp(&other.level),
            Some(k) => biased::<D>(self.coords[k]).cmp(&biased::<D>(other.coords[k])),
        }
    }
}
