// Copyright 2025 the Quadforest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Face contact patterns.

bitflags::bitflags! {
    /// Set of axis-aligned root faces a quadrant is in contact with.
    ///
    /// Bits come in axis pairs: `2k` is the low side of axis `k`, `2k + 1` the high side.
    /// Corner placement uses these patterns to decide whether a candidate sits
    /// exactly against a requested root corner.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Contact: u8 {
        /// Touches the `x = 0` side.
        const X_LOW  = 0b0000_0001;
        /// Touches the `x = ROOT_LEN` side.
        const X_HIGH = 0b0000_0010;
        /// Touches the `y = 0` side.
        const Y_LOW  = 0b0000_0100;
        /// Touches the `y = ROOT_LEN` side.
        const Y_HIGH = 0b0000_1000;
        /// Touches the `z = 0` side.
        const Z_LOW  = 0b0001_0000;
        /// Touches the `z = ROOT_LEN` side.
        const Z_HIGH = 0b0010_0000;
    }
}

impl Contact {
    /// Contact with one side of `axis`.
    #[inline]
    pub const fn side(axis: usize, upper: bool) -> Self {
        let bit = 2 * axis + upper as usize;
        Self::from_bits_retain(1 << bit)
    }
}
