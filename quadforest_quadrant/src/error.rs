// Copyright 2025 the Quadforest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors from the checked conversion layer.
//!
//! Geometric operations never fail; their preconditions are debug assertions.
//! Only raw data coming from outside (coordinates read from another subsystem,
//! transform ids from a connectivity table) goes through these checks.

/// Reasons raw data does not describe a quadrant, node, or transform.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum QuadrantError {
    /// The level is negative or deeper than the deepest quadrant level.
    #[error("level {level} is outside 0..={max}")]
    LevelOutOfRange {
        /// Offending level.
        level: i8,
        /// Deepest allowed level.
        max: i8,
    },
    /// A coordinate is not a multiple of the side length at its level.
    #[error("coordinate {value:#x} on axis {axis} is not aligned to level {level}")]
    Misaligned {
        /// Axis of the offending coordinate.
        axis: usize,
        /// Offending coordinate.
        value: i32,
        /// Level the coordinate was checked against.
        level: i8,
    },
    /// A coordinate lies outside the halo around the root.
    #[error("coordinate {value:#x} on axis {axis} is outside the halo")]
    OutsideHalo {
        /// Axis of the offending coordinate.
        axis: usize,
        /// Offending coordinate.
        value: i32,
    },
    /// The coordinates do not form a node (clamped or unclamped as requested).
    #[error("coordinate {value:#x} on axis {axis} is not a node coordinate (clamped: {inside})")]
    NotANode {
        /// Axis of the offending coordinate.
        axis: usize,
        /// Offending coordinate.
        value: i32,
        /// Whether a clamped node was requested.
        inside: bool,
    },
    /// A face transform id is not in `0..8`.
    #[error("face transform id {0} is out of range")]
    InvalidTransform(u8),
}
