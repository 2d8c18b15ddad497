// Copyright 2025 the Quadforest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadforest Quadrant: bit-exact quadrant and octant algebra.
//!
//! A forest of quadtrees (or octrees) covers a domain with a set of root
//! squares (or cubes), each recursively bisected. This crate is the value-level
//! kernel underneath such a forest:
//!
//! - A [`Quadrant`] is a cell of one tree, stored as integer coordinates on the
//!   finest lattice plus a refinement level, with an opaque payload.
//! - Quadrants are totally ordered along the Morton (z-order) curve, so a tree's
//!   leaves are a sorted slice. See [`Quadrant::linear_id`] and the [`Ord`] impl.
//! - Family relations ([`Quadrant::parent`], [`Quadrant::children`],
//!   [`Quadrant::nearest_common_ancestor`], ...) are constant-time bit operations.
//! - Neighbors across faces and corners may land outside the root, in a halo of
//!   one root length on every side, from where a [`FaceTransform`] or
//!   [`AxisTransform`] maps them into the adjacent tree.
//!
//! The algebra is written once over the [`Dim`] trait and instantiated for
//! [`D2`] and [`D3`]. Operations never allocate and never fail: preconditions
//! are debug assertions. Raw data from elsewhere goes through the checked
//! constructors [`Quadrant::try_new`] and [`Quadrant::try_node`], which return
//! [`QuadrantError`].
//!
//! # Example
//!
//! ```rust
//! use quadforest_quadrant::{D2, Dim, Quadrant2};
//!
//! // The level 2 quadrant in the second column of the bottom row.
//! let q = Quadrant2::<()>::try_new([1 << 28, 0], 2).unwrap();
//! let children = q.children();
//! assert!(Quadrant2::is_family(&children));
//! assert_eq!(children[3].coords(), [(1 << 28) + (1 << 27), 1 << 27]);
//!
//! // Children sort after their parent and in z-order among themselves.
//! assert!(q < children[0]);
//! assert!(children.windows(2).all(|w| w[0] < w[1]));
//!
//! // The neighbor across the -x face leaves the root; shifting it by a full
//! // root length lands in the tree attached on that side.
//! let n = children[0].face_neighbor(3).face_neighbor(3).face_neighbor(3);
//! assert!(!n.is_inside_root());
//! assert!(n.translate_face(3).is_valid());
//! assert_eq!(n.translate_face(3).coord(0), D2::ROOT_LEN - (1 << 27));
//! ```
//!
//! ## Coordinates
//!
//! The root has side length [`Dim::ROOT_LEN`] `= 2^MAX_LEVEL`. A quadrant at
//! level `L` has side `ROOT_LEN >> L` and aligned coordinates. Level
//! [`Dim::MAX_LEVEL`] holds nodes: points on the corner lattice, used to
//! identify shared vertices. Ordinary quadrants stop one level earlier, at
//! [`Dim::QMAX_LEVEL`].

#![no_std]

pub mod contact;
pub mod dim;
pub mod error;
pub mod family;
pub mod neighbor;
pub mod order;
pub mod quadrant;
pub mod transform;

pub use contact::Contact;
pub use dim::{D2, D3, Dim, FaceNormal, FixedArray, edge_constraints, high_side};
pub use error::QuadrantError;
pub use neighbor::AllFaceNeighbors;
pub use order::PayloadWord;
pub use quadrant::{Octant, Quadrant, Quadrant2};
pub use transform::{AxisTransform, FaceTransform};
