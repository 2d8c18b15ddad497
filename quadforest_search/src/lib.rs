// Copyright 2025 the Quadforest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadforest Search: queries over sorted runs of quadrants.
//!
//! The leaves of a tree, sorted by the Morton order of
//! [`quadforest_quadrant::Quadrant`], are a plain slice. This crate answers
//! questions about such slices without owning or changing them:
//!
//! - [`find_lower_bound`] and [`find_upper_bound`]: binary search with a
//!   starting hint.
//! - [`ChildSplit`]: the per-child buckets of descendants of one quadrant.
//! - [`RangeBoundaries`]: which faces, edges and corners of a containing
//!   quadrant a contiguous range of leaves touches.
//! - [`search`]: recursive, callback-driven matching of opaque points against
//!   the leaves of several [`Tree`]s.
//!
//! # Example
//!
//! ```rust
//! use quadforest_quadrant::{D2, Dim, Quadrant2};
//! use quadforest_search::{SearchMatch, Tree, search};
//!
//! // Four leaves at level 1 covering the root.
//! let leaves = Quadrant2::<()>::root().children();
//! let trees = [Tree::new(0, &leaves)];
//!
//! // Points are `[x, y]` in root coordinates.
//! let half = D2::ROOT_LEN / 2;
//! let points = [[half + 1, 3], [2, half]];
//! let mut inside = |_tree: usize, q: &Quadrant2, _leaf: bool, p: &[i32; 2]| {
//!     (0..2).all(|a| q.coord(a) <= p[a] && p[a] < q.coord(a) + q.side_len())
//! };
//! let found = search(&trees, &points, &mut inside);
//! assert_eq!(
//!     found,
//!     [
//!         SearchMatch { tree: 0, leaf: 1, point: 0 },
//!         SearchMatch { tree: 0, leaf: 2, point: 1 },
//!     ]
//! );
//! ```
//!
//! ## Features
//!
//! - `tracing`: emit a span per [`search`] call and events per tree and per
//!   pruned subtree.

#![no_std]

extern crate alloc;

pub mod boundaries;
pub mod bounds;
pub mod search;
pub mod split;
pub mod tree;

pub use boundaries::{RangeBoundaries, find_range_boundaries};
pub use bounds::{find_lower_bound, find_upper_bound};
pub use search::{SearchMatch, SearchQuery, search};
pub use split::ChildSplit;
pub use tree::Tree;
