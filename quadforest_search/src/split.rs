// Copyright 2025 the Quadforest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Splitting a sorted run of descendants into per-child buckets.

use core::fmt;
use core::ops::Range;

use quadforest_quadrant::{Dim, FixedArray, Quadrant};

use crate::bounds::find_lower_bound;

/// Bucket boundaries of a sorted slice, one bucket per child of a common ancestor.
///
/// The quadrants inside child `i` occupy `offset(i)..offset(i + 1)`.
/// Equal neighboring offsets mean an empty bucket.
#[derive(Clone, Copy)]
pub struct ChildSplit<D: Dim> {
    starts: D::PerChild<usize>,
    end: usize,
}

impl<D: Dim> ChildSplit<D> {
    /// Split `quads`, which all descend strictly from one ancestor at `level`.
    pub fn new<P: Copy>(quads: &[Quadrant<D, P>], level: i8) -> Self {
        let end = quads.len();
        let Some(first) = quads.first() else {
            return Self {
                starts: FixedArray::from_fn(|_| 0),
                end,
            };
        };
        let ancestor = first.ancestor(level);
        debug_assert!(
            quads.iter().all(|q| ancestor.is_ancestor(q)),
            "quadrants do not share the ancestor {ancestor}"
        );
        let mut hint = 0;
        let starts: D::PerChild<usize> = FixedArray::from_fn(|child| {
            if child == 0 {
                return 0;
            }
            let start = find_lower_bound(quads, &ancestor.child(child), hint).unwrap_or(end);
            hint = start.min(end.saturating_sub(1));
            start
        });
        Self { starts, end }
    }

    /// Start of bucket `i`; `offset(CHILDREN)` is the slice length.
    pub fn offset(&self, i: usize) -> usize {
        if i == D::CHILDREN {
            self.end
        } else {
            self.starts[i]
        }
    }

    /// Index range of the quadrants inside child `child`.
    pub fn range(&self, child: usize) -> Range<usize> {
        self.offset(child)..self.offset(child + 1)
    }

    /// Whether no quadrant lies inside child `child`.
    pub fn is_empty(&self, child: usize) -> bool {
        self.range(child).is_empty()
    }

    /// Non-empty buckets with their child ids.
    pub fn non_empty(&self) -> impl Iterator<Item = (usize, Range<usize>)> + '_ {
        (0..D::CHILDREN)
            .map(|child| (child, self.range(child)))
            .filter(|(_, r)| !r.is_empty())
    }
}

impl<D: Dim> fmt::Debug for ChildSplit<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries((0..=D::CHILDREN).map(|i| self.offset(i)))
            .finish()
    }
}
