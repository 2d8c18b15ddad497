// Copyright 2025 the Quadforest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Borrowed view of one tree's leaves.

use quadforest_quadrant::{Dim, Quadrant};

/// The sorted leaves of one tree, with their cached extent.
///
/// The slice is owned elsewhere (by a forest or a partition); this view only
/// caches the first and last descendants at [`Dim::QMAX_LEVEL`] so extent
/// checks stay cheap.
#[derive(Clone, Copy, Debug)]
pub struct Tree<'a, D: Dim, P: Copy = ()> {
    id: usize,
    leaves: &'a [Quadrant<D, P>],
    extent: Option<(Quadrant<D, P>, Quadrant<D, P>)>,
}

impl<'a, D: Dim, P: Copy> Tree<'a, D, P> {
    /// View `leaves`, which must be sorted and non-overlapping, as tree `id`.
    pub fn new(id: usize, leaves: &'a [Quadrant<D, P>]) -> Self {
        debug_assert!(
            leaves.windows(2).all(|w| w[0] < w[1] && !w[0].is_ancestor(&w[1])),
            "leaves are not sorted and disjoint"
        );
        debug_assert!(
            leaves.iter().all(Quadrant::is_valid),
            "leaves must lie inside the root"
        );
        let extent = leaves.first().zip(leaves.last()).map(|(first, last)| {
            (
                first.first_descendant(D::QMAX_LEVEL),
                last.last_descendant(D::QMAX_LEVEL),
            )
        });
        Self { id, leaves, extent }
    }

    /// Caller-assigned tree id.
    pub fn id(&self) -> usize {
        self.id
    }

    /// The leaves in Morton order.
    pub fn leaves(&self) -> &'a [Quadrant<D, P>] {
        self.leaves
    }

    /// Whether the tree has no leaves.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// First descendant of the first leaf.
    pub fn first_descendant(&self) -> Option<&Quadrant<D, P>> {
        self.extent.as_ref().map(|(first, _)| first)
    }

    /// Last descendant of the last leaf.
    pub fn last_descendant(&self) -> Option<&Quadrant<D, P>> {
        self.extent.as_ref().map(|(_, last)| last)
    }

    /// Whether some part of `q` lies in the range covered by the leaves.
    pub fn overlaps(&self, q: &Quadrant<D, P>) -> bool {
        let Some((first, last)) = &self.extent else {
            return false;
        };
        let q_first = q.first_descendant(D::QMAX_LEVEL);
        let q_last = q.last_descendant(D::QMAX_LEVEL);
        q_first <= *last && *first <= q_last
    }

    /// Whether all of `q` lies in the range covered by the leaves.
    pub fn contains(&self, q: &Quadrant<D, P>) -> bool {
        let Some((first, last)) = &self.extent else {
            return false;
        };
        *first <= q.first_descendant(D::QMAX_LEVEL) && q.last_descendant(D::QMAX_LEVEL) <= *last
    }

    /// The smallest quadrant containing every leaf, where a search starts.
    pub fn search_root(&self) -> Option<Quadrant<D, P>> {
        let first = self.leaves.first()?;
        let last = self.leaves.last()?;
        Some(first.nearest_common_ancestor(last))
    }
}
