// Copyright 2025 the Quadforest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recursive top-down matching of points against the leaves of a forest.
//!
//! The search starts at the smallest quadrant containing each tree's leaves
//! and descends only into children that hold at least one leaf. At every
//! visited quadrant the query is asked once per point that is still a
//! candidate there. Rejected points are dropped for the whole subtree.
//! Accepting a point at a leaf records a [`SearchMatch`].
//!
//! Points are opaque: the search only passes references to them along.

use alloc::vec::Vec;
use core::marker::PhantomData;

use quadforest_quadrant::{Dim, Quadrant};

use crate::split::ChildSplit;
use crate::tree::Tree;

/// Decides whether a point may lie in a quadrant.
///
/// `quadrant` is either a leaf (`is_leaf == true`) or one of its ancestors.
/// Returning `true` for an ancestor keeps the point a candidate for the
/// children; returning `true` for a leaf reports a match. A point may match
/// more than one leaf, and may be accepted for an ancestor but then rejected
/// by every child.
///
/// Any `FnMut(usize, &Quadrant<D, P>, bool, &T) -> bool` closure is a query.
pub trait SearchQuery<D: Dim, P: Copy, T: ?Sized> {
    /// Test `point` against `quadrant` of tree `tree`.
    fn matches(&mut self, tree: usize, quadrant: &Quadrant<D, P>, is_leaf: bool, point: &T)
    -> bool;
}

impl<D, P, T, F> SearchQuery<D, P, T> for F
where
    D: Dim,
    P: Copy,
    T: ?Sized,
    F: FnMut(usize, &Quadrant<D, P>, bool, &T) -> bool,
{
    #[inline]
    fn matches(
        &mut self,
        tree: usize,
        quadrant: &Quadrant<D, P>,
        is_leaf: bool,
        point: &T,
    ) -> bool {
        self(tree, quadrant, is_leaf, point)
    }
}

/// A point accepted by a leaf.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchMatch {
    /// Id of the tree holding the leaf.
    pub tree: usize,
    /// Index of the leaf in its tree.
    pub leaf: usize,
    /// Index of the point in the searched slice.
    pub point: usize,
}

/// Match every point in `points` against the leaves of `trees`.
///
/// Matches come out ordered by tree (in slice order), then by leaf, then by
/// point. The query is called exactly once for each pair of a visited quadrant
/// and a point still active there.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        skip_all,
        name = "quadforest::search",
        fields(trees = trees.len(), points = points.len())
    )
)]
pub fn search<D, P, T, Q>(trees: &[Tree<'_, D, P>], points: &[T], query: &mut Q) -> Vec<SearchMatch>
where
    D: Dim,
    P: Copy,
    Q: SearchQuery<D, P, T> + ?Sized,
{
    let mut matches = Vec::new();
    if points.is_empty() {
        return matches;
    }
    let all: Vec<usize> = (0..points.len()).collect();
    for tree in trees {
        let Some(root) = tree.search_root() else {
            continue;
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(
            tree = tree.id(),
            leaves = tree.leaves().len(),
            %root,
            "searching tree"
        );
        let mut walk = Walk {
            tree: tree.id(),
            points,
            query: &mut *query,
            matches: &mut matches,
            _marker: PhantomData,
        };
        walk.visit(&root, tree.leaves(), 0, &all);
    }
    matches
}

struct Walk<'a, D: Dim, P: Copy, T, Q: ?Sized> {
    tree: usize,
    points: &'a [T],
    query: &'a mut Q,
    matches: &'a mut Vec<SearchMatch>,
    // `D` and `P` only appear through `Q`'s bound.
    _marker: PhantomData<fn(&Quadrant<D, P>)>,
}

impl<'a, D, P, T, Q> Walk<'a, D, P, T, Q>
where
    D: Dim,
    P: Copy,
    Q: SearchQuery<D, P, T> + ?Sized,
{
    /// Visit `quadrant`, whose leaves are `leaves` starting at tree index `offset`.
    fn visit(
        &mut self,
        quadrant: &Quadrant<D, P>,
        leaves: &[Quadrant<D, P>],
        offset: usize,
        actives: &[usize],
    ) {
        debug_assert!(!leaves.is_empty(), "visited a quadrant without leaves");
        if let [leaf] = leaves
            && leaf.level() == quadrant.level()
        {
            for &point in actives {
                if self
                    .query
                    .matches(self.tree, leaf, true, &self.points[point])
                {
                    self.matches.push(SearchMatch {
                        tree: self.tree,
                        leaf: offset,
                        point,
                    });
                }
            }
            return;
        }

        let kept: Vec<usize> = actives
            .iter()
            .copied()
            .filter(|&point| {
                self.query
                    .matches(self.tree, quadrant, false, &self.points[point])
            })
            .collect();
        if kept.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::trace!(%quadrant, leaves = leaves.len(), "subtree pruned");
            return;
        }

        let split = ChildSplit::new(leaves, quadrant.level());
        for (child, range) in split.non_empty() {
            let start = range.start;
            self.visit(&quadrant.child(child), &leaves[range], offset + start, &kept);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use quadforest_quadrant::{D2, D3, Octant, Quadrant2};

    /// A point in root coordinates.
    #[derive(Debug)]
    struct Point([i32; 2]);

    fn contains(q: &Quadrant2, p: &Point) -> bool {
        let len = q.side_len();
        (0..2).all(|axis| (q.coord(axis)..q.coord(axis) + len).contains(&p.0[axis]))
    }

    /// Uniform level-2 grid with child 3 of the root refined once more.
    fn forest() -> Vec<Quadrant2> {
        let root = Quadrant2::<()>::root();
        let mut leaves = Vec::new();
        for c in 0..3 {
            leaves.extend(root.child(c).children());
        }
        for c in root.child(3).children() {
            leaves.extend(c.children());
        }
        leaves
    }

    #[test]
    fn points_land_in_their_leaves() {
        let leaves = forest();
        let trees = [Tree::new(7, &leaves)];
        let quarter = D2::ROOT_LEN / 4;
        let points = [
            Point([1, 1]),
            Point([3 * quarter + 5, 3 * quarter + 5]),
            Point([quarter, 0]),
        ];
        let mut query = |_: usize, q: &Quadrant2, _: bool, p: &Point| contains(q, p);
        let found = search(&trees, &points, &mut query);

        assert_eq!(found.len(), 3);
        for m in &found {
            assert_eq!(m.tree, 7);
            assert!(contains(&leaves[m.leaf], &points[m.point]));
        }
        assert_eq!(found[0], SearchMatch { tree: 7, leaf: 0, point: 0 });
        assert_eq!(found[1], SearchMatch { tree: 7, leaf: 1, point: 2 });
        assert_eq!(found[2].point, 1);
        assert_eq!(leaves[found[2].leaf].level(), 3);
    }

    #[test]
    fn query_runs_once_per_visited_pair() {
        let leaves = forest();
        let trees = [Tree::new(0, &leaves)];
        let points = [Point([0, 0]), Point([D2::ROOT_LEN - 1, D2::ROOT_LEN - 1])];
        let mut calls = Vec::new();
        let mut query = |_: usize, q: &Quadrant2, leaf: bool, p: &Point| {
            calls.push((*q, leaf, p.0));
            contains(q, p)
        };
        search(&trees, &points, &mut query);

        // Both points reach every child of an accepting quadrant: the root and
        // its four children, then the four leaves of child 0, or the four
        // level-2 quadrants of child 3 and the leaves of the last one.
        assert_eq!(calls.iter().filter(|c| c.2 == [0, 0]).count(), 9);
        assert_eq!(calls.iter().filter(|c| c.2[0] != 0).count(), 13);
        let mut dedup = calls.clone();
        dedup.sort_by(|a, b| a.0.cmp(&b.0).then(a.2.cmp(&b.2)));
        dedup.dedup_by(|a, b| a.0 == b.0 && a.2 == b.2);
        assert_eq!(dedup.len(), calls.len());
        // Only leaves are reported as such.
        for (q, leaf, _) in &calls {
            assert_eq!(*leaf, leaves.contains(q));
        }
    }

    #[test]
    fn rejection_prunes_the_subtree() {
        let leaves = forest();
        let trees = [Tree::new(0, &leaves)];
        let points = [Point([0, 0])];
        let mut visited = 0;
        let mut query = |_: usize, q: &Quadrant2, _: bool, _: &Point| {
            visited += 1;
            q.level() == 0
        };
        assert!(search(&trees, &points, &mut query).is_empty());
        // The root, then each of its four children.
        assert_eq!(visited, 5);
    }

    #[test]
    fn multiple_matches_and_unmatched_ancestors() {
        let leaves = forest();
        let trees = [Tree::new(0, &leaves)];
        let points = ["everything", "nothing below the root"];
        let mut query = |_: usize, q: &Quadrant2, _: bool, p: &&str| match *p {
            "everything" => true,
            _ => q.level() == 0,
        };
        let found = search(&trees, &points, &mut query);
        assert_eq!(found.len(), leaves.len());
        assert!(found.iter().all(|m| m.point == 0));
        let hit: Vec<usize> = found.iter().map(|m| m.leaf).collect();
        assert_eq!(hit, (0..leaves.len()).collect::<Vec<_>>());
    }

    #[test]
    fn partial_trees_and_single_leaves() {
        let root = Octant::<()>::root();
        let first = [root.child(2).child(1), root.child(2).child(6)];
        let second = [root];
        let empty: [Octant; 0] = [];
        let trees = [
            Tree::<D3>::new(0, &first),
            Tree::new(1, &empty),
            Tree::new(2, &second),
        ];
        let mut roots = Vec::new();
        let mut query = |tree: usize, q: &Octant, leaf: bool, _: &()| {
            if !leaf {
                roots.push((tree, *q));
            }
            true
        };
        let found = search(&trees, &[()], &mut query);
        assert_eq!(
            found,
            vec![
                SearchMatch { tree: 0, leaf: 0, point: 0 },
                SearchMatch { tree: 0, leaf: 1, point: 0 },
                SearchMatch { tree: 2, leaf: 0, point: 0 },
            ]
        );
        // The first tree starts at child 2, the common ancestor of its leaves.
        assert_eq!(roots, vec![(0, root.child(2))]);
    }

    #[test]
    fn no_points_no_calls() {
        let leaves = forest();
        let trees = [Tree::new(0, &leaves)];
        let points: [Point; 0] = [];
        let mut query = |_: usize, _: &Quadrant2, _: bool, _: &Point| -> bool {
            panic!("query called without points")
        };
        assert!(search(&trees, &points, &mut query).is_empty());
    }

    #[test]
    fn payload_reaches_the_query_at_leaves() {
        let root = Quadrant2::<u32>::root();
        let leaves: Vec<Quadrant2<u32>> = root
            .children()
            .into_iter()
            .zip(10_u32..)
            .map(|(c, payload)| c.with_payload(payload))
            .collect();
        let trees = [Tree::new(0, &leaves)];
        let mut seen = Vec::new();
        let mut query = |_: usize, q: &Quadrant2<u32>, leaf: bool, _: &()| {
            if leaf {
                seen.push(q.payload);
            }
            true
        };
        search(&trees, &[()], &mut query);
        assert_eq!(seen, [10, 11, 12, 13]);
    }
}
