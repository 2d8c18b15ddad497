// Copyright 2025 the Quadforest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bound search over slices sorted in Morton order.
//!
//! Both searches take a starting index. Sweeps that visit quadrants in order
//! usually know roughly where the answer is, and a good guess saves most of the
//! probes. A bad guess only costs time: the result never depends on it.

use core::cmp::Ordering;

use quadforest_quadrant::{Dim, Quadrant};

/// Index of the first quadrant `>= q`, or `None` if there is none.
pub fn find_lower_bound<D: Dim, P: Copy>(
    quads: &[Quadrant<D, P>],
    q: &Quadrant<D, P>,
    guess: usize,
) -> Option<usize> {
    let count = quads.len();
    if count == 0 {
        return None;
    }
    let (mut low, mut high) = (0, count - 1);
    let mut guess = guess.min(high);
    loop {
        debug_assert!(low <= guess && guess <= high, "probe out of window");
        let here = q.cmp(&quads[guess]);
        if here != Ordering::Greater && guess > 0 && q <= &quads[guess - 1] {
            // The answer is further down.
            high = guess - 1;
            guess = (low + high + 1) / 2;
            continue;
        }
        if here == Ordering::Greater {
            low = guess + 1;
            if low > high {
                return None;
            }
            guess = (low + high) / 2;
            continue;
        }
        return Some(guess);
    }
}

/// Index of the last quadrant `<= q`, or `None` if there is none.
pub fn find_upper_bound<D: Dim, P: Copy>(
    quads: &[Quadrant<D, P>],
    q: &Quadrant<D, P>,
    guess: usize,
) -> Option<usize> {
    let count = quads.len();
    if count == 0 {
        return None;
    }
    let (mut low, mut high) = (0, count - 1);
    let mut guess = guess.min(high);
    loop {
        debug_assert!(low <= guess && guess <= high, "probe out of window");
        let here = quads[guess].cmp(q);
        if here != Ordering::Greater && guess < count - 1 && &quads[guess + 1] <= q {
            // The answer is further up.
            low = guess + 1;
            guess = (low + high) / 2;
            continue;
        }
        if here == Ordering::Greater {
            if guess == low {
                return None;
            }
            high = guess - 1;
            guess = (low + high + 1) / 2;
            continue;
        }
        return Some(guess);
    }
}
