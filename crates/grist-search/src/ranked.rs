// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Bounded Best-K Mix Store
//!
//! A sorted, capacity-bounded container for the best mixes discovered so
//! far. Insertion keeps the list ordered by the canonical comparator and
//! truncates past the capacity; once the store is full, the worst kept
//! total-unit count becomes the pruning bound for the search.
//!
//! ## Ordering
//!
//! Mixes are compared by ascending total units; ties break on the
//! attribute totals element-wise (first difference beyond epsilon
//! decides), then on the count vectors lexicographically. This makes the
//! final ranking deterministic regardless of discovery order.

use grist_core::math::approx::EPS;
use grist_model::solution::Mix;
use std::cmp::Ordering;

/// The canonical mix comparator: ascending total units, then attribute
/// totals element-wise within epsilon, then counts lexicographically.
///
/// # Examples
///
/// ```rust
/// # use std::cmp::Ordering;
/// # use grist_model::solution::{CostSummary, Mix};
/// # use grist_search::ranked::compare_mixes;
/// # use rustc_hash::FxHashMap;
/// # fn mix(counts: Vec<u32>, totals: Vec<f64>) -> Mix {
/// #     let mut bands = FxHashMap::default();
/// #     for (i, _) in totals.iter().enumerate() {
/// #         bands.insert(format!("a{i}"), None);
/// #     }
/// #     Mix::new(counts, totals, bands, FxHashMap::default(), CostSummary::zero())
/// # }
/// let small = mix(vec![1, 1], vec![1.0, 1.0]);
/// let large = mix(vec![2, 1], vec![1.0, 1.0]);
/// assert_eq!(compare_mixes(&small, &large), Ordering::Less);
/// ```
pub fn compare_mixes(a: &Mix, b: &Mix) -> Ordering {
    match a.total_units().cmp(&b.total_units()) {
        Ordering::Equal => {}
        other => return other,
    }

    for (x, y) in a.attribute_totals().iter().zip(b.attribute_totals()) {
        let diff = x - y;
        if diff.abs() > EPS {
            return if diff < 0.0 {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }
    }

    a.counts().cmp(b.counts())
}

/// A sorted list of at most `capacity` mixes in comparator order.
#[derive(Clone, Debug)]
pub struct RankedMixes {
    capacity: usize,
    mixes: Vec<Mix>,
}

impl RankedMixes {
    /// Creates an empty store holding at most `capacity` mixes.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[inline]
    pub fn new(capacity: usize) -> Self {
        assert!(
            capacity > 0,
            "called `RankedMixes::new` with zero capacity"
        );
        Self {
            capacity,
            mixes: Vec::with_capacity(capacity.min(64)),
        }
    }

    /// Offers a mix to the store.
    ///
    /// Returns `true` if the mix was retained, `false` if it ranked past
    /// the capacity and was discarded.
    pub fn insert(&mut self, mix: Mix) -> bool {
        let position = self
            .mixes
            .iter()
            .position(|kept| compare_mixes(&mix, kept) == Ordering::Less)
            .unwrap_or(self.mixes.len());

        if self.mixes.len() >= self.capacity && position >= self.capacity {
            return false;
        }

        self.mixes.insert(position, mix);
        self.mixes.truncate(self.capacity);
        true
    }

    /// Returns `true` once the store holds `capacity` mixes.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.mixes.len() >= self.capacity
    }

    /// Returns the total-unit count of the worst kept mix, but only once
    /// the store is full. Before that there is no pruning bound.
    #[inline]
    pub fn worst_units(&self) -> Option<u32> {
        if self.is_full() {
            self.mixes.last().map(Mix::total_units)
        } else {
            None
        }
    }

    /// Returns the number of mixes currently held.
    #[inline]
    pub fn len(&self) -> usize {
        self.mixes.len()
    }

    /// Returns `true` if no mix has been retained yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mixes.is_empty()
    }

    /// Returns the held mixes in comparator order.
    #[inline]
    pub fn as_slice(&self) -> &[Mix] {
        &self.mixes
    }

    /// Consumes the store and returns the mixes in comparator order.
    #[inline]
    pub fn into_vec(self) -> Vec<Mix> {
        self.mixes
    }
}
