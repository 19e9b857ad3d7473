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

//! Feasible interval and box construction.
//!
//! Per attribute, the requested numeric interval is clipped against the
//! default reachable bound and then, when a band preference is present,
//! split into the intersections with each named band segment. The lazy
//! cartesian product of the per-attribute lists defines the boxes; each
//! box is searched independently.

use crate::capacity::CapacityPlan;
use grist_core::math::{approx::EPS, interval::AttrInterval};
use grist_model::{
    catalogue::Catalogue, diagnostics::Diagnostic, request::SolveRequest, style::Style,
};
use smallvec::SmallVec;

/// The feasible intervals of one attribute, in preference order.
pub type IntervalList = SmallVec<[AttrInterval; 4]>;

/// Builds the per-attribute feasible interval lists.
///
/// Fails with `NoFeasibleIntervals` as soon as any attribute ends up
/// with an empty list: an inverted requested interval, an empty
/// intersection with the reachable bound, or band preferences that
/// intersect nothing.
pub fn feasible_intervals(
    catalogue: &Catalogue,
    style: &Style,
    request: &SolveRequest,
    plan: &CapacityPlan,
) -> Result<Vec<IntervalList>, Diagnostic> {
    let mut lists = Vec::with_capacity(catalogue.num_attrs());

    for (k, attr) in catalogue.attrs().iter().enumerate() {
        let requested = match request.numeric_interval(attr) {
            Some((lo, hi)) => {
                AttrInterval::try_new(lo, hi).ok_or(Diagnostic::NoFeasibleIntervals)?
            }
            None => AttrInterval::UNBOUNDED,
        };
        let clipped = requested
            .intersection(plan.attr_bounds()[k])
            .ok_or(Diagnostic::NoFeasibleIntervals)?;

        let mut list = IntervalList::new();
        match request.band_preference(attr) {
            None => list.push(clipped),
            Some([]) => list.push(clipped),
            Some(bands) => {
                for band in bands {
                    for seg in style.segments(attr) {
                        if seg.band != *band {
                            continue;
                        }
                        let Some(segment) = AttrInterval::try_new(seg.min, seg.max) else {
                            continue;
                        };
                        let Some(interval) = clipped.intersection(segment) else {
                            continue;
                        };
                        if !list.iter().any(|kept| kept.approx_same(interval, EPS)) {
                            list.push(interval);
                        }
                    }
                }
            }
        }

        if list.is_empty() {
            return Err(Diagnostic::NoFeasibleIntervals);
        }
        lists.push(list);
    }

    Ok(lists)
}

/// Lazily enumerates the cartesian product of the per-attribute interval
/// lists, one box at a time.
///
/// The last attribute cycles fastest. With zero attributes a single,
/// unconstrained box is produced.
pub struct BoxIter<'a> {
    lists: &'a [IntervalList],
    cursor: Vec<usize>,
    exhausted: bool,
}

impl<'a> BoxIter<'a> {
    /// Creates an iterator over the boxes of `lists`.
    pub fn new(lists: &'a [IntervalList]) -> Self {
        let exhausted = lists.iter().any(|list| list.is_empty());
        Self {
            lists,
            cursor: vec![0; lists.len()],
            exhausted,
        }
    }
}

impl Iterator for BoxIter<'_> {
    type Item = Vec<AttrInterval>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let item = self
            .cursor
            .iter()
            .enumerate()
            .map(|(k, &i)| self.lists[k][i])
            .collect();

        let mut k = self.lists.len();
        loop {
            if k == 0 {
                self.exhausted = true;
                break;
            }
            k -= 1;
            self.cursor[k] += 1;
            if self.cursor[k] < self.lists[k].len() {
                break;
            }
            self.cursor[k] = 0;
        }

        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity::derive_capacity;
    use grist_model::{
        ingredient::Ingredient,
        request::SolveRequestBuilder,
        style::{BandSegment, Style},
    };
    use rustc_hash::FxHashMap;

    fn catalogue() -> Catalogue {
        Catalogue::new(
            vec!["a".to_string(), "b".to_string()],
            FxHashMap::default(),
            vec![
                Ingredient::new("x", vec![1.0, 0.0]),
                Ingredient::new("y", vec![0.0, 1.0]),
            ],
        )
    }

    fn banded_style() -> Style {
        Style::new(vec![0.0, 0.0]).with_bands(
            "a",
            vec![
                BandSegment::new(0.0, 1.99, "red"),
                BandSegment::new(2.0, 3.99, "green"),
                BandSegment::new(4.0, 10.0, "red"),
            ],
        )
    }

    #[test]
    fn test_unconstrained_attr_yields_reachable_bound() {
        let catalogue = catalogue();
        let style = banded_style();
        let request = SolveRequestBuilder::new("s").total_cap(5).per_cap(5).build();
        let plan = derive_capacity(&catalogue, &style, &request).unwrap();

        let lists = feasible_intervals(&catalogue, &style, &request, &plan).unwrap();
        assert_eq!(lists[0].len(), 1);
        // Clipped to the reachable bound [0, 5].
        assert_eq!(lists[0][0].lo(), 0.0);
        assert_eq!(lists[0][0].hi(), 5.0);
    }

    #[test]
    fn test_unreachable_request_fails() {
        let catalogue = catalogue();
        let style = banded_style();
        // No ingredient can push "a" above 5 units.
        let request = SolveRequestBuilder::new("s")
            .numeric_interval("a", 100.0, 200.0)
            .total_cap(5)
            .per_cap(5)
            .build();
        let plan = derive_capacity(&catalogue, &style, &request).unwrap();
        assert_eq!(
            feasible_intervals(&catalogue, &style, &request, &plan),
            Err(Diagnostic::NoFeasibleIntervals)
        );
    }

    #[test]
    fn test_inverted_request_fails() {
        let catalogue = catalogue();
        let style = banded_style();
        let request = SolveRequestBuilder::new("s")
            .numeric_interval("a", 2.0, 1.0)
            .total_cap(5)
            .per_cap(5)
            .build();
        let plan = derive_capacity(&catalogue, &style, &request).unwrap();
        assert_eq!(
            feasible_intervals(&catalogue, &style, &request, &plan),
            Err(Diagnostic::NoFeasibleIntervals)
        );
    }

    #[test]
    fn test_band_preference_splits_interval() {
        let catalogue = catalogue();
        let style = banded_style();
        let request = SolveRequestBuilder::new("s")
            .band_preference("a", ["red", "green"])
            .total_cap(5)
            .per_cap(5)
            .build();
        let plan = derive_capacity(&catalogue, &style, &request).unwrap();

        let lists = feasible_intervals(&catalogue, &style, &request, &plan).unwrap();
        // Two red segments intersect the reachable bound [0, 5] plus one
        // green segment, in preference order: red first.
        assert_eq!(lists[0].len(), 3);
        assert_eq!(lists[0][0].lo(), 0.0);
        assert_eq!(lists[0][0].hi(), 1.99);
        assert_eq!(lists[0][1].lo(), 4.0);
        assert_eq!(lists[0][1].hi(), 5.0);
        assert_eq!(lists[0][2].lo(), 2.0);
        assert_eq!(lists[0][2].hi(), 3.99);
    }

    #[test]
    fn test_band_preference_without_matching_segment_fails() {
        let catalogue = catalogue();
        let style = banded_style();
        let request = SolveRequestBuilder::new("s")
            .band_preference("a", ["purple"])
            .total_cap(5)
            .per_cap(5)
            .build();
        let plan = derive_capacity(&catalogue, &style, &request).unwrap();
        assert_eq!(
            feasible_intervals(&catalogue, &style, &request, &plan),
            Err(Diagnostic::NoFeasibleIntervals)
        );
    }

    #[test]
    fn test_empty_band_preference_is_unconstrained() {
        let catalogue = catalogue();
        let style = banded_style();
        let request = SolveRequestBuilder::new("s")
            .band_preference("a", Vec::<String>::new())
            .total_cap(5)
            .per_cap(5)
            .build();
        let plan = derive_capacity(&catalogue, &style, &request).unwrap();
        let lists = feasible_intervals(&catalogue, &style, &request, &plan).unwrap();
        assert_eq!(lists[0].len(), 1);
    }

    #[test]
    fn test_box_iter_enumerates_cartesian_product() {
        let lists = vec![
            IntervalList::from_slice(&[
                AttrInterval::new(0.0, 1.0),
                AttrInterval::new(2.0, 3.0),
            ]),
            IntervalList::from_slice(&[
                AttrInterval::new(5.0, 6.0),
                AttrInterval::new(7.0, 8.0),
            ]),
        ];
        let boxes: Vec<Vec<AttrInterval>> = BoxIter::new(&lists).collect();
        assert_eq!(boxes.len(), 4);
        // Last attribute cycles fastest.
        assert_eq!(boxes[0][0].lo(), 0.0);
        assert_eq!(boxes[0][1].lo(), 5.0);
        assert_eq!(boxes[1][0].lo(), 0.0);
        assert_eq!(boxes[1][1].lo(), 7.0);
        assert_eq!(boxes[2][0].lo(), 2.0);
        assert_eq!(boxes[2][1].lo(), 5.0);
    }

    #[test]
    fn test_box_iter_zero_attrs_yields_one_empty_box() {
        let lists: Vec<IntervalList> = Vec::new();
        let boxes: Vec<Vec<AttrInterval>> = BoxIter::new(&lists).collect();
        assert_eq!(boxes.len(), 1);
        assert!(boxes[0].is_empty());
    }
}
