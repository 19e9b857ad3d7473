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

//! Search ordering and suffix bound precomputation.
//!
//! Ingredients with large attribute impact are branched on first so that
//! infeasibility surfaces at shallow depth. For the ordered sequence the
//! module precomputes, from the tail backward, the minimum units still
//! owed and the attainable attribute contribution range of every suffix.
//! These are additive running sums, O(ingredients × attributes) total,
//! never re-derived per search node.

use crate::capacity::CapacityPlan;
use grist_model::{catalogue::Catalogue, diagnostics::Diagnostic};

/// The ordered search sequence with its precomputed suffix bounds.
///
/// Only ingredients that can actually receive units appear: those with a
/// positive mandatory minimum or with spare capacity above it. Everything
/// else is pinned at a count of zero and skipped entirely.
#[derive(Clone, Debug)]
pub struct SearchOrder {
    positions: Vec<usize>,
    min_counts: Vec<u32>,
    max_counts: Vec<u32>,
    vectors: Vec<Vec<f64>>,
    suffix_min_units: Vec<u32>,
    suffix_lo: Vec<Vec<f64>>,
    suffix_hi: Vec<Vec<f64>>,
}

impl SearchOrder {
    /// Returns the number of ordered positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if no ingredient can receive units.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns the original catalogue index per ordered position.
    #[inline]
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Returns the mandatory minimum count at the given position.
    #[inline]
    pub fn min_count(&self, position: usize) -> u32 {
        self.min_counts[position]
    }

    /// Returns the count ceiling at the given position.
    #[inline]
    pub fn max_count(&self, position: usize) -> u32 {
        self.max_counts[position]
    }

    /// Returns the unit vector at the given position.
    #[inline]
    pub fn vector(&self, position: usize) -> &[f64] {
        &self.vectors[position]
    }

    /// Returns the sum of mandatory minimums from `position` to the end.
    /// Index `len()` is valid and yields zero.
    #[inline]
    pub fn suffix_min_units(&self, position: usize) -> u32 {
        self.suffix_min_units[position]
    }

    /// Returns the minimum attainable contribution per attribute from
    /// `position` to the end.
    #[inline]
    pub fn suffix_lo(&self, position: usize) -> &[f64] {
        &self.suffix_lo[position]
    }

    /// Returns the maximum attainable contribution per attribute from
    /// `position` to the end.
    #[inline]
    pub fn suffix_hi(&self, position: usize) -> &[f64] {
        &self.suffix_hi[position]
    }

    /// Returns the ids of optional positions (no mandatory minimum) in
    /// search order. This is the preference order used when the optional
    /// set has to be trimmed.
    pub fn optional_ids(&self, catalogue: &Catalogue) -> Vec<String> {
        self.positions
            .iter()
            .zip(&self.min_counts)
            .filter(|&(_, &min)| min == 0)
            .map(|(&idx, _)| catalogue.ingredients()[idx].id().to_string())
            .collect()
    }

    /// Returns the ids of required positions (positive mandatory
    /// minimum) in search order.
    pub fn required_ids(&self, catalogue: &Catalogue) -> Vec<String> {
        self.positions
            .iter()
            .zip(&self.min_counts)
            .filter(|&(_, &min)| min > 0)
            .map(|(&idx, _)| catalogue.ingredients()[idx].id().to_string())
            .collect()
    }
}

/// Orders the searchable ingredients by descending maximum absolute
/// coefficient and precomputes the suffix bounds.
///
/// Fails with `CapTooSmall` when the mandatory minimums alone exceed the
/// requested total cap.
pub fn build_search_order(
    catalogue: &Catalogue,
    plan: &CapacityPlan,
) -> Result<SearchOrder, Diagnostic> {
    let num_attrs = catalogue.num_attrs();

    let mut entries: Vec<(usize, f64)> = (0..catalogue.num_ingredients())
        .filter(|&idx| {
            plan.min_counts()[idx] > 0 || plan.ceilings()[idx] > plan.min_counts()[idx]
        })
        .map(|idx| {
            let weight = catalogue.ingredients()[idx]
                .unit_vector()
                .iter()
                .fold(0.0f64, |acc, coef| acc.max(coef.abs()));
            (idx, weight)
        })
        .collect();
    // Stable sort: equal weights keep catalogue order, which keeps the
    // whole pipeline deterministic.
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let positions: Vec<usize> = entries.iter().map(|&(idx, _)| idx).collect();
    let min_counts: Vec<u32> = positions.iter().map(|&idx| plan.min_counts()[idx]).collect();
    let max_counts: Vec<u32> = positions.iter().map(|&idx| plan.ceilings()[idx]).collect();
    let vectors: Vec<Vec<f64>> = positions
        .iter()
        .map(|&idx| catalogue.ingredients()[idx].unit_vector().to_vec())
        .collect();

    let (suffix_min_units, suffix_lo, suffix_hi) =
        accumulate_suffix_bounds(&vectors, &min_counts, &max_counts, num_attrs);

    if suffix_min_units[0] > plan.total_cap() {
        return Err(Diagnostic::CapTooSmall);
    }

    Ok(SearchOrder {
        positions,
        min_counts,
        max_counts,
        vectors,
        suffix_min_units,
        suffix_lo,
        suffix_hi,
    })
}

fn accumulate_suffix_bounds(
    vectors: &[Vec<f64>],
    min_counts: &[u32],
    max_counts: &[u32],
    num_attrs: usize,
) -> (Vec<u32>, Vec<Vec<f64>>, Vec<Vec<f64>>) {
    let len = vectors.len();

    let mut suffix_min_units = vec![0u32; len + 1];
    for i in (0..len).rev() {
        suffix_min_units[i] = min_counts[i] + suffix_min_units[i + 1];
    }

    let mut suffix_lo = vec![vec![0.0f64; num_attrs]; len + 1];
    let mut suffix_hi = vec![vec![0.0f64; num_attrs]; len + 1];
    for i in (0..len).rev() {
        for k in 0..num_attrs {
            let coef = vectors[i][k];
            let lo_count = min_counts[i] as f64;
            let hi_count = max_counts[i] as f64;
            // Negative coefficients swap which count bound reaches which
            // extreme.
            let (lo_val, hi_val) = if coef >= 0.0 {
                (coef * lo_count, coef * hi_count)
            } else {
                (coef * hi_count, coef * lo_count)
            };
            suffix_lo[i][k] = lo_val + suffix_lo[i + 1][k];
            suffix_hi[i][k] = hi_val + suffix_hi[i + 1][k];
        }
    }

    (suffix_min_units, suffix_lo, suffix_hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity::derive_capacity;
    use grist_model::{ingredient::Ingredient, request::SolveRequestBuilder, style::Style};
    use rustc_hash::FxHashMap;

    #[test]
    fn test_suffix_bounds_aggregate_ranges() {
        let vectors = vec![vec![1.0, -2.0], vec![-3.0, 4.0]];
        let min_counts = vec![1, 0];
        let max_counts = vec![3, 2];

        let (suffix_min_units, suffix_lo, suffix_hi) =
            accumulate_suffix_bounds(&vectors, &min_counts, &max_counts, 2);

        assert_eq!(suffix_min_units, vec![1, 0, 0]);
        assert_eq!(
            suffix_lo,
            vec![vec![-5.0, -6.0], vec![-6.0, 0.0], vec![0.0, 0.0]]
        );
        assert_eq!(
            suffix_hi,
            vec![vec![3.0, 6.0], vec![0.0, 8.0], vec![0.0, 0.0]]
        );
    }

    fn catalogue() -> Catalogue {
        Catalogue::new(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            FxHashMap::default(),
            vec![
                Ingredient::new("mild", vec![0.0, 2.0, -1.0]),
                Ingredient::new("inert", vec![0.0, 0.0, 0.0]),
                Ingredient::new("strong", vec![5.0, 0.0, 0.0]),
                Ingredient::new("even", vec![-1.0, -1.0, -1.0]),
            ],
        )
    }

    #[test]
    fn test_order_by_descending_max_abs_coefficient() {
        let catalogue = catalogue();
        let style = Style::new(vec![0.0; 3]);
        let request = SolveRequestBuilder::new("s").total_cap(4).per_cap(4).build();
        let plan = derive_capacity(&catalogue, &style, &request).unwrap();

        let order = build_search_order(&catalogue, &plan).unwrap();
        // strong (5) first, then mild (2), then even (1), then inert (0).
        assert_eq!(order.positions(), &[2, 0, 3, 1]);
    }

    #[test]
    fn test_frozen_ingredients_are_excluded() {
        let catalogue = catalogue();
        let style = Style::new(vec![0.0; 3]).with_min_count("mild", 1);
        let request = SolveRequestBuilder::new("s")
            .total_cap(4)
            .per_cap(4)
            .allowed_ingredient_ids(["strong"])
            .build();
        let plan = derive_capacity(&catalogue, &style, &request).unwrap();

        let order = build_search_order(&catalogue, &plan).unwrap();
        // "inert" and "even" are frozen at zero and dropped.
        assert_eq!(order.positions(), &[2, 0]);
        assert_eq!(order.required_ids(&catalogue), vec!["mild"]);
        assert_eq!(order.optional_ids(&catalogue), vec!["strong"]);
    }

    #[test]
    fn test_cap_too_small() {
        let catalogue = catalogue();
        let style = Style::new(vec![0.0; 3])
            .with_min_count("mild", 1)
            .with_min_count("strong", 1);
        let request = SolveRequestBuilder::new("s").total_cap(1).per_cap(4).build();
        let plan = derive_capacity(&catalogue, &style, &request).unwrap();

        assert_eq!(
            build_search_order(&catalogue, &plan).unwrap_err(),
            Diagnostic::CapTooSmall
        );
    }

    #[test]
    fn test_suffix_min_units_accessor() {
        let catalogue = catalogue();
        let style = Style::new(vec![0.0; 3]).with_min_count("mild", 2);
        let request = SolveRequestBuilder::new("s").total_cap(6).per_cap(4).build();
        let plan = derive_capacity(&catalogue, &style, &request).unwrap();

        let order = build_search_order(&catalogue, &plan).unwrap();
        assert_eq!(order.suffix_min_units(0), 2);
        assert_eq!(order.suffix_min_units(order.len()), 0);
    }
}
