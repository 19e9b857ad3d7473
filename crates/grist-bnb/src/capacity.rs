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

//! Capacity derivation.
//!
//! Merges the style's mandatory minimums with the request's extras,
//! derives per-ingredient ceilings under the allow-list and caps, and
//! computes the default reachable bound per attribute. The reachable
//! bound assumes each ingredient's spare capacity is independently and
//! fully usable, which over-approximates the true reachable set; that is
//! safe for pruning but must never replace the exact leaf checks.

use grist_core::math::interval::AttrInterval;
use grist_model::{
    catalogue::Catalogue, diagnostics::Diagnostic, request::SolveRequest, style::Style,
};

/// The per-ingredient count budget and per-attribute reachable bounds
/// for one solve.
#[derive(Clone, Debug)]
pub struct CapacityPlan {
    min_counts: Vec<u32>,
    ceilings: Vec<u32>,
    total_cap: u32,
    adjusted_total_cap: u32,
    remaining_capacity: u32,
    totals_after_min: Vec<f64>,
    attr_bounds: Vec<AttrInterval>,
}

impl CapacityPlan {
    /// Returns the mandatory minimum count per catalogue index.
    #[inline]
    pub fn min_counts(&self) -> &[u32] {
        &self.min_counts
    }

    /// Returns the count ceiling per catalogue index. Ingredients outside
    /// the allow-list are frozen at their minimum.
    #[inline]
    pub fn ceilings(&self) -> &[u32] {
        &self.ceilings
    }

    /// Returns the requested total unit cap.
    #[inline]
    pub fn total_cap(&self) -> u32 {
        self.total_cap
    }

    /// Returns the total cap raised, if necessary, to fit the mandatory
    /// minimums.
    #[inline]
    pub fn adjusted_total_cap(&self) -> u32 {
        self.adjusted_total_cap
    }

    /// Returns the units still assignable beyond the mandatory minimums.
    #[inline]
    pub fn remaining_capacity(&self) -> u32 {
        self.remaining_capacity
    }

    /// Returns the attribute totals of base plus mandatory minimums.
    #[inline]
    pub fn totals_after_min(&self) -> &[f64] {
        &self.totals_after_min
    }

    /// Returns the default reachable bound per attribute.
    #[inline]
    pub fn attr_bounds(&self) -> &[AttrInterval] {
        &self.attr_bounds
    }
}

struct SpareCapacity {
    coef: f64,
    available: u32,
}

/// Derives the capacity plan for one solve.
///
/// Fails with `MinExceedsCap` when a mandatory minimum cannot fit under
/// the per-ingredient cap. Ingredient ids unknown to the catalogue are
/// ignored in both minimum maps.
pub fn derive_capacity(
    catalogue: &Catalogue,
    style: &Style,
    request: &SolveRequest,
) -> Result<CapacityPlan, Diagnostic> {
    let n = catalogue.num_ingredients();
    let num_attrs = catalogue.num_attrs();

    let mut min_counts = vec![0u32; n];
    for (id, &count) in style.mandatory_min_counts() {
        if let Some(index) = catalogue.ingredient_index(id) {
            let slot = &mut min_counts[index.get()];
            *slot = (*slot).max(count);
        }
    }
    for (id, &count) in request.extra_min_counts() {
        if let Some(index) = catalogue.ingredient_index(id) {
            let slot = &mut min_counts[index.get()];
            *slot = (*slot).max(count);
        }
    }

    if min_counts.iter().any(|&count| count > request.per_cap()) {
        return Err(Diagnostic::MinExceedsCap);
    }

    let min_sum: u32 = min_counts.iter().sum();
    let adjusted_total_cap = request.total_cap().max(min_sum);
    let remaining_capacity = adjusted_total_cap - min_sum;

    let allowed = request.allowed_ingredient_ids();
    let mut ceilings = vec![0u32; n];
    for (idx, ingredient) in catalogue.ingredients().iter().enumerate() {
        let required = min_counts[idx] > 0;
        let optional_allowed = allowed.is_none_or(|set| set.contains(ingredient.id()));
        ceilings[idx] = if required || optional_allowed {
            request.per_cap().min(adjusted_total_cap)
        } else {
            min_counts[idx]
        };
    }

    let mut totals_after_min: Vec<f64> = style.base_vector().to_vec();
    totals_after_min.resize(num_attrs, 0.0);
    let mut positives: Vec<Vec<SpareCapacity>> = (0..num_attrs).map(|_| Vec::new()).collect();
    let mut negatives: Vec<Vec<SpareCapacity>> = (0..num_attrs).map(|_| Vec::new()).collect();

    for (idx, ingredient) in catalogue.ingredients().iter().enumerate() {
        let min_count = min_counts[idx];
        if min_count > 0 {
            for (k, total) in totals_after_min.iter_mut().enumerate() {
                *total += ingredient.coefficient(k) * min_count as f64;
            }
        }
        let available = ceilings[idx].saturating_sub(min_count);
        if available > 0 {
            for k in 0..num_attrs {
                let coef = ingredient.coefficient(k);
                if coef > 0.0 {
                    positives[k].push(SpareCapacity { coef, available });
                } else if coef < 0.0 {
                    negatives[k].push(SpareCapacity { coef, available });
                }
            }
        }
    }

    let mut attr_bounds = Vec::with_capacity(num_attrs);
    for k in 0..num_attrs {
        let mut min_bound = totals_after_min[k];
        let mut max_bound = totals_after_min[k];
        if remaining_capacity > 0 {
            // Greedy: the strongest coefficients absorb the spare units first.
            positives[k].sort_by(|a, b| {
                b.coef
                    .partial_cmp(&a.coef)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            let mut left = remaining_capacity;
            for entry in &positives[k] {
                if left == 0 {
                    break;
                }
                let used = entry.available.min(left);
                max_bound += entry.coef * used as f64;
                left -= used;
            }

            negatives[k].sort_by(|a, b| {
                a.coef
                    .partial_cmp(&b.coef)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            let mut left = remaining_capacity;
            for entry in &negatives[k] {
                if left == 0 {
                    break;
                }
                let used = entry.available.min(left);
                min_bound += entry.coef * used as f64;
                left -= used;
            }
        }
        if min_bound > max_bound {
            std::mem::swap(&mut min_bound, &mut max_bound);
        }
        attr_bounds.push(AttrInterval::new(min_bound, max_bound));
    }

    Ok(CapacityPlan {
        min_counts,
        ceilings,
        total_cap: request.total_cap(),
        adjusted_total_cap,
        remaining_capacity,
        totals_after_min,
        attr_bounds,
    })
}
