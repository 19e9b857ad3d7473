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

//! The bounded depth-first search over per-ingredient counts.
//!
//! For every feasibility box the session runs one depth-first search
//! over the ordered ingredient positions, tracking used units and the
//! running attribute totals. Nodes are pruned when the remaining
//! mandatory units cannot fit, when the current top-K bound cannot be
//! beaten, or when the suffix contribution range cannot reach the box.
//! Accepted leaves are deduplicated on their full original-order count
//! vector, which collapses leaves produced by more than one box.
//!
//! A search session owns all of its mutable state (counts buffer, seen
//! set, ranked store, statistics); nothing is shared across invocations,
//! so concurrent solves over the same catalogue are safe.

use crate::{
    assemble::assemble_mix,
    boxes::{BoxIter, IntervalList},
    capacity::CapacityPlan,
    ordering::SearchOrder,
};
use grist_core::math::approx::EPS;
use grist_model::{
    catalogue::Catalogue, diagnostics::AbortReason, solution::Mix, style::Style,
};
use grist_search::{
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    ranked::{RankedMixes, compare_mixes},
    stats::SearchStatistics,
};
use rustc_hash::FxHashSet;

/// The raw product of one engine run, before the facade attaches
/// diagnostics.
#[derive(Debug)]
pub struct EngineRun {
    /// The best mixes in comparator order, at most `top_k`.
    pub mixes: Vec<Mix>,
    /// Distinct feasible leaves encountered, including those that ranked
    /// past `top_k`.
    pub total_feasible: u64,
    /// Set when the search stopped before exhausting its tree.
    pub aborted: Option<AbortReason>,
    /// Counters for the whole run.
    pub stats: SearchStatistics,
}

/// Searches every box and returns the ranked mixes.
///
/// `interval_lists` must hold one non-empty list per attribute (as
/// produced by `boxes::feasible_intervals`).
pub fn search_mixes<M>(
    catalogue: &Catalogue,
    style: &Style,
    plan: &CapacityPlan,
    order: &SearchOrder,
    interval_lists: &[IntervalList],
    top_k: usize,
    monitor: &mut M,
) -> EngineRun
where
    M: SearchMonitor,
{
    let num_attrs = catalogue.num_attrs();
    let session = SearchSession {
        catalogue,
        style,
        plan,
        order,
        monitor,
        ranked: RankedMixes::new(top_k.max(1)),
        seen: FxHashSet::default(),
        counts: vec![0; order.len()],
        lower: vec![f64::NEG_INFINITY; num_attrs],
        upper: vec![f64::INFINITY; num_attrs],
        stats: SearchStatistics::default(),
        total_feasible: 0,
        aborted: None,
    };
    session.run(interval_lists)
}

struct SearchSession<'a, M> {
    catalogue: &'a Catalogue,
    style: &'a Style,
    plan: &'a CapacityPlan,
    order: &'a SearchOrder,
    monitor: &'a mut M,
    ranked: RankedMixes,
    seen: FxHashSet<Vec<u32>>,
    counts: Vec<u32>,
    lower: Vec<f64>,
    upper: Vec<f64>,
    stats: SearchStatistics,
    total_feasible: u64,
    aborted: Option<AbortReason>,
}

impl<M> SearchSession<'_, M>
where
    M: SearchMonitor,
{
    fn run(mut self, interval_lists: &[IntervalList]) -> EngineRun {
        let start_time = std::time::Instant::now();
        self.monitor.on_enter_search();

        for feasibility_box in BoxIter::new(interval_lists) {
            if self.aborted.is_some() {
                break;
            }
            for (k, interval) in feasibility_box.iter().enumerate() {
                self.lower[k] = interval.lo();
                self.upper[k] = interval.hi();
            }
            let totals = self.style.base_vector().to_vec();
            self.dfs(0, 0, &totals);
        }

        self.stats.set_total_time(start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);

        let SearchSession {
            ranked,
            total_feasible,
            aborted,
            stats,
            ..
        } = self;
        // Boxes were searched independently; a final global sort keeps
        // the contract regardless of discovery order.
        let mut mixes = ranked.into_vec();
        mixes.sort_by(compare_mixes);

        EngineRun {
            mixes,
            total_feasible,
            aborted,
            stats,
        }
    }

    fn dfs(&mut self, position: usize, used: u32, totals: &[f64]) {
        if self.aborted.is_some() {
            return;
        }

        self.stats.on_node_visited();
        self.stats.on_depth_update(position as u64);
        self.monitor.on_node(&self.stats);
        if let SearchCommand::Terminate(reason) = self.monitor.search_command(&self.stats) {
            self.aborted = Some(reason);
            return;
        }

        let order = self.order;
        let num_attrs = self.catalogue.num_attrs();

        if position == order.len() {
            self.accept_leaf(totals);
            return;
        }

        // The mandatory minimums still owed must fit in the unit budget,
        // and must be able to beat the current top-K bound.
        let owed = used.saturating_add(order.suffix_min_units(position));
        if owed > self.plan.adjusted_total_cap() {
            self.stats.on_pruning_units();
            return;
        }
        if let Some(bound) = self.ranked.worst_units() {
            if owed > bound {
                self.stats.on_pruning_units();
                return;
            }
        }

        // The suffix contribution range must be able to reach the box.
        let suffix_lo = order.suffix_lo(position);
        let suffix_hi = order.suffix_hi(position);
        for k in 0..num_attrs {
            if totals[k] + suffix_hi[k] < self.lower[k] - EPS
                || totals[k] + suffix_lo[k] > self.upper[k] + EPS
            {
                self.stats.on_pruning_bounds();
                return;
            }
        }

        let remaining_min_after = order.suffix_min_units(position + 1);
        let budget = self
            .plan
            .adjusted_total_cap()
            .saturating_sub(used.saturating_add(remaining_min_after));
        let min_count = order.min_count(position);
        let max_count = order.max_count(position).min(budget);
        if max_count < min_count {
            self.stats.on_pruning_units();
            return;
        }

        // Narrow the candidate window per attribute: for each non-zero
        // coefficient, the counts that could still land the total inside
        // the box one level deeper form a contiguous range.
        let vector = order.vector(position);
        let next_lo = order.suffix_lo(position + 1);
        let next_hi = order.suffix_hi(position + 1);
        let mut local_min = min_count as i64;
        let mut local_max = max_count as i64;
        for k in 0..num_attrs {
            let coef = vector[k];
            if coef == 0.0 {
                continue;
            }
            let total = totals[k];
            let lower = self.lower[k];
            let upper = self.upper[k];
            if coef > 0.0 {
                let max_numerator = upper - next_lo[k] - total;
                if max_numerator.is_finite() {
                    let allowed_max = ((max_numerator + EPS) / coef).floor();
                    if allowed_max.is_finite() {
                        local_max = local_max.min(allowed_max as i64);
                    }
                }
                let min_numerator = lower - next_hi[k] - total;
                if min_numerator.is_finite() {
                    let required_min = ((min_numerator - EPS) / coef).ceil();
                    if required_min.is_finite() {
                        local_min = local_min.max(required_min as i64);
                    }
                }
            } else {
                let abs_coef = -coef;
                let min_numerator = total + next_lo[k] - upper;
                if min_numerator.is_finite() {
                    let required_min = ((min_numerator - EPS) / abs_coef).ceil();
                    if required_min.is_finite() {
                        local_min = local_min.max(required_min as i64);
                    }
                }
                let max_numerator = total + next_hi[k] - lower;
                if max_numerator.is_finite() {
                    let allowed_max = ((max_numerator + EPS) / abs_coef).floor();
                    if allowed_max.is_finite() {
                        local_max = local_max.min(allowed_max as i64);
                    }
                }
            }
            if local_min > local_max {
                break;
            }
        }

        let local_min = local_min.max(min_count as i64);
        let local_max = local_max.min(max_count as i64);
        if local_min > local_max {
            self.stats.on_pruning_bounds();
            return;
        }

        let mut new_totals = vec![0.0f64; num_attrs];
        for count in (local_min as u32)..=(local_max as u32) {
            // Larger counts only push the minimal total further past the
            // bound, so stop instead of skipping.
            if let Some(bound) = self.ranked.worst_units() {
                if used.saturating_add(count).saturating_add(remaining_min_after) > bound {
                    break;
                }
            }

            for k in 0..num_attrs {
                new_totals[k] = totals[k] + vector[k] * count as f64;
            }
            let mut feasible = true;
            for k in 0..num_attrs {
                let min_possible = new_totals[k] + next_lo[k];
                let max_possible = new_totals[k] + next_hi[k];
                if max_possible < self.lower[k] - EPS || min_possible > self.upper[k] + EPS {
                    feasible = false;
                    break;
                }
            }
            if feasible {
                self.counts[position] = count;
                self.dfs(position + 1, used + count, &new_totals);
                if self.aborted.is_some() {
                    break;
                }
            }
        }
        self.counts[position] = 0;
    }

    fn accept_leaf(&mut self, totals: &[f64]) {
        self.stats.on_leaf_reached();

        for k in 0..self.catalogue.num_attrs() {
            if totals[k] < self.lower[k] - EPS || totals[k] > self.upper[k] + EPS {
                return;
            }
        }

        let mut counts_original = vec![0u32; self.catalogue.num_ingredients()];
        for (position, &original) in self.order.positions().iter().enumerate() {
            counts_original[original] = self.counts[position];
        }

        if !self.seen.insert(counts_original.clone()) {
            self.stats.on_duplicate_skipped();
            return;
        }

        self.total_feasible += 1;
        self.stats.on_feasible_leaf();

        let mix = assemble_mix(self.catalogue, self.style, counts_original, totals);
        self.monitor.on_mix_found(&mix, &self.stats);
        self.ranked.insert(mix);
    }
}
