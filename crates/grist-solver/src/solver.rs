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

//! # Recipe Solve Orchestration
//!
//! The facade runs the full pipeline for one request: resolve the style,
//! derive capacities, build the feasible intervals, order the
//! ingredients, then hand everything to the branch-and-bound engine.
//! Every stage failure becomes a diagnostic on an empty outcome; nothing
//! in the pipeline throws.
//!
//! ## Trim fallback
//!
//! A request admitting many optional ingredients can exhaust its visit
//! budget before reaching a single leaf. When that happens and nothing
//! was found, the solve retries once with the optional set trimmed to
//! the strongest candidates in search order, and reports the trim as a
//! diagnostic. The retry never trims again.

use grist_bnb::{
    boxes::feasible_intervals, capacity::derive_capacity, engine::search_mixes,
    ordering::build_search_order,
};
use grist_model::{
    catalogue::Catalogue,
    diagnostics::{AbortReason, Diagnostic},
    outcome::SolveOutcome,
    request::SolveRequest,
};
use grist_search::monitor::{
    composite::CompositeMonitor, interrupt::InterruptMonitor, no_op::NoOperationMonitor,
    search_monitor::SearchMonitor, visit_limit::VisitLimitMonitor,
};
use rustc_hash::FxHashSet;
use std::sync::atomic::AtomicBool;

/// Above this many admitted optional ingredients, an empty aborted solve
/// triggers the trim fallback.
pub const OPTIONAL_TRIM_THRESHOLD: usize = 18;

/// The fewest optional ingredients a trimmed retry keeps.
pub const OPTIONAL_TRIM_MIN: usize = 8;

/// The most optional ingredients a trimmed retry keeps.
pub const OPTIONAL_TRIM_MAX: usize = 18;

/// Solves a request without external observation or cancellation.
///
/// The request's visit budget still applies.
pub fn solve(catalogue: &Catalogue, request: &SolveRequest) -> SolveOutcome {
    let mut monitor = NoOperationMonitor::new();
    solve_monitored(catalogue, request, &mut monitor)
}

/// Solves a request that can be cancelled cooperatively.
///
/// The flag is polled at every search node; setting it ends the solve
/// within one node and yields a `SearchAborted` diagnostic.
pub fn solve_cancellable(
    catalogue: &Catalogue,
    request: &SolveRequest,
    stop_flag: &AtomicBool,
) -> SolveOutcome {
    let mut monitor = InterruptMonitor::new(stop_flag);
    solve_monitored(catalogue, request, &mut monitor)
}

/// Solves a request under a caller-supplied monitor.
///
/// The monitor is stacked on top of the visit-budget monitor derived
/// from the request, so it can observe every node and terminate the
/// search, but it cannot extend the budget.
pub fn solve_monitored<M>(
    catalogue: &Catalogue,
    request: &SolveRequest,
    monitor: &mut M,
) -> SolveOutcome
where
    M: SearchMonitor,
{
    let Some(style) = catalogue.style(request.style_id()) else {
        return SolveOutcome::rejected(Diagnostic::UnknownStyle {
            style_id: request.style_id().to_string(),
        });
    };

    let plan = match derive_capacity(catalogue, style, request) {
        Ok(plan) => plan,
        Err(diagnostic) => return SolveOutcome::rejected(diagnostic),
    };
    let interval_lists = match feasible_intervals(catalogue, style, request, &plan) {
        Ok(lists) => lists,
        Err(diagnostic) => return SolveOutcome::rejected(diagnostic),
    };
    let order = match build_search_order(catalogue, &plan) {
        Ok(order) => order,
        Err(diagnostic) => return SolveOutcome::rejected(diagnostic),
    };

    let run = {
        let mut stacked = CompositeMonitor::new();
        stacked.add_monitor(VisitLimitMonitor::new(request.max_visits()));
        stacked.add_monitor(&mut *monitor);
        search_mixes(
            catalogue,
            style,
            &plan,
            &order,
            &interval_lists,
            request.top_k(),
            &mut stacked,
        )
    };

    if run.aborted == Some(AbortReason::VisitLimit)
        && run.mixes.is_empty()
        && request.allow_optional_trim()
    {
        let optional_ids = order.optional_ids(catalogue);
        if optional_ids.len() > OPTIONAL_TRIM_THRESHOLD {
            let required_ids = order.required_ids(catalogue);
            let target = (plan.remaining_capacity() as usize + required_ids.len())
                .clamp(OPTIONAL_TRIM_MIN, OPTIONAL_TRIM_MAX);
            let kept = target.min(optional_ids.len());
            let mut allowed: FxHashSet<String> = required_ids.into_iter().collect();
            allowed.extend(optional_ids.iter().take(kept).cloned());

            let retry = request.restricted_to(allowed);
            let fallback = solve_monitored(catalogue, &retry, monitor);
            return fallback.with_leading_info(vec![Diagnostic::OptionalTrimmed {
                kept,
                total: optional_ids.len(),
            }]);
        }
    }

    let mut info = Vec::new();
    if let Some(reason) = run.aborted {
        info.push(Diagnostic::SearchAborted {
            reason,
            visited: run.stats.nodes_visited,
        });
    }

    SolveOutcome::new(run.mixes, info, run.total_feasible, run.stats.nodes_visited)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grist_model::{
        index::IngredientIndex,
        ingredient::Ingredient,
        request::SolveRequestBuilder,
        style::{BandSegment, Style},
    };
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use rustc_hash::FxHashMap;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn two_axis_catalogue() -> Catalogue {
        let mut styles = FxHashMap::default();
        styles.insert(
            "plain".to_string(),
            Style::new(vec![0.0, 0.0])
                .with_bands("a", vec![BandSegment::new(0.0, 5.0, "green")])
                .with_bands("b", vec![BandSegment::new(0.0, 5.0, "green")]),
        );
        Catalogue::new(
            vec!["a".to_string(), "b".to_string()],
            styles,
            vec![
                Ingredient::new("x", vec![1.0, 0.0]),
                Ingredient::new("y", vec![0.0, 1.0]),
            ],
        )
    }

    // Attrs and ingredients lifted from the original brewing catalogue.
    fn brewing_catalogue() -> Catalogue {
        let mut styles = FxHashMap::default();
        styles.insert(
            "light_ale".to_string(),
            Style::new(vec![0.0, 0.0, 0.0, 0.0])
                .with_min_count("pale_malt", 1)
                .with_min_count("standard_yeast", 1)
                .with_bands(
                    "taste",
                    vec![
                        BandSegment::new(0.0, 0.99, "red"),
                        BandSegment::new(1.0, 2.99, "green"),
                        BandSegment::new(3.0, 10.0, "red"),
                    ],
                )
                .with_bands(
                    "color",
                    vec![
                        BandSegment::new(0.0, 0.99, "red"),
                        BandSegment::new(1.0, 3.99, "green"),
                        BandSegment::new(4.0, 10.0, "red"),
                    ],
                )
                .with_bands(
                    "strength",
                    vec![
                        BandSegment::new(0.0, 0.99, "red"),
                        BandSegment::new(1.0, 2.99, "green"),
                        BandSegment::new(3.0, 10.0, "red"),
                    ],
                )
                .with_bands(
                    "foam",
                    vec![
                        BandSegment::new(0.0, 0.99, "yellow"),
                        BandSegment::new(1.0, 3.99, "green"),
                        BandSegment::new(4.0, 10.0, "red"),
                    ],
                ),
        );
        Catalogue::new(
            vec![
                "taste".to_string(),
                "color".to_string(),
                "strength".to_string(),
                "foam".to_string(),
            ],
            styles,
            vec![
                Ingredient::new("pale_malt", vec![0.4, 0.3, 1.0, 0.5])
                    .with_unit_cost(2.0)
                    .with_seasonal_label("malt"),
                Ingredient::new("standard_yeast", vec![0.5, 0.0, -1.0, -0.5])
                    .with_unit_cost(2.0)
                    .with_seasonal_label("yeast"),
                Ingredient::new("grapes", vec![1.5, 1.0, 0.5, 0.5])
                    .with_unit_cost(3.0)
                    .with_seasonal_label("fruit"),
                Ingredient::new("sugar", vec![-1.0, -0.5, 2.0, -1.0]).with_unit_cost(1.0),
                Ingredient::new("amber_malt", vec![0.8, 1.2, 0.5, 0.8])
                    .with_unit_cost(2.0)
                    .with_seasonal_label("malt"),
            ],
        )
    }

    #[test]
    fn test_smallest_sum_ranks_first() {
        let catalogue = two_axis_catalogue();
        let request = SolveRequestBuilder::new("plain")
            .numeric_interval("a", 1.0, 2.0)
            .numeric_interval("b", 1.0, 2.0)
            .total_cap(3)
            .per_cap(3)
            .top_k(10)
            .build();

        let outcome = solve(&catalogue, &request);
        assert!(outcome.is_clean());

        let counts: Vec<&[u32]> = outcome.solutions().iter().map(|m| m.counts()).collect();
        assert_eq!(counts, vec![&[1, 1][..], &[1, 2][..], &[2, 1][..]]);
        assert_eq!(outcome.solutions()[0].total_units(), 2);
        assert_eq!(outcome.solutions()[0].band_for("a"), Some("green"));
    }

    #[test]
    fn test_unknown_style() {
        let catalogue = two_axis_catalogue();
        let request = SolveRequestBuilder::new("imperial_stout")
            .total_cap(3)
            .per_cap(3)
            .build();
        let outcome = solve(&catalogue, &request);
        assert!(outcome.solutions().is_empty());
        assert_eq!(
            outcome.info(),
            &[Diagnostic::UnknownStyle {
                style_id: "imperial_stout".to_string()
            }]
        );
    }

    #[test]
    fn test_min_exceeds_cap() {
        let catalogue = two_axis_catalogue();
        let request = SolveRequestBuilder::new("plain")
            .extra_min_count("x", 5)
            .total_cap(10)
            .per_cap(3)
            .build();
        let outcome = solve(&catalogue, &request);
        assert!(outcome.solutions().is_empty());
        assert_eq!(outcome.info(), &[Diagnostic::MinExceedsCap]);
    }

    #[test]
    fn test_cap_too_small() {
        let catalogue = two_axis_catalogue();
        let request = SolveRequestBuilder::new("plain")
            .extra_min_count("x", 1)
            .extra_min_count("y", 1)
            .total_cap(1)
            .per_cap(3)
            .build();
        let outcome = solve(&catalogue, &request);
        assert!(outcome.solutions().is_empty());
        assert_eq!(outcome.info(), &[Diagnostic::CapTooSmall]);
    }

    #[test]
    fn test_no_feasible_intervals() {
        let catalogue = two_axis_catalogue();
        // Nothing can push "a" above 10 with three units.
        let request = SolveRequestBuilder::new("plain")
            .numeric_interval("a", 100.0, 200.0)
            .total_cap(3)
            .per_cap(3)
            .build();
        let outcome = solve(&catalogue, &request);
        assert!(outcome.solutions().is_empty());
        assert_eq!(outcome.info(), &[Diagnostic::NoFeasibleIntervals]);
    }

    #[test]
    fn test_all_green_light_ale_exists() {
        let catalogue = brewing_catalogue();
        let request = SolveRequestBuilder::new("light_ale")
            .band_preference("taste", ["green"])
            .band_preference("color", ["green"])
            .band_preference("strength", ["green"])
            .band_preference("foam", ["green"])
            .total_cap(25)
            .per_cap(25)
            .top_k(5)
            .build();

        let outcome = solve(&catalogue, &request);
        assert!(outcome.is_clean());
        assert!(!outcome.solutions().is_empty());
        assert!(outcome.total_feasible() >= outcome.solutions().len() as u64);

        let best = &outcome.solutions()[0];
        for attr in catalogue.attrs() {
            assert_eq!(best.band_for(attr), Some("green"), "attr {attr} not green");
        }
        // Mandatory minimums hold.
        assert!(best.count_for(IngredientIndex::new(0)) >= 1);
        assert!(best.count_for(IngredientIndex::new(1)) >= 1);
    }

    #[test]
    fn test_empty_allow_list_uses_required_only() {
        let catalogue = brewing_catalogue();
        let request = SolveRequestBuilder::new("light_ale")
            .band_preference("taste", ["green"])
            .band_preference("color", ["green"])
            .band_preference("strength", ["green"])
            .band_preference("foam", ["green"])
            .allowed_ingredient_ids(Vec::<String>::new())
            .total_cap(25)
            .per_cap(25)
            .top_k(5)
            .build();

        let outcome = solve(&catalogue, &request);
        assert!(!outcome.solutions().is_empty());
        let best = &outcome.solutions()[0];
        // Only the two required ingredients may carry units.
        assert_eq!(best.count_for(IngredientIndex::new(2)), 0);
        assert_eq!(best.count_for(IngredientIndex::new(3)), 0);
        assert_eq!(best.count_for(IngredientIndex::new(4)), 0);
        assert!(best.count_for(IngredientIndex::new(0)) >= 1);
        assert!(best.count_for(IngredientIndex::new(1)) >= 1);
        assert!(!best.counts_by_id().contains_key("grapes"));
    }

    #[test]
    fn test_cancellation_flag_set_before_solve() {
        let catalogue = brewing_catalogue();
        let request = SolveRequestBuilder::new("light_ale")
            .total_cap(25)
            .per_cap(25)
            .allow_optional_trim(false)
            .build();

        let flag = AtomicBool::new(false);
        flag.store(true, Ordering::Relaxed);
        let outcome = solve_cancellable(&catalogue, &request, &flag);

        assert!(outcome.solutions().is_empty());
        assert_eq!(outcome.abort_reason(), Some(AbortReason::Cancelled));
    }

    #[test]
    fn test_visit_limit_reports_abort() {
        let catalogue = brewing_catalogue();
        let request = SolveRequestBuilder::new("light_ale")
            .total_cap(25)
            .per_cap(25)
            .max_visits(10)
            .allow_optional_trim(false)
            .top_k(5)
            .build();

        let outcome = solve(&catalogue, &request);
        assert_eq!(outcome.abort_reason(), Some(AbortReason::VisitLimit));
        assert!(outcome.visited() > 10);
        match outcome.info().first() {
            Some(Diagnostic::SearchAborted { visited, .. }) => assert!(*visited > 10),
            other => panic!("expected SearchAborted, got {other:?}"),
        }
    }

    #[test]
    fn test_trim_fallback_engages_on_large_optional_sets() {
        let optional_count = 40usize;
        let mut styles = FxHashMap::default();
        styles.insert(
            "overloaded".to_string(),
            Style::new(vec![0.0; 4]).with_min_count("base_malt", 1),
        );
        let mut ingredients = vec![
            Ingredient::new("base_malt", vec![0.2, 0.1, 0.1, 0.1]).with_unit_cost(1.0),
        ];
        for idx in 0..optional_count {
            ingredients.push(
                Ingredient::new(format!("optional_{idx}"), vec![0.05, 0.02, 0.01, 0.03])
                    .with_unit_cost(1.0 + (idx % 3) as f64),
            );
        }
        let catalogue = Catalogue::new(
            vec![
                "taste".to_string(),
                "color".to_string(),
                "strength".to_string(),
                "foam".to_string(),
            ],
            styles,
            ingredients,
        );

        let request = SolveRequestBuilder::new("overloaded")
            .total_cap(5)
            .per_cap(5)
            .top_k(5)
            .max_visits(15)
            .build();

        let outcome = solve(&catalogue, &request);
        assert!(
            !outcome.solutions().is_empty(),
            "expected the trimmed retry to produce solutions"
        );
        assert_eq!(
            outcome.info().first(),
            Some(&Diagnostic::OptionalTrimmed {
                kept: 8,
                total: 40
            })
        );
    }

    #[test]
    fn test_costs_do_not_affect_ranking() {
        let mut styles = FxHashMap::default();
        styles.insert("plain".to_string(), Style::new(vec![0.0]));
        let catalogue = Catalogue::new(
            vec!["a".to_string()],
            styles,
            vec![
                // The expensive ingredient still ranks first on counts.
                Ingredient::new("cheap", vec![1.0]).with_unit_cost(0.1),
                Ingredient::new("dear", vec![1.0]).with_unit_cost(99.0),
            ],
        );
        let request = SolveRequestBuilder::new("plain")
            .numeric_interval("a", 1.0, 1.0)
            .total_cap(2)
            .per_cap(2)
            .top_k(10)
            .build();

        let outcome = solve(&catalogue, &request);
        let counts: Vec<&[u32]> = outcome.solutions().iter().map(|m| m.counts()).collect();
        // (0,1) before (1,0) by count lexicography, cost ignored.
        assert_eq!(counts, vec![&[0, 1][..], &[1, 0][..]]);
        assert!(outcome.solutions()[0].cost().base() > outcome.solutions()[1].cost().base());
    }

    fn random_catalogue(rng: &mut ChaCha8Rng) -> Catalogue {
        let attrs: Vec<String> = (0..3).map(|k| format!("attr{k}")).collect();
        let mut styles = FxHashMap::default();
        let mut style = Style::new((0..3).map(|_| rng.random_range(-1.0..1.0)).collect());
        for attr in &attrs {
            style = style.with_bands(
                attr.clone(),
                vec![
                    BandSegment::new(-10.0, 0.0, "low"),
                    BandSegment::new(0.0, 10.0, "high"),
                ],
            );
        }
        styles.insert("random".to_string(), style);

        let ingredients = (0..6)
            .map(|i| {
                Ingredient::new(
                    format!("ing{i}"),
                    (0..3).map(|_| rng.random_range(-2.0..2.0)).collect(),
                )
            })
            .collect();
        Catalogue::new(attrs, styles, ingredients)
    }

    #[test]
    fn test_randomized_outcomes_respect_invariants() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20 {
            let catalogue = random_catalogue(&mut rng);
            let request = SolveRequestBuilder::new("random")
                .numeric_interval("attr0", -3.0, 3.0)
                .total_cap(rng.random_range(1..6))
                .per_cap(rng.random_range(1..4))
                .top_k(4)
                .build();

            let outcome = solve(&catalogue, &request);

            let mut seen_counts: Vec<Vec<u32>> = Vec::new();
            for mix in outcome.solutions() {
                // Bound respect.
                assert!(mix.total_units() <= request.total_cap());
                for &count in mix.counts() {
                    assert!(count <= request.per_cap());
                }
                // Totals match a recomputation from the counts.
                for (k, &reported) in mix.attribute_totals().iter().enumerate() {
                    let mut exact = catalogue.style("random").unwrap().base_vector()[k];
                    for (idx, &count) in mix.counts().iter().enumerate() {
                        exact += catalogue.ingredients()[idx].coefficient(k) * count as f64;
                    }
                    assert!((reported - exact).abs() < 0.0005 + 1e-9);
                }
                // No duplicates.
                assert!(!seen_counts.contains(&mix.counts().to_vec()));
                seen_counts.push(mix.counts().to_vec());
            }

            // Ordering: ascending by total units.
            for pair in outcome.solutions().windows(2) {
                assert!(pair[0].total_units() <= pair[1].total_units());
            }
            assert!(outcome.total_feasible() >= outcome.solutions().len() as u64);
        }
    }

    #[test]
    fn test_repeated_solves_are_deterministic() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let catalogue = random_catalogue(&mut rng);
        let request = SolveRequestBuilder::new("random")
            .numeric_interval("attr1", -2.0, 2.0)
            .band_preference("attr0", ["low", "high"])
            .total_cap(5)
            .per_cap(3)
            .top_k(6)
            .build();

        let first = solve(&catalogue, &request);
        let second = solve(&catalogue, &request);
        assert_eq!(first, second);
    }
}
