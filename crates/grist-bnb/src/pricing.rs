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

//! Seasonal cost projections.
//!
//! Ingredient prices swing with the seasons: a family in its scarce
//! season costs more per unit, in its abundant season less. The table is
//! fixed and the projections are purely informational; the ranking of
//! mixes never consults them.

use grist_model::{
    catalogue::Catalogue,
    ingredient::SeasonalKind,
    solution::{CostSummary, Season},
};

/// Multiplier applied in a family's scarce season.
pub const SCARCE_SEASON_MULTIPLIER: f64 = 1.25;

/// Multiplier applied in a family's abundant season.
pub const ABUNDANT_SEASON_MULTIPLIER: f64 = 0.75;

/// Returns the price multiplier for a seasonal family in a season.
///
/// # Examples
///
/// ```rust
/// # use grist_bnb::pricing::{seasonal_multiplier, SCARCE_SEASON_MULTIPLIER};
/// # use grist_model::{ingredient::SeasonalKind, solution::Season};
///
/// assert_eq!(
///     seasonal_multiplier(Season::Spring, Some(SeasonalKind::Malt)),
///     SCARCE_SEASON_MULTIPLIER
/// );
/// assert_eq!(seasonal_multiplier(Season::Spring, None), 1.0);
/// ```
pub fn seasonal_multiplier(season: Season, kind: Option<SeasonalKind>) -> f64 {
    let Some(kind) = kind else {
        return 1.0;
    };
    match (season, kind) {
        (Season::Spring, SeasonalKind::Malt) => SCARCE_SEASON_MULTIPLIER,
        (Season::Spring, SeasonalKind::Fruit) => ABUNDANT_SEASON_MULTIPLIER,
        (Season::Summer, SeasonalKind::Hops) => SCARCE_SEASON_MULTIPLIER,
        (Season::Summer, SeasonalKind::Malt) => ABUNDANT_SEASON_MULTIPLIER,
        (Season::Autumn, SeasonalKind::Hops) => ABUNDANT_SEASON_MULTIPLIER,
        (Season::Winter, SeasonalKind::Fruit) => SCARCE_SEASON_MULTIPLIER,
        _ => 1.0,
    }
}

/// Projects the cost of a count vector across the seasons.
///
/// Free ingredients (zero unit cost) contribute nothing in any season.
pub fn cost_summary(catalogue: &Catalogue, counts: &[u32]) -> CostSummary {
    let mut base = 0.0;
    let mut seasonal = [0.0f64; 4];

    for (idx, &count) in counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let ingredient = &catalogue.ingredients()[idx];
        let unit_cost = ingredient.unit_cost();
        if unit_cost <= 0.0 {
            continue;
        }
        base += unit_cost * count as f64;
        for season in Season::ALL {
            seasonal[season.position()] +=
                unit_cost * seasonal_multiplier(season, ingredient.seasonal_kind()) * count as f64;
        }
    }

    CostSummary::new(base, seasonal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grist_model::ingredient::Ingredient;
    use rustc_hash::FxHashMap;

    fn catalogue() -> Catalogue {
        Catalogue::new(
            vec!["a".to_string()],
            FxHashMap::default(),
            vec![
                Ingredient::new("pale_malt", vec![1.0])
                    .with_unit_cost(2.0)
                    .with_seasonal_kind(SeasonalKind::Malt),
                Ingredient::new("noble_hops", vec![1.0])
                    .with_unit_cost(4.0)
                    .with_seasonal_kind(SeasonalKind::Hops),
                Ingredient::new("water", vec![0.0]),
            ],
        )
    }

    #[test]
    fn test_multiplier_table() {
        assert_eq!(
            seasonal_multiplier(Season::Summer, Some(SeasonalKind::Malt)),
            ABUNDANT_SEASON_MULTIPLIER
        );
        assert_eq!(
            seasonal_multiplier(Season::Winter, Some(SeasonalKind::Fruit)),
            SCARCE_SEASON_MULTIPLIER
        );
        assert_eq!(seasonal_multiplier(Season::Autumn, Some(SeasonalKind::Yeast)), 1.0);
        assert_eq!(seasonal_multiplier(Season::Winter, None), 1.0);
    }

    #[test]
    fn test_cost_summary_per_season() {
        let catalogue = catalogue();
        // 2 units of malt (2.0 each), 1 unit of hops (4.0).
        let summary = cost_summary(&catalogue, &[2, 1, 5]);
        assert_eq!(summary.base(), 8.0);
        // Spring: malt scarce -> 2*2*1.25 + 4 = 9.0
        assert_eq!(summary.for_season(Season::Spring), 9.0);
        // Summer: malt abundant, hops scarce -> 2*2*0.75 + 4*1.25 = 8.0
        assert_eq!(summary.for_season(Season::Summer), 8.0);
        // Autumn: hops abundant -> 4 + 4*0.75 = 7.0
        assert_eq!(summary.for_season(Season::Autumn), 7.0);
        // Winter: nothing applies -> 8.0
        assert_eq!(summary.for_season(Season::Winter), 8.0);
        assert_eq!(summary.min(), 7.0);
        assert_eq!(summary.max(), 9.0);
        assert_eq!(summary.average(), 8.0);
    }

    #[test]
    fn test_free_ingredients_cost_nothing() {
        let catalogue = catalogue();
        let summary = cost_summary(&catalogue, &[0, 0, 10]);
        assert_eq!(summary.base(), 0.0);
        assert_eq!(summary.min(), 0.0);
        assert_eq!(summary.max(), 0.0);
    }
}
