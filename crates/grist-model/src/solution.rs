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

use crate::index::IngredientIndex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// The four seasons used for cost projections, in reporting order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// All seasons in reporting order.
    pub const ALL: [Season; 4] = [
        Season::Spring,
        Season::Summer,
        Season::Autumn,
        Season::Winter,
    ];

    /// Returns this season's position in [`Season::ALL`].
    #[inline]
    pub const fn position(self) -> usize {
        match self {
            Season::Spring => 0,
            Season::Summer => 1,
            Season::Autumn => 2,
            Season::Winter => 3,
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Season::Spring => write!(f, "spring"),
            Season::Summer => write!(f, "summer"),
            Season::Autumn => write!(f, "autumn"),
            Season::Winter => write!(f, "winter"),
        }
    }
}

/// The cost projection of one mix across the seasons.
///
/// Costs are informational only; the ranking of mixes never consults
/// them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostSummary {
    base: f64,
    seasonal: [f64; 4],
    average: f64,
    min: f64,
    max: f64,
}

impl CostSummary {
    /// Builds a summary from the base cost and the per-season totals,
    /// deriving the average, minimum, and maximum.
    pub fn new(base: f64, seasonal: [f64; 4]) -> Self {
        let sum: f64 = seasonal.iter().sum();
        let average = sum / seasonal.len() as f64;
        let min = seasonal.iter().copied().fold(f64::INFINITY, f64::min);
        let max = seasonal.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self {
            base,
            seasonal,
            average,
            min,
            max,
        }
    }

    /// A summary for a mix of free ingredients.
    #[inline]
    pub fn zero() -> Self {
        Self::new(0.0, [0.0; 4])
    }

    /// Returns the unadjusted cost (no seasonal multipliers).
    #[inline]
    pub fn base(&self) -> f64 {
        self.base
    }

    /// Returns the projected cost in the given season.
    #[inline]
    pub fn for_season(&self, season: Season) -> f64 {
        self.seasonal[season.position()]
    }

    /// Returns the average projected cost across the seasons.
    #[inline]
    pub fn average(&self) -> f64 {
        self.average
    }

    /// Returns the cheapest season's projected cost.
    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Returns the most expensive season's projected cost.
    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }
}

/// One feasible ingredient mix produced by the search.
///
/// Counts are reported by original catalogue index; attribute totals are
/// rounded to three decimals. Immutable once emitted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mix {
    counts: Vec<u32>,
    total_units: u32,
    attribute_totals: Vec<f64>,
    bands: FxHashMap<String, Option<String>>,
    counts_by_id: FxHashMap<String, u32>,
    ingredient_count: usize,
    cost: CostSummary,
}

impl Mix {
    /// Constructs a new `Mix`.
    ///
    /// # Panics
    ///
    /// Panics if `bands` and `attribute_totals` cover a different number
    /// of attributes.
    pub fn new(
        counts: Vec<u32>,
        attribute_totals: Vec<f64>,
        bands: FxHashMap<String, Option<String>>,
        counts_by_id: FxHashMap<String, u32>,
        cost: CostSummary,
    ) -> Self {
        assert_eq!(
            bands.len(),
            attribute_totals.len(),
            "called Mix::new with inconsistent attribute counts: bands.len() = {}, attribute_totals.len() = {}",
            bands.len(),
            attribute_totals.len()
        );

        let total_units = counts.iter().sum();
        let ingredient_count = counts_by_id.len();
        Self {
            counts,
            total_units,
            attribute_totals,
            bands,
            counts_by_id,
            ingredient_count,
            cost,
        }
    }

    /// Returns the counts by original catalogue index.
    #[inline]
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Returns the count for a specific ingredient.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn count_for(&self, index: IngredientIndex) -> u32 {
        let position = index.get();
        debug_assert!(
            position < self.counts.len(),
            "called `Mix::count_for` with ingredient index out of bounds: the len is {} but the index is {}",
            self.counts.len(),
            position
        );
        self.counts[position]
    }

    /// Returns the total number of units in the mix.
    #[inline]
    pub fn total_units(&self) -> u32 {
        self.total_units
    }

    /// Returns the attribute totals, rounded to three decimals, in
    /// catalogue attribute order.
    #[inline]
    pub fn attribute_totals(&self) -> &[f64] {
        &self.attribute_totals
    }

    /// Returns the band label assigned to `attr`, or `None` when no
    /// segment matched.
    #[inline]
    pub fn band_for(&self, attr: &str) -> Option<&str> {
        self.bands.get(attr).and_then(|band| band.as_deref())
    }

    /// Returns the band assignments keyed by attribute name.
    #[inline]
    pub fn bands(&self) -> &FxHashMap<String, Option<String>> {
        &self.bands
    }

    /// Returns the non-zero counts keyed by ingredient id.
    #[inline]
    pub fn counts_by_id(&self) -> &FxHashMap<String, u32> {
        &self.counts_by_id
    }

    /// Returns the number of distinct ingredients with a non-zero count.
    #[inline]
    pub fn ingredient_count(&self) -> usize {
        self.ingredient_count
    }

    /// Returns the seasonal cost projection.
    #[inline]
    pub fn cost(&self) -> &CostSummary {
        &self.cost
    }
}

impl std::fmt::Display for Mix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Mix Summary")?;
        writeln!(f, "   Total Units: {}", self.total_units)?;
        writeln!(f, "   Ingredients: {}", self.ingredient_count)?;
        writeln!(f, "   Base Cost:   {:.2}", self.cost.base())?;

        if self.counts_by_id.is_empty() {
            writeln!(f, "   (No ingredients used)")?;
            return Ok(());
        }

        let mut entries: Vec<(&String, &u32)> = self.counts_by_id.iter().collect();
        entries.sort();
        writeln!(f)?;
        writeln!(f, "   {:<24} | {:<8}", "Ingredient", "Units")?;
        writeln!(f, "   {:-<24}-+-{:-<8}", "", "")?;
        for (id, count) in entries {
            writeln!(f, "   {:<24} | {:<8}", id, count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_mix() -> Mix {
        let mut bands = FxHashMap::default();
        bands.insert("taste".to_string(), Some("green".to_string()));
        bands.insert("color".to_string(), None);
        let mut counts_by_id = FxHashMap::default();
        counts_by_id.insert("pale_malt".to_string(), 2);
        counts_by_id.insert("grapes".to_string(), 1);
        Mix::new(
            vec![2, 0, 1],
            vec![1.5, 2.25],
            bands,
            counts_by_id,
            CostSummary::new(7.0, [7.0, 8.75, 7.0, 5.25]),
        )
    }

    #[test]
    fn test_derived_fields() {
        let mix = sample_mix();
        assert_eq!(mix.total_units(), 3);
        assert_eq!(mix.ingredient_count(), 2);
        assert_eq!(mix.count_for(IngredientIndex::new(0)), 2);
        assert_eq!(mix.count_for(IngredientIndex::new(1)), 0);
    }

    #[test]
    fn test_band_lookup() {
        let mix = sample_mix();
        assert_eq!(mix.band_for("taste"), Some("green"));
        assert_eq!(mix.band_for("color"), None);
        assert_eq!(mix.band_for("strength"), None);
    }

    #[test]
    #[should_panic(expected = "called Mix::new with inconsistent attribute counts")]
    fn test_new_panics_on_attribute_mismatch() {
        Mix::new(
            vec![1],
            vec![1.0, 2.0],
            FxHashMap::default(),
            FxHashMap::default(),
            CostSummary::zero(),
        );
    }

    #[test]
    fn test_cost_summary_statistics() {
        let cost = CostSummary::new(4.0, [4.0, 5.0, 3.0, 4.0]);
        assert_eq!(cost.base(), 4.0);
        assert_eq!(cost.average(), 4.0);
        assert_eq!(cost.min(), 3.0);
        assert_eq!(cost.max(), 5.0);
        assert_eq!(cost.for_season(Season::Summer), 5.0);
        assert_eq!(cost.for_season(Season::Autumn), 3.0);
    }

    #[test]
    fn test_display_lists_ingredients() {
        let rendered = format!("{}", sample_mix());
        assert!(rendered.contains("Total Units: 3"));
        assert!(rendered.contains("pale_malt"));
        assert!(rendered.contains("grapes"));
    }
}
