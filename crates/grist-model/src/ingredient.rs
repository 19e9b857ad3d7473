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

use serde::{Deserialize, Serialize};

/// The seasonal families that react to seasonal price swings.
///
/// Free-text catalogue labels are mapped onto these via
/// [`SeasonalKind::from_label`]; anything unrecognized simply has no
/// seasonal behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonalKind {
    Malt,
    Hops,
    Fruit,
    Yeast,
}

impl SeasonalKind {
    /// Maps a free-text label onto a seasonal family by substring match.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use grist_model::ingredient::SeasonalKind;
    ///
    /// assert_eq!(SeasonalKind::from_label("Pale Malt"), Some(SeasonalKind::Malt));
    /// assert_eq!(SeasonalKind::from_label("noble hops"), Some(SeasonalKind::Hops));
    /// assert_eq!(SeasonalKind::from_label("water"), None);
    /// ```
    pub fn from_label(label: &str) -> Option<Self> {
        let lower = label.trim().to_lowercase();
        if lower.is_empty() {
            return None;
        }
        if lower.contains("malt") {
            Some(SeasonalKind::Malt)
        } else if lower.contains("hop") {
            Some(SeasonalKind::Hops)
        } else if lower.contains("fruit") {
            Some(SeasonalKind::Fruit)
        } else if lower.contains("yeast") {
            Some(SeasonalKind::Yeast)
        } else {
            None
        }
    }
}

impl std::fmt::Display for SeasonalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeasonalKind::Malt => write!(f, "malt"),
            SeasonalKind::Hops => write!(f, "hops"),
            SeasonalKind::Fruit => write!(f, "fruit"),
            SeasonalKind::Yeast => write!(f, "yeast"),
        }
    }
}

/// One catalogue ingredient: an identity plus the attribute contribution
/// of a single unit.
///
/// The unit vector is normalized by the catalogue to the shared attribute
/// length, so `coefficient` never has to bounds-check. Immutable for the
/// duration of a solve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    id: String,
    #[serde(rename = "vec")]
    unit_vector: Vec<f64>,
    #[serde(rename = "cost", default)]
    unit_cost: f64,
    #[serde(rename = "seasonal_type", default, skip_serializing_if = "Option::is_none")]
    seasonal_kind: Option<SeasonalKind>,
}

impl Ingredient {
    /// Creates a new ingredient with no cost and no seasonal family.
    #[inline]
    pub fn new(id: impl Into<String>, unit_vector: Vec<f64>) -> Self {
        Self {
            id: id.into(),
            unit_vector,
            unit_cost: 0.0,
            seasonal_kind: None,
        }
    }

    /// Sets the per-unit cost. Non-finite or non-positive costs are
    /// normalized to zero (the ingredient is treated as free).
    #[inline]
    pub fn with_unit_cost(mut self, unit_cost: f64) -> Self {
        self.unit_cost = if unit_cost.is_finite() && unit_cost > 0.0 {
            unit_cost
        } else {
            0.0
        };
        self
    }

    /// Sets the seasonal family directly.
    #[inline]
    pub fn with_seasonal_kind(mut self, kind: SeasonalKind) -> Self {
        self.seasonal_kind = Some(kind);
        self
    }

    /// Derives the seasonal family from a free-text label.
    #[inline]
    pub fn with_seasonal_label(mut self, label: &str) -> Self {
        self.seasonal_kind = SeasonalKind::from_label(label);
        self
    }

    /// Returns the ingredient's identity.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the per-unit attribute vector.
    #[inline]
    pub fn unit_vector(&self) -> &[f64] {
        &self.unit_vector
    }

    /// Returns the contribution to the attribute at `attr` per unit.
    ///
    /// # Panics
    ///
    /// Panics if `attr` is out of bounds for the normalized vector.
    #[inline]
    pub fn coefficient(&self, attr: usize) -> f64 {
        debug_assert!(
            attr < self.unit_vector.len(),
            "called `Ingredient::coefficient` with attribute index out of bounds: the len is {} but the index is {}",
            self.unit_vector.len(),
            attr
        );
        self.unit_vector[attr]
    }

    /// Returns the per-unit cost (zero when the ingredient is free).
    #[inline]
    pub fn unit_cost(&self) -> f64 {
        self.unit_cost
    }

    /// Returns the seasonal family, if any.
    #[inline]
    pub fn seasonal_kind(&self) -> Option<SeasonalKind> {
        self.seasonal_kind
    }

    pub(crate) fn normalize(&mut self, num_attrs: usize) {
        self.unit_vector.resize(num_attrs, 0.0);
        for value in &mut self.unit_vector {
            *value = grist_core::math::approx::finite_or_zero(*value);
        }
        if !(self.unit_cost.is_finite() && self.unit_cost > 0.0) {
            self.unit_cost = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_matching() {
        assert_eq!(SeasonalKind::from_label("Amber Malt"), Some(SeasonalKind::Malt));
        assert_eq!(SeasonalKind::from_label("  HOPS  "), Some(SeasonalKind::Hops));
        assert_eq!(SeasonalKind::from_label("dried fruit"), Some(SeasonalKind::Fruit));
        assert_eq!(SeasonalKind::from_label("standard yeast"), Some(SeasonalKind::Yeast));
        assert_eq!(SeasonalKind::from_label(""), None);
        assert_eq!(SeasonalKind::from_label("honey"), None);
    }

    #[test]
    fn test_cost_normalization() {
        assert_eq!(Ingredient::new("a", vec![]).with_unit_cost(2.5).unit_cost(), 2.5);
        assert_eq!(Ingredient::new("a", vec![]).with_unit_cost(-1.0).unit_cost(), 0.0);
        assert_eq!(Ingredient::new("a", vec![]).with_unit_cost(f64::NAN).unit_cost(), 0.0);
    }

    #[test]
    fn test_normalize_pads_and_sanitizes() {
        let mut ing = Ingredient::new("a", vec![1.0, f64::NAN]);
        ing.normalize(4);
        assert_eq!(ing.unit_vector(), &[1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_seasonal_label_fallback() {
        let ing = Ingredient::new("a", vec![]).with_seasonal_label("pale malt");
        assert_eq!(ing.seasonal_kind(), Some(SeasonalKind::Malt));
        let ing = Ingredient::new("a", vec![]).with_seasonal_label("water");
        assert_eq!(ing.seasonal_kind(), None);
    }
}
