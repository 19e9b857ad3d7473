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

use grist_core::math::approx::finite_or_zero;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A qualitative band over one numeric range of one attribute.
///
/// Segments are evaluated in declaration order and the first match wins.
/// Style authors are expected to keep segments disjoint, but nothing
/// enforces it; first-match resolves any overlap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BandSegment {
    #[serde(default)]
    pub min: f64,
    #[serde(default)]
    pub max: f64,
    pub band: String,
}

impl BandSegment {
    /// Creates a new band segment.
    #[inline]
    pub fn new(min: f64, max: f64, band: impl Into<String>) -> Self {
        Self {
            min,
            max,
            band: band.into(),
        }
    }
}

/// A target style: a base attribute vector, qualitative band segments per
/// attribute, and mandatory minimum counts for certain ingredients.
///
/// The base vector is the attribute contribution before any ingredient is
/// added (the vessel or carrier baseline).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Style {
    #[serde(rename = "base", default)]
    base_vector: Vec<f64>,
    #[serde(rename = "bands", default)]
    bands_by_attr: FxHashMap<String, Vec<BandSegment>>,
    #[serde(rename = "min_counts", default)]
    mandatory_min_counts: FxHashMap<String, u32>,
}

impl Style {
    /// Creates a new style with the given base vector, no band segments,
    /// and no mandatory minimums.
    #[inline]
    pub fn new(base_vector: Vec<f64>) -> Self {
        Self {
            base_vector,
            bands_by_attr: FxHashMap::default(),
            mandatory_min_counts: FxHashMap::default(),
        }
    }

    /// Adds the band segments for one attribute, replacing any existing.
    #[inline]
    pub fn with_bands(mut self, attr: impl Into<String>, segments: Vec<BandSegment>) -> Self {
        self.bands_by_attr.insert(attr.into(), segments);
        self
    }

    /// Adds a mandatory minimum count for one ingredient.
    #[inline]
    pub fn with_min_count(mut self, ingredient_id: impl Into<String>, count: u32) -> Self {
        self.mandatory_min_counts.insert(ingredient_id.into(), count);
        self
    }

    /// Returns the base attribute vector.
    #[inline]
    pub fn base_vector(&self) -> &[f64] {
        &self.base_vector
    }

    /// Returns the band segments declared for `attr`, or an empty slice.
    #[inline]
    pub fn segments(&self, attr: &str) -> &[BandSegment] {
        self.bands_by_attr
            .get(attr)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the mandatory minimum counts keyed by ingredient id.
    #[inline]
    pub fn mandatory_min_counts(&self) -> &FxHashMap<String, u32> {
        &self.mandatory_min_counts
    }

    /// Classifies `value` into a band for `attr`.
    ///
    /// Scans the attribute's segments in declaration order and returns the
    /// first whose `[min - eps, max + eps]` range contains the value, or
    /// `None` if no segment matches.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use grist_core::math::approx::EPS;
    /// # use grist_model::style::{BandSegment, Style};
    ///
    /// let style = Style::new(vec![0.0]).with_bands(
    ///     "taste",
    ///     vec![
    ///         BandSegment::new(0.0, 0.99, "red"),
    ///         BandSegment::new(1.0, 2.99, "green"),
    ///     ],
    /// );
    /// assert_eq!(style.classify("taste", 1.5, EPS), Some("green"));
    /// assert_eq!(style.classify("taste", 5.0, EPS), None);
    /// ```
    pub fn classify(&self, attr: &str, value: f64, eps: f64) -> Option<&str> {
        self.segments(attr)
            .iter()
            .find(|seg| value >= seg.min - eps && value <= seg.max + eps)
            .map(|seg| seg.band.as_str())
    }

    pub(crate) fn normalize(&mut self, num_attrs: usize) {
        self.base_vector.resize(num_attrs, 0.0);
        for value in &mut self.base_vector {
            *value = finite_or_zero(*value);
        }
        for segments in self.bands_by_attr.values_mut() {
            for seg in segments {
                seg.min = finite_or_zero(seg.min);
                seg.max = finite_or_zero(seg.max);
            }
        }
    }
}
