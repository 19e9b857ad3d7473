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

//! The strongly-typed solve request.
//!
//! A request is validated and normalized once by its builder; the engine
//! assumes well-typed input thereafter. Numeric intervals default to
//! unbounded, band preferences default to unconstrained, and NaN interval
//! endpoints are widened to the corresponding infinity.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// Default number of ranked mixes to return.
pub const DEFAULT_TOP_K: usize = 3;

/// Default node-visit budget per solve.
pub const DEFAULT_MAX_VISITS: u64 = 1_000_000;

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_max_visits() -> u64 {
    DEFAULT_MAX_VISITS
}

fn default_true() -> bool {
    true
}

/// A fully specified solve request.
///
/// Construct through [`SolveRequestBuilder`]; the builder applies the
/// defaults and normalizations that keep the engine free of defensive
/// coercion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolveRequest {
    style_id: String,
    #[serde(default)]
    numeric_intervals: FxHashMap<String, (f64, f64)>,
    #[serde(default)]
    band_preferences: FxHashMap<String, Vec<String>>,
    total_cap: u32,
    per_cap: u32,
    #[serde(default)]
    extra_min_counts: FxHashMap<String, u32>,
    #[serde(default)]
    allowed_ingredient_ids: Option<FxHashSet<String>>,
    #[serde(default = "default_top_k")]
    top_k: usize,
    #[serde(default = "default_max_visits")]
    max_visits: u64,
    #[serde(default = "default_true")]
    allow_optional_trim: bool,
}

impl SolveRequest {
    /// Returns the requested style id.
    #[inline]
    pub fn style_id(&self) -> &str {
        &self.style_id
    }

    /// Returns the requested numeric interval for `attr`, if one was set.
    #[inline]
    pub fn numeric_interval(&self, attr: &str) -> Option<(f64, f64)> {
        self.numeric_intervals.get(attr).copied()
    }

    /// Returns the allowed band labels for `attr`, or `None` when the
    /// attribute is unconstrained.
    #[inline]
    pub fn band_preference(&self, attr: &str) -> Option<&[String]> {
        self.band_preferences.get(attr).map(Vec::as_slice)
    }

    /// Returns the total unit cap.
    #[inline]
    pub fn total_cap(&self) -> u32 {
        self.total_cap
    }

    /// Returns the per-ingredient unit cap.
    #[inline]
    pub fn per_cap(&self) -> u32 {
        self.per_cap
    }

    /// Returns the extra mandatory minimum counts keyed by ingredient id.
    #[inline]
    pub fn extra_min_counts(&self) -> &FxHashMap<String, u32> {
        &self.extra_min_counts
    }

    /// Returns the allow-list restricting which optional ingredients may
    /// receive non-mandatory units, or `None` when all are admitted.
    #[inline]
    pub fn allowed_ingredient_ids(&self) -> Option<&FxHashSet<String>> {
        self.allowed_ingredient_ids.as_ref()
    }

    /// Returns the result limit.
    #[inline]
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Returns the node-visit budget.
    #[inline]
    pub fn max_visits(&self) -> u64 {
        self.max_visits
    }

    /// Returns whether the optional-ingredient trim fallback may run.
    #[inline]
    pub fn allow_optional_trim(&self) -> bool {
        self.allow_optional_trim
    }

    /// Returns a copy of this request restricted to the given allow-list,
    /// with the trim fallback disabled. Used for the one-shot retry after
    /// an exhausted visit budget.
    pub fn restricted_to(&self, allowed_ingredient_ids: FxHashSet<String>) -> Self {
        let mut request = self.clone();
        request.allowed_ingredient_ids = Some(allowed_ingredient_ids);
        request.allow_optional_trim = false;
        request
    }
}

/// Builder for [`SolveRequest`].
///
/// # Examples
///
/// ```rust
/// # use grist_model::request::SolveRequestBuilder;
///
/// let request = SolveRequestBuilder::new("light_ale")
///     .numeric_interval("taste", 1.0, 2.0)
///     .band_preference("color", ["green"])
///     .total_cap(10)
///     .per_cap(5)
///     .top_k(5)
///     .build();
/// assert_eq!(request.style_id(), "light_ale");
/// assert_eq!(request.numeric_interval("taste"), Some((1.0, 2.0)));
/// assert_eq!(request.numeric_interval("color"), None);
/// ```
#[derive(Clone, Debug)]
pub struct SolveRequestBuilder {
    request: SolveRequest,
}

impl SolveRequestBuilder {
    /// Creates a builder for the given style with unbounded intervals, no
    /// band preferences, zero caps, and default limits.
    pub fn new(style_id: impl Into<String>) -> Self {
        Self {
            request: SolveRequest {
                style_id: style_id.into(),
                numeric_intervals: FxHashMap::default(),
                band_preferences: FxHashMap::default(),
                total_cap: 0,
                per_cap: 0,
                extra_min_counts: FxHashMap::default(),
                allowed_ingredient_ids: None,
                top_k: DEFAULT_TOP_K,
                max_visits: DEFAULT_MAX_VISITS,
                allow_optional_trim: true,
            },
        }
    }

    /// Requests `[lo, hi]` for `attr`. NaN endpoints widen to infinity.
    pub fn numeric_interval(mut self, attr: impl Into<String>, lo: f64, hi: f64) -> Self {
        let lo = if lo.is_nan() { f64::NEG_INFINITY } else { lo };
        let hi = if hi.is_nan() { f64::INFINITY } else { hi };
        self.request.numeric_intervals.insert(attr.into(), (lo, hi));
        self
    }

    /// Restricts `attr` to the named bands.
    pub fn band_preference<I, S>(mut self, attr: impl Into<String>, bands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request
            .band_preferences
            .insert(attr.into(), bands.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the total unit cap.
    pub fn total_cap(mut self, total_cap: u32) -> Self {
        self.request.total_cap = total_cap;
        self
    }

    /// Sets the per-ingredient unit cap.
    pub fn per_cap(mut self, per_cap: u32) -> Self {
        self.request.per_cap = per_cap;
        self
    }

    /// Adds a mandatory minimum count beyond the style's own.
    pub fn extra_min_count(mut self, ingredient_id: impl Into<String>, count: u32) -> Self {
        self.request
            .extra_min_counts
            .insert(ingredient_id.into(), count);
        self
    }

    /// Restricts optional units to the given ingredient ids. Mandatory
    /// ingredients are unaffected.
    pub fn allowed_ingredient_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request.allowed_ingredient_ids =
            Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the result limit. Clamped to at least one.
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.request.top_k = top_k.max(1);
        self
    }

    /// Sets the node-visit budget. Clamped to at least one.
    pub fn max_visits(mut self, max_visits: u64) -> Self {
        self.request.max_visits = max_visits.max(1);
        self
    }

    /// Enables or disables the optional-ingredient trim fallback.
    pub fn allow_optional_trim(mut self, allow: bool) -> Self {
        self.request.allow_optional_trim = allow;
        self
    }

    /// Finalizes the request.
    pub fn build(self) -> SolveRequest {
        self.request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = SolveRequestBuilder::new("pale").build();
        assert_eq!(request.top_k(), DEFAULT_TOP_K);
        assert_eq!(request.max_visits(), DEFAULT_MAX_VISITS);
        assert!(request.allow_optional_trim());
        assert!(request.allowed_ingredient_ids().is_none());
        assert!(request.numeric_interval("taste").is_none());
        assert!(request.band_preference("taste").is_none());
    }

    #[test]
    fn test_nan_endpoints_widen_to_infinity() {
        let request = SolveRequestBuilder::new("pale")
            .numeric_interval("taste", f64::NAN, f64::NAN)
            .build();
        assert_eq!(
            request.numeric_interval("taste"),
            Some((f64::NEG_INFINITY, f64::INFINITY))
        );
    }

    #[test]
    fn test_top_k_clamped() {
        let request = SolveRequestBuilder::new("pale").top_k(0).build();
        assert_eq!(request.top_k(), 1);
    }

    #[test]
    fn test_restricted_to_disables_trim() {
        let request = SolveRequestBuilder::new("pale").build();
        let restricted = request.restricted_to(["pale_malt".to_string()].into_iter().collect());
        assert!(!restricted.allow_optional_trim());
        assert!(
            restricted
                .allowed_ingredient_ids()
                .unwrap()
                .contains("pale_malt")
        );
        // The original is untouched.
        assert!(request.allow_optional_trim());
    }
}
