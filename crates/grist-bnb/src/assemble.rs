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

//! Turns accepted leaves into externally visible mix records.
//!
//! Attribute totals are rounded to three decimals before band
//! classification, so re-classifying a reported total always reproduces
//! the reported band.

use crate::pricing;
use grist_core::math::approx::{EPS, round_to};
use grist_model::{catalogue::Catalogue, solution::Mix, style::Style};
use rustc_hash::FxHashMap;

/// Builds a `Mix` from an accepted leaf's original-order count vector and
/// its exact attribute totals.
pub fn assemble_mix(
    catalogue: &Catalogue,
    style: &Style,
    counts: Vec<u32>,
    totals: &[f64],
) -> Mix {
    let rounded: Vec<f64> = totals.iter().map(|&value| round_to(value, 3)).collect();

    let mut bands = FxHashMap::default();
    for (k, attr) in catalogue.attrs().iter().enumerate() {
        let band = style.classify(attr, rounded[k], EPS).map(str::to_string);
        bands.insert(attr.clone(), band);
    }

    let mut counts_by_id = FxHashMap::default();
    for (idx, &count) in counts.iter().enumerate() {
        if count > 0 {
            counts_by_id.insert(catalogue.ingredients()[idx].id().to_string(), count);
        }
    }

    let cost = pricing::cost_summary(catalogue, &counts);
    Mix::new(counts, rounded, bands, counts_by_id, cost)
}
