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

//! Grist-Model: the immutable data model of the recipe solver
//!
//! Everything the search consumes or produces lives here: the ingredient
//! catalogue with its styles and band segments, the validated solve
//! request, the assembled mix records, and the diagnostic taxonomy.
//! All types are plain data; the solving logic lives in `grist-bnb` and
//! `grist-solver`.
//!
//! Construction and normalization
//! - `catalogue::Catalogue` validates and normalizes raw JSON input once;
//!   downstream code assumes well-formed vectors of uniform length.
//! - `request::SolveRequestBuilder` produces a strongly-typed request,
//!   replacing the loosely-shaped objects the solver used to accept at
//!   every call site.
//!
//! Module map
//! - `index`: typed attribute and ingredient indices.
//! - `ingredient`: per-unit attribute vectors, costs, seasonal kinds.
//! - `style`: band segments, base vectors, mandatory minimum counts.
//! - `catalogue`: the validated, queryable catalogue with JSON loading.
//! - `request`: the solve request and its builder.
//! - `solution`: mix records, seasons, and cost summaries.
//! - `outcome`: the ranked result list plus diagnostics.
//! - `diagnostics`: recoverable failure codes and abort reasons.

pub mod catalogue;
pub mod diagnostics;
pub mod index;
pub mod ingredient;
pub mod outcome;
pub mod request;
pub mod solution;
pub mod style;
