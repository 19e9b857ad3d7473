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

//! Grist-BnB: branch-and-bound over integer ingredient counts
//!
//! The search engine behind the recipe solver. Given a catalogue, a
//! style, and a validated request, it finds the best K integer count
//! vectors whose attribute totals land inside the requested feasibility
//! boxes, ranked by fewest total units.
//!
//! Core flow
//! - `capacity`: derive mandatory minimums, per-ingredient ceilings, and
//!   the default reachable bound per attribute.
//! - `boxes`: intersect requested intervals with band segments and the
//!   reachable bounds into per-attribute interval lists; their lazy
//!   cartesian product yields the search boxes.
//! - `ordering`: order ingredients by contribution magnitude and
//!   precompute suffix bounds for pruning.
//! - `engine`: the bounded depth-first search with deduplication and
//!   top-K maintenance.
//! - `assemble`: turn accepted leaves into externally visible mixes.
//! - `pricing`: seasonal cost projections attached to each mix.
//!
//! Design highlights
//! - Every failure is a `Diagnostic` value, never a panic.
//! - The search is a pure function of its inputs; all mutable state is
//!   owned by one search session.
//! - Monitors observe and can terminate the search at node granularity.

pub mod assemble;
pub mod boxes;
pub mod capacity;
pub mod engine;
pub mod ordering;
pub mod pricing;
