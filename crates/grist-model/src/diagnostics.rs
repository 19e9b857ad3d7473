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

//! Recoverable solve diagnostics.
//!
//! Every failure mode of a solve is an expected condition reported as a
//! value, never an exception or a panic. The caller (UI or worker
//! boundary) translates these codes into user-facing text and
//! distinguishes "nothing feasible" (empty `info`) from "request
//! rejected or search cut short" (non-empty `info`).

use serde::{Deserialize, Serialize};

/// Why a search stopped before exhausting its tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    /// The caller's cancellation flag was observed.
    Cancelled,
    /// The node-visit budget was exhausted.
    VisitLimit,
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbortReason::Cancelled => write!(f, "cancelled"),
            AbortReason::VisitLimit => write!(f, "visit limit"),
        }
    }
}

/// A diagnostic code attached to a solve outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The requested style id is absent from the catalogue.
    UnknownStyle { style_id: String },
    /// A mandatory minimum count exceeds the per-ingredient cap.
    MinExceedsCap,
    /// After intersecting requested, band, and reachable bounds, some
    /// attribute has no feasible interval left.
    NoFeasibleIntervals,
    /// The mandatory minimums alone do not fit in the total unit cap.
    CapTooSmall,
    /// The search stopped before exhausting its tree; any returned mixes
    /// are the best found up to that point.
    SearchAborted { reason: AbortReason, visited: u64 },
    /// The optional ingredient set was trimmed before a retry because the
    /// full set exhausted the visit budget without a single solution.
    OptionalTrimmed { kept: usize, total: usize },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::UnknownStyle { style_id } => {
                write!(f, "unknown style '{style_id}'")
            }
            Diagnostic::MinExceedsCap => {
                write!(f, "a mandatory minimum exceeds the per-ingredient cap")
            }
            Diagnostic::NoFeasibleIntervals => {
                write!(f, "no feasible attribute intervals remain")
            }
            Diagnostic::CapTooSmall => {
                write!(f, "mandatory minimums exceed the total unit cap")
            }
            Diagnostic::SearchAborted { reason, visited } => {
                write!(f, "search aborted ({reason}) after {visited} nodes")
            }
            Diagnostic::OptionalTrimmed { kept, total } => {
                write!(f, "optional ingredients trimmed to {kept} of {total}")
            }
        }
    }
}
