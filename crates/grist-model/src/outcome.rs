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

use crate::{
    diagnostics::{AbortReason, Diagnostic},
    solution::Mix,
};
use serde::{Deserialize, Serialize};

/// The complete result of one solve.
///
/// `solutions` holds at most `top_k` mixes in comparator order. `info`
/// carries zero or more diagnostic codes; an empty list with an empty
/// solution set means the request was valid but nothing feasible exists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolveOutcome {
    solutions: Vec<Mix>,
    info: Vec<Diagnostic>,
    total_feasible: u64,
    visited: u64,
}

impl SolveOutcome {
    /// Constructs a new outcome.
    #[inline]
    pub fn new(
        solutions: Vec<Mix>,
        info: Vec<Diagnostic>,
        total_feasible: u64,
        visited: u64,
    ) -> Self {
        Self {
            solutions,
            info,
            total_feasible,
            visited,
        }
    }

    /// An empty outcome carrying a single rejection diagnostic.
    #[inline]
    pub fn rejected(diagnostic: Diagnostic) -> Self {
        Self {
            solutions: Vec::new(),
            info: vec![diagnostic],
            total_feasible: 0,
            visited: 0,
        }
    }

    /// Returns the ranked mixes.
    #[inline]
    pub fn solutions(&self) -> &[Mix] {
        &self.solutions
    }

    /// Returns the diagnostic codes.
    #[inline]
    pub fn info(&self) -> &[Diagnostic] {
        &self.info
    }

    /// Returns the number of distinct feasible mixes encountered, which
    /// may exceed `solutions().len()` when more than `top_k` exist.
    #[inline]
    pub fn total_feasible(&self) -> u64 {
        self.total_feasible
    }

    /// Returns the number of search nodes visited.
    #[inline]
    pub fn visited(&self) -> u64 {
        self.visited
    }

    /// Returns `true` if the request was accepted and the search ran to
    /// completion.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.info.is_empty()
    }

    /// Returns the abort reason if the search was cut short.
    pub fn abort_reason(&self) -> Option<AbortReason> {
        self.info.iter().find_map(|diag| match diag {
            Diagnostic::SearchAborted { reason, .. } => Some(*reason),
            _ => None,
        })
    }

    /// Prepends diagnostics ahead of the existing ones, deduplicating
    /// exact repeats.
    pub fn with_leading_info(mut self, diagnostics: Vec<Diagnostic>) -> Self {
        let mut info = diagnostics;
        for diag in self.info.drain(..) {
            if !info.contains(&diag) {
                info.push(diag);
            }
        }
        self.info = info;
        self
    }
}
