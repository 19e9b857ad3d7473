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

use std::time::Duration;

/// Statistics collected during one search run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStatistics {
    /// Total search nodes visited across all boxes.
    pub nodes_visited: u64,
    /// Leaves reached (all positions assigned), feasible or not.
    pub leaves_reached: u64,
    /// Distinct feasible leaves accepted into the result set.
    pub feasible_leaves: u64,
    /// Leaves discarded because their count vector was already seen.
    pub duplicates_skipped: u64,
    /// Nodes pruned because the unit budget could not be met.
    pub prunings_units: u64,
    /// Nodes pruned because the suffix could not reach the box.
    pub prunings_bounds: u64,
    /// The deepest position reached in the ordered ingredient list.
    pub max_depth: u64,
    /// Total time spent searching.
    pub time_total: Duration,
}

impl SearchStatistics {
    #[inline]
    pub fn on_node_visited(&mut self) {
        self.nodes_visited = self.nodes_visited.saturating_add(1);
    }

    #[inline]
    pub fn on_leaf_reached(&mut self) {
        self.leaves_reached = self.leaves_reached.saturating_add(1);
    }

    #[inline]
    pub fn on_feasible_leaf(&mut self) {
        self.feasible_leaves = self.feasible_leaves.saturating_add(1);
    }

    #[inline]
    pub fn on_duplicate_skipped(&mut self) {
        self.duplicates_skipped = self.duplicates_skipped.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_units(&mut self) {
        self.prunings_units = self.prunings_units.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_bounds(&mut self) {
        self.prunings_bounds = self.prunings_bounds.saturating_add(1);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }
}

impl std::fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Search Statistics:")?;
        writeln!(f, "  Nodes visited:       {}", self.nodes_visited)?;
        writeln!(f, "  Leaves reached:      {}", self.leaves_reached)?;
        writeln!(f, "  Feasible leaves:     {}", self.feasible_leaves)?;
        writeln!(f, "  Duplicates skipped:  {}", self.duplicates_skipped)?;
        writeln!(f, "  Prunings (units):    {}", self.prunings_units)?;
        writeln!(f, "  Prunings (bounds):   {}", self.prunings_bounds)?;
        writeln!(f, "  Max depth reached:   {}", self.max_depth)?;
        writeln!(f, "  Total time:          {:.2?}", self.time_total)
    }
}
