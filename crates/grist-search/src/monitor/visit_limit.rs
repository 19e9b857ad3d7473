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
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    stats::SearchStatistics,
};
use grist_model::{diagnostics::AbortReason, solution::Mix};

/// A monitor that terminates the search once the node-visit budget is
/// exhausted.
///
/// The budget bounds worst-case latency on large catalogues; an aborted
/// search still returns whatever it found.
#[derive(Debug, Clone, Copy)]
pub struct VisitLimitMonitor {
    max_visits: u64,
}

impl VisitLimitMonitor {
    /// Creates a monitor allowing at most `max_visits` node visits.
    #[inline]
    pub fn new(max_visits: u64) -> Self {
        Self { max_visits }
    }

    /// Returns the configured budget.
    #[inline]
    pub fn max_visits(&self) -> u64 {
        self.max_visits
    }
}

impl SearchMonitor for VisitLimitMonitor {
    fn name(&self) -> &str {
        "VisitLimitMonitor"
    }

    fn on_enter_search(&mut self) {}
    fn on_exit_search(&mut self, _stats: &SearchStatistics) {}
    fn on_mix_found(&mut self, _mix: &Mix, _stats: &SearchStatistics) {}
    fn on_node(&mut self, _stats: &SearchStatistics) {}

    fn search_command(&self, stats: &SearchStatistics) -> SearchCommand {
        if stats.nodes_visited > self.max_visits {
            SearchCommand::Terminate(AbortReason::VisitLimit)
        } else {
            SearchCommand::Continue
        }
    }
}
