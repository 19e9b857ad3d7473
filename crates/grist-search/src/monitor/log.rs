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
use grist_model::solution::Mix;

const DEFAULT_LOG_INTERVAL: u64 = 100_000;

/// A monitor that prints search progress to stdout.
///
/// Intended for interactive debugging of slow instances; it never
/// influences the search.
#[derive(Debug, Clone, Copy)]
pub struct LogSearchMonitor {
    interval: u64,
}

impl Default for LogSearchMonitor {
    fn default() -> Self {
        Self {
            interval: DEFAULT_LOG_INTERVAL,
        }
    }
}

impl LogSearchMonitor {
    /// Creates a monitor printing a progress line every `interval` nodes.
    #[inline]
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
        }
    }
}

impl SearchMonitor for LogSearchMonitor {
    fn name(&self) -> &str {
        "LogSearchMonitor"
    }

    fn on_enter_search(&mut self) {
        println!("Search started.");
    }

    fn on_exit_search(&mut self, stats: &SearchStatistics) {
        println!("Search finished.");
        println!("{}", stats);
    }

    fn on_mix_found(&mut self, mix: &Mix, stats: &SearchStatistics) {
        println!(
            "Mix found: {} units, {} ingredients ({} feasible so far)",
            mix.total_units(),
            mix.ingredient_count(),
            stats.feasible_leaves
        );
    }

    fn on_node(&mut self, stats: &SearchStatistics) {
        if stats.nodes_visited % self.interval == 0 {
            println!(
                "... {} nodes visited, {} feasible, depth {}",
                stats.nodes_visited, stats.feasible_leaves, stats.max_depth
            );
        }
    }

    fn search_command(&self, _stats: &SearchStatistics) -> SearchCommand {
        SearchCommand::Continue
    }
}
