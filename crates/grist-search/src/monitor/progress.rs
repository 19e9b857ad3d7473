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

/// A monitor that reports the visit count to a callback at a fixed node
/// interval.
///
/// Used by the worker boundary to relay progress messages without the
/// engine knowing anything about transports.
pub struct ProgressMonitor<F>
where
    F: FnMut(u64),
{
    interval: u64,
    callback: F,
}

impl<F> ProgressMonitor<F>
where
    F: FnMut(u64),
{
    /// Creates a monitor invoking `callback` every `interval` visited
    /// nodes. An interval of zero is treated as one.
    #[inline]
    pub fn new(interval: u64, callback: F) -> Self {
        Self {
            interval: interval.max(1),
            callback,
        }
    }
}

impl<F> SearchMonitor for ProgressMonitor<F>
where
    F: FnMut(u64),
{
    fn name(&self) -> &str {
        "ProgressMonitor"
    }

    fn on_enter_search(&mut self) {}
    fn on_exit_search(&mut self, _stats: &SearchStatistics) {}
    fn on_mix_found(&mut self, _mix: &Mix, _stats: &SearchStatistics) {}

    fn on_node(&mut self, stats: &SearchStatistics) {
        if stats.nodes_visited % self.interval == 0 {
            (self.callback)(stats.nodes_visited);
        }
    }

    fn search_command(&self, _stats: &SearchStatistics) -> SearchCommand {
        SearchCommand::Continue
    }
}
