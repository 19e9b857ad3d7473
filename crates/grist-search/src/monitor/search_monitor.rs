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

use crate::stats::SearchStatistics;
use grist_model::{diagnostics::AbortReason, solution::Mix};

/// The instruction a monitor hands back to the running search.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum SearchCommand {
    #[default]
    Continue,
    Terminate(AbortReason),
}

impl std::fmt::Display for SearchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchCommand::Continue => write!(f, "Continue"),
            SearchCommand::Terminate(reason) => write!(f, "Terminate: {}", reason),
        }
    }
}

/// Observes and controls a running search.
///
/// The engine calls `on_node` and `search_command` at every node
/// boundary, which is what makes cooperative cancellation effective: a
/// monitor that returns `Terminate` stops the search within one node.
pub trait SearchMonitor {
    fn name(&self) -> &str;
    fn on_enter_search(&mut self);
    fn on_exit_search(&mut self, stats: &SearchStatistics);
    fn on_mix_found(&mut self, mix: &Mix, stats: &SearchStatistics);
    fn on_node(&mut self, stats: &SearchStatistics);
    fn search_command(&self, stats: &SearchStatistics) -> SearchCommand;
}

impl<M> SearchMonitor for &mut M
where
    M: SearchMonitor + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn on_enter_search(&mut self) {
        (**self).on_enter_search()
    }

    fn on_exit_search(&mut self, stats: &SearchStatistics) {
        (**self).on_exit_search(stats)
    }

    fn on_mix_found(&mut self, mix: &Mix, stats: &SearchStatistics) {
        (**self).on_mix_found(mix, stats)
    }

    fn on_node(&mut self, stats: &SearchStatistics) {
        (**self).on_node(stats)
    }

    fn search_command(&self, stats: &SearchStatistics) -> SearchCommand {
        (**self).search_command(stats)
    }
}

impl<'a> std::fmt::Debug for (dyn SearchMonitor + 'a) {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchMonitor({})", self.name())
    }
}

impl<'a> std::fmt::Display for (dyn SearchMonitor + 'a) {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchMonitor({})", self.name())
    }
}
