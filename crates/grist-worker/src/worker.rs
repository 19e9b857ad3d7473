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

//! # Worker Thread and Handle
//!
//! A dedicated thread runs solves sequentially against catalogue state
//! installed once by `init`. The owning `WorkerHandle` assigns request
//! ids, relays envelopes over channels, and supports cooperative
//! cancellation.
//!
//! ## Cancellation
//!
//! The worker cannot poll its request queue while a solve is running, so
//! `cancel` flips a shared per-request flag synchronously and records
//! the cancel envelope on the wire as well. The engine observes the flag
//! at every search node; a solve cancelled this way answers with a
//! `cancelled` response instead of a `result`.

use crate::envelope::{Envelope, WorkerRequest, WorkerResponse};
use grist_model::{catalogue::Catalogue, diagnostics::AbortReason, request::SolveRequest};
use grist_search::monitor::{
    composite::CompositeMonitor, interrupt::InterruptMonitor, progress::ProgressMonitor,
};
use grist_solver::solver::solve_monitored;
use rustc_hash::FxHashMap;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
    mpsc::{Receiver, Sender, channel},
};
use std::thread::JoinHandle;
use std::time::Duration;

/// How many visited nodes pass between progress heartbeats.
pub const PROGRESS_INTERVAL: u64 = 25_000;

type CancelFlags = Arc<Mutex<FxHashMap<u64, Arc<AtomicBool>>>>;

/// The owning side of a worker thread.
///
/// Dropping the handle closes the request channel and joins the thread;
/// a solve already running finishes (or gets cancelled) first.
pub struct WorkerHandle {
    requests: Option<Sender<Envelope<WorkerRequest>>>,
    responses: Receiver<Envelope<WorkerResponse>>,
    cancel_flags: CancelFlags,
    next_id: u64,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Spawns a worker thread with no catalogue installed.
    pub fn spawn() -> Self {
        let (request_tx, request_rx) = channel();
        let (response_tx, response_rx) = channel();
        let cancel_flags: CancelFlags = Arc::default();
        let worker_flags = Arc::clone(&cancel_flags);

        let thread = std::thread::Builder::new()
            .name("grist-worker".to_string())
            .spawn(move || worker_loop(request_rx, response_tx, worker_flags))
            .expect("failed to spawn grist worker thread");

        Self {
            requests: Some(request_tx),
            responses: response_rx,
            cancel_flags,
            next_id: 0,
            thread: Some(thread),
        }
    }

    fn sender(&self) -> &Sender<Envelope<WorkerRequest>> {
        self.requests
            .as_ref()
            .expect("worker request channel already closed")
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Installs the catalogue in the worker. Answered with `ready`.
    pub fn init(&mut self, catalogue: Catalogue) -> u64 {
        let id = self.allocate_id();
        let _ = self
            .sender()
            .send(Envelope::new(id, WorkerRequest::Init(Box::new(catalogue))));
        id
    }

    /// Submits a solve. Answered with exactly one `result`, `cancelled`,
    /// or `error` carrying the returned id.
    pub fn solve(&mut self, request: SolveRequest) -> u64 {
        let id = self.allocate_id();
        self.cancel_flags
            .lock()
            .unwrap()
            .insert(id, Arc::new(AtomicBool::new(false)));
        let _ = self
            .sender()
            .send(Envelope::new(id, WorkerRequest::Solve(Box::new(request))));
        id
    }

    /// Cancels an outstanding solve cooperatively.
    ///
    /// The flag is flipped synchronously because the worker cannot read
    /// its queue mid-solve; the cancel envelope is still sent so the
    /// wire traffic reflects the request.
    pub fn cancel(&mut self, request_id: u64) {
        if let Some(flag) = self.cancel_flags.lock().unwrap().get(&request_id) {
            flag.store(true, Ordering::Relaxed);
        }
        let id = self.allocate_id();
        let _ = self
            .sender()
            .send(Envelope::new(id, WorkerRequest::Cancel { request_id }));
    }

    /// Blocks for the next response.
    pub fn recv(&self) -> Option<Envelope<WorkerResponse>> {
        self.responses.recv().ok()
    }

    /// Blocks for the next response, up to `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Envelope<WorkerResponse>> {
        self.responses.recv_timeout(timeout).ok()
    }

    /// Shuts the worker down and joins its thread.
    pub fn shutdown(self) {}
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        self.requests.take();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn worker_loop(
    requests: Receiver<Envelope<WorkerRequest>>,
    responses: Sender<Envelope<WorkerResponse>>,
    cancel_flags: CancelFlags,
) {
    let mut installed: Option<Catalogue> = None;

    while let Ok(Envelope { id, payload }) = requests.recv() {
        match payload {
            WorkerRequest::Init(catalogue) => {
                installed = Some(*catalogue);
                let _ = responses.send(Envelope::new(id, WorkerResponse::Ready));
            }
            WorkerRequest::Solve(request) => {
                let Some(catalogue) = installed.as_ref() else {
                    let _ = responses.send(Envelope::new(
                        id,
                        WorkerResponse::Error {
                            message: "solve received before init".to_string(),
                        },
                    ));
                    continue;
                };
                let response = run_solve(catalogue, &request, id, &responses, &cancel_flags);
                cancel_flags.lock().unwrap().remove(&id);
                let _ = responses.send(Envelope::new(id, response));
            }
            WorkerRequest::Cancel { request_id } => {
                // Normally redundant (the handle flips the flag itself),
                // but honored for traffic driven purely by envelopes.
                if let Some(flag) = cancel_flags.lock().unwrap().get(&request_id) {
                    flag.store(true, Ordering::Relaxed);
                }
            }
        }
    }
}

fn run_solve(
    catalogue: &Catalogue,
    request: &SolveRequest,
    id: u64,
    responses: &Sender<Envelope<WorkerResponse>>,
    cancel_flags: &CancelFlags,
) -> WorkerResponse {
    let flag = cancel_flags
        .lock()
        .unwrap()
        .get(&id)
        .cloned()
        .unwrap_or_default();

    if flag.load(Ordering::Relaxed) {
        return WorkerResponse::Cancelled;
    }

    let progress_tx = responses.clone();
    let mut monitor = CompositeMonitor::new();
    monitor.add_monitor(InterruptMonitor::new(&flag));
    monitor.add_monitor(ProgressMonitor::new(PROGRESS_INTERVAL, move |visited| {
        let _ = progress_tx.send(Envelope::new(id, WorkerResponse::Progress { visited }));
    }));

    let outcome = solve_monitored(catalogue, request, &mut monitor);
    if outcome.abort_reason() == Some(AbortReason::Cancelled) {
        WorkerResponse::Cancelled
    } else {
        WorkerResponse::Result(Box::new(outcome))
    }
}
