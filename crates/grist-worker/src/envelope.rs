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

//! The wire shape of worker traffic.
//!
//! Every message is an envelope `{ id, type, payload }`. The id ties a
//! response to the request that caused it; responses arrive in
//! completion order, not submission order.

use grist_model::{catalogue::Catalogue, outcome::SolveOutcome, request::SolveRequest};
use serde::{Deserialize, Serialize};

/// A message envelope carrying a correlation id and a typed payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub id: u64,
    #[serde(flatten)]
    pub payload: T,
}

impl<T> Envelope<T> {
    /// Creates a new envelope.
    #[inline]
    pub fn new(id: u64, payload: T) -> Self {
        Self { id, payload }
    }
}

/// Requests accepted by the worker.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum WorkerRequest {
    /// Installs the read-only catalogue the following solves run against.
    Init(Box<Catalogue>),
    /// Runs one solve and yields exactly one terminal response.
    Solve(Box<SolveRequest>),
    /// Requests cooperative cancellation of an outstanding solve.
    Cancel { request_id: u64 },
}

/// Responses emitted by the worker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum WorkerResponse {
    /// The catalogue was installed.
    Ready,
    /// A progress heartbeat for a running solve.
    Progress { visited: u64 },
    /// The terminal response of a completed solve.
    Result(Box<SolveOutcome>),
    /// The terminal response of a cancelled solve.
    Cancelled,
    /// The terminal response of a failed request.
    Error { message: String },
}
