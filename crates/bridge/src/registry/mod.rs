// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory state shared by every Bridge subsystem.
//!
//! Jobs, worker connections, the worker->job reverse index, subscribers,
//! and pending approval/context gates all live behind one coarse-grained
//! lock. The invariants in the job model span these maps together (a
//! job is `running` iff its worker's reverse-index entry points back at
//! it), so per-map locking would let them observe each other
//! inconsistently; a single lock keeps every mutation atomic.

mod connections;
mod gates;
mod jobs;
mod subscribers;

pub use connections::ConnectionHandle;
pub use gates::{GateKind, PendingGate};
pub use subscribers::SubscriberId;

use bridge_core::{Job, JobId, WorkerId, WorkerInfo};
use std::collections::HashMap;

#[derive(Default)]
pub struct Registry {
    pub(crate) jobs: HashMap<JobId, Job>,
    pub(crate) by_worker: HashMap<WorkerId, JobId>,
    pub(crate) connections: HashMap<WorkerId, ConnectionHandle>,
    pub(crate) subscribers: HashMap<JobId, HashMap<SubscriberId, subscribers::Subscriber>>,
    pub(crate) gates: HashMap<String, PendingGate>,
    pub(crate) next_subscriber_id: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn worker_info(&self, id: &WorkerId) -> Option<&WorkerInfo> {
        self.connections.get(id).map(|c| &c.info)
    }

    pub fn job(&self, id: &JobId) -> Option<&Job> {
        self.jobs.get(id)
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
