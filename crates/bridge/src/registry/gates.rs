// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pending approval/context gates.
//!
//! A gate is opened when a worker reports `needs_approval` or
//! `needs_context` and closed when the matching client response arrives
//! (looked up by exact `request_id`, never by scanning jobs — see
//! REDESIGN FLAGS) or when its deadline lapses.

use super::Registry;
use bridge_core::JobId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateKind {
    Approval,
    Context,
}

#[derive(Debug, Clone)]
pub struct PendingGate {
    pub job_id: JobId,
    pub kind: GateKind,
    pub created_at_ms: u64,
    pub timeout_at_ms: u64,
}

impl Registry {
    pub fn open_gate(
        &mut self,
        request_id: impl Into<String>,
        job_id: JobId,
        kind: GateKind,
        now_ms: u64,
        timeout_ms: u64,
    ) {
        self.gates.insert(
            request_id.into(),
            PendingGate { job_id, kind, created_at_ms: now_ms, timeout_at_ms: now_ms + timeout_ms },
        );
    }

    /// Remove and return the gate for `request_id`, if any is pending.
    pub fn take_gate(&mut self, request_id: &str) -> Option<PendingGate> {
        self.gates.remove(request_id)
    }

    pub fn gate(&self, request_id: &str) -> Option<&PendingGate> {
        self.gates.get(request_id)
    }

    /// Request ids whose deadline has passed `now_ms`.
    pub fn expired_gates(&self, now_ms: u64) -> Vec<String> {
        self.gates
            .iter()
            .filter(|(_, gate)| gate.timeout_at_ms <= now_ms)
            .map(|(request_id, _)| request_id.clone())
            .collect()
    }

    /// All pending gates belonging to `job_id`, e.g. to clear them when a
    /// job reaches a terminal state while a gate is still open.
    pub fn gates_for_job(&self, job_id: JobId) -> Vec<String> {
        self.gates
            .iter()
            .filter(|(_, gate)| gate.job_id == job_id)
            .map(|(request_id, _)| request_id.clone())
            .collect()
    }

    /// Drop every pending gate belonging to `job_id`. A job that reaches a
    /// terminal state implicitly cancels any request still awaiting a
    /// response (§3 invariant: every gate is tied to exactly one active job).
    pub fn clear_gates_for_job(&mut self, job_id: JobId) {
        self.gates.retain(|_, gate| gate.job_id != job_id);
    }
}

#[cfg(test)]
#[path = "gates_tests.rs"]
mod tests;
