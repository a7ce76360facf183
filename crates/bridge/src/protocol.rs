// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatch table for inbound worker frames.
//!
//! One function per [`bridge_wire::WorkerInbound`] variant, all operating
//! on an already-locked `&mut Registry`. `handle` is the single entry
//! point the worker connection task calls for every frame it decodes.

use crate::registry::{GateKind, Registry};
use bridge_core::{Clock, ConnectionStatus, Event, EventType, JobId, WorkerId};
use bridge_wire::{ClientOutbound, WorkerInbound};
use tracing::warn;

/// Handle one inbound frame from `worker`. Returns the events produced,
/// for the caller to hand to the persistence sink.
///
/// Receipt of any frame — not just `pong` — refreshes the worker's
/// `last_heartbeat` (§4.3).
pub fn handle(registry: &mut Registry, worker: &WorkerId, frame: WorkerInbound, clock: &impl Clock) -> Vec<Event> {
    registry.touch_heartbeat(worker, clock.epoch_ms());
    match frame {
        WorkerInbound::Auth { .. } => {
            // Handled by the listener during the handshake, before frames
            // reach this dispatch table.
            Vec::new()
        }
        WorkerInbound::Pong => Vec::new(),
        WorkerInbound::Event { event } => {
            if event.is_custom() {
                warn!(job_id = %event.job_id, "dropped event with unrecognized type");
                return Vec::new();
            }
            registry.broadcast(event.job_id, ClientOutbound::Event { event: event.clone() });
            vec![event]
        }
        WorkerInbound::TaskComplete { task_id, result, artifacts } => on_task_complete(registry, worker, task_id, result, artifacts, clock),
        WorkerInbound::TaskFailed { task_id, error_message, error_code } => {
            on_task_failed(registry, worker, task_id, error_message, error_code, clock)
        }
        WorkerInbound::NeedsApproval { task_id, request_id, description, risk_level } => {
            on_needs_approval(registry, task_id, request_id, description, risk_level, clock)
        }
        WorkerInbound::NeedsContext { task_id, request_id, prompt } => {
            on_needs_context(registry, task_id, request_id, prompt, clock)
        }
        WorkerInbound::Unknown => {
            warn!(worker = %worker, "dropped unrecognized worker frame");
            Vec::new()
        }
    }
}

fn release(registry: &mut Registry, worker: &WorkerId) {
    registry.release_worker(worker);
    registry.set_current_job(worker, None);
    registry.set_status(worker, ConnectionStatus::Online);
}

/// A worker may only complete/fail the job it is actually assigned to
/// (§4.6). `task_id` comes straight off the wire, so a misbehaving or
/// confused worker could name a different job — including one belonging
/// to another user's session.
fn owns_job(registry: &Registry, worker: &WorkerId, job_id: JobId) -> bool {
    registry.job_for_worker(worker).is_some_and(|job| job.id == job_id)
}

fn on_task_complete(
    registry: &mut Registry,
    worker: &WorkerId,
    task_id: String,
    result: Option<serde_json::Value>,
    artifacts: Vec<serde_json::Value>,
    clock: &impl Clock,
) -> Vec<Event> {
    let job_id = JobId::from_string(&task_id);
    if !owns_job(registry, worker, job_id) {
        warn!(worker = %worker, %task_id, "dropped task_complete for a job not assigned to this worker");
        return Vec::new();
    }
    if let Some(job) = registry.job_mut(&job_id) {
        job.artifacts = artifacts;
        job.mark_completed(result, clock);
    }
    registry.clear_gates_for_job(job_id);
    release(registry, worker);

    let event = Event::new(EventType::JobCompleted, job_id);
    registry.broadcast(job_id, ClientOutbound::Event { event: event.clone() });
    vec![event]
}

fn on_task_failed(
    registry: &mut Registry,
    worker: &WorkerId,
    task_id: String,
    error_message: String,
    error_code: Option<String>,
    clock: &impl Clock,
) -> Vec<Event> {
    let job_id = JobId::from_string(&task_id);
    if !owns_job(registry, worker, job_id) {
        warn!(worker = %worker, %task_id, "dropped task_failed for a job not assigned to this worker");
        return Vec::new();
    }
    if let Some(job) = registry.job_mut(&job_id) {
        job.mark_failed(error_message, error_code, clock);
    }
    registry.clear_gates_for_job(job_id);
    release(registry, worker);

    let event = Event::new(EventType::JobFailed, job_id);
    registry.broadcast(job_id, ClientOutbound::Event { event: event.clone() });
    vec![event]
}

fn on_needs_approval(
    registry: &mut Registry,
    task_id: String,
    request_id: String,
    description: String,
    risk_level: Option<String>,
    clock: &impl Clock,
) -> Vec<Event> {
    let job_id = JobId::from_string(&task_id);
    if let Some(job) = registry.job_mut(&job_id) {
        job.mark_paused();
    }
    registry.open_gate(request_id.clone(), job_id, GateKind::Approval, clock.epoch_ms(), crate::env::approval_timeout().as_millis() as u64);

    let event = Event::new(EventType::NeedsApproval, job_id).with_payload(serde_json::json!({
        "request_id": request_id,
        "description": description,
        "risk_level": risk_level,
    }));
    registry.broadcast(job_id, ClientOutbound::Event { event: event.clone() });
    vec![event]
}

fn on_needs_context(
    registry: &mut Registry,
    task_id: String,
    request_id: String,
    prompt: String,
    clock: &impl Clock,
) -> Vec<Event> {
    let job_id = JobId::from_string(&task_id);
    if let Some(job) = registry.job_mut(&job_id) {
        job.mark_paused();
    }
    registry.open_gate(request_id.clone(), job_id, GateKind::Context, clock.epoch_ms(), crate::env::context_timeout().as_millis() as u64);

    let event = Event::new(EventType::NeedsContext, job_id)
        .with_payload(serde_json::json!({ "request_id": request_id, "prompt": prompt }));
    registry.broadcast(job_id, ClientOutbound::Event { event: event.clone() });
    vec![event]
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
