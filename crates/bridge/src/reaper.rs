// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Liveness reaper: periodic sweep for dead worker connections, overdue
//! jobs, and expired approval/context gates.
//!
//! A sweep is a pure function over `&mut Registry` so it can be unit
//! tested without a running clock or sockets; `spawn` wraps it in a
//! periodic task against the shared, locked registry.

use crate::persist::EventSink;
use crate::registry::{GateKind, Registry};
use crate::scheduler;
use bridge_core::{Clock, ConnectionStatus, Event, EventType, JobId, WorkerId};
use bridge_wire::{ClientOutbound, WorkerOutbound};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// What a single sweep did, for logging and persistence.
#[derive(Debug, Default)]
pub struct SweepReport {
    pub dead_workers: Vec<WorkerId>,
    pub timed_out_jobs: Vec<JobId>,
    pub denied_approvals: Vec<String>,
    pub failed_context_jobs: Vec<JobId>,
    pub events: Vec<Event>,
}

/// Run one sweep: reap dead connections, enforce job deadlines, resolve
/// expired gates. Safe to call concurrently with reconnects because it
/// only acts on the snapshot taken under the caller's lock.
pub fn sweep(registry: &mut Registry, clock: &impl Clock, heartbeat_timeout_ms: u64) -> SweepReport {
    let now_ms = clock.epoch_ms();
    let mut report = SweepReport::default();

    for worker in registry.dead_connections(now_ms, heartbeat_timeout_ms) {
        if let Some(job) = registry.job_for_worker(&worker) {
            let job_id = job.id;
            if let Some(job) = registry.job_mut(&job_id) {
                job.mark_failed("worker connection lost", Some("worker_unreachable".into()), clock);
            }
            registry.clear_gates_for_job(job_id);
            registry.release_worker(&worker);
            let event = Event::new(EventType::JobFailed, job_id);
            registry.broadcast(job_id, ClientOutbound::Event { event: event.clone() });
            report.events.push(event);
            report.timed_out_jobs.push(job_id);
        }
        registry.remove_connection(&worker);
        warn!(worker = %worker, "reaped dead worker connection");
        report.dead_workers.push(worker);
    }

    for job_id in scheduler::overdue_jobs(registry, now_ms) {
        scheduler::enforce_timeout(registry, job_id, clock);
        let event = Event::new(EventType::JobFailed, job_id);
        registry.broadcast(job_id, ClientOutbound::Event { event: event.clone() });
        report.events.push(event);
        report.timed_out_jobs.push(job_id);
    }

    // Approval gates default to deny-on-timeout: the worker stays paused
    // safely rather than proceeding with an un-reviewed action.
    for request_id in registry.expired_gates(now_ms) {
        let Some(gate) = registry.gate(&request_id) else { continue };
        let job_id = gate.job_id;
        let kind = gate.kind;
        registry.take_gate(&request_id);

        let worker_id = registry.job(&job_id).and_then(|j| j.worker_id.clone()).map(WorkerId::new);
        match kind {
            GateKind::Approval => {
                if let Some(worker) = worker_id {
                    let _ = registry.send_to_worker(
                        &worker,
                        WorkerOutbound::ApprovalResponse {
                            request_id: request_id.clone(),
                            approved: false,
                            reason: Some("approval timed out".into()),
                        },
                    );
                }
                let event = Event::new(EventType::ApprovalDenied, job_id)
                    .with_payload(serde_json::json!({ "request_id": request_id, "reason": "approval timed out" }));
                registry.broadcast(job_id, ClientOutbound::Event { event: event.clone() });
                report.events.push(event);
                report.denied_approvals.push(request_id);
            }
            GateKind::Context => {
                if let Some(job) = registry.job_mut(&job_id) {
                    job.mark_failed("context request timed out", Some("context_timeout".into()), clock);
                }
                registry.clear_gates_for_job(job_id);
                if let Some(worker) = worker_id {
                    registry.release_worker(&worker);
                    registry.set_current_job(&worker, None);
                    registry.set_status(&worker, ConnectionStatus::Online);
                }
                let event = Event::new(EventType::JobFailed, job_id);
                registry.broadcast(job_id, ClientOutbound::Event { event: event.clone() });
                report.events.push(event);
                report.failed_context_jobs.push(job_id);
            }
        }
    }

    report
}

/// Spawn the periodic liveness sweep against the shared registry. Every
/// event a sweep produces is handed to `sink` so reaper-originated job
/// failures and gate resolutions reach the same durable history as
/// worker-originated ones (§4.1).
pub fn spawn<C: Clock + 'static>(
    registry: Arc<Mutex<Registry>>,
    clock: C,
    interval: Duration,
    heartbeat_timeout_ms: u64,
    sink: Arc<dyn EventSink>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let report = {
                let mut guard = registry.lock();
                sweep(&mut guard, &clock, heartbeat_timeout_ms)
            };
            if !report.dead_workers.is_empty() || !report.timed_out_jobs.is_empty() {
                info!(
                    dead_workers = report.dead_workers.len(),
                    timed_out_jobs = report.timed_out_jobs.len(),
                    "liveness sweep completed"
                );
            }
            for event in report.events {
                sink.record(event);
            }
        }
    })
}

/// Send a `ping` frame to every connected worker. Dead ones will simply
/// fail the send and get picked up by the next [`sweep`].
pub fn ping_all(registry: &Registry) -> usize {
    let mut sent = 0;
    for worker in registry.connections() {
        if registry.send_to_worker(&worker.instance_id, WorkerOutbound::Ping).is_ok() {
            sent += 1;
        }
    }
    sent
}

/// Spawn the periodic heartbeat pinger against the shared registry.
pub fn spawn_pinger(registry: Arc<Mutex<Registry>>, interval: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let sent = ping_all(&registry.lock());
            tracing::debug!(sent, "heartbeat ping sweep");
        }
    })
}

#[cfg(test)]
#[path = "reaper_tests.rs"]
mod tests;
