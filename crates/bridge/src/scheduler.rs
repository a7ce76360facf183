// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job submission, cancellation, dispatch, and deadline enforcement.
//!
//! The scheduler never owns a lock itself — every function here takes
//! `&mut Registry` and is meant to be called with the Bridge's single
//! lock already held, so a submit/dispatch/cancel sequence observes a
//! consistent snapshot of jobs, connections, and the reverse index.

use crate::error::SchedulerError;
use crate::registry::Registry;
use bridge_core::{Clock, Event, EventType, Job, JobId, JobStatus, PolicyProfile, WorkerId};
use bridge_wire::{ClientOutbound, WorkerOutbound};
use tracing::{info, warn};

/// Create a job in `pending` state and immediately advance it to `queued`,
/// broadcasting a `JobQueued` event (§4.5 step 1).
pub fn submit_job(
    registry: &mut Registry,
    user_id: impl Into<String>,
    task_prompt: impl Into<String>,
    policy_profile: PolicyProfile,
    max_runtime_minutes: u32,
    clock: &impl Clock,
) -> (JobId, Event) {
    let mut job = Job::new(JobId::new(), user_id, task_prompt, policy_profile, max_runtime_minutes, clock);
    job.mark_queued();
    let id = job.id;
    registry.insert_job(job);
    info!(job_id = %id, "job submitted");

    let event = Event::new(EventType::JobQueued, id);
    registry.broadcast(id, ClientOutbound::Event { event: event.clone() });
    (id, event)
}

/// Attempt to hand a queued job to an idle worker, preferring `preferred`
/// when it is given and currently online-and-idle (§4.5 step 2). Returns
/// the worker it was dispatched to and the `JobStarted` event broadcast
/// for it, if any worker was available.
pub fn try_dispatch(
    registry: &mut Registry,
    job_id: JobId,
    preferred: Option<&WorkerId>,
    clock: &impl Clock,
) -> Option<(WorkerId, Event)> {
    let worker_id = preferred
        .filter(|id| registry.worker_info(id).is_some_and(|info| info.is_idle()))
        .cloned()
        .or_else(|| registry.find_idle_worker())?;

    let job = registry.job_mut(&job_id)?;
    if job.mark_running(worker_id.to_string(), clock).is_err() {
        return None;
    }
    let steps = job.steps.clone();
    let prompt = job.task_prompt.clone();
    let policy = job.policy_profile.clone();
    let max_runtime_minutes = job.max_runtime_minutes;

    registry.assign_worker(worker_id.clone(), job_id);
    registry.set_current_job(&worker_id, Some(job_id.to_string()));
    registry.set_status(&worker_id, bridge_core::ConnectionStatus::Busy);

    let frame = WorkerOutbound::TaskStart {
        task_id: job_id.to_string(),
        prompt,
        policy,
        max_runtime_minutes,
        steps,
    };
    if let Err(err) = registry.send_to_worker(&worker_id, frame) {
        warn!(job_id = %job_id, worker = %worker_id, %err, "dispatch send failed");
        return None;
    }
    info!(job_id = %job_id, worker = %worker_id, "job dispatched");

    let event = Event::new(EventType::JobStarted, job_id);
    registry.broadcast(job_id, ClientOutbound::Event { event: event.clone() });
    Some((worker_id, event))
}

/// Walk every queued job and try to dispatch it to an idle worker,
/// stopping once no idle worker remains. Returns every `JobStarted` event
/// broadcast along the way, for the caller to hand to the persistence sink.
pub fn dispatch_pending(registry: &mut Registry, clock: &impl Clock) -> Vec<Event> {
    let mut events = Vec::new();
    for job_id in registry.queued_job_ids() {
        match try_dispatch(registry, job_id, None, clock) {
            Some((_worker, event)) => events.push(event),
            None => break,
        }
    }
    events
}

/// Cancel a job. Cancelling a queued job is a pure state change; cancelling
/// a running job also asks its worker to stop and frees the worker back to
/// idle. Returns the `JobCancelled` event broadcast for it.
pub fn cancel_job(
    registry: &mut Registry,
    job_id: JobId,
    reason: impl Into<String>,
    clock: &impl Clock,
) -> Result<Event, SchedulerError> {
    let reason = reason.into();
    let worker_id = registry.job(&job_id).and_then(|j| j.worker_id.clone());

    let job = registry.job_mut(&job_id).ok_or_else(|| SchedulerError::JobNotFound(job_id.to_string()))?;
    if job.is_terminal() {
        return Err(SchedulerError::NotActive(job_id.to_string()));
    }
    job.mark_cancelled(reason.clone(), clock);
    registry.clear_gates_for_job(job_id);

    if let Some(worker) = worker_id {
        let worker = WorkerId::new(worker);
        registry.release_worker(&worker);
        registry.set_current_job(&worker, None);
        registry.set_status(&worker, bridge_core::ConnectionStatus::Online);
        let _ = registry.send_to_worker(
            &worker,
            WorkerOutbound::TaskCancel { task_id: job_id.to_string(), reason },
        );
    }

    let event = Event::new(EventType::JobCancelled, job_id);
    registry.broadcast(job_id, ClientOutbound::Event { event: event.clone() });
    Ok(event)
}

/// Jobs that have been running longer than their `max_runtime_minutes`
/// deadline. The caller is responsible for transitioning them to `timeout`.
pub fn overdue_jobs(registry: &Registry, now_ms: u64) -> Vec<JobId> {
    registry
        .jobs()
        .filter(|job| job.status == JobStatus::Running)
        .filter(|job| {
            job.started_at_ms
                .map(|started| now_ms.saturating_sub(started) > job.max_runtime_minutes as u64 * 60_000)
                .unwrap_or(false)
        })
        .map(|job| job.id)
        .collect()
}

/// Force a job past its deadline into `timeout`, releasing its worker.
pub fn enforce_timeout(registry: &mut Registry, job_id: JobId, clock: &impl Clock) {
    let worker_id = registry.job(&job_id).and_then(|j| j.worker_id.clone());
    if let Some(job) = registry.job_mut(&job_id) {
        job.mark_timeout(clock);
    }
    registry.clear_gates_for_job(job_id);
    if let Some(worker) = worker_id {
        let worker = WorkerId::new(worker);
        registry.release_worker(&worker);
        registry.set_current_job(&worker, None);
        registry.set_status(&worker, bridge_core::ConnectionStatus::Online);
        let _ = registry.send_to_worker(
            &worker,
            WorkerOutbound::TaskCancel { task_id: job_id.to_string(), reason: "deadline exceeded".into() },
        );
    }
    warn!(job_id = %job_id, "job timed out");
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
