// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level Bridge: wires the registry, scheduler, reaper, and event
//! sink together behind the API the client and worker listeners call.

use crate::error::{BridgeError, GateError};
use crate::persist::{EventSink, NullSink};
use crate::registry::Registry;
use crate::{protocol, reaper, scheduler};
use bridge_core::{Clock, Event, EventType, Job, JobId, PolicyProfile, SystemClock, WorkerId, WorkerInfo};
use bridge_wire::{ClientOutbound, WorkerInbound, WorkerOutbound};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

/// Bridge configuration, loaded from `BRIDGE_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub heartbeat_interval: Duration,
    pub heartbeat_timeout: Duration,
    pub approval_timeout: Duration,
    pub context_timeout: Duration,
    pub reaper_interval: Duration,
    pub subscriber_buffer: usize,
    pub worker_bind: String,
    pub client_bind: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            heartbeat_interval: crate::env::heartbeat_interval(),
            heartbeat_timeout: crate::env::heartbeat_timeout(),
            approval_timeout: crate::env::approval_timeout(),
            context_timeout: crate::env::context_timeout(),
            reaper_interval: crate::env::reaper_interval(),
            subscriber_buffer: crate::env::subscriber_buffer(),
            worker_bind: crate::env::worker_bind(),
            client_bind: crate::env::client_bind(),
        }
    }
}

/// Shared Bridge state plus the background tasks keeping it healthy.
pub struct Bridge<C: Clock = SystemClock> {
    pub config: Config,
    pub registry: Arc<Mutex<Registry>>,
    pub clock: C,
    pub sink: Arc<dyn EventSink>,
    /// Auth tokens issued by `POST /workers`, mapping token -> (instance_id, user_id).
    tokens: Mutex<HashMap<String, (WorkerId, String)>>,
    reaper_handle: Mutex<Option<tokio::task::JoinHandle<()>>>,
    pinger_handle: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl Bridge<SystemClock> {
    pub fn new(config: Config) -> Self {
        Self::with_clock(config, SystemClock, Arc::new(NullSink))
    }
}

impl<C: Clock + 'static> Bridge<C> {
    pub fn with_clock(config: Config, clock: C, sink: Arc<dyn EventSink>) -> Self {
        Self {
            config,
            registry: Arc::new(Mutex::new(Registry::new())),
            clock,
            sink,
            tokens: Mutex::new(HashMap::new()),
            reaper_handle: Mutex::new(None),
            pinger_handle: Mutex::new(None),
        }
    }

    /// Mint an `instance_id` and `auth_token` pair for a future worker
    /// connection. The worker presents the token in its `auth` frame.
    pub fn register_worker(&self, user_id: String) -> (WorkerId, String) {
        let instance_id = WorkerId::new(format!("vm-{}", nanoid::nanoid!(12)));
        let token = nanoid::nanoid!(32);
        self.tokens.lock().insert(token.clone(), (instance_id.clone(), user_id));
        (instance_id, token)
    }

    /// Validate a worker's presented auth token, returning its registered
    /// `instance_id`/`user_id` on success.
    pub fn verify_token(&self, token: &str) -> Option<(WorkerId, String)> {
        self.tokens.lock().get(token).cloned()
    }

    /// Revoke a worker's registration and disconnect it if currently live.
    pub fn unregister_worker(&self, instance_id: &WorkerId) {
        self.tokens.lock().retain(|_, (id, _)| id != instance_id);
        self.disconnect_worker(instance_id);
    }

    /// Start the background liveness reaper and heartbeat pinger.
    /// Idempotent: calling this twice replaces the previous tasks.
    pub fn start(&self) {
        let reaper_handle = reaper::spawn(
            Arc::clone(&self.registry),
            self.clock.clone(),
            self.config.reaper_interval,
            self.config.heartbeat_timeout.as_millis() as u64,
            Arc::clone(&self.sink),
        );
        *self.reaper_handle.lock() = Some(reaper_handle);

        let pinger_handle = reaper::spawn_pinger(Arc::clone(&self.registry), self.config.heartbeat_interval);
        *self.pinger_handle.lock() = Some(pinger_handle);

        info!("bridge started");
    }

    pub fn stop(&self) {
        if let Some(handle) = self.reaper_handle.lock().take() {
            handle.abort();
        }
        if let Some(handle) = self.pinger_handle.lock().take() {
            handle.abort();
        }
        info!("bridge stopped");
    }

    // -- Client-facing API ------------------------------------------------

    pub fn submit_job(
        &self,
        user_id: impl Into<String>,
        task_prompt: impl Into<String>,
        policy_profile: PolicyProfile,
        max_runtime_minutes: u32,
        preferred_worker: Option<WorkerId>,
    ) -> JobId {
        let mut registry = self.registry.lock();
        let (id, queued_event) =
            scheduler::submit_job(&mut registry, user_id, task_prompt, policy_profile, max_runtime_minutes, &self.clock);
        let mut events = vec![queued_event];
        if let Some(worker) = preferred_worker.as_ref() {
            if let Some((_worker, event)) = scheduler::try_dispatch(&mut registry, id, Some(worker), &self.clock) {
                events.push(event);
            }
        }
        events.extend(scheduler::dispatch_pending(&mut registry, &self.clock));
        drop(registry);
        for event in events {
            self.sink.record(event);
        }
        id
    }

    pub fn cancel_job(&self, job_id: JobId, reason: impl Into<String>) -> Result<(), BridgeError> {
        let mut registry = self.registry.lock();
        let cancelled_event = scheduler::cancel_job(&mut registry, job_id, reason, &self.clock).map_err(BridgeError::from)?;
        let started_events = scheduler::dispatch_pending(&mut registry, &self.clock);
        drop(registry);
        self.sink.record(cancelled_event);
        for event in started_events {
            self.sink.record(event);
        }
        Ok(())
    }

    pub fn job(&self, job_id: &JobId) -> Option<Job> {
        self.registry.lock().job(job_id).cloned()
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.registry.lock().jobs().cloned().collect()
    }

    pub fn workers(&self) -> Vec<WorkerInfo> {
        self.registry.lock().connections().cloned().collect()
    }

    pub fn subscribe(&self, job_id: JobId) -> Option<(crate::registry::SubscriberId, mpsc::Receiver<ClientOutbound>)> {
        let mut registry = self.registry.lock();
        registry.job(&job_id)?;
        Some(registry.subscribe(job_id, self.config.subscriber_buffer))
    }

    pub fn unsubscribe(&self, job_id: JobId, id: crate::registry::SubscriberId) {
        self.registry.lock().unsubscribe(job_id, id);
    }

    /// Resolve a pending approval gate raised by a worker's `needs_approval` frame,
    /// emitting `ApprovalGranted`/`ApprovalDenied` (§4.7).
    pub fn respond_to_approval(&self, request_id: &str, approved: bool, reason: Option<String>) -> Result<(), BridgeError> {
        let mut registry = self.registry.lock();
        let gate = registry.take_gate(request_id).ok_or_else(|| GateError::NotFound(request_id.to_string()))?;
        let worker_id = registry
            .job(&gate.job_id)
            .and_then(|j| j.worker_id.clone())
            .map(WorkerId::new)
            .ok_or_else(|| GateError::WorkerGone(request_id.to_string()))?;

        registry
            .send_to_worker(&worker_id, WorkerOutbound::ApprovalResponse { request_id: request_id.to_string(), approved, reason: reason.clone() })
            .map_err(BridgeError::from)?;

        if approved {
            if let Some(job) = registry.job_mut(&gate.job_id) {
                let _ = job.mark_resumed();
            }
        }

        let kind = if approved { EventType::ApprovalGranted } else { EventType::ApprovalDenied };
        let event = Event::new(kind, gate.job_id)
            .with_payload(serde_json::json!({ "request_id": request_id, "reason": reason }));
        registry.broadcast(gate.job_id, ClientOutbound::Event { event: event.clone() });
        drop(registry);
        self.sink.record(event);
        Ok(())
    }

    /// Resolve a pending context gate raised by a worker's `needs_context` frame,
    /// emitting `ContextProvided` (§4.7).
    pub fn respond_to_context(&self, request_id: &str, response: String, attachments: Vec<serde_json::Value>) -> Result<(), BridgeError> {
        let mut registry = self.registry.lock();
        let gate = registry.take_gate(request_id).ok_or_else(|| GateError::NotFound(request_id.to_string()))?;
        let worker_id = registry
            .job(&gate.job_id)
            .and_then(|j| j.worker_id.clone())
            .map(WorkerId::new)
            .ok_or_else(|| GateError::WorkerGone(request_id.to_string()))?;

        registry
            .send_to_worker(&worker_id, WorkerOutbound::ContextResponse { request_id: request_id.to_string(), response, attachments })
            .map_err(BridgeError::from)?;

        if let Some(job) = registry.job_mut(&gate.job_id) {
            let _ = job.mark_resumed();
        }

        let event = Event::new(EventType::ContextProvided, gate.job_id)
            .with_payload(serde_json::json!({ "request_id": request_id }));
        registry.broadcast(gate.job_id, ClientOutbound::Event { event: event.clone() });
        drop(registry);
        self.sink.record(event);
        Ok(())
    }

    // -- Worker-facing API --------------------------------------------------

    pub fn connect_worker(&self, instance_id: WorkerId, user_id: String) -> (mpsc::UnboundedReceiver<WorkerOutbound>, Option<JobId>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut registry = self.registry.lock();
        let id_for_release = instance_id.clone();
        let accepted = registry.accept_connection(instance_id, user_id, self.clock.epoch_ms(), tx);
        let mut events = Vec::new();
        if let Some(job_id) = accepted.evicted_job {
            if let Some(job) = registry.job_mut(&job_id) {
                job.mark_failed("worker reconnected with a fresh session", Some("worker_evicted".into()), &self.clock);
            }
            registry.clear_gates_for_job(job_id);
            registry.release_worker(&id_for_release);
            let event = Event::new(EventType::JobFailed, job_id);
            registry.broadcast(job_id, ClientOutbound::Event { event: event.clone() });
            events.push(event);
        }
        events.extend(scheduler::dispatch_pending(&mut registry, &self.clock));
        drop(registry);
        for event in events {
            self.sink.record(event);
        }
        (rx, accepted.evicted_job)
    }

    pub fn disconnect_worker(&self, instance_id: &WorkerId) {
        let mut registry = self.registry.lock();
        let mut event = None;
        if let Some(job) = registry.job_for_worker(instance_id) {
            let job_id = job.id;
            if let Some(job) = registry.job_mut(&job_id) {
                job.mark_failed("worker disconnected", Some("worker_disconnected".into()), &self.clock);
            }
            registry.clear_gates_for_job(job_id);
            let failed_event = Event::new(EventType::JobFailed, job_id);
            registry.broadcast(job_id, ClientOutbound::Event { event: failed_event.clone() });
            event = Some(failed_event);
        }
        registry.remove_connection(instance_id);
        drop(registry);
        if let Some(event) = event {
            self.sink.record(event);
        }
    }

    /// Handle one inbound frame from `worker`, forwarding produced events
    /// to the persistence sink.
    pub fn handle_worker_frame(&self, worker: &WorkerId, frame: WorkerInbound) {
        let mut registry = self.registry.lock();
        let mut events = protocol::handle(&mut registry, worker, frame, &self.clock);
        events.extend(scheduler::dispatch_pending(&mut registry, &self.clock));
        drop(registry);
        for event in events {
            self.sink.record(event);
        }
    }

    pub fn heartbeat_interval(&self) -> Duration {
        self.config.heartbeat_interval
    }
}

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod tests;
