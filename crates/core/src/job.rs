// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identifier and lifecycle state machine.

use crate::clock::Clock;
use crate::policy::PolicyProfile;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

crate::define_id! {
    /// Unique identifier for a job.
    pub struct JobId("job-");
}

/// Lifecycle status of a job.
///
/// Allowed transitions:
/// `pending -> queued -> {vm_booting ->}? running <-> paused`,
/// `running -> {completed | failed | cancelled | timeout}`,
/// `queued -> cancelled`.
/// Once in a terminal state (`completed`, `failed`, `cancelled`, `timeout`)
/// a job never transitions again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Queued,
    VmBooting,
    Running,
    Paused,
    Completed,
    Failed,
    Cancelled,
    Timeout,
}

crate::simple_display! {
    JobStatus {
        Pending => "pending",
        Queued => "queued",
        VmBooting => "vm_booting",
        Running => "running",
        Paused => "paused",
        Completed => "completed",
        Failed => "failed",
        Cancelled => "cancelled",
        Timeout => "timeout",
    }
}

impl JobStatus {
    /// Terminal states never transition again.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled | Self::Timeout)
    }

    /// Active states count toward worker occupancy / reverse-index membership.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Queued | Self::VmBooting | Self::Running | Self::Paused)
    }
}

/// Status of a single step in a job's execution plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

crate::simple_display! {
    StepStatus {
        Pending => "pending",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
    }
}

/// A recorded tool invocation within a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

/// One entry in a job's execution plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    pub status: StepStatus,
    #[serde(default)]
    pub tool_calls: Vec<ToolCallRecord>,
    #[serde(default)]
    pub screenshots: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at_ms: Option<u64>,
}

impl Step {
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: StepStatus::Pending,
            tool_calls: Vec::new(),
            screenshots: Vec::new(),
            result: None,
            error_message: None,
            started_at_ms: None,
            completed_at_ms: None,
        }
    }
}

/// A job: a unit of automation work submitted by a client and assigned to
/// at most one worker at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub task_prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<String>,
    pub policy_profile: PolicyProfile,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default)]
    pub artifacts: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    pub created_at_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at_ms: Option<u64>,
    pub max_runtime_minutes: u32,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Error returned when a caller asks a job to do something its current
/// status doesn't allow (e.g. cancel an already-terminal job).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobTransitionError {
    #[error("job {0} is already in a terminal state ({1})")]
    AlreadyTerminal(JobId, JobStatus),
    #[error("job {0} cannot transition to running from {1}")]
    InvalidStart(JobId, JobStatus),
    #[error("job {0} is not paused")]
    NotPaused(JobId),
}

impl Job {
    pub fn new(
        id: JobId,
        user_id: impl Into<String>,
        task_prompt: impl Into<String>,
        policy_profile: PolicyProfile,
        max_runtime_minutes: u32,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id,
            user_id: user_id.into(),
            session_id: None,
            task_prompt: task_prompt.into(),
            description: None,
            worker_id: None,
            policy_profile,
            status: JobStatus::Pending,
            status_message: None,
            steps: Vec::new(),
            result: None,
            artifacts: Vec::new(),
            error_message: None,
            error_code: None,
            created_at_ms: clock.epoch_ms(),
            started_at_ms: None,
            completed_at_ms: None,
            max_runtime_minutes,
            metadata: HashMap::new(),
            tags: Vec::new(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Mark the job `queued`. Idempotent no-op if already past `pending`.
    pub fn mark_queued(&mut self) {
        if self.status == JobStatus::Pending {
            self.status = JobStatus::Queued;
        }
    }

    /// Assign to a worker and transition into `running`.
    pub fn mark_running(
        &mut self,
        worker_id: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), JobTransitionError> {
        if !matches!(self.status, JobStatus::Queued | JobStatus::VmBooting) {
            return Err(JobTransitionError::InvalidStart(self.id, self.status));
        }
        self.worker_id = Some(worker_id.into());
        self.status = JobStatus::Running;
        if self.started_at_ms.is_none() {
            self.started_at_ms = Some(clock.epoch_ms());
        }
        Ok(())
    }

    pub fn mark_vm_booting(&mut self) {
        if self.status == JobStatus::Queued {
            self.status = JobStatus::VmBooting;
        }
    }

    /// Suspend a running job awaiting approval/context.
    pub fn mark_paused(&mut self) {
        if self.status == JobStatus::Running {
            self.status = JobStatus::Paused;
        }
    }

    /// Resume a paused job.
    pub fn mark_resumed(&mut self) -> Result<(), JobTransitionError> {
        if self.status != JobStatus::Paused {
            return Err(JobTransitionError::NotPaused(self.id));
        }
        self.status = JobStatus::Running;
        Ok(())
    }

    fn finish(&mut self, status: JobStatus, clock: &impl Clock) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.status = status;
        self.completed_at_ms = Some(clock.epoch_ms());
        self.worker_id = None;
        true
    }

    /// Idempotent: a second call on an already-terminal job is a no-op.
    pub fn mark_completed(&mut self, result: Option<Value>, clock: &impl Clock) -> bool {
        let applied = self.finish(JobStatus::Completed, clock);
        if applied {
            self.result = result;
        }
        applied
    }

    /// Idempotent: a second call on an already-terminal job is a no-op.
    pub fn mark_failed(
        &mut self,
        error_message: impl Into<String>,
        error_code: Option<String>,
        clock: &impl Clock,
    ) -> bool {
        let message = error_message.into();
        let applied = self.finish(JobStatus::Failed, clock);
        if applied {
            self.error_message = Some(message);
            self.error_code = error_code;
        }
        applied
    }

    /// Idempotent: a second call on an already-terminal job is a no-op.
    pub fn mark_cancelled(&mut self, reason: impl Into<String>, clock: &impl Clock) -> bool {
        let reason = reason.into();
        let applied = self.finish(JobStatus::Cancelled, clock);
        if applied {
            self.status_message = Some(reason);
        }
        applied
    }

    /// Idempotent: a second call on an already-terminal job is a no-op.
    pub fn mark_timeout(&mut self, clock: &impl Clock) -> bool {
        self.finish(JobStatus::Timeout, clock)
    }

    pub fn duration_seconds(&self, clock: &impl Clock) -> Option<u64> {
        let started = self.started_at_ms?;
        let end = self.completed_at_ms.unwrap_or_else(|| clock.epoch_ms());
        Some(end.saturating_sub(started) / 1000)
    }

    pub fn progress_percentage(&self) -> f64 {
        if self.steps.is_empty() {
            return 0.0;
        }
        let completed = self.steps.iter().filter(|s| s.status == StepStatus::Completed).count();
        (completed as f64 / self.steps.len() as f64) * 100.0
    }
}

crate::builder! {
    pub struct JobBuilder => Job {
        into {
            id: JobId = JobId::new(),
            user_id: String = "user-1",
            task_prompt: String = "do the thing",
        }
        set {
            session_id: Option<String> = None,
            description: Option<String> = None,
            worker_id: Option<String> = None,
            policy_profile: PolicyProfile = PolicyProfile::named("default"),
            status: JobStatus = JobStatus::Pending,
            status_message: Option<String> = None,
            steps: Vec<Step> = Vec::new(),
            result: Option<Value> = None,
            artifacts: Vec<Value> = Vec::new(),
            error_message: Option<String> = None,
            error_code: Option<String> = None,
            created_at_ms: u64 = 1_000_000,
            started_at_ms: Option<u64> = None,
            completed_at_ms: Option<u64> = None,
            max_runtime_minutes: u32 = 30,
            metadata: HashMap<String, Value> = HashMap::new(),
            tags: Vec<String> = Vec::new(),
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
