// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event envelope and type taxonomy.
//!
//! Every event that flows through the Bridge — job lifecycle, VM lifecycle,
//! task step progress, worker output, approval/context gates — is wrapped in
//! the same envelope: `{ type, job_id, timestamp, payload }`. `payload` stays
//! an opaque JSON object: the Bridge only ever inspects envelope fields, and
//! round-trips whatever shape the worker put in there.

use crate::job::JobId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Closed set of recognized event types.
///
/// `Custom` is the forward-compatibility catch-all: a `type` string the
/// Bridge doesn't recognize deserializes here rather than failing the frame.
/// The Protocol Handler drops `Custom` events with a warning instead of
/// broadcasting them (see [`Event::is_custom`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    // Job lifecycle
    JobQueued,
    JobStarted,
    JobCompleted,
    JobCancelled,
    JobFailed,

    // VM lifecycle
    VmBooting,
    VmReady,
    VmError,
    VmShutdown,

    // Task execution
    TaskStarted,
    TaskStepStarted,
    TaskStepCompleted,
    TaskStepFailed,

    // Output and logging
    Log,
    Stdout,
    Stderr,

    // Visual feedback
    ScreenshotCaptured,
    VideoFrame,

    // Tool interactions
    ToolCalled,
    ToolCompleted,
    ToolError,

    // Approval gates
    NeedsApproval,
    ApprovalGranted,
    ApprovalDenied,

    // Context requests
    NeedsContext,
    ContextProvided,

    /// Unrecognized type string; preserved so callers can log it, never broadcast.
    #[serde(other)]
    Custom,
}

crate::simple_display! {
    EventType {
        JobQueued => "job_queued",
        JobStarted => "job_started",
        JobCompleted => "job_completed",
        JobCancelled => "job_cancelled",
        JobFailed => "job_failed",
        VmBooting => "vm_booting",
        VmReady => "vm_ready",
        VmError => "vm_error",
        VmShutdown => "vm_shutdown",
        TaskStarted => "task_started",
        TaskStepStarted => "task_step_started",
        TaskStepCompleted => "task_step_completed",
        TaskStepFailed => "task_step_failed",
        Log => "log",
        Stdout => "stdout",
        Stderr => "stderr",
        ScreenshotCaptured => "screenshot_captured",
        VideoFrame => "video_frame",
        ToolCalled => "tool_called",
        ToolCompleted => "tool_completed",
        ToolError => "tool_error",
        NeedsApproval => "needs_approval",
        ApprovalGranted => "approval_granted",
        ApprovalDenied => "approval_denied",
        NeedsContext => "needs_context",
        ContextProvided => "context_provided",
        Custom => "custom",
    }
}

/// An event in a job's ordered stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: EventType,
    pub job_id: JobId,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub payload: Value,
}

impl Event {
    pub fn new(kind: EventType, job_id: JobId) -> Self {
        Self { kind, job_id, timestamp: Utc::now(), payload: json!({}) }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn is_custom(&self) -> bool {
        matches!(self.kind, EventType::Custom)
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Event {
    /// Construct an event with an explicit timestamp (for deterministic tests).
    pub fn at(kind: EventType, job_id: JobId, timestamp: DateTime<Utc>) -> Self {
        Self { kind, job_id, timestamp, payload: json!({}) }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
