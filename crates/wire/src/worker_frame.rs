// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Frames exchanged on the worker phone-home channel.

use bridge_core::{Event, PolicyProfile, Step};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Frames a worker sends to the Bridge.
///
/// Dispatch table: `pong` refreshes liveness, `event` is forwarded to
/// subscribers, `task_complete`/`task_failed` terminate the job,
/// `needs_approval`/`needs_context` register a pending gate. Anything
/// else is dropped with a warning by the Protocol Handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkerInbound {
    Auth { token: String, user_id: String },
    Pong,
    Event { event: Event },
    TaskComplete { task_id: String, result: Option<Value>, #[serde(default)] artifacts: Vec<Value> },
    TaskFailed { task_id: String, error_message: String, #[serde(default)] error_code: Option<String> },
    NeedsApproval { task_id: String, request_id: String, description: String, #[serde(default)] risk_level: Option<String> },
    NeedsContext { task_id: String, request_id: String, prompt: String },
    #[serde(other)]
    Unknown,
}

/// Frames the Bridge sends to a worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkerOutbound {
    Ping,
    Connected { instance_id: String },
    TaskStart {
        task_id: String,
        prompt: String,
        policy: PolicyProfile,
        max_runtime_minutes: u32,
        #[serde(default)]
        steps: Vec<Step>,
    },
    TaskCancel { task_id: String, reason: String },
    ApprovalResponse { request_id: String, approved: bool, #[serde(default)] reason: Option<String> },
    ContextResponse { request_id: String, response: String, #[serde(default)] attachments: Vec<Value> },
}

#[cfg(test)]
#[path = "worker_frame_tests.rs"]
mod tests;
