// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! REST-facing data transfer objects for the thin client HTTP façade.

use bridge_core::{ConnectionStatus, Job, JobStatus, PolicyProfile, Step, WorkerInfo};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// `POST /jobs` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitJobRequest {
    pub user_id: String,
    #[serde(default)]
    pub session_id: Option<String>,
    pub task_prompt: String,
    #[serde(default)]
    pub policy_profile: Option<String>,
    #[serde(default)]
    pub max_runtime_minutes: Option<u32>,
    #[serde(default)]
    pub preferred_worker: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// `POST /jobs/:id/cancel` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelJobRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

/// `POST /jobs/:id/approve` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalResponseRequest {
    pub request_id: String,
    pub approved: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

/// `POST /jobs/:id/context` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextResponseRequest {
    pub request_id: String,
    pub response: String,
    #[serde(default)]
    pub attachments: Vec<Value>,
}

/// `POST /workers` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterWorkerRequest {
    pub user_id: String,
}

/// `POST /workers` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterWorkerResponse {
    pub instance_id: String,
    pub auth_token: String,
}

/// Condensed job view for list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: String,
    pub user_id: String,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<String>,
    pub progress_percentage: f64,
    pub created_at_ms: u64,
}

impl From<&Job> for JobSummary {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id.to_string(),
            user_id: job.user_id.clone(),
            status: job.status,
            worker_id: job.worker_id.clone(),
            progress_percentage: job.progress_percentage(),
            created_at_ms: job.created_at_ms,
        }
    }
}

/// Full job view for `GET /jobs/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDetail {
    pub id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub task_prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<String>,
    pub policy_profile: PolicyProfile,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    pub steps: Vec<Step>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    pub artifacts: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    pub created_at_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at_ms: Option<u64>,
    pub max_runtime_minutes: u32,
    pub progress_percentage: f64,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl From<&Job> for JobDetail {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id.to_string(),
            user_id: job.user_id.clone(),
            session_id: job.session_id.clone(),
            task_prompt: job.task_prompt.clone(),
            description: job.description.clone(),
            worker_id: job.worker_id.clone(),
            policy_profile: job.policy_profile.clone(),
            status: job.status,
            status_message: job.status_message.clone(),
            steps: job.steps.clone(),
            result: job.result.clone(),
            artifacts: job.artifacts.clone(),
            error_message: job.error_message.clone(),
            error_code: job.error_code.clone(),
            created_at_ms: job.created_at_ms,
            started_at_ms: job.started_at_ms,
            completed_at_ms: job.completed_at_ms,
            max_runtime_minutes: job.max_runtime_minutes,
            progress_percentage: job.progress_percentage(),
            metadata: job.metadata.clone(),
            tags: job.tags.clone(),
        }
    }
}

/// Worker view for `GET /workers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerSummary {
    pub instance_id: String,
    pub user_id: String,
    pub status: ConnectionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_job_id: Option<String>,
    pub connected_at_ms: u64,
    pub last_heartbeat_ms: u64,
}

impl From<&WorkerInfo> for WorkerSummary {
    fn from(info: &WorkerInfo) -> Self {
        Self {
            instance_id: info.instance_id.to_string(),
            user_id: info.user_id.clone(),
            status: info.status,
            current_job_id: info.current_job_id.clone(),
            connected_at_ms: info.connected_at_ms,
            last_heartbeat_ms: info.last_heartbeat_ms,
        }
    }
}

#[cfg(test)]
#[path = "dto_tests.rs"]
mod tests;
