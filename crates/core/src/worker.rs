// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker identity and connection metadata.
//!
//! `WorkerId` wraps the `instance_id` a VM worker presents on connect — it
//! is chosen by the worker, not generated here, so it's a plain string
//! newtype rather than a [`crate::define_id!`] type.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkerId(pub String);

impl WorkerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WorkerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for WorkerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for WorkerId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for WorkerId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Borrow<str> for WorkerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Liveness/occupancy status of a worker connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Online,
    Busy,
    Offline,
}

crate::simple_display! {
    ConnectionStatus {
        Online => "online",
        Busy => "busy",
        Offline => "offline",
    }
}

/// Metadata describing a connected worker. Pure data — the live socket
/// handle is held separately by the connection registry so this type stays
/// cheap to snapshot for status queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerInfo {
    pub instance_id: WorkerId,
    pub user_id: String,
    pub connected_at_ms: u64,
    pub last_heartbeat_ms: u64,
    pub status: ConnectionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_job_id: Option<String>,
}

impl WorkerInfo {
    pub fn new(instance_id: WorkerId, user_id: impl Into<String>, now_ms: u64) -> Self {
        Self {
            instance_id,
            user_id: user_id.into(),
            connected_at_ms: now_ms,
            last_heartbeat_ms: now_ms,
            status: ConnectionStatus::Online,
            current_job_id: None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.status == ConnectionStatus::Online && self.current_job_id.is_none()
    }

    /// Alive iff online-or-busy and the heartbeat hasn't lapsed `timeout_ms`.
    pub fn is_alive(&self, now_ms: u64, timeout_ms: u64) -> bool {
        self.status != ConnectionStatus::Offline
            && now_ms.saturating_sub(self.last_heartbeat_ms) < timeout_ms
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
