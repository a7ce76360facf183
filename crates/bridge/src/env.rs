// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the bridge crate.

use std::time::Duration;

fn duration_ms(var: &str, default: Duration) -> Duration {
    std::env::var(var).ok().and_then(|s| s.parse::<u64>().ok()).map(Duration::from_millis).unwrap_or(default)
}

/// Frequency of `ping` frames sent to each worker connection.
pub fn heartbeat_interval() -> Duration {
    duration_ms("BRIDGE_HEARTBEAT_INTERVAL_MS", Duration::from_secs(30))
}

/// Deadline after which a worker with no heartbeat is considered dead.
pub fn heartbeat_timeout() -> Duration {
    duration_ms("BRIDGE_HEARTBEAT_TIMEOUT_MS", Duration::from_secs(60))
}

/// Timeout after which an unanswered approval gate resolves implicitly.
pub fn approval_timeout() -> Duration {
    duration_ms("BRIDGE_APPROVAL_TIMEOUT_MS", Duration::from_secs(300))
}

/// Timeout after which an unanswered context gate resolves implicitly.
pub fn context_timeout() -> Duration {
    duration_ms("BRIDGE_CONTEXT_TIMEOUT_MS", Duration::from_secs(600))
}

/// How often the liveness reaper scans worker connections.
pub fn reaper_interval() -> Duration {
    duration_ms("BRIDGE_REAPER_INTERVAL_MS", Duration::from_secs(30))
}

/// Per-subscriber bounded buffer size before it's deemed dead.
pub fn subscriber_buffer() -> usize {
    std::env::var("BRIDGE_SUBSCRIBER_BUFFER").ok().and_then(|s| s.parse::<usize>().ok()).unwrap_or(32)
}

/// Address the worker phone-home listener binds.
pub fn worker_bind() -> String {
    std::env::var("BRIDGE_WORKER_BIND").unwrap_or_else(|_| "0.0.0.0:7420".to_string())
}

/// Address the client HTTP façade binds.
pub fn client_bind() -> String {
    std::env::var("BRIDGE_CLIENT_BIND").unwrap_or_else(|_| "0.0.0.0:7421".to_string())
}
