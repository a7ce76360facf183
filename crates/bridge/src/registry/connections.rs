// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker connection table.

use super::Registry;
use bridge_core::{ConnectionStatus, WorkerId, WorkerInfo};
use bridge_wire::WorkerOutbound;
use tokio::sync::mpsc;

/// A live worker connection: its metadata plus the sending half of its
/// outbound frame channel. The receive loop owns the socket itself; this
/// handle is how the rest of the Bridge talks back to it.
pub struct ConnectionHandle {
    pub info: WorkerInfo,
    pub sender: mpsc::UnboundedSender<WorkerOutbound>,
}

/// Outcome of admitting a new connection: whether an existing connection
/// with the same `instance_id` had to be evicted first.
pub struct Accepted {
    pub evicted_job: Option<bridge_core::JobId>,
}

impl Registry {
    /// Admit a new connection, evicting any existing connection for the
    /// same `instance_id` first (duplicate-id policy, §4.3). Returns the
    /// job that was running on the evicted connection, if any, so the
    /// caller can fail it.
    pub fn accept_connection(
        &mut self,
        instance_id: WorkerId,
        user_id: String,
        now_ms: u64,
        sender: mpsc::UnboundedSender<WorkerOutbound>,
    ) -> Accepted {
        let evicted_job = self.by_worker.get(&instance_id).copied();
        self.connections.remove(&instance_id);

        let info = WorkerInfo::new(instance_id.clone(), user_id, now_ms);
        self.connections.insert(instance_id, ConnectionHandle { info, sender });
        Accepted { evicted_job }
    }

    pub fn remove_connection(&mut self, instance_id: &WorkerId) -> Option<ConnectionHandle> {
        self.by_worker.remove(instance_id);
        self.connections.remove(instance_id)
    }

    pub fn touch_heartbeat(&mut self, instance_id: &WorkerId, now_ms: u64) {
        if let Some(conn) = self.connections.get_mut(instance_id) {
            conn.info.last_heartbeat_ms = now_ms;
        }
    }

    pub fn set_status(&mut self, instance_id: &WorkerId, status: ConnectionStatus) {
        if let Some(conn) = self.connections.get_mut(instance_id) {
            conn.info.status = status;
        }
    }

    pub fn set_current_job(&mut self, instance_id: &WorkerId, job_id: Option<String>) {
        if let Some(conn) = self.connections.get_mut(instance_id) {
            conn.info.current_job_id = job_id;
        }
    }

    /// First idle, connected worker in iteration order (§4.5: first-match,
    /// no fairness guarantee).
    pub fn find_idle_worker(&self) -> Option<WorkerId> {
        self.connections.values().find(|c| c.info.is_idle()).map(|c| c.info.instance_id.clone())
    }

    pub fn send_to_worker(
        &self,
        instance_id: &WorkerId,
        frame: WorkerOutbound,
    ) -> Result<(), crate::error::ConnectionError> {
        let conn = self
            .connections
            .get(instance_id)
            .ok_or_else(|| crate::error::ConnectionError::NotFound(instance_id.to_string()))?;
        conn.sender.send(frame).map_err(|_| {
            crate::error::ConnectionError::SendFailed(
                instance_id.to_string(),
                bridge_wire::ProtocolError::ConnectionClosed,
            )
        })
    }

    pub fn connections(&self) -> impl Iterator<Item = &WorkerInfo> {
        self.connections.values().map(|c| &c.info)
    }

    /// Connections whose heartbeat has lapsed the liveness timeout.
    pub fn dead_connections(&self, now_ms: u64, timeout_ms: u64) -> Vec<WorkerId> {
        self.connections
            .values()
            .filter(|c| !c.info.is_alive(now_ms, timeout_ms))
            .map(|c| c.info.instance_id.clone())
            .collect()
    }
}

#[cfg(test)]
#[path = "connections_tests.rs"]
mod tests;
