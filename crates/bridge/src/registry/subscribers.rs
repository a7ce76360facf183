// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client subscribers to a job's event stream.
//!
//! Each subscriber holds a bounded channel; a slow or gone client is
//! dropped on next broadcast rather than allowed to back-pressure the
//! whole event fan-out (§4.4).

use super::Registry;
use bridge_core::JobId;
use bridge_wire::ClientOutbound;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

pub struct Subscriber {
    pub sender: mpsc::Sender<ClientOutbound>,
}

impl Registry {
    pub fn subscribe(&mut self, job_id: JobId, buffer: usize) -> (SubscriberId, mpsc::Receiver<ClientOutbound>) {
        let id = SubscriberId(self.next_subscriber_id);
        self.next_subscriber_id += 1;

        let (tx, rx) = mpsc::channel(buffer);
        self.subscribers.entry(job_id).or_default().insert(id, Subscriber { sender: tx });
        (id, rx)
    }

    pub fn unsubscribe(&mut self, job_id: JobId, id: SubscriberId) {
        if let Some(subs) = self.subscribers.get_mut(&job_id) {
            subs.remove(&id);
            if subs.is_empty() {
                self.subscribers.remove(&job_id);
            }
        }
    }

    /// Best-effort fan-out to every subscriber of `job_id`. Subscribers
    /// whose channel is full or closed are dropped rather than awaited.
    pub fn broadcast(&mut self, job_id: JobId, frame: ClientOutbound) {
        let Some(subs) = self.subscribers.get_mut(&job_id) else { return };
        subs.retain(|_, sub| sub.sender.try_send(frame.clone()).is_ok());
        if subs.is_empty() {
            self.subscribers.remove(&job_id);
        }
    }

    pub fn subscriber_count(&self, job_id: JobId) -> usize {
        self.subscribers.get(&job_id).map(|s| s.len()).unwrap_or(0)
    }
}

#[cfg(test)]
#[path = "subscribers_tests.rs"]
mod tests;
