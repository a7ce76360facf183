// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Frames exchanged on the client subscription channel (job event stream).

use crate::dto::JobDetail;
use bridge_core::Event;
use serde::{Deserialize, Serialize};

/// Frames a client sends on its subscription channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientInbound {
    Ping,
    #[serde(other)]
    Unknown,
}

/// Frames the Bridge sends on a client subscription channel.
///
/// `InitialState` is always the first frame after a successful subscribe,
/// so a client never observes an `Event` before it has seen the job as it
/// stood at subscription time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientOutbound {
    Pong,
    InitialState { job: Box<JobDetail> },
    Event { event: Event },
}

#[cfg(test)]
#[path = "client_frame_tests.rs"]
mod tests;
