// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the Bridge.

use bridge_core::JobTransitionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("no worker connection with instance_id {0}")]
    NotFound(String),
    #[error("send to worker {0} failed: {1}")]
    SendFailed(String, bridge_wire::ProtocolError),
}

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("job {0} not found")]
    JobNotFound(String),
    #[error("job {0} is not active")]
    NotActive(String),
    #[error(transparent)]
    Transition(#[from] JobTransitionError),
}

#[derive(Debug, Error)]
pub enum GateError {
    #[error("no pending gate with request_id {0}")]
    NotFound(String),
    #[error("pending gate {0} belongs to a job with no connected worker")]
    WorkerGone(String),
}

/// Aggregate error type returned by the Bridge's public API.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
    #[error(transparent)]
    Gate(#[from] GateError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
