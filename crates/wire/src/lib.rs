// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire protocol for the Bridge: worker phone-home frames, client
//! subscription frames, and REST DTOs.
//!
//! Wire format for both framed channels: 4-byte length prefix (big-endian)
//! + JSON payload.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client_frame;
mod codec;
mod dto;
mod worker_frame;

pub use client_frame::{ClientInbound, ClientOutbound};
pub use codec::{decode, encode, read_frame_bytes, read_message, write_message, ProtocolError, MAX_FRAME_BYTES};
pub use dto::{
    ApprovalResponseRequest, CancelJobRequest, ContextResponseRequest, JobDetail, JobSummary,
    RegisterWorkerRequest, RegisterWorkerResponse, SubmitJobRequest, WorkerSummary,
};
pub use worker_frame::{WorkerInbound, WorkerOutbound};
