// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::event::{Event, EventType};
use crate::job::JobId;
use crate::policy::PolicyProfile;

/// Proptest strategies for core state machine types.
pub mod strategies {
    use crate::event::EventType;
    use crate::job::JobStatus;
    use proptest::prelude::*;

    pub fn arb_job_status() -> impl Strategy<Value = JobStatus> {
        prop_oneof![
            Just(JobStatus::Pending),
            Just(JobStatus::Queued),
            Just(JobStatus::VmBooting),
            Just(JobStatus::Running),
            Just(JobStatus::Paused),
            Just(JobStatus::Completed),
            Just(JobStatus::Failed),
            Just(JobStatus::Cancelled),
            Just(JobStatus::Timeout),
        ]
    }

    pub fn arb_event_type() -> impl Strategy<Value = EventType> {
        prop_oneof![
            Just(EventType::JobQueued),
            Just(EventType::JobStarted),
            Just(EventType::JobCompleted),
            Just(EventType::JobCancelled),
            Just(EventType::JobFailed),
            Just(EventType::Log),
            Just(EventType::Stdout),
            Just(EventType::NeedsApproval),
            Just(EventType::NeedsContext),
        ]
    }
}

pub fn job_queued_event(id: &str) -> Event {
    Event::new(EventType::JobQueued, JobId::from_string(id))
}

pub fn job_failed_event(id: &str) -> Event {
    Event::new(EventType::JobFailed, JobId::from_string(id))
}

pub fn test_policy() -> PolicyProfile {
    PolicyProfile::named("default")
}
