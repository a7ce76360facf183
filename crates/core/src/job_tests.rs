// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::clock::FakeClock;

fn new_job(clock: &FakeClock) -> Job {
    Job::new(JobId::new(), "user-1", "do the thing", PolicyProfile::named("default"), 30, clock)
}

#[test]
fn new_job_starts_pending() {
    let clock = FakeClock::new();
    let job = new_job(&clock);
    assert_eq!(job.status, JobStatus::Pending);
    assert!(!job.is_terminal());
    assert!(!job.is_active());
}

#[test]
fn mark_queued_is_idempotent() {
    let clock = FakeClock::new();
    let mut job = new_job(&clock);
    job.mark_queued();
    job.mark_queued();
    assert_eq!(job.status, JobStatus::Queued);
}

#[test]
fn mark_running_sets_started_at_once() {
    let clock = FakeClock::new();
    let mut job = new_job(&clock);
    job.mark_queued();
    job.mark_running("worker-1", &clock).unwrap();
    let first_start = job.started_at_ms;
    assert_eq!(job.worker_id.as_deref(), Some("worker-1"));
    assert_eq!(job.status, JobStatus::Running);

    clock.advance(std::time::Duration::from_secs(5));
    // started_at must not move on a hypothetical re-entry to running via pause/resume
    job.mark_paused();
    job.mark_resumed().unwrap();
    assert_eq!(job.started_at_ms, first_start);
}

#[test]
fn mark_running_rejects_invalid_source_state() {
    let clock = FakeClock::new();
    let mut job = new_job(&clock);
    assert!(job.mark_running("worker-1", &clock).is_err());
}

#[test]
fn terminal_transition_is_idempotent() {
    let clock = FakeClock::new();
    let mut job = new_job(&clock);
    job.mark_queued();
    job.mark_running("worker-1", &clock).unwrap();

    assert!(job.mark_completed(None, &clock));
    let completed_at = job.completed_at_ms;
    assert!(job.worker_id.is_none());

    clock.advance(std::time::Duration::from_secs(10));
    assert!(!job.mark_completed(None, &clock));
    assert!(!job.mark_failed("late failure", None, &clock));
    assert_eq!(job.completed_at_ms, completed_at);
}

#[test]
fn cannot_transition_out_of_terminal_state() {
    let clock = FakeClock::new();
    let mut job = new_job(&clock);
    job.mark_queued();
    job.mark_running("worker-1", &clock).unwrap();
    job.mark_cancelled("user requested", &clock);
    assert!(job.is_terminal());
    assert!(!job.mark_timeout(&clock));
}

#[test]
fn progress_percentage_tracks_completed_steps() {
    let clock = FakeClock::new();
    let mut job = new_job(&clock);
    job.steps = vec![Step::pending("a"), Step::pending("b")];
    job.steps[0].status = StepStatus::Completed;
    assert_eq!(job.progress_percentage(), 50.0);
}

#[test]
fn progress_percentage_is_zero_with_no_steps() {
    let clock = FakeClock::new();
    let job = new_job(&clock);
    assert_eq!(job.progress_percentage(), 0.0);
}

#[yare::parameterized(
    completed = { JobStatus::Completed },
    failed = { JobStatus::Failed },
    cancelled = { JobStatus::Cancelled },
    timeout = { JobStatus::Timeout },
)]
fn every_terminal_status_rejects_every_further_transition(terminal: JobStatus) {
    let clock = FakeClock::new();
    let mut job = new_job(&clock);
    job.status = terminal;

    assert!(job.mark_running("worker-1", &clock).is_err());
    assert!(!job.mark_completed(None, &clock));
    assert!(!job.mark_failed("late", None, &clock));
    assert!(!job.mark_cancelled("late", &clock));
    assert!(!job.mark_timeout(&clock));
    assert_eq!(job.status, terminal);
}
