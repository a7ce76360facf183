// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job map + worker->job reverse index.

use super::Registry;
use bridge_core::{Job, JobId, WorkerId};

impl Registry {
    pub fn insert_job(&mut self, job: Job) {
        self.jobs.insert(job.id, job);
    }

    pub fn job_mut(&mut self, id: &JobId) -> Option<&mut Job> {
        self.jobs.get_mut(id)
    }

    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values()
    }

    /// Job currently assigned to `worker`, if any.
    pub fn job_for_worker(&self, worker: &WorkerId) -> Option<&Job> {
        self.by_worker.get(worker).and_then(|id| self.jobs.get(id))
    }

    /// Record that `job` is now running on `worker` in the reverse index.
    pub fn assign_worker(&mut self, worker: WorkerId, job: JobId) {
        self.by_worker.insert(worker, job);
    }

    /// Drop the reverse-index entry for `worker`, if any.
    pub fn release_worker(&mut self, worker: &WorkerId) {
        self.by_worker.remove(worker);
    }

    /// Every job that is still pending/queued (has never been assigned a worker).
    pub fn queued_job_ids(&self) -> Vec<JobId> {
        self.jobs
            .values()
            .filter(|j| matches!(j.status, bridge_core::JobStatus::Queued))
            .map(|j| j.id)
            .collect()
    }
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
