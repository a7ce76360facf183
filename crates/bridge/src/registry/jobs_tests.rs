use super::super::Registry;
use bridge_core::{JobBuilder, JobId, JobStatus, WorkerId};

#[test]
fn inserted_job_is_retrievable() {
    let mut reg = Registry::new();
    let job = JobBuilder::default().build();
    let id = job.id;
    reg.insert_job(job);
    assert_eq!(reg.job(&id).unwrap().id, id);
}

#[test]
fn assigning_a_worker_makes_job_for_worker_resolve() {
    let mut reg = Registry::new();
    let job = JobBuilder::default().build();
    let id = job.id;
    reg.insert_job(job);

    let worker = WorkerId::new("vm-1");
    reg.assign_worker(worker.clone(), id);
    assert_eq!(reg.job_for_worker(&worker).unwrap().id, id);

    reg.release_worker(&worker);
    assert!(reg.job_for_worker(&worker).is_none());
}

#[test]
fn queued_job_ids_only_returns_queued_status() {
    let mut reg = Registry::new();
    let queued = JobBuilder::default().status(JobStatus::Queued).build();
    let running = JobBuilder::default().status(JobStatus::Running).build();
    let queued_id = queued.id;
    reg.insert_job(queued);
    reg.insert_job(running);

    assert_eq!(reg.queued_job_ids(), vec![queued_id]);
}

#[test]
fn job_mut_allows_in_place_transition() {
    let mut reg = Registry::new();
    let job = JobBuilder::default().build();
    let id: JobId = job.id;
    reg.insert_job(job);

    reg.job_mut(&id).unwrap().mark_queued();
    assert_eq!(reg.job(&id).unwrap().status, JobStatus::Queued);
}
