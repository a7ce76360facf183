use super::Registry;
use bridge_core::JobBuilder;

#[test]
fn new_registry_is_empty() {
    let reg = Registry::new();
    assert_eq!(reg.jobs().count(), 0);
    assert_eq!(reg.connections().count(), 0);
}

#[test]
fn worker_info_is_none_for_unknown_worker() {
    let reg = Registry::new();
    assert!(reg.worker_info(&bridge_core::WorkerId::new("nobody")).is_none());
}

#[test]
fn job_lookup_matches_inserted_job() {
    let mut reg = Registry::new();
    let job = JobBuilder::default().build();
    let id = job.id;
    reg.insert_job(job);
    assert_eq!(reg.job(&id).unwrap().id, id);
}
