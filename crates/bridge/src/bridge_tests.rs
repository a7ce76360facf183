use super::*;
use bridge_core::{FakeClock, JobStatus};

fn test_config() -> Config {
    Config {
        heartbeat_interval: Duration::from_secs(30),
        heartbeat_timeout: Duration::from_secs(60),
        approval_timeout: Duration::from_secs(300),
        context_timeout: Duration::from_secs(600),
        reaper_interval: Duration::from_secs(30),
        subscriber_buffer: 8,
        worker_bind: "127.0.0.1:0".into(),
        client_bind: "127.0.0.1:0".into(),
    }
}

fn test_bridge() -> Bridge<FakeClock> {
    Bridge::with_clock(test_config(), FakeClock::new(), Arc::new(NullSink))
}

#[test]
fn submit_job_queues_when_no_worker_is_connected() {
    let bridge = test_bridge();
    let id = bridge.submit_job("user-1", "do a thing", PolicyProfile::named("default"), 30, None);
    assert_eq!(bridge.job(&id).unwrap().status, JobStatus::Queued);
}

#[test]
fn connect_worker_dispatches_queued_jobs() {
    let bridge = test_bridge();
    let id = bridge.submit_job("user-1", "do a thing", PolicyProfile::named("default"), 30, None);

    let (_rx, evicted) = bridge.connect_worker(WorkerId::new("vm-1"), "user-1".into());
    assert!(evicted.is_none());
    assert_eq!(bridge.job(&id).unwrap().status, JobStatus::Running);
}

#[test]
fn reconnecting_same_instance_id_evicts_and_fails_its_job() {
    let bridge = test_bridge();
    let id = bridge.submit_job("user-1", "do a thing", PolicyProfile::named("default"), 30, None);
    bridge.connect_worker(WorkerId::new("vm-1"), "user-1".into());
    assert_eq!(bridge.job(&id).unwrap().status, JobStatus::Running);

    let (_rx, evicted) = bridge.connect_worker(WorkerId::new("vm-1"), "user-1".into());
    assert_eq!(evicted, Some(id));
    assert_eq!(bridge.job(&id).unwrap().status, JobStatus::Failed);
}

#[test]
fn cancel_job_marks_cancelled() {
    let bridge = test_bridge();
    let id = bridge.submit_job("user-1", "do a thing", PolicyProfile::named("default"), 30, None);
    bridge.cancel_job(id, "nevermind").unwrap();
    assert_eq!(bridge.job(&id).unwrap().status, JobStatus::Cancelled);
}

#[test]
fn approval_response_to_unknown_request_is_an_error() {
    let bridge = test_bridge();
    assert!(bridge.respond_to_approval("missing", true, None).is_err());
}

#[test]
fn disconnect_worker_fails_its_running_job() {
    let bridge = test_bridge();
    let id = bridge.submit_job("user-1", "do a thing", PolicyProfile::named("default"), 30, None);
    bridge.connect_worker(WorkerId::new("vm-1"), "user-1".into());

    bridge.disconnect_worker(&WorkerId::new("vm-1"));
    assert_eq!(bridge.job(&id).unwrap().status, JobStatus::Failed);
}

#[test]
fn registered_token_verifies_to_the_minted_instance_id() {
    let bridge = test_bridge();
    let (instance_id, token) = bridge.register_worker("user-1".into());
    let (verified_id, verified_user) = bridge.verify_token(&token).unwrap();
    assert_eq!(verified_id, instance_id);
    assert_eq!(verified_user, "user-1");
}

#[test]
fn unregister_worker_invalidates_its_tokens() {
    let bridge = test_bridge();
    let (_instance_id, token) = bridge.register_worker("user-1".into());
    let (instance_id, _) = bridge.verify_token(&token).unwrap();

    bridge.unregister_worker(&instance_id);
    assert!(bridge.verify_token(&token).is_none());
}

#[tokio::test]
async fn subscribe_then_broadcast_delivers_frame() {
    let bridge = test_bridge();
    let id = bridge.submit_job("user-1", "do a thing", PolicyProfile::named("default"), 30, None);
    let (_sub_id, mut rx) = bridge.subscribe(id).unwrap();

    bridge.registry.lock().broadcast(id, ClientOutbound::Pong);
    let frame = rx.recv().await.unwrap();
    assert!(matches!(frame, ClientOutbound::Pong));
}

/// Many workers connecting and many jobs submitting concurrently must never
/// leave the worker<->job reverse index inconsistent (§8 invariants), even
/// though every one of these calls takes the same coarse registry lock.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submits_and_connects_preserve_the_reverse_index_invariant() {
    let bridge = Arc::new(test_bridge());

    let connects = (0..8).map(|i| {
        let bridge = Arc::clone(&bridge);
        tokio::spawn(async move {
            bridge.connect_worker(WorkerId::new(format!("vm-{i}")), "user-1".into());
        })
    });
    let submits = (0..8).map(|i| {
        let bridge = Arc::clone(&bridge);
        tokio::spawn(async move {
            bridge.submit_job("user-1", format!("job {i}"), PolicyProfile::named("default"), 30, None);
        })
    });

    for handle in connects.chain(submits) {
        handle.await.unwrap();
    }

    for job in bridge.jobs() {
        if job.status == JobStatus::Running {
            let worker_id = WorkerId::new(job.worker_id.clone().unwrap());
            assert_eq!(bridge.registry.lock().job_for_worker(&worker_id).unwrap().id, job.id);
        }
    }
    for worker in bridge.workers() {
        if let Some(job_id) = &worker.current_job_id {
            assert_eq!(bridge.job(&JobId::from_string(job_id)).unwrap().worker_id.as_deref(), Some(worker.instance_id.as_str()));
        }
    }
}
