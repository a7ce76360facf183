use super::super::Registry;
use super::GateKind;
use bridge_core::JobId;

#[test]
fn open_then_take_gate_round_trips() {
    let mut reg = Registry::new();
    let job_id = JobId::new();
    reg.open_gate("req-1", job_id, GateKind::Approval, 1_000, 300_000);

    let gate = reg.gate("req-1").unwrap();
    assert_eq!(gate.job_id, job_id);
    assert_eq!(gate.kind, GateKind::Approval);

    let taken = reg.take_gate("req-1").unwrap();
    assert_eq!(taken.job_id, job_id);
    assert!(reg.gate("req-1").is_none());
}

#[test]
fn take_gate_on_unknown_request_id_is_none() {
    let mut reg = Registry::new();
    assert!(reg.take_gate("missing").is_none());
}

#[test]
fn expired_gates_only_lists_lapsed_deadlines() {
    let mut reg = Registry::new();
    let job_id = JobId::new();
    reg.open_gate("fresh", job_id, GateKind::Context, 1_000, 300_000);
    reg.open_gate("stale", job_id, GateKind::Context, 1_000, 100);

    let expired = reg.expired_gates(1_500);
    assert_eq!(expired, vec!["stale".to_string()]);
}

#[test]
fn gates_for_job_finds_all_open_requests_for_that_job() {
    let mut reg = Registry::new();
    let job_id = JobId::new();
    let other_job = JobId::new();
    reg.open_gate("a", job_id, GateKind::Approval, 0, 1_000);
    reg.open_gate("b", job_id, GateKind::Context, 0, 1_000);
    reg.open_gate("c", other_job, GateKind::Approval, 0, 1_000);

    let mut ids = reg.gates_for_job(job_id);
    ids.sort();
    assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
}
