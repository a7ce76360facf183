// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn auth_frame_round_trips() {
    let frame = WorkerInbound::Auth { token: "tok".to_string(), user_id: "u1".to_string() };
    let json = serde_json::to_value(&frame).unwrap();
    assert_eq!(json["type"], "auth");
    let back: WorkerInbound = serde_json::from_value(json).unwrap();
    match back {
        WorkerInbound::Auth { token, user_id } => {
            assert_eq!(token, "tok");
            assert_eq!(user_id, "u1");
        }
        other => panic!("unexpected variant: {other:?}"),
    }
}

#[test]
fn unrecognized_type_becomes_unknown() {
    let json = serde_json::json!({"type": "something_new"});
    let frame: WorkerInbound = serde_json::from_value(json).unwrap();
    assert!(matches!(frame, WorkerInbound::Unknown));
}

#[test]
fn task_start_round_trips_with_policy() {
    let frame = WorkerOutbound::TaskStart {
        task_id: "job-1".to_string(),
        prompt: "do it".to_string(),
        policy: PolicyProfile::named("default"),
        max_runtime_minutes: 30,
        steps: vec![],
    };
    let json = serde_json::to_string(&frame).unwrap();
    let back: WorkerOutbound = serde_json::from_str(&json).unwrap();
    match back {
        WorkerOutbound::TaskStart { task_id, .. } => assert_eq!(task_id, "job-1"),
        other => panic!("unexpected variant: {other:?}"),
    }
}
