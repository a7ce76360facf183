// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::job::JobId;

#[test]
fn event_round_trips_through_json() {
    let event = Event::new(EventType::JobStarted, JobId::new());
    let json = serde_json::to_string(&event).unwrap();
    let back: Event = serde_json::from_str(&json).unwrap();
    assert_eq!(event, back);
}

#[test]
fn unknown_type_deserializes_as_custom() {
    let json = serde_json::json!({
        "type": "something_the_bridge_has_never_seen",
        "job_id": "job-abc",
        "payload": {},
    });
    let event: Event = serde_json::from_value(json).unwrap();
    assert!(event.is_custom());
}

#[test]
fn payload_fields_survive_round_trip() {
    let json = serde_json::json!({
        "type": "log",
        "job_id": "job-abc",
        "payload": {"level": "info", "message": "hi", "extra_field_we_dont_know": 42},
    });
    let event: Event = serde_json::from_value(json.clone()).unwrap();
    let back = serde_json::to_value(&event).unwrap();
    assert_eq!(back["payload"], json["payload"]);
}

#[test]
fn event_type_display_matches_wire_string() {
    assert_eq!(EventType::NeedsApproval.to_string(), "needs_approval");
    assert_eq!(EventType::JobQueued.to_string(), "job_queued");
}
