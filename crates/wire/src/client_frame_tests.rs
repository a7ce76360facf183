// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use bridge_core::{Event, EventType, JobId};

#[test]
fn ping_round_trips() {
    let json = serde_json::to_value(ClientInbound::Ping).unwrap();
    assert_eq!(json["type"], "ping");
    let back: ClientInbound = serde_json::from_value(json).unwrap();
    assert!(matches!(back, ClientInbound::Ping));
}

#[test]
fn event_frame_carries_event() {
    let frame = ClientOutbound::Event { event: Event::new(EventType::JobStarted, JobId::new()) };
    let json = serde_json::to_value(&frame).unwrap();
    assert_eq!(json["type"], "event");
    assert_eq!(json["event"]["type"], "job_started");
}
