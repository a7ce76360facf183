// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn worker_id_hash_map_lookup() {
    let mut map = std::collections::HashMap::new();
    map.insert(WorkerId::new("vm-1"), 1);
    assert_eq!(map.get("vm-1"), Some(&1));
}

#[test]
fn fresh_connection_is_idle_and_alive() {
    let info = WorkerInfo::new(WorkerId::new("vm-1"), "user-1", 1000);
    assert!(info.is_idle());
    assert!(info.is_alive(1000, 60_000));
}

#[test]
fn busy_connection_is_not_idle() {
    let mut info = WorkerInfo::new(WorkerId::new("vm-1"), "user-1", 1000);
    info.status = ConnectionStatus::Busy;
    info.current_job_id = Some("job-1".to_string());
    assert!(!info.is_idle());
}

#[test]
fn heartbeat_timeout_marks_connection_dead() {
    let info = WorkerInfo::new(WorkerId::new("vm-1"), "user-1", 1000);
    assert!(!info.is_alive(1000 + 60_001, 60_000));
    assert!(info.is_alive(1000 + 59_999, 60_000));
}

#[test]
fn offline_status_is_never_alive_regardless_of_heartbeat() {
    let mut info = WorkerInfo::new(WorkerId::new("vm-1"), "user-1", 1000);
    info.status = ConnectionStatus::Offline;
    assert!(!info.is_alive(1000, 60_000));
}
