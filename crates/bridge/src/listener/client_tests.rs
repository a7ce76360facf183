use super::*;
use crate::bridge::Config;
use crate::persist::NullSink;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use bridge_core::FakeClock;
use std::time::Duration;
use tower::ServiceExt;

fn test_bridge() -> Arc<Bridge<FakeClock>> {
    let config = Config {
        heartbeat_interval: Duration::from_secs(30),
        heartbeat_timeout: Duration::from_secs(60),
        approval_timeout: Duration::from_secs(300),
        context_timeout: Duration::from_secs(600),
        reaper_interval: Duration::from_secs(30),
        subscriber_buffer: 8,
        worker_bind: "127.0.0.1:0".into(),
        client_bind: "127.0.0.1:0".into(),
    };
    Arc::new(Bridge::with_clock(config, FakeClock::new(), Arc::new(NullSink)))
}

#[tokio::test]
async fn submit_job_returns_queued_job_detail() {
    let app = router(test_bridge());
    let body = serde_json::json!({ "user_id": "user-1", "task_prompt": "do a thing" });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/jobs")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn get_unknown_job_is_404() {
    let app = router(test_bridge());
    let response = app
        .oneshot(Request::builder().uri("/jobs/job-doesnotexist0000000").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn register_worker_returns_token() {
    let app = router(test_bridge());
    let body = serde_json::json!({ "user_id": "user-1" });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/workers")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn list_jobs_filters_by_user() {
    let bridge = test_bridge();
    bridge.submit_job("alice", "a", bridge_core::PolicyProfile::named("default"), 30, None);
    bridge.submit_job("bob", "b", bridge_core::PolicyProfile::named("default"), 30, None);

    let app = router(Arc::clone(&bridge));
    let response = app
        .oneshot(Request::builder().uri("/jobs?user_id=alice").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let jobs: Vec<serde_json::Value> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(jobs.len(), 1);
}
