// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client-facing REST + WebSocket façade (§6).

use crate::bridge::Bridge;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use bridge_core::{Clock, JobId, PolicyProfile, WorkerId};
use bridge_wire::{
    ApprovalResponseRequest, CancelJobRequest, ClientInbound, ClientOutbound, ContextResponseRequest, JobDetail,
    JobSummary, RegisterWorkerRequest, RegisterWorkerResponse, SubmitJobRequest, WorkerSummary,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub fn router<C: Clock + 'static>(bridge: Arc<Bridge<C>>) -> Router {
    Router::new()
        .route("/jobs", post(submit_job::<C>).get(list_jobs::<C>))
        .route("/jobs/:id", get(get_job::<C>))
        .route("/jobs/:id/cancel", post(cancel_job::<C>))
        .route("/jobs/:id/approve", post(approve::<C>))
        .route("/jobs/:id/context", post(provide_context::<C>))
        .route("/jobs/:id/events", get(subscribe::<C>))
        .route("/workers", post(register_worker::<C>).get(list_workers::<C>))
        .route("/workers/:id", delete(unregister_worker::<C>))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(bridge)
}

/// Bind and serve the client façade until the process exits.
pub async fn run<C: Clock + 'static>(bridge: Arc<Bridge<C>>, bind_addr: &str) -> std::io::Result<()> {
    let app = router(bridge);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!(%bind_addr, "client listener bound");
    axum::serve(listener, app).await
}

async fn submit_job<C: Clock + 'static>(
    State(bridge): State<Arc<Bridge<C>>>,
    Json(req): Json<SubmitJobRequest>,
) -> impl IntoResponse {
    let policy = PolicyProfile::named(req.policy_profile.unwrap_or_else(|| "default".into()));
    let preferred_worker = req.preferred_worker.map(WorkerId::new);
    let id = bridge.submit_job(req.user_id, req.task_prompt, policy, req.max_runtime_minutes.unwrap_or(30), preferred_worker);
    match bridge.job(&id) {
        Some(job) => Json(JobDetail::from(&job)).into_response(),
        None => axum::http::StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct ListJobsQuery {
    user_id: Option<String>,
    status: Option<String>,
}

async fn list_jobs<C: Clock + 'static>(
    State(bridge): State<Arc<Bridge<C>>>,
    Query(filter): Query<ListJobsQuery>,
) -> impl IntoResponse {
    let jobs: Vec<JobSummary> = bridge
        .jobs()
        .iter()
        .filter(|job| filter.user_id.as_deref().map(|u| u == job.user_id).unwrap_or(true))
        .filter(|job| filter.status.as_deref().map(|s| s == job.status.to_string()).unwrap_or(true))
        .map(JobSummary::from)
        .collect();
    Json(jobs)
}

async fn get_job<C: Clock + 'static>(
    State(bridge): State<Arc<Bridge<C>>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match bridge.job(&JobId::from_string(&id)) {
        Some(job) => Json(JobDetail::from(&job)).into_response(),
        None => axum::http::StatusCode::NOT_FOUND.into_response(),
    }
}

async fn cancel_job<C: Clock + 'static>(
    State(bridge): State<Arc<Bridge<C>>>,
    Path(id): Path<String>,
    Json(req): Json<CancelJobRequest>,
) -> impl IntoResponse {
    let job_id = JobId::from_string(&id);
    match bridge.cancel_job(job_id, req.reason.unwrap_or_else(|| "cancelled by client".into())) {
        Ok(()) => axum::http::StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            warn!(%err, "cancel_job failed");
            axum::http::StatusCode::CONFLICT.into_response()
        }
    }
}

async fn approve<C: Clock + 'static>(
    State(bridge): State<Arc<Bridge<C>>>,
    Path(_id): Path<String>,
    Json(req): Json<ApprovalResponseRequest>,
) -> impl IntoResponse {
    match bridge.respond_to_approval(&req.request_id, req.approved, req.reason) {
        Ok(()) => axum::http::StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            warn!(%err, "approval response failed");
            axum::http::StatusCode::NOT_FOUND.into_response()
        }
    }
}

async fn provide_context<C: Clock + 'static>(
    State(bridge): State<Arc<Bridge<C>>>,
    Path(_id): Path<String>,
    Json(req): Json<ContextResponseRequest>,
) -> impl IntoResponse {
    match bridge.respond_to_context(&req.request_id, req.response, req.attachments) {
        Ok(()) => axum::http::StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            warn!(%err, "context response failed");
            axum::http::StatusCode::NOT_FOUND.into_response()
        }
    }
}

async fn register_worker<C: Clock + 'static>(
    State(bridge): State<Arc<Bridge<C>>>,
    Json(req): Json<RegisterWorkerRequest>,
) -> impl IntoResponse {
    let (instance_id, auth_token) = bridge.register_worker(req.user_id);
    Json(RegisterWorkerResponse { instance_id: instance_id.to_string(), auth_token })
}

async fn list_workers<C: Clock + 'static>(State(bridge): State<Arc<Bridge<C>>>) -> impl IntoResponse {
    let workers: Vec<WorkerSummary> = bridge.workers().iter().map(WorkerSummary::from).collect();
    Json(workers)
}

async fn unregister_worker<C: Clock + 'static>(
    State(bridge): State<Arc<Bridge<C>>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    bridge.unregister_worker(&WorkerId::new(id));
    axum::http::StatusCode::NO_CONTENT
}

async fn subscribe<C: Clock + 'static>(
    State(bridge): State<Arc<Bridge<C>>>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let job_id = JobId::from_string(&id);
    ws.on_upgrade(move |socket| subscriber_session(bridge, job_id, socket))
}

async fn subscriber_session<C: Clock + 'static>(bridge: Arc<Bridge<C>>, job_id: JobId, socket: WebSocket) {
    let Some((sub_id, mut rx)) = bridge.subscribe(job_id) else {
        return;
    };
    let (mut sink, mut stream) = socket.split();

    if let Some(job) = bridge.job(&job_id) {
        let initial = ClientOutbound::InitialState { job: Box::new(JobDetail::from(&job)) };
        if let Ok(text) = serde_json::to_string(&initial) {
            let _ = sink.send(Message::Text(text)).await;
        }
    }

    loop {
        tokio::select! {
            frame = rx.recv() => {
                let Some(frame) = frame else { break };
                let Ok(text) = serde_json::to_string(&frame) else { continue };
                if sink.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(Message::Text(text))) => {
                        if let Ok(ClientInbound::Ping) = serde_json::from_str(&text) {
                            let Ok(pong) = serde_json::to_string(&ClientOutbound::Pong) else { continue };
                            if sink.send(Message::Text(pong)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(_)) => break,
                }
            }
        }
    }
    bridge.unsubscribe(job_id, sub_id);
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
