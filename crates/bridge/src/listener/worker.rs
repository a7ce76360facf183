// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker phone-home listener: a raw length-prefixed JSON stream per
//! worker connection (§6). Each accepted socket gets one reader task and
//! one writer task, joined by the registry's `ConnectionHandle` sender so
//! the rest of the Bridge never touches the socket directly.

use crate::bridge::Bridge;
use bridge_core::{Clock, WorkerId};
use bridge_wire::{ProtocolError, WorkerInbound, WorkerOutbound};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

const FRAME_TIMEOUT: Duration = Duration::from_secs(120);

/// Accept worker connections on `bind_addr` until the process exits.
pub async fn run<C: Clock + 'static>(bridge: Arc<Bridge<C>>, bind_addr: &str) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind_addr).await?;
    info!(%bind_addr, "worker listener bound");
    loop {
        let (stream, addr) = listener.accept().await?;
        let bridge = Arc::clone(&bridge);
        tokio::spawn(async move {
            let (reader, writer) = stream.into_split();
            if let Err(err) = handle_connection(reader, writer, &bridge).await {
                debug!(%addr, %err, "worker connection ended");
            }
        });
    }
}

async fn handle_connection<R, W, C>(mut reader: R, mut writer: W, bridge: &Bridge<C>) -> Result<(), ProtocolError>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
    C: Clock + 'static,
{
    let auth: WorkerInbound = bridge_wire::read_message(&mut reader, FRAME_TIMEOUT).await?;
    let WorkerInbound::Auth { token, user_id } = auth else {
        bridge_wire::write_message(&mut writer, &WorkerOutbound::TaskCancel {
            task_id: String::new(),
            reason: "first frame must be auth".into(),
        }, FRAME_TIMEOUT).await?;
        return Err(ProtocolError::ConnectionClosed);
    };

    let Some((instance_id, registered_user)) = bridge.verify_token(&token) else {
        warn!("worker presented an unknown auth token");
        return Err(ProtocolError::ConnectionClosed);
    };
    let user_id = if user_id.is_empty() { registered_user } else { user_id };

    let (mut outbound_rx, _evicted) = bridge.connect_worker(instance_id.clone(), user_id);
    bridge_wire::write_message(&mut writer, &WorkerOutbound::Connected { instance_id: instance_id.to_string() }, FRAME_TIMEOUT).await?;
    info!(worker = %instance_id, "worker connected");

    let write_task = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            if bridge_wire::write_message(&mut writer, &frame, FRAME_TIMEOUT).await.is_err() {
                break;
            }
        }
    });

    let result = read_loop(&mut reader, &instance_id, bridge).await;
    write_task.abort();
    bridge.disconnect_worker(&instance_id);
    info!(worker = %instance_id, "worker disconnected");
    result
}

async fn read_loop<R, C>(reader: &mut R, instance_id: &WorkerId, bridge: &Bridge<C>) -> Result<(), ProtocolError>
where
    R: AsyncRead + Unpin,
    C: Clock + 'static,
{
    loop {
        let frame: WorkerInbound = bridge_wire::read_message(reader, FRAME_TIMEOUT).await?;
        bridge.handle_worker_frame(instance_id, frame);
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
