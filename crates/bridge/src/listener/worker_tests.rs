use super::*;
use crate::bridge::Config;
use crate::persist::NullSink;
use bridge_core::FakeClock;
use bridge_wire::WorkerOutbound;
use std::time::Duration;
use tokio::net::TcpStream;

fn test_config(bind: &str) -> Config {
    Config {
        heartbeat_interval: Duration::from_secs(30),
        heartbeat_timeout: Duration::from_secs(60),
        approval_timeout: Duration::from_secs(300),
        context_timeout: Duration::from_secs(600),
        reaper_interval: Duration::from_secs(30),
        subscriber_buffer: 8,
        worker_bind: bind.to_string(),
        client_bind: "127.0.0.1:0".into(),
    }
}

#[tokio::test]
async fn worker_completes_auth_handshake_and_receives_connected() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let bridge = Arc::new(Bridge::with_clock(test_config(&addr.to_string()), FakeClock::new(), Arc::new(NullSink)));
    let (_instance_id, token) = bridge.register_worker("user-1".into());

    let bridge_for_task = Arc::clone(&bridge);
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (reader, writer) = stream.into_split();
        let _ = handle_connection(reader, writer, &bridge_for_task).await;
    });

    let mut stream = TcpStream::connect(addr).await.unwrap();
    bridge_wire::write_message(&mut stream, &WorkerInbound::Auth { token, user_id: "user-1".into() }, Duration::from_secs(5))
        .await
        .unwrap();

    let response: WorkerOutbound = bridge_wire::read_message(&mut stream, Duration::from_secs(5)).await.unwrap();
    assert!(matches!(response, WorkerOutbound::Connected { .. }));
}

#[tokio::test]
async fn worker_with_unknown_token_is_rejected() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let bridge = Arc::new(Bridge::with_clock(test_config(&addr.to_string()), FakeClock::new(), Arc::new(NullSink)));

    let bridge_for_task = Arc::clone(&bridge);
    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (reader, writer) = stream.into_split();
        handle_connection(reader, writer, &bridge_for_task).await
    });

    let mut stream = TcpStream::connect(addr).await.unwrap();
    bridge_wire::write_message(
        &mut stream,
        &WorkerInbound::Auth { token: "bogus".into(), user_id: "user-1".into() },
        Duration::from_secs(5),
    )
    .await
    .unwrap();

    let result = handle.await.unwrap();
    assert!(result.is_err());
}
