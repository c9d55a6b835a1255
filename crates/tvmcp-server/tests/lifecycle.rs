//! Supervisor behavior against real sockets

use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use tvmcp_core::testing::FakeShell;
use tvmcp_core::{ServerRunState, StaticDiscovery};
use tvmcp_mcp::{device_registry, GovernanceConfig, McpServer, ScreenshotSettings};
use tvmcp_server::{StartOutcome, Supervisor};

fn supervisor() -> Arc<Supervisor> {
    let registry = device_registry(
        Arc::new(FakeShell::new()),
        ScreenshotSettings::default(),
        GovernanceConfig::default(),
    )
    .unwrap();
    Arc::new(Supervisor::new(
        Arc::new(McpServer::new(registry)),
        "127.0.0.1",
        Arc::new(StaticDiscovery::new("192.168.1.40")),
    ))
}

#[tokio::test]
async fn concurrent_starts_bind_once() {
    let supervisor = supervisor();
    let mut rx = supervisor.subscribe();

    let (a, b) = tokio::join!(supervisor.start(0), supervisor.start(0));
    let outcomes = [a.unwrap(), b.unwrap()];

    let started = outcomes.iter().filter(|o| matches!(o, StartOutcome::Started(_))).count();
    let already = outcomes.iter().filter(|o| matches!(o, StartOutcome::AlreadyRunning(_))).count();
    assert_eq!((started, already), (1, 1));
    assert_eq!(outcomes[0].local_addr(), outcomes[1].local_addr());

    // One transition to running
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().is_running());
    assert!(!rx.has_changed().unwrap());

    supervisor.stop().await.unwrap();
}

#[tokio::test]
async fn serves_sse_until_stopped() {
    let supervisor = supervisor();
    let addr = supervisor.start(0).await.unwrap().local_addr();

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /sse HTTP/1.1\r\nHost: localhost\r\nAccept: text/event-stream\r\n\r\n")
        .await
        .unwrap();

    let mut received = Vec::new();
    let mut buf = [0u8; 1024];
    tokio::time::timeout(Duration::from_secs(5), async {
        while !String::from_utf8_lossy(&received).contains("event: endpoint") {
            let n = stream.read(&mut buf).await.unwrap();
            assert!(n > 0, "connection closed early");
            received.extend_from_slice(&buf[..n]);
        }
    })
    .await
    .expect("no endpoint event");

    let text = String::from_utf8_lossy(&received);
    assert!(text.starts_with("HTTP/1.1 200"));
    assert!(text.contains("/message?sessionId="));

    // An open stream must not hold up shutdown
    tokio::time::timeout(Duration::from_secs(5), supervisor.stop())
        .await
        .expect("stop hung")
        .unwrap();
    assert_eq!(supervisor.status(), ServerRunState::Stopped);
    assert!(TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn status_reports_advertised_url() {
    let supervisor = supervisor();
    let port = supervisor.start(0).await.unwrap().local_addr().port();
    assert_eq!(
        supervisor.status(),
        ServerRunState::Running { address: Some(format!("http://192.168.1.40:{}/sse", port)) }
    );
    supervisor.stop().await.unwrap();
}
