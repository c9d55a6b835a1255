use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use tvmcp_core::{Discovery, ServerRunState};
use tvmcp_mcp::{serve_sse, McpServer, SseTransport, SSE_PATH};

use crate::error::{ServerError, ServerResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started(SocketAddr),
    AlreadyRunning(SocketAddr),
}

impl StartOutcome {
    pub fn local_addr(&self) -> SocketAddr {
        match self {
            StartOutcome::Started(addr) | StartOutcome::AlreadyRunning(addr) => *addr,
        }
    }
}

struct RunningServer {
    local_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

/// Publishes `Stopped` when the server task ends, including panics and abort
struct StoppedOnDrop(Arc<watch::Sender<ServerRunState>>);

impl Drop for StoppedOnDrop {
    fn drop(&mut self) {
        self.0.send_replace(ServerRunState::Stopped);
    }
}

/// Starts and stops the SSE server; the only writer of the run state
pub struct Supervisor {
    server: Arc<McpServer>,
    host: String,
    discovery: Arc<dyn Discovery>,
    state: Arc<watch::Sender<ServerRunState>>,
    running: Mutex<Option<RunningServer>>,
}

impl Supervisor {
    pub fn new(server: Arc<McpServer>, host: impl Into<String>, discovery: Arc<dyn Discovery>) -> Self {
        let (state, _) = watch::channel(ServerRunState::Stopped);
        Self {
            server,
            host: host.into(),
            discovery,
            state: Arc::new(state),
            running: Mutex::new(None),
        }
    }

    /// Bind and serve on `port` (0 picks an ephemeral port).
    ///
    /// Concurrent calls serialize on the supervisor lock, so only the first
    /// binds; the rest report `AlreadyRunning`.
    pub async fn start(&self, port: u16) -> ServerResult<StartOutcome> {
        let mut running = self.running.lock().await;
        if let Some(current) = running.as_ref() {
            if self.is_live(current) {
                return Ok(StartOutcome::AlreadyRunning(current.local_addr));
            }
            info!(addr = %current.local_addr, "previous server ended, starting again");
        }

        let listener = TcpListener::bind((self.host.as_str(), port)).await.map_err(|source| {
            ServerError::Bind { host: self.host.clone(), port, source }
        })?;
        let local_addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

        let address = self.advertised_address(local_addr.port());
        self.state.send_replace(ServerRunState::Running { address: address.clone() });

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let transport = SseTransport::new(self.server.clone());
        let guard = StoppedOnDrop(self.state.clone());

        let task = tokio::spawn(async move {
            let result = serve_sse(listener, transport, async move {
                let _ = shutdown_rx.await;
            })
            .await;
            drop(guard);

            match result {
                Ok(()) => info!(addr = %local_addr, "MCP server stopped"),
                Err(e) => error!(addr = %local_addr, error = %e, "MCP server terminated"),
            }
        });

        info!(
            addr = %local_addr,
            address = address.as_deref().unwrap_or("unresolved"),
            "MCP server started"
        );
        *running = Some(RunningServer { local_addr, shutdown: Some(shutdown_tx), task });
        Ok(StartOutcome::Started(local_addr))
    }

    /// Stop accepting connections and wait for the server task; no-op when stopped
    pub async fn stop(&self) -> ServerResult<()> {
        let Some(mut current) = self.running.lock().await.take() else {
            return Ok(());
        };

        if let Some(shutdown) = current.shutdown.take() {
            // The task may already be gone, which is fine
            let _ = shutdown.send(());
        }

        let addr = current.local_addr;
        match current.task.await {
            Ok(()) => Ok(()),
            Err(e) if e.is_cancelled() => Ok(()),
            Err(e) => {
                warn!(addr = %addr, "server task panicked");
                self.state.send_replace(ServerRunState::Stopped);
                Err(ServerError::Task { addr, message: e.to_string() })
            }
        }
    }

    pub fn status(&self) -> ServerRunState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ServerRunState> {
        self.state.subscribe()
    }

    /// Address of the running listener, if any
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.running
            .lock()
            .await
            .as_ref()
            .filter(|current| self.is_live(current))
            .map(|current| current.local_addr)
    }

    /// The drop guard publishes `Stopped` before the task is marked finished
    fn is_live(&self, current: &RunningServer) -> bool {
        !current.task.is_finished() && self.state.borrow().is_running()
    }

    fn advertised_address(&self, port: u16) -> Option<String> {
        self.discovery
            .local_address()
            .map(|host| format!("http://{}:{}{}", host, port, SSE_PATH))
    }

    /// Kill the server task without a graceful shutdown
    #[cfg(test)]
    pub(crate) async fn abort_for_test(&self) {
        if let Some(current) = self.running.lock().await.as_ref() {
            current.task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tvmcp_core::StaticDiscovery;
    use tvmcp_mcp::{GovernanceConfig, ToolRegistry};

    fn supervisor(discovery: StaticDiscovery) -> Supervisor {
        let server = McpServer::new(ToolRegistry::new(GovernanceConfig::default()));
        Supervisor::new(Arc::new(server), "127.0.0.1", Arc::new(discovery))
    }

    async fn wait_for_stopped(rx: &mut watch::Receiver<ServerRunState>) {
        tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|state| !state.is_running()))
            .await
            .expect("state never returned to stopped")
            .expect("state channel closed");
    }

    #[tokio::test]
    async fn running_address_uses_discovery() {
        let supervisor = supervisor(StaticDiscovery::new("10.0.0.7"));
        let outcome = supervisor.start(0).await.unwrap();
        let port = outcome.local_addr().port();

        let state = supervisor.status();
        assert_eq!(state.address(), Some(format!("http://10.0.0.7:{}/sse", port).as_str()));
        supervisor.stop().await.unwrap();
    }

    #[tokio::test]
    async fn unresolved_address_still_runs() {
        let supervisor = supervisor(StaticDiscovery(None));
        supervisor.start(0).await.unwrap();
        assert_eq!(supervisor.status(), ServerRunState::Running { address: None });
        supervisor.stop().await.unwrap();
        assert_eq!(supervisor.status(), ServerRunState::Stopped);
    }

    #[tokio::test]
    async fn aborted_task_publishes_stopped() {
        let supervisor = supervisor(StaticDiscovery::new("127.0.0.1"));
        let mut rx = supervisor.subscribe();
        supervisor.start(0).await.unwrap();
        assert!(supervisor.status().is_running());

        supervisor.abort_for_test().await;
        wait_for_stopped(&mut rx).await;
        assert_eq!(supervisor.local_addr().await, None);

        // A server that ended on its own can be started again
        let outcome = supervisor.start(0).await.unwrap();
        assert!(matches!(outcome, StartOutcome::Started(_)));
        supervisor.stop().await.unwrap();
    }

    #[tokio::test]
    async fn stop_when_stopped_is_noop() {
        let supervisor = supervisor(StaticDiscovery(None));
        supervisor.stop().await.unwrap();
        assert_eq!(supervisor.status(), ServerRunState::Stopped);
    }

    #[tokio::test]
    async fn bind_failure_leaves_state_stopped() {
        let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = occupied.local_addr().unwrap().port();

        let supervisor = supervisor(StaticDiscovery(None));
        let err = supervisor.start(port).await.unwrap_err();
        assert!(matches!(err, ServerError::Bind { .. }));
        assert_eq!(supervisor.status(), ServerRunState::Stopped);
    }
}
