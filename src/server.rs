//! Server assembly
//!
//! Wires the registry, the session Coordinator and the acceptor together,
//! and owns the shutdown tokens and the connection task tracker.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::handler::handle_connection;
use crate::registry::Registry;
use crate::session::{Coordinator, SessionHandle, SessionState};

/// Pause after a failed accept before trying again
pub const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Longest wait for connection tasks to finish at shutdown
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Source of incoming connections for the acceptor
pub trait Listener: Send + 'static {
    fn accept(&mut self)
        -> impl Future<Output = io::Result<(TcpStream, SocketAddr)>> + Send + '_;
}

impl Listener for TcpListener {
    fn accept(&mut self)
        -> impl Future<Output = io::Result<(TcpStream, SocketAddr)>> + Send + '_ {
        TcpListener::accept(self)
    }
}

/// Everything a connection task needs from the server
#[derive(Clone)]
pub struct Connections {
    pub registry: Arc<Registry>,
    pub session: SessionHandle,
    /// Fires after the session's final broadcast has been queued
    pub closing: CancellationToken,
    pub tracker: TaskTracker,
}

/// A running bingo session
pub struct BingoServer {
    connections: Connections,
    shutdown: CancellationToken,
    coordinator: JoinHandle<SessionState>,
}

impl BingoServer {
    /// Start the Coordinator for a fresh session
    pub fn start(config: &ServerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let registry = Arc::new(Registry::new());
        let shutdown = CancellationToken::new();
        let (coordinator, session) = Coordinator::new(
            SessionState::new(),
            Arc::clone(&registry),
            config.draw_interval(),
            rng,
            shutdown.clone(),
        );

        Self {
            connections: Connections {
                registry,
                session,
                closing: CancellationToken::new(),
                tracker: TaskTracker::new(),
            },
            shutdown,
            coordinator: tokio::spawn(coordinator.run()),
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.connections.registry
    }

    pub fn session(&self) -> &SessionHandle {
        &self.connections.session
    }

    /// Spawn the acceptor on an already bound listener
    pub fn spawn_acceptor<L: Listener>(&self, listener: L) -> JoinHandle<()> {
        tokio::spawn(accept_loop(
            listener,
            self.connections.clone(),
            self.shutdown.clone(),
        ))
    }

    /// Stop accepting, announce the shutdown, then close every connection
    ///
    /// Returns once the Coordinator has stopped and each connection has
    /// flushed its queue, or `SHUTDOWN_TIMEOUT` has passed.
    pub async fn shutdown(self) -> Option<SessionState> {
        self.shutdown.cancel();
        let state = match self.coordinator.await {
            Ok(state) => Some(state),
            Err(e) => {
                error!("Coordinator task failed: {}", e);
                None
            }
        };

        self.connections.closing.cancel();
        self.connections.tracker.close();
        if tokio::time::timeout(SHUTDOWN_TIMEOUT, self.connections.tracker.wait())
            .await
            .is_err()
        {
            warn!(
                "{} connections still open after {:?}",
                self.connections.tracker.len(),
                SHUTDOWN_TIMEOUT
            );
        }

        state
    }
}

/// Connection accept loop
///
/// Each connection gets its own tracked task; accept errors are logged and
/// retried after `ACCEPT_BACKOFF` until the shutdown token fires.
pub async fn accept_loop<L: Listener>(
    mut listener: L,
    connections: Connections,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Acceptor stopped");
                break;
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, addr)) => {
                    info!("New connection from {}", addr);
                    let Connections { registry, session, closing, tracker } = connections.clone();

                    // Spawn handler task for each connection
                    tracker.spawn(async move {
                        if let Err(e) = handle_connection(stream, registry, session, closing).await {
                            error!("Connection handler error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            }
        }
    }
}
