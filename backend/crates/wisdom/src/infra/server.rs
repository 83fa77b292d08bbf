//! Server lifecycle
//!
//! [`PowServer::start`] binds, launches the workers and the acceptor, and hands
//! back a [`RunningServer`]. [`RunningServer::shutdown`] stops accepting,
//! closes the queue and waits for in-flight connections up to the configured
//! grace period.

use crate::application::config::ServerConfig;
use crate::application::connection::ConnectionHandler;
use crate::error::{ServerError, ServerResult};
use crate::infra::pool::{accept_loop, connection_queue, worker_loop};
use crate::presentation::router::HandlerRegistry;
use pow::Hashcash;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;

/// Result of a graceful shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReport {
    /// Every worker finished within the grace period
    Drained,
    /// The grace period elapsed; `abandoned` workers were left running
    TimedOut { abandoned: usize },
}

pub struct PowServer<R> {
    config: ServerConfig,
    registry: Arc<HandlerRegistry<R>>,
    repo: Arc<R>,
}

impl<R> PowServer<R>
where
    R: Send + Sync + 'static,
{
    pub fn new(config: ServerConfig, registry: HandlerRegistry<R>, repo: R) -> Self {
        Self {
            config,
            registry: Arc::new(registry),
            repo: Arc::new(repo),
        }
    }

    /// Bind the listener and start serving in the background.
    ///
    /// Failing to bind is the only startup error.
    pub async fn start(self) -> ServerResult<RunningServer> {
        let listener = TcpListener::bind(self.config.addr.as_str())
            .await
            .map_err(|source| ServerError::Bind {
                addr: self.config.addr.clone(),
                source,
            })?;
        let local_addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

        let shutdown = CancellationToken::new();
        let (tx, rx) = connection_queue(self.config.queue_capacity);

        let mut workers = JoinSet::new();
        for worker_id in 0..self.config.worker_count {
            let handler = ConnectionHandler::new(
                Hashcash::new(),
                self.config.difficulty,
                self.config.pow_timeout,
                Arc::clone(&self.registry),
                Arc::clone(&self.repo),
            );
            workers.spawn(worker_loop(
                worker_id,
                Arc::clone(&rx),
                handler,
                shutdown.clone(),
            ));
        }

        let acceptor = tokio::spawn(accept_loop(listener, tx, shutdown.clone()));

        tracing::info!(
            addr = %local_addr,
            difficulty = self.config.difficulty.bits(),
            workers = self.config.worker_count,
            queue_capacity = self.config.queue_capacity,
            pow_timeout = ?self.config.pow_timeout,
            "Server started"
        );

        Ok(RunningServer {
            local_addr,
            shutdown,
            acceptor,
            workers,
            shutdown_timeout: self.config.shutdown_timeout,
        })
    }
}

/// Handle to a started server.
pub struct RunningServer {
    local_addr: SocketAddr,
    shutdown: CancellationToken,
    acceptor: JoinHandle<()>,
    workers: JoinSet<()>,
    shutdown_timeout: Duration,
}

impl RunningServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Token that stops the server when cancelled. [`RunningServer::shutdown`]
    /// cancels it too.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub async fn cancelled(&self) {
        self.shutdown.cancelled().await
    }

    /// Stop accepting and wait for workers to drain.
    ///
    /// Connections still waiting in the queue are closed unanswered. Workers
    /// that outlive the grace period are detached, not aborted.
    pub async fn shutdown(self) -> ShutdownReport {
        let RunningServer {
            shutdown,
            acceptor,
            mut workers,
            shutdown_timeout,
            ..
        } = self;

        tracing::info!(workers = workers.len(), "Shutting down");
        shutdown.cancel();

        if let Err(err) = acceptor.await {
            tracing::error!(error = %err, "Acceptor task failed");
        }

        let drain = async {
            while let Some(joined) = workers.join_next().await {
                if let Err(err) = joined {
                    tracing::error!(error = %err, "Worker task failed");
                }
            }
        };

        match tokio::time::timeout(shutdown_timeout, drain).await {
            Ok(()) => {
                tracing::info!("All workers have finished");
                ShutdownReport::Drained
            }
            Err(_) => {
                let abandoned = workers.len();
                workers.detach_all();
                tracing::warn!(
                    abandoned,
                    timeout = ?shutdown_timeout,
                    "Shutdown timed out waiting for workers"
                );
                ShutdownReport::TimedOut { abandoned }
            }
        }
    }
}
