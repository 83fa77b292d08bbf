//! Acceptor and worker pool
//!
//! One acceptor feeds a bounded FIFO queue; `worker_count` workers drain it,
//! each serving one connection at a time. A full queue blocks the acceptor,
//! which leaves further clients waiting in the kernel accept backlog.

use crate::application::connection::ConnectionHandler;
use kernel::error::app_error::AppError;
use kernel::id::ConnectionId;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Pause after a failed `accept` (e.g. EMFILE) before trying again.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(10);

#[derive(Debug)]
pub(crate) struct Incoming {
    pub stream: TcpStream,
    pub remote_addr: SocketAddr,
}

/// Consumer side of the queue, shared by every worker.
pub(crate) type ConnectionReceiver = Arc<Mutex<mpsc::Receiver<Incoming>>>;

pub(crate) fn connection_queue(capacity: usize) -> (mpsc::Sender<Incoming>, ConnectionReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (tx, Arc::new(Mutex::new(rx)))
}

/// Source of inbound connections for [`accept_loop`].
pub(crate) trait Listener: Send + Sync + 'static {
    fn accept(&self) -> impl Future<Output = io::Result<(TcpStream, SocketAddr)>> + Send;
}

impl Listener for TcpListener {
    fn accept(&self) -> impl Future<Output = io::Result<(TcpStream, SocketAddr)>> + Send {
        TcpListener::accept(self)
    }
}

/// Accept until cancelled. Dropping `queue` on return closes it for the workers.
pub(crate) async fn accept_loop<L: Listener>(
    listener: L,
    queue: mpsc::Sender<Incoming>,
    token: CancellationToken,
) {
    loop {
        let accepted = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            accepted = listener.accept() => accepted,
        };

        match accepted {
            Ok((stream, remote_addr)) => {
                tracing::debug!(%remote_addr, "Connection accepted");
                let incoming = Incoming {
                    stream,
                    remote_addr,
                };

                // Blocks while the queue is full
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    sent = queue.send(incoming) => {
                        if sent.is_err() {
                            tracing::warn!("All workers gone, stopping acceptor");
                            break;
                        }
                    }
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to accept connection");
                tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
            }
        }
    }

    tracing::info!("Acceptor stopped");
}

/// Serve queued connections one at a time until the queue closes or
/// cancellation is observed between connections.
pub(crate) async fn worker_loop<R>(
    worker_id: usize,
    queue: ConnectionReceiver,
    mut handler: ConnectionHandler<R>,
    token: CancellationToken,
) where
    R: Send + Sync + 'static,
{
    tracing::debug!(worker_id, "Worker started");

    loop {
        let next = tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!(worker_id, "Shutdown signalled, stopping worker");
                break;
            }
            next = async { queue.lock().await.recv().await } => next,
        };

        let Some(Incoming {
            stream,
            remote_addr,
        }) = next
        else {
            tracing::info!(worker_id, "Connection queue closed, stopping worker");
            break;
        };

        let conn_id = ConnectionId::new();
        let span = tracing::info_span!("connection", %conn_id, %remote_addr, worker_id);
        async {
            match handler.handle(stream).await {
                Ok(outcome) => tracing::info!(outcome = outcome.as_str(), "Connection closed"),
                Err(err) => {
                    let err = AppError::from(err);
                    if err.is_expected() {
                        tracing::warn!(error = %err, kind = %err.kind(), "Connection closed mid-frame");
                    } else {
                        tracing::error!(error = %err, kind = %err.kind(), "Connection failed");
                    }
                }
            }
        }
        .instrument(span)
        .await;
    }
}
