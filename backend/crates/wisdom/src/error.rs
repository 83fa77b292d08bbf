//! Server and Client Error Types
//!
//! Every failure is converted into `kernel::error::AppError` before it is
//! logged. Log levels follow [`AppError::is_expected`]: outcomes the peer
//! caused are logged at `warn`, everything else at `error`.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use pow::PowError;
use std::io;
use thiserror::Error;

pub type ConnectionResult<T> = Result<T, ConnectionError>;
pub type ServerResult<T> = Result<T, ServerError>;
pub type ClientResult<T> = Result<T, ClientError>;

/// Failure that terminates a single connection without a response line.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("failed to send challenge: {0}")]
    WriteChallenge(#[source] io::Error),

    #[error("failed to read solution: {0}")]
    ReadSolution(#[source] io::Error),

    #[error("failed to read handler id: {0}")]
    ReadHandlerId(#[source] io::Error),

    #[error("failed to write response: {0}")]
    WriteResponse(#[source] io::Error),
}

impl ConnectionError {
    /// A reply cut short by the peer is a framing violation; everything else
    /// is a transport failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConnectionError::ReadSolution(e) | ConnectionError::ReadHandlerId(e)
                if e.kind() == io::ErrorKind::UnexpectedEof =>
            {
                ErrorKind::Protocol
            }
            _ => ErrorKind::Transport,
        }
    }
}

impl From<ConnectionError> for AppError {
    fn from(err: ConnectionError) -> Self {
        AppError::new(err.kind(), err.to_string()).with_source(err)
    }
}

/// Startup failure.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to listen on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to read listener address: {0}")]
    LocalAddr(#[source] io::Error),
}

impl ServerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServerError::Bind { .. } | ServerError::LocalAddr(_) => ErrorKind::Transport,
        }
    }
}

impl From<ServerError> for AppError {
    fn from(err: ServerError) -> Self {
        let app = AppError::new(err.kind(), err.to_string());
        match err {
            ServerError::Bind { source, .. } => app
                .with_action("Check that APP_ADDR is free and valid")
                .with_source(source),
            ServerError::LocalAddr(source) => app.with_source(source),
        }
    }
}

/// Failure of one client request.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to read challenge and difficulty: {0}")]
    ReadChallenge(#[source] io::Error),

    #[error(transparent)]
    Solve(#[from] PowError),

    #[error("solver task failed: {0}")]
    Solver(#[from] tokio::task::JoinError),

    #[error("failed to send request: {0}")]
    SendSolution(#[source] io::Error),

    #[error("failed to read response: {0}")]
    ReadResponse(#[source] io::Error),

    #[error("server closed the connection without a response")]
    EmptyResponse,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Connect { .. }
            | ClientError::ReadChallenge(_)
            | ClientError::SendSolution(_)
            | ClientError::ReadResponse(_) => ErrorKind::Transport,
            ClientError::Solve(e) => e.kind(),
            ClientError::Solver(_) => ErrorKind::Internal,
            ClientError::EmptyResponse => ErrorKind::Protocol,
        }
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Solve(err) => err.into(),
            ClientError::Connect { .. } => AppError::new(err.kind(), err.to_string())
                .with_action("Check that the server is running at APP_SERVERADDR")
                .with_source(err),
            err => AppError::new(err.kind(), err.to_string()).with_source(err),
        }
    }
}
