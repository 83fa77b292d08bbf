//! Connection state machine
//!
//! `New → ChallengeSent → AwaitingSolution → {Served, InvalidSolution,
//! HandlerNotFound, TimedOut} → Closed`
//!
//! The wait for the client reply is a future raced against the connection
//! deadline with [`tokio::time::timeout_at`]. The response line is written
//! only after the race is decided, so the losing branch is dropped before it
//! can touch the socket.

use crate::error::{ConnectionError, ConnectionResult};
use crate::presentation::protocol::{
    ChallengeFrame, HANDLER_NOT_FOUND_LINE, HandlerId, INVALID_SOLUTION_LINE, TIMEOUT_LINE,
    read_request, write_line,
};
use crate::presentation::router::HandlerRegistry;
use pow::{Challenge, Difficulty, Hashcash};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::time::Instant;

/// Per-socket state, alive from the challenge write until close.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionContext {
    pub challenge: Challenge,
    pub deadline: Instant,
}

/// How a connection ended when a response line was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionOutcome {
    Served(HandlerId),
    InvalidSolution,
    HandlerNotFound(HandlerId),
    TimedOut,
}

impl ConnectionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionOutcome::Served(_) => "served",
            ConnectionOutcome::InvalidSolution => "invalid_solution",
            ConnectionOutcome::HandlerNotFound(_) => "handler_not_found",
            ConnectionOutcome::TimedOut => "timed_out",
        }
    }
}

enum Verdict {
    Accepted(HandlerId),
    Rejected,
    TimedOut,
}

/// Runs the protocol for one connection at a time.
///
/// Each worker owns one handler, and with it one [`Hashcash`] engine, so
/// workers never contend on a random source.
pub struct ConnectionHandler<R> {
    engine: Hashcash,
    difficulty: Difficulty,
    pow_timeout: Duration,
    registry: Arc<HandlerRegistry<R>>,
    repo: Arc<R>,
}

impl<R> ConnectionHandler<R>
where
    R: Send + Sync + 'static,
{
    pub fn new(
        engine: Hashcash,
        difficulty: Difficulty,
        pow_timeout: Duration,
        registry: Arc<HandlerRegistry<R>>,
        repo: Arc<R>,
    ) -> Self {
        Self {
            engine,
            difficulty,
            pow_timeout,
            registry,
            repo,
        }
    }

    /// Serve one connection to completion.
    ///
    /// Returns `Err` when the socket failed before a response line could be
    /// delivered. The stream is closed on every path.
    pub async fn handle<S>(&mut self, mut stream: S) -> ConnectionResult<ConnectionOutcome>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send,
    {
        let ctx = self.send_challenge(&mut stream).await?;

        let verdict = match tokio::time::timeout_at(
            ctx.deadline,
            self.await_solution(&ctx, &mut stream),
        )
        .await
        {
            Ok(verdict) => verdict?,
            Err(_) => Verdict::TimedOut,
        };

        let outcome = self.respond(verdict, &mut stream).await?;

        if let Err(err) = stream.shutdown().await {
            tracing::debug!(error = %err, "Socket shutdown failed");
        }
        Ok(outcome)
    }

    async fn send_challenge<S>(&mut self, stream: &mut S) -> ConnectionResult<ConnectionContext>
    where
        S: AsyncWrite + Unpin + Send,
    {
        let challenge = self.engine.generate_challenge();
        let frame = ChallengeFrame {
            challenge,
            difficulty: self.difficulty,
        };

        stream
            .write_all(&frame.encode())
            .await
            .map_err(ConnectionError::WriteChallenge)?;
        stream
            .flush()
            .await
            .map_err(ConnectionError::WriteChallenge)?;

        tracing::debug!(
            challenge = %platform::crypto::to_base64(challenge.as_bytes()),
            difficulty = self.difficulty.bits(),
            "Challenge and difficulty sent"
        );

        Ok(ConnectionContext {
            challenge,
            deadline: Instant::now() + self.pow_timeout,
        })
    }

    async fn await_solution<S>(
        &self,
        ctx: &ConnectionContext,
        stream: &mut S,
    ) -> ConnectionResult<Verdict>
    where
        S: AsyncRead + Unpin + Send,
    {
        let request = read_request(stream).await?;

        if self
            .engine
            .validate_solution(&ctx.challenge, &request.solution, self.difficulty)
        {
            Ok(Verdict::Accepted(request.handler_id))
        } else {
            Ok(Verdict::Rejected)
        }
    }

    async fn respond<S>(&self, verdict: Verdict, stream: &mut S) -> ConnectionResult<ConnectionOutcome>
    where
        S: AsyncWrite + Unpin + Send,
    {
        let outcome = match verdict {
            Verdict::TimedOut => {
                write_line(stream, TIMEOUT_LINE)
                    .await
                    .map_err(ConnectionError::WriteResponse)?;
                ConnectionOutcome::TimedOut
            }
            Verdict::Rejected => {
                write_line(stream, INVALID_SOLUTION_LINE)
                    .await
                    .map_err(ConnectionError::WriteResponse)?;
                ConnectionOutcome::InvalidSolution
            }
            Verdict::Accepted(id) => match self.registry.get(id) {
                Some(handler) => {
                    tracing::debug!(handler_id = %id, handler = handler.name(), "Dispatching");
                    handler
                        .call(stream, self.repo.as_ref())
                        .await
                        .map_err(ConnectionError::WriteResponse)?;
                    ConnectionOutcome::Served(id)
                }
                None => {
                    write_line(stream, HANDLER_NOT_FOUND_LINE)
                        .await
                        .map_err(ConnectionError::WriteResponse)?;
                    ConnectionOutcome::HandlerNotFound(id)
                }
            },
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::protocol::{CHALLENGE_FRAME_LEN, RequestFrame};
    use pow::{NONCE_SIZE, Solution};
    use quote::{Quote, StaticQuoteRepository};
    use std::io;
    use tokio::io::AsyncReadExt;

    const SEED: u64 = 42;

    fn handler(difficulty: u8, pow_timeout: Duration) -> ConnectionHandler<StaticQuoteRepository> {
        let repo = StaticQuoteRepository::new(vec![Quote::new("Be water.", "Bruce Lee")]);
        ConnectionHandler::new(
            Hashcash::with_seed(SEED),
            Difficulty::new(difficulty),
            pow_timeout,
            Arc::new(HandlerRegistry::with_default_routes()),
            Arc::new(repo),
        )
    }

    /// The frame a handler built with [`SEED`] sends first.
    fn expected_frame(difficulty: u8) -> [u8; CHALLENGE_FRAME_LEN] {
        ChallengeFrame {
            challenge: Hashcash::with_seed(SEED).generate_challenge(),
            difficulty: Difficulty::new(difficulty),
        }
        .encode()
    }

    #[tokio::test]
    async fn test_invalid_solution() {
        let mock = tokio_test::io::Builder::new()
            .write(&expected_frame(64))
            .read(&[0xFF; NONCE_SIZE])
            .read(&[0x01])
            .write(INVALID_SOLUTION_LINE.as_bytes())
            .build();

        let outcome = handler(64, Duration::from_secs(5)).handle(mock).await.unwrap();
        assert_eq!(outcome, ConnectionOutcome::InvalidSolution);
    }

    #[tokio::test]
    async fn test_handler_not_found() {
        let mock = tokio_test::io::Builder::new()
            .write(&expected_frame(0))
            .read(&[0; NONCE_SIZE])
            .read(&[0x02])
            .write(HANDLER_NOT_FOUND_LINE.as_bytes())
            .build();

        let outcome = handler(0, Duration::from_secs(5)).handle(mock).await.unwrap();
        assert_eq!(outcome, ConnectionOutcome::HandlerNotFound(HandlerId::new(0x02)));
    }

    #[tokio::test]
    async fn test_valid_solution_dispatches_quote() {
        let mock = tokio_test::io::Builder::new()
            .write(&expected_frame(0))
            .read(&[7; NONCE_SIZE])
            .read(&[0x01])
            .write(b"Here is your quote: 'Be water.' - Bruce Lee\n")
            .build();

        let outcome = handler(0, Duration::from_secs(5)).handle(mock).await.unwrap();
        assert_eq!(outcome, ConnectionOutcome::Served(HandlerId::QUOTE));
    }

    #[tokio::test]
    async fn test_challenge_write_failure() {
        let mock = tokio_test::io::Builder::new()
            .write_error(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
            .build();

        let err = handler(0, Duration::from_secs(5)).handle(mock).await.unwrap_err();
        assert!(matches!(err, ConnectionError::WriteChallenge(_)));
    }

    #[tokio::test]
    async fn test_short_read_closes_without_response() {
        let mock = tokio_test::io::Builder::new()
            .write(&expected_frame(0))
            .read(&[1, 2, 3])
            .build();

        let err = handler(0, Duration::from_secs(5)).handle(mock).await.unwrap_err();
        assert!(matches!(err, ConnectionError::ReadSolution(_)));
        assert_eq!(err.kind(), kernel::error::kind::ErrorKind::Protocol);
    }

    #[tokio::test]
    async fn test_timeout_is_final() {
        let (server, mut client) = tokio::io::duplex(64);
        let task = tokio::spawn(async move {
            handler(0, Duration::from_millis(100)).handle(server).await
        });

        let mut frame = [0u8; CHALLENGE_FRAME_LEN];
        client.read_exact(&mut frame).await.unwrap();
        assert_eq!(frame, expected_frame(0));

        // A valid reply arriving after the deadline must not produce a second line
        tokio::time::sleep(Duration::from_millis(250)).await;
        let late = RequestFrame {
            solution: Solution::from_bytes([0; NONCE_SIZE]),
            handler_id: HandlerId::QUOTE,
        };
        let _ = client.write_all(&late.encode()).await;

        let mut response = String::new();
        client.read_to_string(&mut response).await.unwrap();
        assert_eq!(response, TIMEOUT_LINE);
        assert_eq!(task.await.unwrap().unwrap(), ConnectionOutcome::TimedOut);
    }

    #[tokio::test]
    async fn test_solution_within_deadline() {
        let (server, mut client) = tokio::io::duplex(64);
        let task = tokio::spawn(async move {
            handler(0, Duration::from_secs(5)).handle(server).await
        });

        let mut frame = [0u8; CHALLENGE_FRAME_LEN];
        client.read_exact(&mut frame).await.unwrap();
        let request = RequestFrame {
            solution: Solution::from_bytes([3; NONCE_SIZE]),
            handler_id: HandlerId::QUOTE,
        };
        client.write_all(&request.encode()).await.unwrap();

        let mut response = String::new();
        client.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("Here is your quote:"));
        assert!(response.ends_with('\n'));
        assert_eq!(task.await.unwrap().unwrap(), ConnectionOutcome::Served(HandlerId::QUOTE));
    }
}
