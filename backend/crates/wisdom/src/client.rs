//! Client
//!
//! [`PowClient`] performs one full exchange: read the challenge, solve it
//! off the async runtime, send `solution || handler_id`, read the reply line.
//! [`run_load`] drives many exchanges at a fixed request rate.

use crate::application::config::{ClientConfig, DEFAULT_SOLVE_TIMEOUT};
use crate::error::{ClientError, ClientResult};
use crate::presentation::protocol::{HandlerId, RequestFrame, read_challenge};
use kernel::error::app_error::AppError;
use kernel::id::RequestId;
use pow::{Hashcash, SolveBudget};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::task::JoinSet;
use tracing::Instrument;

#[derive(Debug, Clone)]
pub struct PowClient {
    server_addr: String,
    max_solve_attempts: Option<u64>,
    solve_timeout: Duration,
}

impl PowClient {
    pub fn new(server_addr: impl Into<String>) -> Self {
        Self {
            server_addr: server_addr.into(),
            max_solve_attempts: None,
            solve_timeout: DEFAULT_SOLVE_TIMEOUT,
        }
    }

    /// Cap the solver instead of deriving the budget from the difficulty.
    pub fn with_max_solve_attempts(mut self, attempts: u64) -> Self {
        self.max_solve_attempts = Some(attempts);
        self
    }

    /// Give up on a challenge after `timeout` of solving.
    pub fn with_solve_timeout(mut self, timeout: Duration) -> Self {
        self.solve_timeout = timeout;
        self
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            server_addr: config.server_addr.clone(),
            max_solve_attempts: config.max_solve_attempts,
            solve_timeout: config.solve_timeout,
        }
    }

    /// Run one exchange and return the server's response line, newline included.
    pub async fn request(&self, handler_id: HandlerId) -> ClientResult<String> {
        let mut stream = TcpStream::connect(self.server_addr.as_str())
            .await
            .map_err(|source| ClientError::Connect {
                addr: self.server_addr.clone(),
                source,
            })?;

        let frame = read_challenge(&mut stream)
            .await
            .map_err(ClientError::ReadChallenge)?;
        let budget = self
            .max_solve_attempts
            .map(SolveBudget::attempts)
            .unwrap_or_else(|| SolveBudget::for_difficulty(frame.difficulty))
            .with_time_limit(self.solve_timeout);

        let solution = tokio::task::spawn_blocking(move || {
            Hashcash::new().solve(&frame.challenge, frame.difficulty, budget)
        })
        .await??;
        tracing::debug!(
            difficulty = frame.difficulty.bits(),
            leading_zero_bits = pow::count_leading_zero_bits(&pow::compute_pow_hash(
                &frame.challenge,
                &solution
            )),
            "Challenge solved"
        );

        let request = RequestFrame {
            solution,
            handler_id,
        };
        stream
            .write_all(&request.encode())
            .await
            .map_err(ClientError::SendSolution)?;

        let mut response = String::new();
        let read = BufReader::new(stream)
            .read_line(&mut response)
            .await
            .map_err(ClientError::ReadResponse)?;
        if read == 0 {
            return Err(ClientError::EmptyResponse);
        }
        Ok(response)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl LoadSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Start `total_requests` requests at `rps` and wait for all of them.
pub async fn run_load(config: &ClientConfig) -> LoadSummary {
    let client = PowClient::from_config(config);
    let handler_id = config.handler_id;
    let mut ticker = tokio::time::interval(config.request_interval());
    let mut requests = JoinSet::new();

    for request_num in 0..config.total_requests {
        ticker.tick().await;

        let client = client.clone();
        let span = tracing::info_span!("request", request_id = %RequestId::new(), request_num);
        requests.spawn(
            async move {
                match client.request(handler_id).await {
                    Ok(response) => {
                        tracing::info!(response = response.trim_end(), "Request succeeded");
                        true
                    }
                    Err(err) => {
                        let err = AppError::from(err);
                        if err.is_expected() {
                            tracing::warn!(error = %err, kind = %err.kind(), "Request failed");
                        } else {
                            tracing::error!(error = %err, kind = %err.kind(), "Request failed");
                        }
                        false
                    }
                }
            }
            .instrument(span),
        );
    }

    let mut summary = LoadSummary::default();
    while let Some(joined) = requests.join_next().await {
        match joined {
            Ok(true) => summary.succeeded += 1,
            Ok(false) => summary.failed += 1,
            Err(err) => {
                tracing::error!(error = %err, "Request task failed");
                summary.failed += 1;
            }
        }
    }

    tracing::info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "All requests finished"
    );
    summary
}
