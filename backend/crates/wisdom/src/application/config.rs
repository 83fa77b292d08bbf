//! Application Configuration
//!
//! Runtime settings for the server and the load-generating client. Values are
//! populated by the binaries (CLI flags / `APP_*` environment) and checked with
//! `validate()` before anything is started.

use crate::presentation::protocol::HandlerId;
use kernel::error::app_error::{AppError, AppResult};
use pow::Difficulty;
use std::time::Duration;

/// Accepted connections waiting for a free worker.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Client-side limit on one solve; matches the server's default `pow_timeout`.
pub const DEFAULT_SOLVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Leading zero bits required of `SHA-256(challenge || solution)`
    pub difficulty: Difficulty,
    /// Listen address (`host:port`)
    pub addr: String,
    /// Number of connections served concurrently
    pub worker_count: usize,
    /// Accepted connections buffered ahead of the workers
    pub queue_capacity: usize,
    /// Grace period for in-flight connections on shutdown
    pub shutdown_timeout: Duration,
    /// Time a client has to return its reply after the challenge is sent
    pub pow_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::DEFAULT,
            addr: "0.0.0.0:8080".to_string(),
            worker_count: 10,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            shutdown_timeout: Duration::from_secs(5),
            pow_timeout: Duration::from_secs(5),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> AppResult<()> {
        if self.addr.trim().is_empty() {
            return Err(AppError::invalid_config("listen address must not be empty")
                .with_action("Set APP_ADDR, e.g. 0.0.0.0:8080"));
        }
        if self.worker_count == 0 {
            return Err(
                AppError::invalid_config("worker_count must be greater than 0")
                    .with_action("Set APP_WORKERCOUNT to a positive integer"),
            );
        }
        if self.queue_capacity == 0 {
            return Err(
                AppError::invalid_config("queue_capacity must be greater than 0")
                    .with_action("Set APP_QUEUECAPACITY to a positive integer"),
            );
        }
        if self.pow_timeout.is_zero() {
            return Err(AppError::invalid_config("pow_timeout must be greater than 0")
                .with_action("Set APP_POWTIMEOUT to a positive duration"));
        }
        if !self.difficulty.is_practical() {
            tracing::warn!(
                difficulty = self.difficulty.bits(),
                max_practical = Difficulty::MAX_PRACTICAL,
                "Difficulty is beyond what clients can solve in reasonable time"
            );
        }
        Ok(())
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server address (`host:port`)
    pub server_addr: String,
    /// Requests started per second
    pub rps: u32,
    /// Requests started in total
    pub total_requests: usize,
    /// Capability requested after the challenge is solved
    pub handler_id: HandlerId,
    /// Cap on solve attempts; derived from the difficulty when unset
    pub max_solve_attempts: Option<u64>,
    /// Wall-clock limit on one solve
    pub solve_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:8080".to_string(),
            rps: 10,
            total_requests: 100,
            handler_id: HandlerId::QUOTE,
            max_solve_attempts: None,
            solve_timeout: DEFAULT_SOLVE_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> AppResult<()> {
        if self.server_addr.trim().is_empty() {
            return Err(AppError::invalid_config("server address must not be empty")
                .with_action("Set APP_SERVERADDR, e.g. 127.0.0.1:8080"));
        }
        if self.rps == 0 {
            return Err(AppError::invalid_config("rps must be greater than 0")
                .with_action("Set APP_RPS to a positive integer"));
        }
        if self.solve_timeout.is_zero() {
            return Err(AppError::invalid_config("solve_timeout must be greater than 0")
                .with_action("Set APP_SOLVETIMEOUT to a positive duration"));
        }
        Ok(())
    }

    /// Pause between two request starts.
    pub fn request_interval(&self) -> Duration {
        (Duration::from_secs(1) / self.rps.max(1)).max(Duration::from_nanos(1))
    }
}
