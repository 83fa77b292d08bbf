//! Word-of-wisdom server core
//!
//! A TCP service that hands out a quote only after the client has solved a
//! hashcash proof-of-work challenge.
//!
//! - `presentation/` - Wire framing, the handler registry and its handlers
//! - `application/` - Configuration and the per-connection state machine
//! - `infra/` - Acceptor, worker pool and server lifecycle
//! - [`client`] - Client library used by the load generator and the tests
//!
//! ## Protocol
//! 1. Server sends `challenge[8] || difficulty[1]`
//! 2. Client replies `solution[8] || handler_id[1]` within the PoW timeout
//! 3. Server writes one newline-terminated line and closes the connection

pub mod application;
pub mod client;
pub mod error;
pub mod infra;
pub mod presentation;

pub use application::config::{
    ClientConfig, DEFAULT_QUEUE_CAPACITY, DEFAULT_SOLVE_TIMEOUT, ServerConfig,
};
pub use application::connection::{ConnectionHandler, ConnectionOutcome};
pub use client::{LoadSummary, PowClient, run_load};
pub use error::{ClientError, ConnectionError, ServerError};
pub use infra::server::{PowServer, RunningServer, ShutdownReport};
pub use presentation::handlers::QuoteHandler;
pub use presentation::protocol::HandlerId;
pub use presentation::router::{Handler, HandlerFuture, HandlerRegistry};
