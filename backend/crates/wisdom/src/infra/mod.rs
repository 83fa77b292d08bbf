//! Infrastructure Layer - Sockets, workers and lifecycle

pub(crate) mod pool;
pub mod server;
