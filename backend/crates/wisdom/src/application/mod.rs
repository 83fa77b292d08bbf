//! Application Layer
//!
//! Configuration and the connection state machine.

pub mod config;
pub mod connection;
