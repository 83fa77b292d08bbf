//! Application Layer
//!
//! Stateful engine built on top of the pure domain services.

pub mod engine;
