//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of vocabulary shared by the
//! PoW engine, the quote provider and the server:
//! - Error classification and the unified error type
//! - Typed IDs used to correlate log lines
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all crates.

pub mod error {
    pub mod app_error;
    pub mod kind;
}
pub mod id;

pub use error::app_error::{AppError, AppResult};
pub use error::kind::ErrorKind;
