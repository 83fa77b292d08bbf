//! PoW Error Types
//!
//! This module provides PoW-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// PoW-specific result type alias
pub type PowResult<T> = Result<T, PowError>;

/// PoW-specific error variants
#[derive(Debug, Error)]
pub enum PowError {
    /// The solve budget ran out before a valid candidate was found
    #[error("no solution found after {attempts} attempts at difficulty {difficulty}")]
    SolveExhausted { attempts: u64, difficulty: u8 },
}

impl PowError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            PowError::SolveExhausted { .. } => ErrorKind::Exhausted,
        }
    }
}

impl From<PowError> for AppError {
    fn from(err: PowError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        AppError::new(kind, message)
            .with_action("Lower the server difficulty or raise the solve budget")
    }
}
