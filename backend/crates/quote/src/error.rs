//! Quote Error Types

use kernel::error::{app_error::AppError, kind::ErrorKind};
use std::path::PathBuf;
use thiserror::Error;

/// Quote-specific result type alias
pub type QuoteResult<T> = Result<T, QuoteError>;

#[derive(Debug, Error)]
pub enum QuoteError {
    /// The repository holds no quotes
    #[error("no quotes available")]
    NotFound,

    /// The quote file could not be read
    #[error("failed to read quotes from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The quote file is not a JSON array of quotes
    #[error("failed to parse quotes from {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl QuoteError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuoteError::NotFound => ErrorKind::NotFound,
            QuoteError::Read { .. } | QuoteError::Parse { .. } => ErrorKind::InvalidConfig,
        }
    }
}

impl From<QuoteError> for AppError {
    fn from(err: QuoteError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        match err {
            QuoteError::NotFound => AppError::new(kind, message),
            QuoteError::Read { source, .. } => AppError::new(kind, message)
                .with_action("Check APP_QUOTESFILE points to a readable file")
                .with_source(source),
            QuoteError::Parse { source, .. } => AppError::new(kind, message)
                .with_action("The quotes file must be a JSON array of {\"text\", \"author\"}")
                .with_source(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_kind() {
        assert_eq!(QuoteError::NotFound.kind(), ErrorKind::NotFound);
        assert_eq!(QuoteError::NotFound.to_string(), "no quotes available");
    }

    #[test]
    fn test_read_error_into_app_error() {
        let err = QuoteError::Read {
            path: PathBuf::from("/missing.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let app: AppError = err.into();
        assert_eq!(app.kind(), ErrorKind::InvalidConfig);
        assert!(app.message().contains("/missing.json"));
        assert!(app.action().is_some());
    }
}
