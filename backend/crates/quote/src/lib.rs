//! Quote provider
//!
//! - `domain/` - The [`Quote`] entity and the [`QuoteRepository`] trait
//! - `infra/` - In-memory implementation backed by a built-in set or a JSON file
//!
//! Repositories are read-only after construction and safe to share between
//! connection workers.

pub mod domain;
pub mod error;
pub mod infra;

pub use domain::entities::Quote;
pub use domain::repository::{LocalQuoteRepository, QuoteRepository};
pub use error::{QuoteError, QuoteResult};
pub use infra::static_repository::StaticQuoteRepository;
