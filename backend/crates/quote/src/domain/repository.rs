//! Repository Traits
//!
//! Interfaces for quote lookup. Implementation is in infrastructure layer.

use crate::domain::entities::Quote;
use crate::error::QuoteResult;

/// Quote repository trait
#[trait_variant::make(QuoteRepository: Send)]
pub trait LocalQuoteRepository {
    /// Pick a quote
    ///
    /// Fails with `QuoteError::NotFound` when the repository is empty.
    async fn random_quote(&self) -> QuoteResult<Quote>;
}
