//! Quote provider port
//!
//! Defines the interface for fetching a motivational quote from an
//! external source.

use async_trait::async_trait;

use crate::domain::result::Result;
use crate::domain::Quote;

/// Remote source of quotes
///
/// Implementations make a single attempt per call: no retry, no caching.
/// The QuoteService masks failures with a local fallback.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Provider name (e.g., "quotable")
    fn name(&self) -> &str;

    /// Fetch one random quote
    async fn random_quote(&self) -> Result<Quote>;
}
