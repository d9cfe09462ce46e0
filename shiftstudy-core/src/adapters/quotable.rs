//! Quotable API client
//!
//! Fetches a random motivational quote with one GET request. No
//! authentication, no pagination, no retry.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::QuoteApiSettings;
use crate::domain::result::{Error, Result};
use crate::domain::Quote;
use crate::ports::QuoteProvider;

/// Production base URL
pub const DEFAULT_BASE_URL: &str = "https://api.quotable.io";

/// Tag filter sent with every request
pub const QUOTE_TAGS: &str = "education|learning|wisdom|success|inspirational";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Quotable `/random` response. Only the fields we use; the rest is ignored.
#[derive(Debug, Deserialize)]
pub struct QuotableResponse {
    pub content: String,
    pub author: String,
}

/// Quotable API client
#[derive(Debug)]
pub struct QuotableClient {
    client: Client,
    base_url: String,
}

impl QuotableClient {
    /// Create a client for `base_url` with a request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the `quoteApi` settings section
    pub fn from_settings(settings: &QuoteApiSettings) -> Result<Self> {
        Self::new(&settings.base_url, Duration::from_secs(settings.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl QuoteProvider for QuotableClient {
    fn name(&self) -> &str {
        "quotable"
    }

    async fn random_quote(&self) -> Result<Quote> {
        let url = format!("{}/random", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("tags", QUOTE_TAGS)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::quote(format!("Quote service returned {}", status)));
        }

        let body: QuotableResponse = response
            .json()
            .await
            .map_err(|e| Error::quote(format!("Failed to parse quote response: {}", e)))?;

        if body.content.trim().is_empty() {
            return Err(Error::quote("Quote service returned an empty quote"));
        }

        Ok(Quote::new(body.content, body.author))
    }
}
