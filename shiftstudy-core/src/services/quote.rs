//! Quote service - motivational quote for the home dashboard
//!
//! One attempt against the provider per fetch. Any failure (network,
//! timeout, bad status, unparseable body) is masked by a random fallback
//! quote; the reason is returned so the caller can log it.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::domain::{fallback_quote, Quote};
use crate::ports::QuoteProvider;

/// Quote shown by the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "quote", rename_all = "lowercase")]
pub enum QuoteState {
    Idle,
    Loading,
    Ready(Quote),
}

/// Where a quote came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum QuoteSource {
    Remote,
    Fallback { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteOutcome {
    pub quote: Quote,
    #[serde(flatten)]
    pub source: QuoteSource,
}

impl QuoteOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, QuoteSource::Fallback { .. })
    }
}

pub struct QuoteService {
    provider: Arc<dyn QuoteProvider>,
    state: Mutex<QuoteState>,
}

impl QuoteService {
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self {
            provider,
            state: Mutex::new(QuoteState::Idle),
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn state(&self) -> QuoteState {
        self.state
            .lock()
            .map(|s| s.clone())
            .unwrap_or(QuoteState::Idle)
    }

    /// Fetch a quote, falling back to a local one on any failure
    pub async fn fetch_quote(&self) -> QuoteOutcome {
        self.set_state(QuoteState::Loading);

        let outcome = match self.provider.random_quote().await {
            Ok(quote) => QuoteOutcome {
                quote,
                source: QuoteSource::Remote,
            },
            Err(e) => QuoteOutcome {
                quote: fallback_quote(&mut rand::thread_rng()),
                source: QuoteSource::Fallback {
                    reason: e.to_string(),
                },
            },
        };

        self.set_state(QuoteState::Ready(outcome.quote.clone()));
        outcome
    }

    fn set_state(&self, state: QuoteState) {
        if let Ok(mut current) = self.state.lock() {
            *current = state;
        }
    }
}
