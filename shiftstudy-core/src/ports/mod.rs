//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core domain
//! depends only on these traits, not on concrete implementations.

mod quote_provider;
mod repository;

pub use quote_provider::QuoteProvider;
pub use repository::{TaskStore, UserStore};
