//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for the UserStore and TaskStore ports
//! - Quotable HTTP client for QuoteProvider

pub mod duckdb;
pub mod quotable;

#[cfg(test)]
pub mod quotable_mock;
