//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

pub mod auth;
pub mod logging;
pub mod migration;
pub mod password;
pub mod quote;
pub mod task;

pub use auth::{AuthService, AuthState, SignupForm};
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use password::{hash_password, verify_password};
pub use quote::{QuoteOutcome, QuoteService, QuoteSource, QuoteState};
pub use task::{TaskService, TaskSnapshot, TaskStatus};
