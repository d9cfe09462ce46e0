//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod quote;
pub mod result;
pub mod schedule;
mod task;
mod user;
pub mod validation;

pub use quote::{fallback_quote, Quote, FALLBACK_QUOTES};
pub use schedule::{DayBounds, DayBucket, TaskCounts, TaskFilter};
pub use task::{normalize_due_time, Task, TaskDraft, DEFAULT_PRIORITY, PRIORITIES};
pub use user::User;
