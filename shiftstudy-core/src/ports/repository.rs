//! Repository ports - data access abstraction
//!
//! These traits are the data-access layer. Implementations turn storage
//! failures into [`Error::Database`](crate::domain::result::Error) and never
//! retry them.

use crate::domain::result::Result;
use crate::domain::{Task, User};

/// Data access for users
///
/// There is deliberately no update operation: profiles are never edited.
pub trait UserStore: Send + Sync {
    /// Insert a user and return the identifier assigned by the store
    fn insert_user(&self, user: &User) -> Result<i64>;

    /// Look up a user by exact (case-sensitive) email
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Look up a user by identifier
    fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>>;

    /// Delete a user together with every task they own
    ///
    /// Not reachable from any user-facing flow; used for maintenance.
    fn delete_user(&self, user_id: i64) -> Result<()>;
}

/// Data access for tasks
///
/// Every list is ordered by due date ascending.
pub trait TaskStore: Send + Sync {
    /// Insert a task; the caller re-reads to see the assigned identifier
    fn insert_task(&self, task: &Task) -> Result<()>;

    /// Replace every mutable field of the task matched by `task.id`
    fn update_task(&self, task: &Task) -> Result<()>;

    /// Delete the task matched by `task_id`
    fn delete_task(&self, task_id: i64) -> Result<()>;

    /// All tasks owned by `user_id`
    fn get_tasks_for_user(&self, user_id: i64) -> Result<Vec<Task>>;

    /// Tasks owned by `user_id` that are not completed
    fn get_incomplete_tasks_for_user(&self, user_id: i64) -> Result<Vec<Task>>;

    /// Tasks owned by `user_id` with `start <= due_date < end`
    fn get_tasks_in_range(&self, user_id: i64, start: i64, end: i64) -> Result<Vec<Task>>;

    /// Single task by identifier
    fn get_task_by_id(&self, task_id: i64) -> Result<Option<Task>>;
}
