//! Task service - the in-memory task list for the active user
//!
//! Every mutation writes to the store and then reloads the owner's full list.
//! There is no optimistic update: the list changes only after a successful
//! reload. On any failure the previous list is kept and the status carries
//! the message.
//!
//! State is published through a `tokio::sync::watch` channel. Subscribers
//! see each snapshot; callers without a runtime can poll [`TaskService::snapshot`].

use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use serde::Serialize;
use tokio::sync::watch;

use crate::domain::result::{Error, Result};
use crate::domain::schedule;
use crate::domain::{DayBucket, Task, TaskCounts, TaskFilter};
use crate::ports::TaskStore;

/// Status of the last task operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum TaskStatus {
    Idle,
    Loading,
    Success,
    Error(String),
}

/// Everything a task screen renders from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSnapshot {
    /// Owner of `tasks`, `None` until the first successful load
    pub user_id: Option<i64>,
    /// Ordered by due date ascending
    pub tasks: Vec<Task>,
    pub status: TaskStatus,
}

impl Default for TaskSnapshot {
    fn default() -> Self {
        Self {
            user_id: None,
            tasks: Vec::new(),
            status: TaskStatus::Idle,
        }
    }
}

pub struct TaskService {
    store: Arc<dyn TaskStore>,
    state: watch::Sender<TaskSnapshot>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        let (state, _) = watch::channel(TaskSnapshot::default());
        Self { store, state }
    }

    /// Receive every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<TaskSnapshot> {
        self.state.subscribe()
    }

    /// Current snapshot
    pub fn snapshot(&self) -> TaskSnapshot {
        self.state.borrow().clone()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.state.borrow().tasks.clone()
    }

    pub fn status(&self) -> TaskStatus {
        self.state.borrow().status.clone()
    }

    /// Load every task owned by `user_id`
    ///
    /// On failure the previous list stays in place.
    pub fn load_for_user(&self, user_id: i64) -> Result<Vec<Task>> {
        self.set_status(TaskStatus::Loading);

        match self.store.get_tasks_for_user(user_id) {
            Ok(tasks) => {
                self.state.send_modify(|s| {
                    s.user_id = Some(user_id);
                    s.tasks = tasks.clone();
                    s.status = TaskStatus::Success;
                });
                Ok(tasks)
            }
            Err(e) => {
                self.set_status(TaskStatus::Error(e.to_string()));
                Err(e)
            }
        }
    }

    /// Insert a task, then reload its owner's list
    pub fn add_task(&self, task: &Task) -> Result<Vec<Task>> {
        self.write_then_reload(task.user_id, || self.store.insert_task(task))
    }

    /// Replace a task, then reload its owner's list
    pub fn update_task(&self, task: &Task) -> Result<Vec<Task>> {
        self.write_then_reload(task.user_id, || self.store.update_task(task))
    }

    /// Flip the completion flag, then reload
    pub fn toggle_completion(&self, task: &Task) -> Result<Vec<Task>> {
        self.update_task(&task.toggled())
    }

    /// Delete a task, then reload its owner's list
    pub fn delete_task(&self, task: &Task) -> Result<Vec<Task>> {
        self.write_then_reload(task.user_id, || self.store.delete_task(task.id))
    }

    /// Task from the current list by identifier
    pub fn find(&self, task_id: i64) -> Option<Task> {
        self.state
            .borrow()
            .tasks
            .iter()
            .find(|t| t.id == task_id)
            .cloned()
    }

    fn write_then_reload<F>(&self, user_id: i64, write: F) -> Result<Vec<Task>>
    where
        F: FnOnce() -> Result<()>,
    {
        self.set_status(TaskStatus::Loading);

        if let Err(e) = write() {
            self.set_status(TaskStatus::Error(e.to_string()));
            return Err(e);
        }

        // Write committed; a failed reload surfaces as Error::Reload
        self.load_for_user(user_id)
            .map_err(|e| Error::Reload(e.to_string()))
    }

    fn set_status(&self, status: TaskStatus) {
        self.state.send_modify(|s| s.status = status);
    }

    /// Tasks due today, in the time zone of `now`
    pub fn today<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<Task> {
        schedule::today(&self.state.borrow().tasks, now)
    }

    /// Next five incomplete tasks due from tomorrow on
    pub fn upcoming<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<Task> {
        schedule::upcoming(&self.state.borrow().tasks, now)
    }

    /// Monday-to-Sunday buckets for the week containing `now`
    pub fn week<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<DayBucket> {
        schedule::week(&self.state.borrow().tasks, now)
    }

    pub fn counts(&self) -> TaskCounts {
        schedule::counts(&self.state.borrow().tasks)
    }

    pub fn filtered(&self, filter: TaskFilter) -> Vec<Task> {
        schedule::filter(&self.state.borrow().tasks, filter)
    }
}
