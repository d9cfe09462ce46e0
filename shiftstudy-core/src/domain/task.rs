//! Task domain model

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::result::{Error, Result};

/// Priority values offered by the task form. Stored as free text.
pub const PRIORITIES: [&str; 3] = ["High", "Medium", "Low"];

/// Priority assigned when none is chosen
pub const DEFAULT_PRIORITY: &str = "Medium";

/// Sort key used for tasks without a due time ("all day")
pub const ALL_DAY_SORT_TIME: &str = "00:00";

/// A study task owned by exactly one user
///
/// Note: `category` is the subject the task belongs to (e.g. "CP3406").
/// `priority` is free text; see [`PRIORITIES`] for the values the UI offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    /// Unix epoch milliseconds
    pub due_date: i64,
    /// "HH:MM", absent means all day
    pub due_time: Option<String>,
    pub category: String,
    pub priority: String,
    pub is_completed: bool,
    /// Unix epoch milliseconds
    pub created_at: i64,
}

impl Task {
    /// Create a new task with required fields
    pub fn new(
        user_id: i64,
        title: impl Into<String>,
        category: impl Into<String>,
        due_date: i64,
    ) -> Self {
        Self {
            id: 0,
            user_id,
            title: title.into(),
            description: String::new(),
            due_date,
            due_time: None,
            category: category.into(),
            priority: DEFAULT_PRIORITY.to_string(),
            is_completed: false,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Copy with the completion flag flipped
    pub fn toggled(&self) -> Self {
        Self {
            is_completed: !self.is_completed,
            ..self.clone()
        }
    }

    /// Due time used for ordering inside a day
    pub fn sort_time(&self) -> &str {
        self.due_time.as_deref().unwrap_or(ALL_DAY_SORT_TIME)
    }

    /// Validate task data
    pub fn validate(&self) -> std::result::Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("task title cannot be empty");
        }
        if self.category.trim().is_empty() {
            return Err("task subject cannot be empty");
        }
        Ok(())
    }
}

/// Normalize a due time to zero-padded "HH:MM"
pub fn normalize_due_time(raw: &str) -> Result<String> {
    let time = NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| Error::validation(format!("Invalid time '{}'. Use HH:MM", raw.trim())))?;
    Ok(time.format("%H:%M").to_string())
}

/// Task form contents before they become a [`Task`]
///
/// Mirrors the add-task screen: title, subject and due date are required,
/// the rest is optional.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub subject: String,
    pub description: String,
    /// Unix epoch milliseconds
    pub due_date: Option<i64>,
    pub due_time: Option<String>,
    pub priority: Option<String>,
}

impl TaskDraft {
    /// Validate the form and build a task for `user_id`
    ///
    /// Checks run in form order, so the first missing field is reported.
    pub fn into_task(self, user_id: i64) -> Result<Task> {
        if self.title.trim().is_empty() {
            return Err(Error::validation("Please enter a title"));
        }
        if self.subject.trim().is_empty() {
            return Err(Error::validation("Please enter a subject"));
        }
        let due_date = self
            .due_date
            .ok_or_else(|| Error::validation("Please select a due date"))?;

        let due_time = match self.due_time.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(normalize_due_time(raw)?),
        };

        let priority = match self.priority.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_PRIORITY.to_string(),
            Some(p) => p.to_string(),
        };

        let mut task = Task::new(user_id, self.title.trim(), self.subject.trim(), due_date);
        task.description = self.description.trim().to_string();
        task.due_time = due_time;
        task.priority = priority;
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> TaskDraft {
        TaskDraft {
            title: "  Assignment 2 ".to_string(),
            subject: "CP3406".to_string(),
            description: " Write report ".to_string(),
            due_date: Some(1_700_000_000_000),
            due_time: None,
            priority: None,
        }
    }

    #[test]
    fn test_new_task_defaults() {
        let task = Task::new(1, "Read chapter", "History", 42);
        assert_eq!(task.id, 0);
        assert_eq!(task.priority, "Medium");
        assert!(!task.is_completed);
        assert!(task.due_time.is_none());
        assert!(task.description.is_empty());
    }

    #[test]
    fn test_toggle_twice_restores() {
        let task = Task::new(1, "Read chapter", "History", 42);
        let once = task.toggled();
        assert!(once.is_completed);
        assert_eq!(once.toggled(), task);
    }

    #[test]
    fn test_sort_time_defaults_to_midnight() {
        let mut task = Task::new(1, "Lab", "Chem", 0);
        assert_eq!(task.sort_time(), "00:00");
        task.due_time = Some("14:30".to_string());
        assert_eq!(task.sort_time(), "14:30");
    }

    #[test]
    fn test_validate() {
        let mut task = Task::new(1, "Lab", "Chem", 0);
        assert!(task.validate().is_ok());
        task.category = "   ".to_string();
        assert!(task.validate().is_err());
    }

    #[test]
    fn test_draft_trims_and_defaults() {
        let task = draft().into_task(9).unwrap();
        assert_eq!(task.user_id, 9);
        assert_eq!(task.title, "Assignment 2");
        assert_eq!(task.description, "Write report");
        assert_eq!(task.priority, DEFAULT_PRIORITY);
    }

    #[test]
    fn test_draft_requires_fields_in_order() {
        let mut d = draft();
        d.title = " ".into();
        d.subject = String::new();
        let err = d.into_task(1).unwrap_err();
        assert_eq!(err.to_string(), "Please enter a title");

        let mut d = draft();
        d.subject = String::new();
        assert_eq!(d.into_task(1).unwrap_err().to_string(), "Please enter a subject");

        let mut d = draft();
        d.due_date = None;
        assert_eq!(d.into_task(1).unwrap_err().to_string(), "Please select a due date");
    }

    #[test]
    fn test_draft_due_time() {
        let mut d = draft();
        d.due_time = Some("9:05".into());
        assert_eq!(d.into_task(1).unwrap().due_time.as_deref(), Some("09:05"));

        let mut d = draft();
        d.due_time = Some("".into());
        assert!(d.into_task(1).unwrap().due_time.is_none());

        let mut d = draft();
        d.due_time = Some("25:00".into());
        assert!(matches!(d.into_task(1), Err(Error::Validation(_))));
    }
}
