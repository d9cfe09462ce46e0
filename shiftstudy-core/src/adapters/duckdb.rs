//! DuckDB repository implementation

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use duckdb::{params, Connection, Params, Row};

use crate::domain::result::{Error, Result};
use crate::domain::{Task, User};
use crate::ports::{TaskStore, UserStore};
use crate::services::{MigrationResult, MigrationService};

/// Maximum number of retries when the database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

const USER_COLUMNS: &str = "user_id, email, password, name, created_at";

const TASK_COLUMNS: &str = "task_id, user_id, title, description, due_date, due_time, \
                            category, priority, is_completed, created_at";

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
        || lower.contains("could not set lock on file")
}

/// Check if an error message is a unique constraint violation
fn is_unique_violation(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    lower.contains("duplicate key") || lower.contains("unique constraint")
}

fn row_to_user(row: &Row<'_>) -> duckdb::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        password: row.get(2)?,
        name: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn row_to_task(row: &Row<'_>) -> duckdb::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        due_date: row.get(4)?,
        due_time: row.get(5)?,
        category: row.get(6)?,
        priority: row.get(7)?,
        is_completed: row.get(8)?,
        created_at: row.get(9)?,
    })
}

/// DuckDB repository implementation
///
/// One connection per repository, shared behind a mutex. Construct it once
/// and hand it to the services that need it.
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl DuckDbRepository {
    /// Open (or create) the database file at `db_path`
    ///
    /// Opening retries with exponential backoff when the file is locked by
    /// another process (e.g. a second CLI invocation). Queries and writes
    /// are never retried.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: Some(db_path.to_path_buf()),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[shiftstudy] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::database(format!("Failed to open database after {} retries", MAX_RETRIES))
        }))
    }

    /// Open a private in-memory database (one per call)
    pub fn open_in_memory() -> Result<Self> {
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_in_memory_with_flags(config)?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: None,
        })
    }

    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Extension autoloading stays off so cached extensions are never picked up
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Ok(Connection::open_with_flags(db_path, config)?)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::database(format!("Lock poisoned: {}", e)))
    }

    /// Path of the database file, `None` for in-memory databases
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Run database migrations using the MigrationService
    pub fn run_migrations(&self) -> Result<MigrationResult> {
        let conn = self.lock()?;
        MigrationService::new(&conn).run_pending()
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    fn query_tasks<P: Params>(&self, sql: &str, params: P) -> Result<Vec<Task>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, row_to_task)?;

        let mut tasks = Vec::new();
        for task in rows {
            tasks.push(task?);
        }
        Ok(tasks)
    }

    fn query_user<P: Params>(&self, sql: &str, params: P) -> Result<Option<User>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query_map(params, row_to_user)?;
        match rows.next() {
            Some(user) => Ok(Some(user?)),
            None => Ok(None),
        }
    }

    /// Number of users whose email matches exactly
    pub fn count_users_with_email(&self, email: &str) -> Result<i64> {
        let conn = self.lock()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE email = ?",
            [email],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

impl UserStore for DuckDbRepository {
    fn insert_user(&self, user: &User) -> Result<i64> {
        let conn = self.lock()?;
        let user_id: i64 = conn.query_row("SELECT nextval('seq_user_id')", [], |row| row.get(0))?;

        conn.execute(
            "INSERT INTO users (user_id, email, password, name, created_at)
             VALUES (?, ?, ?, ?, ?)",
            params![user_id, user.email, user.password, user.name, user.created_at],
        )
        .map_err(|e| {
            if is_unique_violation(&e.to_string()) {
                Error::DuplicateEmail
            } else {
                Error::from(e)
            }
        })?;

        Ok(user_id)
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.query_user(
            &format!("SELECT {} FROM users WHERE email = ? LIMIT 1", USER_COLUMNS),
            [email],
        )
    }

    fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>> {
        self.query_user(
            &format!("SELECT {} FROM users WHERE user_id = ?", USER_COLUMNS),
            [user_id],
        )
    }

    /// Deletes the user's tasks first, then the user.
    ///
    /// Note: not wrapped in an explicit transaction because DuckDB checks
    /// foreign keys eagerly inside transactions. Each statement auto-commits
    /// and the order keeps the constraint satisfied.
    fn delete_user(&self, user_id: i64) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM tasks WHERE user_id = ?", params![user_id])?;
        conn.execute("DELETE FROM users WHERE user_id = ?", params![user_id])?;
        Ok(())
    }
}

impl TaskStore for DuckDbRepository {
    fn insert_task(&self, task: &Task) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO tasks (user_id, title, description, due_date, due_time,
                                category, priority, is_completed, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                task.user_id,
                task.title,
                task.description,
                task.due_date,
                task.due_time,
                task.category,
                task.priority,
                task.is_completed,
                task.created_at,
            ],
        )?;
        Ok(())
    }

    fn update_task(&self, task: &Task) -> Result<()> {
        let conn = self.lock()?;
        // user_id is not updated: a task never changes owner
        let updated = conn.execute(
            "UPDATE tasks SET title = ?, description = ?, due_date = ?, due_time = ?,
                              category = ?, priority = ?, is_completed = ?
             WHERE task_id = ?",
            params![
                task.title,
                task.description,
                task.due_date,
                task.due_time,
                task.category,
                task.priority,
                task.is_completed,
                task.id,
            ],
        )?;

        if updated == 0 {
            return Err(Error::not_found(format!("task {}", task.id)));
        }
        Ok(())
    }

    fn delete_task(&self, task_id: i64) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM tasks WHERE task_id = ?", params![task_id])?;
        Ok(())
    }

    fn get_tasks_for_user(&self, user_id: i64) -> Result<Vec<Task>> {
        self.query_tasks(
            &format!(
                "SELECT {} FROM tasks WHERE user_id = ? ORDER BY due_date ASC, task_id ASC",
                TASK_COLUMNS
            ),
            [user_id],
        )
    }

    fn get_incomplete_tasks_for_user(&self, user_id: i64) -> Result<Vec<Task>> {
        self.query_tasks(
            &format!(
                "SELECT {} FROM tasks WHERE user_id = ? AND NOT is_completed
                 ORDER BY due_date ASC, task_id ASC",
                TASK_COLUMNS
            ),
            [user_id],
        )
    }

    fn get_tasks_in_range(&self, user_id: i64, start: i64, end: i64) -> Result<Vec<Task>> {
        self.query_tasks(
            &format!(
                "SELECT {} FROM tasks WHERE user_id = ? AND due_date >= ? AND due_date < ?
                 ORDER BY due_date ASC, task_id ASC",
                TASK_COLUMNS
            ),
            [user_id, start, end],
        )
    }

    fn get_task_by_id(&self, task_id: i64) -> Result<Option<Task>> {
        let tasks = self.query_tasks(
            &format!("SELECT {} FROM tasks WHERE task_id = ?", TASK_COLUMNS),
            [task_id],
        )?;
        Ok(tasks.into_iter().next())
    }
}
