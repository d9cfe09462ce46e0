//! ShiftStudy Core - tasks, schedule and accounts for student productivity
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core entities (User, Task, Quote) and derived task views
//! - **ports**: Trait definitions for external dependencies (UserStore, TaskStore, QuoteProvider)
//! - **services**: Business logic orchestration (auth, task view-state, quotes, logging)
//! - **adapters**: Concrete implementations (DuckDB, Quotable)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use adapters::duckdb::DuckDbRepository;
use adapters::quotable::QuotableClient;
use config::Config;
use ports::QuoteProvider;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult, Result};
pub use domain::{Quote, Task, TaskDraft, TaskFilter, User};

/// File name of the main database inside the data directory
pub const DB_FILENAME: &str = "shiftstudy.duckdb";

/// Main context for ShiftStudy operations
///
/// Owns the store handle and hands it to every service that needs it.
/// Nothing here is global: each context is independent.
pub struct ShiftStudyContext {
    pub config: Config,
    pub data_dir: Option<PathBuf>,
    pub repository: Arc<DuckDbRepository>,
    pub auth_service: AuthService,
    pub task_service: TaskService,
    pub quote_service: QuoteService,
}

impl ShiftStudyContext {
    /// Open the context backed by the data directory
    ///
    /// Creates the directory and the database if needed and applies
    /// pending migrations.
    pub fn new(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let config = Config::load(data_dir)?;

        let repository = Arc::new(DuckDbRepository::new(&data_dir.join(DB_FILENAME))?);
        repository.ensure_schema()?;

        let quote_provider = Arc::new(QuotableClient::from_settings(
            &config.effective_quote_api(),
        )?);

        let mut context = Self::with_parts(config, repository, quote_provider);
        context.data_dir = Some(data_dir.to_path_buf());
        Ok(context)
    }

    /// Build a context from an already opened repository and quote provider
    pub fn with_parts(
        config: Config,
        repository: Arc<DuckDbRepository>,
        quote_provider: Arc<dyn QuoteProvider>,
    ) -> Self {
        let auth_service = AuthService::new(repository.clone());
        let task_service = TaskService::new(repository.clone());
        let quote_service = QuoteService::new(quote_provider);

        Self {
            config,
            data_dir: None,
            repository,
            auth_service,
            task_service,
            quote_service,
        }
    }

    /// Log in and load the user's tasks
    pub fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        let user = self.auth_service.submit_login(email, password)?;
        self.task_service.load_for_user(user.id)?;
        Ok(user)
    }

    /// Persist the current config to the data directory
    pub fn save_config(&self) -> Result<()> {
        match &self.data_dir {
            Some(dir) => self.config.save(dir),
            None => Err(Error::Config("No data directory to save settings to".into())),
        }
    }
}
