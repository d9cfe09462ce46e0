//! Event log migrations - embedded SQL files
//!
//! The event log lives in its own database file (logs.duckdb) so it can be
//! exported or cleared without touching user data. Applied by the same
//! MigrationService as the main schema.

/// Event log migrations, in application order.
/// Format: (filename, sql_content)
pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    ("001_initial_schema.sql", include_str!("001_initial_schema.sql")),
];
