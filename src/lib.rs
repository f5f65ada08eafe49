//! # vacancydb - Job-board vacancy store
//!
//! Persists employer and vacancy records harvested from a job-board API and
//! answers salary analytics over them.
//!
//! vacancydb provides:
//! - SQLite schema with external-id deduplication and employer references
//! - Idempotent batch loading with per-record failure isolation
//! - One salary normalization rule shared by Rust code and SQL
//! - Query engine for counts, rankings, keyword search and salary statistics

pub mod config;
pub mod loader;
pub mod query;
pub mod record;
pub mod salary;
pub mod source;
pub mod storage;
pub mod ui;

// Re-exports for convenient access
pub use config::DatabaseConfig;
pub use loader::{LoadStats, RecordLoader};
pub use query::QueryEngine;
pub use record::{EmployerRecord, VacancyRecord};
pub use salary::{Salary, comparable_salary, display_salary};
pub use source::{DataSource, InMemorySource, JsonDataSource};
pub use storage::VacancyStore;

/// Result type alias for vacancydb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for vacancydb operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}
