//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - employers(employer_id, name, description, site_url, alternate_url,
//!   logo_urls, area, industries)
//! - vacancies(vacancy_id, employer_id -> employers.employer_id, name,
//!   salary_*, ..., alternate_url)
//!
//! Every statement runs in auto-commit mode; there is no multi-statement
//! transaction around a batch.

pub mod connection;
pub mod schema;
pub mod sqlite;

pub use connection::ConnectionProvider;
pub use sqlite::{DbStats, VacancyStore};
