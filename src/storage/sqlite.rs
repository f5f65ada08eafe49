//! SQLite storage implementation

use rusqlite::{Connection, params};

use super::connection::ConnectionProvider;
use super::schema;
use crate::Result;
use crate::config::DatabaseConfig;
use crate::record::{EmployerRecord, VacancyRecord, opaque_json};

/// SQLite-backed store for employers and vacancies
pub struct VacancyStore {
    provider: ConnectionProvider,
}

impl VacancyStore {
    /// Open a database file (creates if doesn't exist).
    ///
    /// Connects immediately so an unreachable store is reported here rather
    /// than on the first query.
    pub fn open(config: DatabaseConfig) -> Result<Self> {
        config.validate()?;
        let mut provider = ConnectionProvider::new(config);
        provider.connect()?;
        Ok(Self { provider })
    }

    /// Open an in-memory database with the schema in place (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let mut store = Self::open(DatabaseConfig::in_memory())?;
        store.create_schema()?;
        Ok(store)
    }

    pub fn config(&self) -> &DatabaseConfig {
        self.provider.config()
    }

    /// Live connection, reopened if it was closed
    pub fn connection(&mut self) -> Result<&Connection> {
        self.provider.connect()
    }

    pub fn is_connected(&self) -> bool {
        self.provider.is_connected()
    }

    /// Release the connection; the next operation reopens it
    pub fn close(&mut self) {
        self.provider.disconnect();
    }

    // ========== Schema Operations ==========

    /// Create both tables and their constraints if absent
    pub fn create_schema(&mut self) -> Result<()> {
        let conn = self.connection()?;
        for stmt in schema::all_schema_statements() {
            conn.execute(stmt, [])?;
        }
        tracing::info!("Schema ready (employers, vacancies)");
        Ok(())
    }

    /// Drop both tables with all their rows. Irreversible.
    pub fn drop_schema(&mut self) -> Result<()> {
        let conn = self.connection()?;
        for stmt in schema::DROP_TABLES {
            conn.execute(stmt, [])?;
        }
        tracing::info!("Schema dropped");
        Ok(())
    }

    // ========== Insert Operations ==========

    /// Insert an employer unless its external id is already stored.
    ///
    /// Returns `true` only when a row was written.
    pub fn insert_employer(&mut self, employer: &EmployerRecord) -> Result<bool> {
        let conn = self.connection()?;
        let written = conn.execute(
            r#"
            INSERT INTO employers (
                employer_id, name, description, site_url,
                alternate_url, logo_urls, area, industries
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT (employer_id) DO NOTHING
            "#,
            params![
                employer.id,
                employer.name,
                employer.description,
                employer.site_url,
                employer.alternate_url,
                opaque_json(employer.logo_urls.as_ref()),
                opaque_json(employer.area.as_ref()),
                opaque_json(employer.industries.as_ref()),
            ],
        )?;
        Ok(written == 1)
    }

    /// Insert a vacancy unless its external id is already stored.
    ///
    /// Fails when the referenced employer is not stored yet.
    pub fn insert_vacancy(&mut self, vacancy: &VacancyRecord) -> Result<bool> {
        let conn = self.connection()?;
        let written = conn.execute(
            r#"
            INSERT INTO vacancies (
                vacancy_id, employer_id, name, salary_from, salary_to,
                salary_currency, salary_gross, area, published_at, created_at,
                requirement, responsibility, employment, experience, alternate_url
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            ON CONFLICT (vacancy_id) DO NOTHING
            "#,
            params![
                vacancy.id,
                vacancy.employer_id(),
                vacancy.name,
                vacancy.salary_from(),
                vacancy.salary_to(),
                vacancy.salary_currency(),
                vacancy.salary_gross(),
                opaque_json(vacancy.area.as_ref()),
                vacancy.published_at,
                vacancy.created_at,
                vacancy.requirement,
                vacancy.responsibility,
                vacancy.employment_name(),
                vacancy.experience_name(),
                vacancy.alternate_url,
            ],
        )?;
        Ok(written == 1)
    }

    // ========== Counts ==========

    pub fn count_employers(&mut self) -> Result<usize> {
        let count: i64 = self
            .connection()?
            .query_row("SELECT COUNT(*) FROM employers", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn count_vacancies(&mut self) -> Result<usize> {
        let count: i64 = self
            .connection()?
            .query_row("SELECT COUNT(*) FROM vacancies", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Get database statistics
    pub fn stats(&mut self) -> Result<DbStats> {
        Ok(DbStats {
            employers: self.count_employers()?,
            vacancies: self.count_vacancies()?,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct DbStats {
    pub employers: usize,
    pub vacancies: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Employers: {}", self.employers)?;
        writeln!(f, "  Vacancies: {}", self.vacancies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_schema_is_idempotent() {
        let mut store = VacancyStore::open_in_memory().unwrap();
        store.create_schema().unwrap();
        store.create_schema().unwrap();
        assert_eq!(store.count_employers().unwrap(), 0);
    }

    #[test]
    fn test_employer_insert_first_write_wins() {
        let mut store = VacancyStore::open_in_memory().unwrap();

        assert!(store.insert_employer(&EmployerRecord::new(1, "Acme")).unwrap());
        assert!(!store.insert_employer(&EmployerRecord::new(1, "Renamed")).unwrap());

        let name: String = store
            .connection()
            .unwrap()
            .query_row("SELECT name FROM employers WHERE employer_id = 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(name, "Acme");
        assert_eq!(store.count_employers().unwrap(), 1);
    }

    #[test]
    fn test_employer_without_name_is_rejected() {
        let mut store = VacancyStore::open_in_memory().unwrap();
        let nameless = EmployerRecord {
            id: Some(5),
            ..Default::default()
        };
        assert!(store.insert_employer(&nameless).is_err());
        assert_eq!(store.count_employers().unwrap(), 0);
    }

    #[test]
    fn test_vacancy_requires_stored_employer() {
        let mut store = VacancyStore::open_in_memory().unwrap();

        assert!(store.insert_vacancy(&VacancyRecord::new(10, "Dev", Some(1))).is_err());

        store.insert_employer(&EmployerRecord::new(1, "Acme")).unwrap();
        assert!(store.insert_vacancy(&VacancyRecord::new(10, "Dev", Some(1))).unwrap());
        assert!(!store.insert_vacancy(&VacancyRecord::new(10, "Dev", Some(1))).unwrap());
    }

    #[test]
    fn test_vacancy_without_employer_is_allowed() {
        let mut store = VacancyStore::open_in_memory().unwrap();
        assert!(store.insert_vacancy(&VacancyRecord::new(10, "Orphan", None)).unwrap());
        assert_eq!(store.count_vacancies().unwrap(), 1);
    }

    #[test]
    fn test_opaque_attributes_stored_as_json() {
        let mut store = VacancyStore::open_in_memory().unwrap();
        let mut employer = EmployerRecord::new(1, "Acme");
        employer.area = Some(serde_json::json!({"id": "1", "name": "Москва"}));
        employer.industries = Some(serde_json::json!([]));
        store.insert_employer(&employer).unwrap();

        let (area, industries): (Option<String>, Option<String>) = store
            .connection()
            .unwrap()
            .query_row("SELECT area, industries FROM employers", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        let area: serde_json::Value = serde_json::from_str(&area.unwrap()).unwrap();
        assert_eq!(area["name"], "Москва");
        assert_eq!(industries, None);
    }

    #[test]
    fn test_drop_schema_removes_tables() {
        let mut store = VacancyStore::open_in_memory().unwrap();
        store.insert_employer(&EmployerRecord::new(1, "Acme")).unwrap();
        store.drop_schema().unwrap();
        assert!(store.count_employers().is_err());

        store.create_schema().unwrap();
        assert_eq!(store.count_employers().unwrap(), 0);
    }

    #[test]
    fn test_reopen_after_close_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = VacancyStore::open(DatabaseConfig::new(dir.path().join("v.db"))).unwrap();
        store.create_schema().unwrap();
        store.insert_employer(&EmployerRecord::new(1, "Acme")).unwrap();

        store.close();
        assert!(!store.is_connected());

        assert_eq!(store.count_employers().unwrap(), 1);
        assert!(store.is_connected());
    }

    #[test]
    fn test_open_unreachable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("nested").join("v.db");
        assert!(VacancyStore::open(DatabaseConfig::new(path)).is_err());
    }
}
