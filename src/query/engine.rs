//! Query engine implementation
//!
//! Provides the read-only analytical queries:
//! - Vacancy counts per company, and the top companies by that count
//! - Vacancy listings (all, by employer, by keyword)
//! - Average salary and the vacancies paying above it
//! - Salary statistics
//!
//! Every public operation degrades instead of failing: a query error is logged
//! and turned into an empty `Vec` or `None`. Callers must read that as "no data
//! available", which is not the same as a count of zero.

use rusqlite::{Row, params};

use super::rows::{
    CompanyVacancyCount, EmployerVacancy, KeywordMatch, RankedVacancy, SalaryStatistics,
    TopCompany, VacancyListing,
};
use crate::Result;
use crate::storage::VacancyStore;

const LISTING_COLUMNS: &str = r#"
    e.name AS company_name,
    v.name AS vacancy_name,
    v.salary_from,
    v.salary_to,
    v.salary_currency,
    v.alternate_url AS vacancy_url
"#;

/// Query engine over a [`VacancyStore`]
pub struct QueryEngine<'a> {
    store: &'a mut VacancyStore,
}

impl<'a> QueryEngine<'a> {
    /// Create a new query engine
    pub fn new(store: &'a mut VacancyStore) -> Self {
        Self { store }
    }

    /// Every employer with its vacancy count (zero included), most vacancies first
    pub fn companies_and_vacancies_count(&mut self) -> Vec<CompanyVacancyCount> {
        degrade("company vacancy counts", self.try_companies_and_vacancies_count())
    }

    /// All vacancies with a known employer, ordered by company then vacancy
    pub fn all_vacancies(&mut self) -> Vec<VacancyListing> {
        degrade("all vacancies", self.try_all_vacancies())
    }

    /// Mean comparable salary over vacancies disclosing at least one bound.
    ///
    /// `None` when no vacancy has salary data.
    pub fn avg_salary(&mut self) -> Option<f64> {
        degrade("average salary", self.try_avg_salary())
    }

    /// Vacancies where the lower bound, the upper bound, or the mean of both
    /// exceeds the average salary, best paid first.
    ///
    /// Each bound is tested on its own, so a wide range can qualify on its upper
    /// bound even when its comparable salary is below the average.
    pub fn vacancies_with_higher_salary(&mut self) -> Vec<RankedVacancy> {
        let Some(avg) = self.avg_salary() else {
            return Vec::new();
        };
        degrade("above-average vacancies", self.try_vacancies_above(avg))
    }

    /// Case-insensitive substring search over title, requirement and responsibility
    pub fn vacancies_with_keyword(&mut self, keyword: &str) -> Vec<KeywordMatch> {
        degrade("keyword search", self.try_vacancies_with_keyword(keyword))
    }

    /// Vacancies of one employer (by external id), ordered by name
    pub fn vacancies_by_company(&mut self, employer_id: i64) -> Vec<EmployerVacancy> {
        degrade("employer vacancies", self.try_vacancies_by_company(employer_id))
    }

    /// First `limit` companies by vacancy count
    pub fn top_companies_by_vacancies(&mut self, limit: usize) -> Vec<TopCompany> {
        degrade("top companies", self.try_top_companies_by_vacancies(limit))
    }

    /// Single-row aggregate; `None` if the query failed
    pub fn salary_statistics(&mut self) -> Option<SalaryStatistics> {
        degrade("salary statistics", self.try_salary_statistics().map(Some))
    }

    // ========== Fallible queries ==========

    fn try_companies_and_vacancies_count(&mut self) -> Result<Vec<CompanyVacancyCount>> {
        let conn = self.store.connection()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT e.name AS company_name, COUNT(v.id) AS vacancies_count
            FROM employers e
            LEFT JOIN vacancies v ON e.employer_id = v.employer_id
            GROUP BY e.id, e.name
            ORDER BY vacancies_count DESC, e.name
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(CompanyVacancyCount {
                    company_name: row.get(0)?,
                    vacancies_count: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn try_all_vacancies(&mut self) -> Result<Vec<VacancyListing>> {
        let conn = self.store.connection()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {LISTING_COLUMNS}
            FROM vacancies v
            JOIN employers e ON v.employer_id = e.employer_id
            ORDER BY e.name, v.name
            "#
        ))?;

        let rows = stmt
            .query_map([], row_to_listing)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn try_avg_salary(&mut self) -> Result<Option<f64>> {
        let conn = self.store.connection()?;
        let avg: Option<f64> = conn.query_row(
            r#"
            SELECT AVG(comparable_salary(salary_from, salary_to))
            FROM vacancies
            WHERE salary_from IS NOT NULL OR salary_to IS NOT NULL
            "#,
            [],
            |row| row.get(0),
        )?;
        Ok(avg)
    }

    fn try_vacancies_above(&mut self, avg: f64) -> Result<Vec<RankedVacancy>> {
        let conn = self.store.connection()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {LISTING_COLUMNS},
                comparable_salary(v.salary_from, v.salary_to) AS calculated_salary
            FROM vacancies v
            JOIN employers e ON v.employer_id = e.employer_id
            WHERE (v.salary_from IS NOT NULL AND v.salary_from > ?1)
               OR (v.salary_to IS NOT NULL AND v.salary_to > ?1)
               OR (
                    v.salary_from IS NOT NULL AND v.salary_to IS NOT NULL
                    AND (v.salary_from + v.salary_to) / 2.0 > ?1
               )
            ORDER BY calculated_salary DESC, e.name, v.name
            "#
        ))?;

        let rows = stmt
            .query_map(params![avg], |row| {
                Ok(RankedVacancy {
                    vacancy: row_to_listing(row)?,
                    calculated_salary: row.get(6)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn try_vacancies_with_keyword(&mut self, keyword: &str) -> Result<Vec<KeywordMatch>> {
        let needle = keyword.to_lowercase();
        let conn = self.store.connection()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {LISTING_COLUMNS}, v.requirement, v.responsibility
            FROM vacancies v
            JOIN employers e ON v.employer_id = e.employer_id
            WHERE instr(casefold(v.name), ?1) > 0
               OR instr(casefold(v.requirement), ?1) > 0
               OR instr(casefold(v.responsibility), ?1) > 0
            ORDER BY e.name, v.name
            "#
        ))?;

        let rows = stmt
            .query_map(params![needle], |row| {
                Ok(KeywordMatch {
                    vacancy: row_to_listing(row)?,
                    requirement: row.get(6)?,
                    responsibility: row.get(7)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn try_vacancies_by_company(&mut self, employer_id: i64) -> Result<Vec<EmployerVacancy>> {
        let conn = self.store.connection()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT v.name, v.salary_from, v.salary_to, v.salary_currency,
                   v.alternate_url, v.employment, v.experience
            FROM vacancies v
            WHERE v.employer_id = ?1
            ORDER BY v.name
            "#,
        )?;

        let rows = stmt
            .query_map(params![employer_id], |row| {
                Ok(EmployerVacancy {
                    vacancy_name: row.get(0)?,
                    salary_from: row.get(1)?,
                    salary_to: row.get(2)?,
                    salary_currency: row.get(3)?,
                    vacancy_url: row.get(4)?,
                    employment: row.get(5)?,
                    experience: row.get(6)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn try_top_companies_by_vacancies(&mut self, limit: usize) -> Result<Vec<TopCompany>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let conn = self.store.connection()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT e.name AS company_name, COUNT(v.id) AS vacancies_count,
                   e.alternate_url AS company_url
            FROM employers e
            LEFT JOIN vacancies v ON e.employer_id = v.employer_id
            GROUP BY e.id, e.name, e.alternate_url
            ORDER BY vacancies_count DESC, e.name
            LIMIT ?1
            "#,
        )?;

        let rows = stmt
            .query_map(params![limit], |row| {
                Ok(TopCompany {
                    company_name: row.get(0)?,
                    vacancies_count: row.get(1)?,
                    company_url: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn try_salary_statistics(&mut self) -> Result<SalaryStatistics> {
        let conn = self.store.connection()?;
        let stats = conn.query_row(
            r#"
            SELECT
                COUNT(*) AS total_vacancies,
                COUNT(CASE WHEN salary_from IS NOT NULL OR salary_to IS NOT NULL THEN 1 END)
                    AS vacancies_with_salary,
                AVG(CASE WHEN salary_from IS NOT NULL OR salary_to IS NOT NULL
                    THEN comparable_salary(salary_from, salary_to) END) AS avg_salary,
                MIN(CASE WHEN salary_from IS NOT NULL OR salary_to IS NOT NULL
                    THEN comparable_salary(salary_from, salary_to) END) AS min_salary,
                MAX(CASE WHEN salary_from IS NOT NULL OR salary_to IS NOT NULL
                    THEN comparable_salary(salary_from, salary_to) END) AS max_salary
            FROM vacancies
            "#,
            [],
            |row| {
                Ok(SalaryStatistics {
                    total_vacancies: row.get(0)?,
                    vacancies_with_salary: row.get(1)?,
                    avg_salary: row.get(2)?,
                    min_salary: row.get(3)?,
                    max_salary: row.get(4)?,
                })
            },
        )?;
        Ok(stats)
    }
}

/// Columns 0..=5 as selected by [`LISTING_COLUMNS`]
fn row_to_listing(row: &Row) -> rusqlite::Result<VacancyListing> {
    Ok(VacancyListing {
        company_name: row.get(0)?,
        vacancy_name: row.get(1)?,
        salary_from: row.get(2)?,
        salary_to: row.get(3)?,
        salary_currency: row.get(4)?,
        vacancy_url: row.get(5)?,
    })
}

fn degrade<T: Default>(operation: &str, result: Result<T>) -> T {
    result.unwrap_or_else(|e| {
        tracing::error!("Query '{}' failed: {}", operation, e);
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::RecordLoader;
    use crate::record::{EmployerRecord, VacancyRecord};

    fn scenario_store() -> VacancyStore {
        let mut store = VacancyStore::open_in_memory().unwrap();
        let employers = vec![EmployerRecord::new(1, "A"), EmployerRecord::new(2, "B")];
        let vacancies = vec![
            VacancyRecord::new(10, "Dev", Some(1)).with_salary(Some(1000), Some(2000), Some("RUR")),
            VacancyRecord::new(11, "Mgr", Some(2)),
        ];
        RecordLoader::new(&mut store).load_batch(&employers, &vacancies);
        store
    }

    /// Four employers; salaries chosen so the average is 100_000
    fn salary_store() -> VacancyStore {
        let mut store = VacancyStore::open_in_memory().unwrap();
        let mut acme = EmployerRecord::new(1, "Acme");
        acme.alternate_url = Some("https://hh.ru/employer/1".to_string());
        let employers = vec![
            acme,
            EmployerRecord::new(2, "Globex"),
            EmployerRecord::new(3, "Initech"),
            EmployerRecord::new(4, "Empty Co"),
        ];
        let vacancies = vec![
            // comparable 150_000
            VacancyRecord::new(1, "Senior Rust", Some(1)).with_salary(
                Some(100_000),
                Some(200_000),
                Some("RUR"),
            ),
            // comparable 50_000
            VacancyRecord::new(2, "Junior", Some(1)).with_salary(Some(50_000), None, Some("RUR")),
            // comparable 100_000; qualifies only through its upper bound
            VacancyRecord::new(3, "Wide range", Some(2)).with_salary(
                Some(40_000),
                Some(160_000),
                Some("RUR"),
            ),
            // no salary
            VacancyRecord::new(4, "Intern", Some(3)),
        ];
        RecordLoader::new(&mut store).load_batch(&employers, &vacancies);
        store
    }

    #[test]
    fn test_scenario_average_and_keyword() {
        let mut store = scenario_store();
        let mut engine = QueryEngine::new(&mut store);

        assert_eq!(engine.avg_salary(), Some(1500.0));

        let hits = engine.vacancies_with_keyword("Dev");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].vacancy.vacancy_name, "Dev");
    }

    #[test]
    fn test_average_is_none_without_salaries() {
        let mut store = VacancyStore::open_in_memory().unwrap();
        RecordLoader::new(&mut store).load_batch(
            &[EmployerRecord::new(1, "A")],
            &[VacancyRecord::new(10, "Dev", Some(1))],
        );

        let mut engine = QueryEngine::new(&mut store);
        assert_eq!(engine.avg_salary(), None);
        assert!(engine.vacancies_with_higher_salary().is_empty());
    }

    #[test]
    fn test_average_uses_comparable_salary() {
        let mut store = salary_store();
        let mut engine = QueryEngine::new(&mut store);
        // (150_000 + 50_000 + 100_000) / 3
        assert_eq!(engine.avg_salary(), Some(100_000.0));
    }

    #[test]
    fn test_above_average_predicate_and_order() {
        let mut store = salary_store();
        let mut engine = QueryEngine::new(&mut store);

        let rows = engine.vacancies_with_higher_salary();
        let names: Vec<&str> = rows.iter().map(|r| r.vacancy.vacancy_name.as_str()).collect();
        assert_eq!(names, vec!["Senior Rust", "Wide range"]);
        assert_eq!(rows[0].calculated_salary, 150_000);
        // selected on its upper bound although its comparable salary equals the average
        assert_eq!(rows[1].calculated_salary, 100_000);
    }

    #[test]
    fn test_company_counts_include_zero() {
        let mut store = salary_store();
        let mut engine = QueryEngine::new(&mut store);

        let counts = engine.companies_and_vacancies_count();
        assert_eq!(counts.len(), 4);
        assert_eq!(counts[0].company_name, "Acme");
        assert_eq!(counts[0].vacancies_count, 2);
        let empty = counts.iter().find(|c| c.company_name == "Empty Co").unwrap();
        assert_eq!(empty.vacancies_count, 0);
        assert!(counts.windows(2).all(|w| w[0].vacancies_count >= w[1].vacancies_count));
    }

    #[test]
    fn test_top_companies_limit() {
        let mut store = salary_store();
        let mut engine = QueryEngine::new(&mut store);

        let top = engine.top_companies_by_vacancies(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].company_name, "Acme");
        assert_eq!(top[0].company_url.as_deref(), Some("https://hh.ru/employer/1"));

        assert!(engine.top_companies_by_vacancies(0).is_empty());
        assert_eq!(engine.top_companies_by_vacancies(usize::MAX).len(), 4);
    }

    #[test]
    fn test_all_vacancies_ordering() {
        let mut store = salary_store();
        let mut engine = QueryEngine::new(&mut store);

        let rows = engine.all_vacancies();
        let pairs: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.company_name.as_str(), r.vacancy_name.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("Acme", "Junior"),
                ("Acme", "Senior Rust"),
                ("Globex", "Wide range"),
                ("Initech", "Intern"),
            ]
        );
    }

    #[test]
    fn test_all_vacancies_skips_vacancies_without_employer() {
        let mut store = scenario_store();
        store.insert_vacancy(&VacancyRecord::new(99, "Orphan", None)).unwrap();

        let mut engine = QueryEngine::new(&mut store);
        assert_eq!(engine.all_vacancies().len(), 2);
    }

    #[test]
    fn test_keyword_search_fields_and_case() {
        let mut store = VacancyStore::open_in_memory().unwrap();
        let mut by_requirement = VacancyRecord::new(2, "Backend", Some(1));
        by_requirement.requirement = Some("Опыт работы с PostgreSQL".to_string());
        let mut by_responsibility = VacancyRecord::new(3, "Аналитик", Some(1));
        by_responsibility.responsibility = Some("Писать SQL-запросы к postgresql".to_string());
        RecordLoader::new(&mut store).load_batch(
            &[EmployerRecord::new(1, "Acme")],
            &[
                VacancyRecord::new(1, "Ведущий РАЗРАБОТЧИК", Some(1)),
                by_requirement,
                by_responsibility,
            ],
        );

        let mut engine = QueryEngine::new(&mut store);
        assert_eq!(engine.vacancies_with_keyword("разработчик").len(), 1);
        assert_eq!(engine.vacancies_with_keyword("POSTGRESQL").len(), 2);
        assert!(engine.vacancies_with_keyword("kotlin").is_empty());
        // LIKE wildcards are plain characters here
        assert!(engine.vacancies_with_keyword("%").is_empty());
    }

    #[test]
    fn test_vacancies_by_company() {
        let mut store = VacancyStore::open_in_memory().unwrap();
        let mut vacancy = VacancyRecord::new(10, "Dev", Some(1));
        vacancy.employment = Some(crate::record::NamedRef {
            name: Some("Полная занятость".to_string()),
        });
        RecordLoader::new(&mut store).load_batch(
            &[EmployerRecord::new(1, "Acme"), EmployerRecord::new(2, "Other")],
            &[
                vacancy,
                VacancyRecord::new(11, "Analyst", Some(1)),
                VacancyRecord::new(12, "Other job", Some(2)),
            ],
        );

        let mut engine = QueryEngine::new(&mut store);
        let rows = engine.vacancies_by_company(1);
        let names: Vec<&str> = rows.iter().map(|r| r.vacancy_name.as_str()).collect();
        assert_eq!(names, vec!["Analyst", "Dev"]);
        assert_eq!(rows[1].employment.as_deref(), Some("Полная занятость"));
        assert_eq!(rows[1].experience, None);
    }

    #[test]
    fn test_employer_without_vacancies_returns_empty() {
        let mut store = VacancyStore::open_in_memory().unwrap();
        store.insert_employer(&EmployerRecord::new(1, "Acme")).unwrap();

        let mut engine = QueryEngine::new(&mut store);
        assert!(engine.vacancies_by_company(1).is_empty());
    }

    #[test]
    fn test_salary_statistics() {
        let mut store = salary_store();
        let mut engine = QueryEngine::new(&mut store);

        let stats = engine.salary_statistics().unwrap();
        assert_eq!(
            stats,
            SalaryStatistics {
                total_vacancies: 4,
                vacancies_with_salary: 3,
                avg_salary: Some(100_000.0),
                min_salary: Some(50_000),
                max_salary: Some(150_000),
            }
        );
    }

    #[test]
    fn test_salary_statistics_empty_store() {
        let mut store = VacancyStore::open_in_memory().unwrap();
        let mut engine = QueryEngine::new(&mut store);

        let stats = engine.salary_statistics().unwrap();
        assert_eq!(stats.total_vacancies, 0);
        assert_eq!(stats.vacancies_with_salary, 0);
        assert_eq!(stats.avg_salary, None);
        assert_eq!(stats.min_salary, None);
    }

    #[test]
    fn test_queries_degrade_without_schema() {
        let mut store = scenario_store();
        store.drop_schema().unwrap();

        let mut engine = QueryEngine::new(&mut store);
        assert!(engine.companies_and_vacancies_count().is_empty());
        assert!(engine.all_vacancies().is_empty());
        assert_eq!(engine.avg_salary(), None);
        assert!(engine.vacancies_with_higher_salary().is_empty());
        assert!(engine.vacancies_with_keyword("Dev").is_empty());
        assert!(engine.vacancies_by_company(1).is_empty());
        assert!(engine.top_companies_by_vacancies(10).is_empty());
        assert_eq!(engine.salary_statistics(), None);
    }

    #[test]
    fn test_queries_reopen_closed_connection() {
        let dir = tempfile::tempdir().unwrap();
        let config = crate::config::DatabaseConfig::new(dir.path().join("v.db"));
        let mut store = VacancyStore::open(config).unwrap();
        store.create_schema().unwrap();
        RecordLoader::new(&mut store).load_batch(
            &[EmployerRecord::new(1, "A")],
            &[VacancyRecord::new(10, "Dev", Some(1)).with_salary(Some(1000), Some(2000), None)],
        );
        store.close();

        let mut engine = QueryEngine::new(&mut store);
        assert_eq!(engine.avg_salary(), Some(1500.0));
        assert_eq!(engine.all_vacancies().len(), 1);
    }
}
