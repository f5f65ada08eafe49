//! Database schema definitions

/// SQL to create the employers table
pub const CREATE_EMPLOYERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS employers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    employer_id INTEGER UNIQUE NOT NULL,
    name TEXT NOT NULL,
    description TEXT,
    site_url TEXT,
    alternate_url TEXT,
    logo_urls TEXT,
    area TEXT,
    industries TEXT
)
"#;

/// SQL to create the vacancies table
///
/// `employer_id` holds the employer's external id, not the internal row id.
pub const CREATE_VACANCIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS vacancies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    vacancy_id INTEGER UNIQUE NOT NULL,
    employer_id INTEGER REFERENCES employers(employer_id),
    name TEXT NOT NULL,
    salary_from INTEGER,
    salary_to INTEGER,
    salary_currency TEXT,
    salary_gross INTEGER,
    area TEXT,
    published_at TEXT,
    created_at TEXT,
    requirement TEXT,
    responsibility TEXT,
    employment TEXT,
    experience TEXT,
    alternate_url TEXT
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_vacancies_employer ON vacancies(employer_id)",
];

/// Dependents first so the foreign key never dangles
pub const DROP_TABLES: &[&str] = &[
    "DROP TABLE IF EXISTS vacancies",
    "DROP TABLE IF EXISTS employers",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_EMPLOYERS_TABLE, CREATE_VACANCIES_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
