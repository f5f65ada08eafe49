//! Result rows returned by the query engine
//!
//! Field names are the column names of the underlying queries, so serializing
//! a row yields the same `column -> value` mapping the SQL produces.

use serde::Serialize;

use crate::salary::{Salary, comparable_salary, display_salary};

/// Employer name with its number of stored vacancies
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyVacancyCount {
    pub company_name: String,
    pub vacancies_count: i64,
}

/// Same grouping as [`CompanyVacancyCount`] plus the employer profile URL
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCompany {
    pub company_name: String,
    pub vacancies_count: i64,
    pub company_url: Option<String>,
}

/// A vacancy joined with its employer's name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VacancyListing {
    pub company_name: String,
    pub vacancy_name: String,
    pub salary_from: Option<i64>,
    pub salary_to: Option<i64>,
    pub salary_currency: Option<String>,
    pub vacancy_url: Option<String>,
}

/// Vacancy paying above the average, with the value it is ranked by
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedVacancy {
    #[serde(flatten)]
    pub vacancy: VacancyListing,
    pub calculated_salary: i64,
}

/// Keyword search hit, including the text fields that were searched
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordMatch {
    #[serde(flatten)]
    pub vacancy: VacancyListing,
    pub requirement: Option<String>,
    pub responsibility: Option<String>,
}

/// Vacancy of a single employer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployerVacancy {
    pub vacancy_name: String,
    pub salary_from: Option<i64>,
    pub salary_to: Option<i64>,
    pub salary_currency: Option<String>,
    pub vacancy_url: Option<String>,
    pub employment: Option<String>,
    pub experience: Option<String>,
}

/// Aggregate over all vacancies. Salary figures are `None` when no vacancy
/// discloses a salary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryStatistics {
    pub total_vacancies: i64,
    pub vacancies_with_salary: i64,
    pub avg_salary: Option<f64>,
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
}

/// Rows that carry a salary range
pub trait SalaryRow {
    fn salary_bounds(&self) -> (Option<i64>, Option<i64>);
    fn currency(&self) -> Option<&str>;

    fn salary(&self) -> Salary {
        let (from, to) = self.salary_bounds();
        Salary::new(from, to, self.currency())
    }

    fn comparable_salary(&self) -> i64 {
        let (from, to) = self.salary_bounds();
        comparable_salary(from, to)
    }

    fn display_salary(&self) -> String {
        let (from, to) = self.salary_bounds();
        display_salary(from, to, self.currency())
    }
}

impl SalaryRow for VacancyListing {
    fn salary_bounds(&self) -> (Option<i64>, Option<i64>) {
        (self.salary_from, self.salary_to)
    }

    fn currency(&self) -> Option<&str> {
        self.salary_currency.as_deref()
    }
}

impl SalaryRow for RankedVacancy {
    fn salary_bounds(&self) -> (Option<i64>, Option<i64>) {
        self.vacancy.salary_bounds()
    }

    fn currency(&self) -> Option<&str> {
        self.vacancy.currency()
    }
}

impl SalaryRow for KeywordMatch {
    fn salary_bounds(&self) -> (Option<i64>, Option<i64>) {
        self.vacancy.salary_bounds()
    }

    fn currency(&self) -> Option<&str> {
        self.vacancy.currency()
    }
}

impl SalaryRow for EmployerVacancy {
    fn salary_bounds(&self) -> (Option<i64>, Option<i64>) {
        (self.salary_from, self.salary_to)
    }

    fn currency(&self) -> Option<&str> {
        self.salary_currency.as_deref()
    }
}

/// Keep rows whose comparable salary is at least `min`
pub fn filter_by_min_salary<T: SalaryRow>(rows: Vec<T>, min: i64) -> Vec<T> {
    rows.into_iter()
        .filter(|row| row.comparable_salary() >= min)
        .collect()
}

/// Highest-paying `n` rows, best first; ties keep their original order
pub fn top_by_salary<T: SalaryRow>(mut rows: Vec<T>, n: usize) -> Vec<T> {
    rows.sort_by(|a, b| b.comparable_salary().cmp(&a.comparable_salary()));
    rows.truncate(n);
    rows
}
