use tabled::{Table, Tabled, settings::Style};

use crate::query::{CompanyVacancyCount, EmployerVacancy, SalaryRow, SalaryStatistics, TopCompany};
use crate::ui::output::amount;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn stats_table(stats: &[(&str, &str)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label, value);
    }
    builder.build()
}

#[derive(Tabled)]
struct CompanyCountRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "Vacancies")]
    vacancies: i64,
}

#[derive(Tabled)]
struct CompanyTableRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "Vacancies")]
    vacancies: i64,
    #[tabled(rename = "Profile")]
    url: String,
}

#[derive(Tabled)]
struct EmployerVacancyTableRow {
    #[tabled(rename = "Vacancy")]
    name: String,
    #[tabled(rename = "Salary")]
    salary: String,
    #[tabled(rename = "Employment")]
    employment: String,
    #[tabled(rename = "Experience")]
    experience: String,
}

pub fn company_counts_table(rows: &[CompanyVacancyCount]) -> String {
    let rows: Vec<CompanyCountRow> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| CompanyCountRow {
            rank: i + 1,
            company: r.company_name.clone(),
            vacancies: r.vacancies_count,
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn top_companies_table(rows: &[TopCompany]) -> String {
    let rows: Vec<CompanyTableRow> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| CompanyTableRow {
            rank: i + 1,
            company: r.company_name.clone(),
            vacancies: r.vacancies_count,
            url: r.company_url.clone().unwrap_or_default(),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn employer_vacancies_table(rows: &[EmployerVacancy]) -> String {
    let rows: Vec<EmployerVacancyTableRow> = rows
        .iter()
        .map(|r| EmployerVacancyTableRow {
            name: r.vacancy_name.clone(),
            salary: r.display_salary(),
            employment: r.employment.clone().unwrap_or_default(),
            experience: r.experience.clone().unwrap_or_default(),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn salary_statistics_table(stats: &SalaryStatistics) -> String {
    let total = stats.total_vacancies.to_string();
    let with_salary = stats.vacancies_with_salary.to_string();
    let missing = "—".to_string();
    let avg = stats.avg_salary.map(amount).unwrap_or_else(|| missing.clone());
    let min = stats.min_salary.map(|v| v.to_string()).unwrap_or_else(|| missing.clone());
    let max = stats.max_salary.map(|v| v.to_string()).unwrap_or(missing);

    stats_table(&[
        ("Total vacancies", total.as_str()),
        ("With salary", with_salary.as_str()),
        ("Average salary", avg.as_str()),
        ("Minimum salary", min.as_str()),
        ("Maximum salary", max.as_str()),
    ])
}
