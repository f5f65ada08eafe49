pub mod engine;
pub mod rows;

pub use engine::QueryEngine;
pub use rows::{
    CompanyVacancyCount, EmployerVacancy, KeywordMatch, RankedVacancy, SalaryRow,
    SalaryStatistics, TopCompany, VacancyListing,
};
