use std::sync::OnceLock;

use crate::loader::LoadStats;
use crate::query::SalaryRow;
use crate::ui::{Icons, theme};
use owo_colors::OwoColorize;

static QUIET: OnceLock<bool> = OnceLock::new();

/// `VACANCYDB_QUIET=1` (or `true`) drops headers and section rules
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("VACANCYDB_QUIET")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}

pub fn header(text: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", Icons::ROCKET, text.style(theme().header));
}

pub fn status(icon: &str, label: &str, value: &str) {
    println!("{} {}: {}", icon, label.style(theme().dim), value);
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn));
}

pub fn info(label: &str, value: &str) {
    println!(
        "{} {}: {}",
        Icons::INFO.style(theme().info),
        label.style(theme().dim),
        value
    );
}

pub fn section(title: &str) {
    if is_quiet() {
        return;
    }
    println!();
    println!("━{}━", title.style(theme().header));
}

pub fn empty(label: &str) {
    println!("{} {}", Icons::EMPTY, label.style(theme().muted));
}

pub fn money(text: &str) -> String {
    text.style(theme().salary).to_string()
}

/// Salary text, greyed out when the vacancy discloses no bounds
pub fn salary<R: SalaryRow>(row: &R) -> String {
    let (from, to) = row.salary_bounds();
    let style = if from.is_none() && to.is_none() {
        theme().salary_unspecified
    } else {
        theme().salary
    };
    row.display_salary().style(style).to_string()
}

pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", label.style(theme().dim), value);
}

/// Salary figure with two decimals, as averages are not whole numbers
pub fn amount(value: f64) -> String {
    format!("{:.2}", value)
}

/// Company, title, salary and link of one vacancy
pub fn vacancy_card<R: SalaryRow>(company: &str, title: &str, url: Option<&str>, row: &R) {
    println!(
        "{} {}  {}",
        Icons::BRIEFCASE,
        title.style(theme().vacancy),
        company.style(theme().company)
    );
    println!("   {} {}", Icons::MONEY, salary(row));
    if let Some(url) = url {
        println!("   {} {}", Icons::LINK, url.style(theme().link));
    }
}

pub fn load_summary(stats: &LoadStats) {
    section("Load summary");
    summary_row(
        "Employers:",
        &format!("{}/{}", stats.employers_loaded, stats.employers_total),
    );
    summary_row(
        "Vacancies:",
        &format!("{}/{}", stats.vacancies_loaded, stats.vacancies_total),
    );
    if stats.employers_skipped() > 0 {
        warn(&format!(
            "Skipped employers: {} (duplicates or errors)",
            stats.employers_skipped()
        ));
    }
    if stats.vacancies_skipped() > 0 {
        warn(&format!(
            "Skipped vacancies: {} (duplicates or errors)",
            stats.vacancies_skipped()
        ));
    }
}
