use std::path::PathBuf;
use std::time::Instant;

use crate::{OutputMode, emit_success};
use owo_colors::OwoColorize;
use vacancydb::config::{self, VacancyDbConfig};
use vacancydb::query::SalaryRow;
use vacancydb::ui::{self, Icons, ProgressManager, Spinner, table};
use vacancydb::{
    DataSource, DatabaseConfig, JsonDataSource, QueryEngine, RecordLoader, VacancyStore,
};

const DEFAULT_TOP_LIMIT: usize = 10;

/// Settings resolved once from flags, env and the config file
pub struct Context {
    pub output_mode: OutputMode,
    pub config_path: PathBuf,
    pub config: Option<VacancyDbConfig>,
    pub database: PathBuf,
}

impl Context {
    pub fn resolve(
        config_path: Option<PathBuf>,
        database: Option<PathBuf>,
        output_mode: OutputMode,
    ) -> anyhow::Result<Self> {
        let config_path = config_path.unwrap_or_else(config::default_config_path);
        let config = config::load_config(Some(&config_path))?;
        let database = config::resolve_database_path(database.as_deref(), config.as_ref());
        Ok(Self {
            output_mode,
            config_path,
            config,
            database,
        })
    }

    fn open_store(&self) -> anyhow::Result<VacancyStore> {
        config::ensure_db_dir(&self.database)?;
        let store = VacancyStore::open(DatabaseConfig::new(&self.database)).map_err(|e| {
            anyhow::anyhow!("cannot open database {}: {}", self.database.display(), e)
        })?;
        Ok(store)
    }

    fn human(&self) -> bool {
        self.output_mode.is_human()
    }
}

pub fn run_init(ctx: &Context, force: bool) -> anyhow::Result<()> {
    let config = VacancyDbConfig {
        database: Some(ctx.database.to_string_lossy().to_string()),
        data_file: Some(config::default_data_file().to_string_lossy().to_string()),
        top_limit: Some(DEFAULT_TOP_LIMIT),
    };
    config::write_config(&ctx.config_path, &config, force)?;

    let mut store = ctx.open_store()?;
    store.create_schema()?;

    if ctx.human() {
        ui::header("vacancydb initialised");
        ui::status(Icons::FILE, "Config", &ctx.config_path.display().to_string());
        ui::status(Icons::DATABASE, "Database", &ctx.database.display().to_string());
        ui::success("Schema ready");
    } else {
        emit_success(
            ctx.output_mode,
            "init",
            serde_json::json!({
                "config": ctx.config_path,
                "database": ctx.database,
            }),
        )?;
    }
    Ok(())
}

pub fn run_load(ctx: &Context, file: Option<PathBuf>) -> anyhow::Result<()> {
    let file = config::resolve_data_file(file.as_deref(), ctx.config.as_ref());
    let source = JsonDataSource::open(&file)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {}", file.display(), e))?;

    let employers = source.employers()?;
    let vacancies = source.vacancies()?;
    if employers.is_empty() && vacancies.is_empty() {
        anyhow::bail!("{} contains no employers or vacancies", file.display());
    }

    let mut store = ctx.open_store()?;
    store.create_schema()?;

    if ctx.human() {
        ui::header(&format!("Loading {}", file.display()));
        ui::status(Icons::DATABASE, "Database", &ctx.database.display().to_string());
        ui::info(
            "Found",
            &format!("{} employers, {} vacancies", employers.len(), vacancies.len()),
        );

        let started = Instant::now();
        let (mut progress, tx) = ProgressManager::new();
        let stats = RecordLoader::new(&mut store)
            .with_progress(tx)
            .load_batch(&employers, &vacancies);
        progress.finish_with_summary(started.elapsed(), &stats);
        ui::load_summary(&stats);
        if let Ok(stored) = store.stats() {
            ui::summary_row(
                "Stored:",
                &format!("{} employers, {} vacancies", stored.employers, stored.vacancies),
            );
        }
    } else {
        let stats = RecordLoader::new(&mut store).load_batch(&employers, &vacancies);
        emit_success(ctx.output_mode, "load", serde_json::to_value(stats)?)?;
    }

    store.close();
    Ok(())
}

pub fn run_companies(ctx: &Context) -> anyhow::Result<()> {
    let mut store = ctx.open_store()?;
    let rows = QueryEngine::new(&mut store).companies_and_vacancies_count();

    if !ctx.human() {
        return emit_success(ctx.output_mode, "companies", serde_json::to_value(&rows)?);
    }

    ui::section("Companies and vacancy counts");
    if rows.is_empty() {
        ui::empty("No companies found.");
    } else {
        println!("{}", table::company_counts_table(&rows));
    }
    Ok(())
}

pub fn run_vacancies(ctx: &Context) -> anyhow::Result<()> {
    let mut store = ctx.open_store()?;
    let rows = QueryEngine::new(&mut store).all_vacancies();

    if !ctx.human() {
        return emit_success(ctx.output_mode, "vacancies", serde_json::to_value(&rows)?);
    }

    ui::section(&format!("All vacancies ({})", rows.len()));
    if rows.is_empty() {
        ui::empty("No vacancies found.");
    }
    for row in &rows {
        ui::vacancy_card(&row.company_name, &row.vacancy_name, row.vacancy_url.as_deref(), row);
    }
    Ok(())
}

pub fn run_avg_salary(ctx: &Context) -> anyhow::Result<()> {
    let mut store = ctx.open_store()?;
    let avg = QueryEngine::new(&mut store).avg_salary();

    if !ctx.human() {
        return emit_success(
            ctx.output_mode,
            "avg-salary",
            serde_json::json!({ "avg_salary": avg }),
        );
    }

    ui::section("Average salary");
    match avg {
        Some(avg) => ui::info("Average over all vacancies", &ui::money(&ui::amount(avg))),
        None => ui::empty("No salary data available."),
    }
    Ok(())
}

pub fn run_above_average(ctx: &Context) -> anyhow::Result<()> {
    let mut store = ctx.open_store()?;
    let mut engine = QueryEngine::new(&mut store);
    let avg = engine.avg_salary();
    let rows = engine.vacancies_with_higher_salary();

    if !ctx.human() {
        return emit_success(
            ctx.output_mode,
            "above-average",
            serde_json::json!({ "avg_salary": avg, "vacancies": rows }),
        );
    }

    ui::section(&format!("Vacancies above the average salary ({})", rows.len()));
    if let Some(avg) = avg {
        ui::summary_row("Average:", &ui::money(&ui::amount(avg)));
    }
    if rows.is_empty() {
        ui::empty("No vacancies found.");
    }
    for row in &rows {
        let v = &row.vacancy;
        ui::vacancy_card(&v.company_name, &v.vacancy_name, v.vacancy_url.as_deref(), row);
    }
    Ok(())
}

pub fn run_search(ctx: &Context, keyword: &str) -> anyhow::Result<()> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        anyhow::bail!("keyword must not be empty");
    }

    let mut store = ctx.open_store()?;
    let spinner = ctx
        .human()
        .then(|| Spinner::new(&format!("Searching for '{}'...", keyword)));
    let rows = QueryEngine::new(&mut store).vacancies_with_keyword(keyword);
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if !ctx.human() {
        return emit_success(ctx.output_mode, "search", serde_json::to_value(&rows)?);
    }

    ui::section(&format!("{} Results for '{}' ({})", Icons::SEARCH, keyword, rows.len()));
    if rows.is_empty() {
        ui::empty("No vacancies found.");
    }
    for row in &rows {
        let v = &row.vacancy;
        ui::vacancy_card(&v.company_name, &v.vacancy_name, v.vacancy_url.as_deref(), row);
    }
    Ok(())
}

pub fn run_employer(ctx: &Context, id: i64) -> anyhow::Result<()> {
    let mut store = ctx.open_store()?;
    let rows = QueryEngine::new(&mut store).vacancies_by_company(id);

    if !ctx.human() {
        return emit_success(ctx.output_mode, "employer", serde_json::to_value(&rows)?);
    }

    ui::section(&format!("{} Vacancies of employer {}", Icons::OFFICE, id));
    if rows.is_empty() {
        ui::empty("No vacancies found.");
    } else {
        println!("{}", table::employer_vacancies_table(&rows));
        let best = rows.iter().map(|r| r.comparable_salary()).max().unwrap_or(0);
        if best > 0 {
            ui::summary_row("Best offer:", &ui::money(&best.to_string()));
        }
    }
    Ok(())
}

pub fn run_top(ctx: &Context, limit: Option<usize>) -> anyhow::Result<()> {
    let limit = limit
        .or_else(|| ctx.config.as_ref().and_then(|c| c.top_limit))
        .unwrap_or(DEFAULT_TOP_LIMIT);

    let mut store = ctx.open_store()?;
    let rows = QueryEngine::new(&mut store).top_companies_by_vacancies(limit);

    if !ctx.human() {
        return emit_success(ctx.output_mode, "top", serde_json::to_value(&rows)?);
    }

    ui::section(&format!("{} Top {} companies by vacancies", Icons::TROPHY, limit));
    if rows.is_empty() {
        ui::empty("No companies found.");
    } else {
        println!("{}", table::top_companies_table(&rows));
    }
    Ok(())
}

pub fn run_stats(ctx: &Context) -> anyhow::Result<()> {
    let mut store = ctx.open_store()?;
    let stats = QueryEngine::new(&mut store).salary_statistics();

    if !ctx.human() {
        return emit_success(ctx.output_mode, "stats", serde_json::to_value(&stats)?);
    }

    ui::section(&format!("{} Salary statistics", Icons::STATS));
    match stats {
        Some(stats) => {
            println!("{}", table::salary_statistics_table(&stats));
            if stats.avg_salary.is_none() {
                ui::empty("No salary data available.");
            }
        }
        None => ui::error("Could not compute salary statistics"),
    }
    Ok(())
}

pub fn run_reset(ctx: &Context, yes: bool) -> anyhow::Result<()> {
    if !yes {
        anyhow::bail!("reset drops every stored employer and vacancy; pass --yes to confirm");
    }

    let mut store = ctx.open_store()?;
    store.drop_schema()?;

    if ctx.human() {
        println!(
            "{} {}",
            Icons::BROOM,
            format!("Dropped all tables in {}", ctx.database.display()).style(ui::theme().warn)
        );
    } else {
        emit_success(ctx.output_mode, "reset", serde_json::json!({ "database": ctx.database }))?;
    }
    Ok(())
}
