//! vacancydb CLI - load job-board harvests into SQLite and query them

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "vacancydb")]
#[command(version)]
#[command(about = "Job-board vacancy store - load employer/vacancy harvests and analyse salaries")]
#[command(long_about = r#"
vacancydb keeps employers and vacancies harvested from a job-board API in a
SQLite database and answers questions about them:
  • Which companies post the most vacancies
  • Average salary and the vacancies paying above it
  • Keyword search over titles, requirements and responsibilities

Example usage:
  vacancydb init
  vacancydb load --file data/hh_data.json
  vacancydb search python
  vacancydb top --limit 5
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true, env = "VACANCYDB_DATABASE")]
    database: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputMode::Human)]
    format: OutputMode,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file and create the schema
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Load employers and vacancies from a harvest JSON file
    Load {
        /// Harvest file (defaults to the config's data_file)
        #[arg(short = 'i', long)]
        file: Option<PathBuf>,
    },

    /// Companies with their number of vacancies
    Companies,

    /// All vacancies with company, salary and link
    Vacancies,

    /// Average salary over vacancies that disclose one
    AvgSalary,

    /// Vacancies paying above the average salary
    AboveAverage,

    /// Search vacancies by keyword
    Search {
        /// Word to look for in title, requirement and responsibility
        keyword: String,
    },

    /// Vacancies of one employer
    Employer {
        /// External employer id
        id: i64,
    },

    /// Companies with the most vacancies
    Top {
        /// Number of companies to show (defaults to the config's top_limit, then 10)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Salary statistics
    Stats,

    /// Drop both tables and every stored row
    Reset {
        /// Confirm the irreversible drop
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(self) -> bool {
        self == OutputMode::Human
    }
}

/// Print `{"ok": true, "command": ..., "data": ...}` on stdout
pub fn emit_success(
    output_mode: OutputMode,
    command: &str,
    data: serde_json::Value,
) -> anyhow::Result<()> {
    if output_mode == OutputMode::Json {
        let envelope = serde_json::json!({
            "ok": true,
            "command": command,
            "data": data,
        });
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over the -v flag
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let ctx = commands::Context::resolve(cli.config, cli.database, cli.format)?;

    match cli.command {
        Commands::Init { force } => commands::run_init(&ctx, force),
        Commands::Load { file } => commands::run_load(&ctx, file),
        Commands::Companies => commands::run_companies(&ctx),
        Commands::Vacancies => commands::run_vacancies(&ctx),
        Commands::AvgSalary => commands::run_avg_salary(&ctx),
        Commands::AboveAverage => commands::run_above_average(&ctx),
        Commands::Search { keyword } => commands::run_search(&ctx, &keyword),
        Commands::Employer { id } => commands::run_employer(&ctx, id),
        Commands::Top { limit } => commands::run_top(&ctx, limit),
        Commands::Stats => commands::run_stats(&ctx),
        Commands::Reset { yes } => commands::run_reset(&ctx, yes),
    }
}
