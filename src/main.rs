//! LTC Projection CLI
//!
//! Command-line interface for person and household projections

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ltc_projection::export::{write_household_csv_file, write_person_csv_file};
use ltc_projection::household::load_household_json;
use ltc_projection::person::load_person_json;
use ltc_projection::policy::{load_schedule_csv, load_schedule_json, PolicyTerms};
use ltc_projection::summary::ProjectionSummary;
use ltc_projection::{PolicySchedule, PolicyType, ProjectionConfig, ProjectionStrategy, ScenarioRunner};
use std::path::{Path, PathBuf};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliStrategy {
    Tracking,
    Authoritative,
}

impl From<CliStrategy> for ProjectionStrategy {
    fn from(value: CliStrategy) -> Self {
        match value {
            CliStrategy::Tracking => ProjectionStrategy::IllustrationTracking,
            CliStrategy::Authoritative => ProjectionStrategy::IllustrationAuthoritative,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliPolicyType {
    Traditional,
    Hybrid,
}

impl From<CliPolicyType> for PolicyType {
    fn from(value: CliPolicyType) -> Self {
        match value {
            CliPolicyType::Traditional => PolicyType::Traditional,
            CliPolicyType::Hybrid => PolicyType::Hybrid,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "ltc-projection")]
#[command(about = "Household long-term-care insurance projections")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Project one person from a JSON config
    Person {
        /// Person config (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Policy illustration (.json document or .csv table)
        #[arg(short, long)]
        schedule: Option<PathBuf>,

        /// Product type for a CSV illustration
        #[arg(long, value_enum, default_value = "traditional")]
        policy_type: CliPolicyType,

        /// Initial premium for a CSV illustration
        #[arg(long, default_value_t = 0.0)]
        initial_premium: f64,

        /// Face amount at issue for a CSV illustration
        #[arg(long, default_value_t = 0.0)]
        initial_death_benefit: f64,

        #[arg(long, value_enum, default_value = "tracking")]
        strategy: CliStrategy,

        /// Calendar year of the first projected age (default: this year)
        #[arg(long)]
        start_year: Option<i32>,

        /// Yearly output (CSV)
        #[arg(short, long, default_value = "person_projection.csv")]
        output: PathBuf,
    },

    /// Project a one- or two-person household from a JSON config
    Household {
        /// Household config (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Override the strategy in the household config
        #[arg(long, value_enum)]
        strategy: Option<CliStrategy>,

        /// Yearly output (CSV)
        #[arg(short, long, default_value = "household_projection.csv")]
        output: PathBuf,
    },
}

fn load_schedule(path: &Path, terms: PolicyTerms) -> Result<PolicySchedule> {
    let extension = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
    let schedule = match extension.as_deref() {
        Some("json") => load_schedule_json(path),
        Some("csv") => load_schedule_csv(path, terms),
        _ => bail!("Unrecognised schedule format: {}", path.display()),
    };
    schedule.with_context(|| format!("Failed to load policy schedule {}", path.display()))
}

fn print_summary(title: &str, summary: &ProjectionSummary) {
    let age = |a: Option<u32>| a.map_or_else(|| "-".to_string(), |a| a.to_string());

    println!("\n{}", title);
    println!("{}", "-".repeat(title.len()));
    println!("  Years projected:        {}", summary.years);
    println!("  Retirement age:         {}", age(summary.retirement.retirement_age));
    println!("  Assets at retirement:   ${:.2}", summary.retirement.assets_at_retirement);
    println!("  Retirement income:      ${:.2}", summary.retirement.total_retirement_income);
    println!("  Asset depletion age:    {}", age(summary.retirement.depletion_age));
    println!("  LTC event years:        {}", summary.ltc.event_years);
    println!("  Total LTC cost:         ${:.2}", summary.ltc.total_ltc_cost);
    println!("  Total LTC benefits:     ${:.2}", summary.ltc.total_ltc_benefits);
    println!("  LTC out of pocket:      ${:.2}", summary.ltc.out_of_pocket);
    println!("  LTC coverage ratio:     {:.1}%", summary.ltc.coverage_ratio * 100.0);
    println!("  Peak assets:            ${:.2} (age {})", summary.assets.peak_assets, age(summary.assets.peak_assets_age));
    println!("  Final assets:           ${:.2}", summary.assets.final_assets);
    println!("  Final policy value:     ${:.2}", summary.assets.final_policy_value);
    println!("  Final death benefit:    ${:.2}", summary.assets.final_death_benefit);
    println!("  Total premiums:         ${:.2}", summary.assets.total_premiums);
    println!("  Total policy loans:     ${:.2}", summary.assets.total_policy_loans);
    println!("  Insolvency age:         {}", age(summary.assets.insolvency_age));
}

fn main() -> Result<()> {
    env_logger::init();

    match Args::parse().command {
        Command::Person {
            config,
            schedule,
            policy_type,
            initial_premium,
            initial_death_benefit,
            strategy,
            start_year,
            output,
        } => {
            let person = load_person_json(&config)
                .with_context(|| format!("Failed to load person config {}", config.display()))?;
            let terms = PolicyTerms {
                policy_type: policy_type.into(),
                initial_premium,
                initial_death_benefit,
            };
            let schedule = schedule.map(|path| load_schedule(&path, terms)).transpose()?;

            let defaults = ProjectionConfig::default();
            let runner = ScenarioRunner::new(ProjectionConfig {
                strategy: strategy.into(),
                start_year: start_year.unwrap_or(defaults.start_year),
                ..defaults
            });

            let result = runner.run_person(&person, schedule.as_ref()).context("Invalid projection inputs")?;
            write_person_csv_file(&output, &result)
                .with_context(|| format!("Failed to write {}", output.display()))?;

            print_summary(&format!("{} ({})", result.name, result.strategy.as_str()), &result.summary());
            println!("\nFull results written to: {}", output.display());
        }

        Command::Household { config, strategy, output } => {
            let mut household = load_household_json(&config)
                .with_context(|| format!("Failed to load household config {}", config.display()))?;
            if let Some(strategy) = strategy {
                household.projection.strategy = strategy.into();
            }

            let runner = ScenarioRunner::new(household.projection.clone());
            let projection = runner.run_household(&household).context("Invalid projection inputs")?;
            write_household_csv_file(&output, &projection)
                .with_context(|| format!("Failed to write {}", output.display()))?;

            for result in [&projection.person1, &projection.person2].into_iter().flatten() {
                print_summary(&result.name, &result.summary());
            }
            print_summary("Household", &projection.summary());
            if let Some(age) = projection.bankrupt_age() {
                println!("\nHousehold bankrupt from age {}", age);
            }
            println!("\nFull results written to: {}", output.display());
        }
    }

    Ok(())
}
