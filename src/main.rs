use std::io;
use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{ArgGroup, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use entry_delay_projection::aggregates::CleanedSheet;
use entry_delay_projection::config::Config;
use entry_delay_projection::knowledge::{self, KnowledgeBase};
use entry_delay_projection::models::{AggregateSource, CalendarPolicy, ProjectionInput};
use entry_delay_projection::report::{self, ProjectionReport};
use entry_delay_projection::{calendar, projection};

#[derive(Parser)]
#[command(name = "entry-delay-projection")]
#[command(about = "Projects when your average days to enter time drops below 5", long_about = None)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Knowledge base JSON, overriding the config file
    #[arg(long, global = true)]
    knowledge_base: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the sessions and date needed to get under the threshold
    #[command(group(
        ArgGroup::new("source")
            .args(["csv", "current_average"])
            .required(true)
            .multiple(false)
    ))]
    Project {
        /// Timekeeping spreadsheet export (CSV)
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Use a manual estimate of the current average instead of a spreadsheet
        #[arg(long)]
        current_average: Option<f64>,
        /// Hours entered per session
        #[arg(long)]
        hours: Option<f64>,
        /// Days between working and entering time (0 = same day)
        #[arg(long)]
        entry_delay: Option<f64>,
        #[arg(long)]
        title: Option<String>,
        /// Start date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// all-days or business-days
        #[arg(long)]
        policy: Option<CalendarPolicy>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Clean a spreadsheet export and write it back as CSV
    Clean {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value = "cleaned_data.csv")]
        out: PathBuf,
    },
    /// Ask a question about average days to enter time
    Ask { question: String },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let knowledge_base_path = cli.knowledge_base.or_else(|| config.knowledge_base.clone());

    match cli.command {
        Commands::Project {
            csv,
            current_average,
            hours,
            entry_delay,
            title,
            date,
            policy,
            out,
        } => {
            let source = match (csv, current_average) {
                (Some(path), _) => {
                    let sheet = CleanedSheet::from_path(&path)
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    AggregateSource::FromSpreadsheet(sheet.totals()?)
                }
                (None, Some(current_average)) => AggregateSource::Manual { current_average },
                (None, None) => anyhow::bail!("either --csv or --current-average is required"),
            };
            info!(source = source.describe(), "resolved aggregates");

            let input = ProjectionInput::from_totals(
                source.totals(),
                hours.unwrap_or(config.hours_per_session),
                entry_delay.unwrap_or(config.entry_delay),
            );
            let policy = policy.unwrap_or(config.calendar_policy);
            let start_date = date.unwrap_or_else(|| Local::now().date_naive());
            let title = title.or(config.title).unwrap_or_default();

            let result = projection::compute(&input)?;
            let target_date = calendar::project_date(start_date, result.required_sessions, policy)?;
            let reset_date = calendar::next_reset_date(&title, start_date)?;

            let knowledge_base = match knowledge_base_path {
                Some(path) => KnowledgeBase::load(&path)?,
                None => KnowledgeBase::default(),
            };
            let output = report::build_projection_report(&ProjectionReport {
                disclaimer: knowledge_base.disclaimer(),
                result: &result,
                threshold: input.threshold,
                policy,
                target_date,
                reset_date,
            });

            match out {
                Some(path) => {
                    std::fs::write(&path, output)?;
                    println!("Projection written to {}.", path.display());
                }
                None => print!("{output}"),
            }
        }
        Commands::Clean { csv, out } => {
            let sheet = CleanedSheet::from_path(&csv)
                .with_context(|| format!("failed to read {}", csv.display()))?;
            sheet
                .write_csv(&out)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Wrote {} cleaned rows to {}.", sheet.rows.len(), out.display());

            match sheet.totals() {
                Ok(totals) => println!(
                    "Weighted date diff {:.2} over {:.2} hours (average {:.2} days).",
                    totals.weighted_delay_sum,
                    totals.hours_worked_sum,
                    totals.average()
                ),
                Err(err) => warn!("no aggregates available: {err}"),
            }
        }
        Commands::Ask { question } => {
            if knowledge::is_projection_question(&question) {
                println!(
                    "To calculate your projection, run `entry-delay-projection project --csv <export.csv>` \
                     with your title, hours per session, and entry delay."
                );
                return Ok(());
            }

            let knowledge_base = match knowledge_base_path {
                Some(path) => KnowledgeBase::load(&path)?,
                None => {
                    warn!("no knowledge base configured");
                    KnowledgeBase::default()
                }
            };
            println!("{}", knowledge_base.best_answer(&question));
        }
    }

    Ok(())
}
