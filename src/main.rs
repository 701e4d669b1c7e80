use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

mod aggregate;
mod config;
mod db;
mod error;
mod feedback;
mod models;
mod report;
mod retry;
mod service;
mod store;

use config::{AppConfig, DatabaseConfig, DEFAULT_CONNECT_ATTEMPTS, DEFAULT_MAX_CONNECTIONS};
use db::PgStore;
use error::PersonalizationError;
use service::PersonalizationService;
use store::PersonalizationStore;

#[derive(Parser)]
#[command(name = "classroom-personalization")]
#[command(about = "Class quiz aggregation and lesson plan personalization", long_about = None)]
struct Cli {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    max_connections: u32,

    #[arg(long, env = "DATABASE_CONNECT_ATTEMPTS", default_value_t = DEFAULT_CONNECT_ATTEMPTS)]
    connect_attempts: u32,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load realistic seed data
    Seed,
    /// Register an instructional unit
    CreateUnit {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "medium")]
        difficulty: String,
        #[arg(long, default_value_t = 45)]
        duration_min: i32,
    },
    /// Register a baseline lesson plan for a unit
    CreatePlan {
        #[arg(long)]
        unit: Uuid,
        #[arg(long, default_value = "v1.0")]
        version: String,
    },
    /// List units and their completed attempts
    Units,
    /// Import quiz answers from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Aggregate completed attempts into a new personalization record
    Aggregate {
        #[arg(long)]
        unit: Uuid,
        /// Baseline lesson plan the delta applies to
        #[arg(long)]
        plan: Option<Uuid>,
    },
    /// Publish a reviewed personalization record
    Publish {
        #[arg(long)]
        record: Uuid,
        #[arg(long)]
        reviewer: Option<String>,
    },
    /// List personalization records for a unit
    Records {
        #[arg(long)]
        unit: Uuid,
    },
    /// Per-student feedback for a unit
    Feedback {
        #[arg(long)]
        unit: Uuid,
        /// Student number, e.g. GS-2026-014
        #[arg(long)]
        student: String,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        unit: Uuid,
        /// Defaults to the unit's current record
        #[arg(long)]
        record: Option<Uuid>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

impl Cli {
    fn app_config(&self) -> AppConfig {
        AppConfig {
            database: DatabaseConfig::new(
                self.database_url.clone(),
                self.max_connections,
                self.connect_attempts,
            ),
            verbose: self.verbose,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.app_config();
    init_logging(&config);

    let pool = db::connect(&config.database)
        .await
        .context("failed to connect to Postgres")?;
    let service = PersonalizationService::new(PgStore::new(pool));
    let pool = service.store().pool();

    match cli.command {
        Commands::InitDb => {
            db::init_db(pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(pool).await?;
            println!("Seed data inserted.");
        }
        Commands::CreateUnit {
            title,
            difficulty,
            duration_min,
        } => {
            let unit = db::create_unit(pool, &title, &difficulty, duration_min).await?;
            println!("Unit {} ready: {}", unit.id, unit.title);
        }
        Commands::CreatePlan { unit, version } => {
            if service.store().find_unit(unit).await?.is_none() {
                return Err(PersonalizationError::not_found("unit", unit).into());
            }
            let plan = db::create_plan(pool, unit, &version).await?;
            println!(
                "Lesson plan {} ({}) ready for unit {}, created {}.",
                plan.id,
                plan.version,
                unit,
                plan.created_at.to_rfc3339()
            );
        }
        Commands::Units => {
            let units = db::list_units(pool).await?;
            if units.is_empty() {
                println!("No units registered.");
                return Ok(());
            }

            for overview in units {
                println!("{}", report::unit_line(&overview));
            }
        }
        Commands::Import { csv } => {
            let inserted = db::import_csv(pool, &csv)
                .await
                .with_context(|| format!("failed to import {}", csv.display()))?;
            println!("Inserted {inserted} answers from {}.", csv.display());
        }
        Commands::Aggregate { unit, plan } => {
            let record = service.aggregate(unit, plan).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::Publish { record, reviewer } => {
            let record = service.publish(record, reviewer).await?;
            println!(
                "Record {} published at {}.",
                record.id,
                record
                    .published_at
                    .map(|at| at.to_rfc3339())
                    .unwrap_or_default()
            );
        }
        Commands::Records { unit } => {
            let records = service.list_records(unit).await?;
            if records.is_empty() {
                println!("No personalization records for this unit.");
                return Ok(());
            }

            for record in records {
                println!(
                    "- {} created {} {} students, {} overrides{}",
                    record.id,
                    record.created_at.to_rfc3339(),
                    record.class_summary.total_students,
                    record.plan_delta.group_overrides().len(),
                    if record.is_published { ", published" } else { "" }
                );
            }
        }
        Commands::Feedback { unit, student } => {
            let feedback = service.student_feedback(unit, &student).await?;
            println!("{}", serde_json::to_string_pretty(&feedback)?);
        }
        Commands::Report { unit, record, out } => {
            let unit_row = service
                .store()
                .find_unit(unit)
                .await?
                .ok_or_else(|| PersonalizationError::not_found("unit", unit))?;
            let record = match record {
                Some(id) => service
                    .store()
                    .get_record(id)
                    .await?
                    .filter(|r| r.unit_id == unit)
                    .ok_or_else(|| PersonalizationError::not_found("personalization record", id))?,
                None => service.current_record(unit).await?,
            };
            let report = report::build_report(&unit_row, &record);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
