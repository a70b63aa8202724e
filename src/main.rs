//! HRMS Scoring - CLI entry point

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

use hrms_scoring::api::EngineStatus;
use hrms_scoring::constants::{APP_NAME, APP_VERSION, DEFAULT_GENERATE_COUNT, DEFAULT_SEED};
use hrms_scoring::logic::dataset::{generate, read_records, record_from_value, write_records};
use hrms_scoring::logic::features::LayoutInfo;
use hrms_scoring::logic::model::load_registry;
use hrms_scoring::logic::training::train_and_persist;
use hrms_scoring::{PersonnelRecord, Result, ScoreEngine, ScoringConfig};

#[derive(Parser)]
#[command(name = "hrms-scoring", version, about = "Personnel feature engineering and scoring")]
struct Cli {
    /// JSON config file; defaults + HRMS_* environment otherwise
    #[arg(long, global = true, env = "HRMS_CONFIG")]
    config: Option<PathBuf>,

    /// Artifact directory (overrides config)
    #[arg(long, global = true)]
    artifacts: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a labelled synthetic dataset (.json or .jsonl)
    Generate {
        #[arg(long, default_value_t = DEFAULT_GENERATE_COUNT)]
        count: usize,
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Fit encoders, scaler and models, then persist them
    Train {
        #[arg(long)]
        data: PathBuf,
    },
    /// Score one record (JSON file, or - for stdin)
    Score {
        #[arg(long)]
        record: String,
    },
    /// Print the active feature layout
    Layout,
    /// Print loaded models and layout
    Status,
}

fn load_config(cli: &Cli) -> Result<ScoringConfig> {
    let mut config = match &cli.config {
        Some(path) => ScoringConfig::load(path)?.with_env_overrides(),
        None => ScoringConfig::from_env(),
    };
    if let Some(dir) = &cli.artifacts {
        config.artifact_dir = dir.clone();
    }
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_record(source: &str) -> Result<PersonnelRecord> {
    let text = if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(source)?
    };

    record_from_value(&serde_json::from_str::<Value>(&text)?)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    match cli.command {
        Command::Generate { count, seed, out } => {
            let records = generate(count, seed);
            let written = write_records(&out, &records)?;
            log::info!("Wrote {} records to {}", written, out.display());
        }
        Command::Train { data } => {
            let records = read_records(&data)?;
            let (_, report) = train_and_persist(&records, &config)?;
            log::info!(
                "Run {}: {} artifacts in {}",
                report.run_id,
                report.artifacts.len(),
                config.artifact_dir.display()
            );
            print_json(&report)?;
        }
        Command::Score { record } => {
            let record = read_record(&record)?;
            let registry = Arc::new(load_registry(&config.artifact_dir));
            let engine = ScoreEngine::new(registry, config.fallback.clone());
            print_json(&engine.insights(&record)?)?;
        }
        Command::Layout => {
            let registry = load_registry(&config.artifact_dir);
            let velocity = registry
                .preprocessor()
                .map(|p| p.career_velocity)
                .unwrap_or(config.career_velocity);
            print_json(&LayoutInfo::current(velocity))?;
        }
        Command::Status => {
            let registry = load_registry(&config.artifact_dir);
            print_json(&EngineStatus::collect(&registry, &config))?;
        }
    }

    Ok(())
}

fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}", APP_NAME, APP_VERSION);

    if let Err(e) = run(Cli::parse()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
