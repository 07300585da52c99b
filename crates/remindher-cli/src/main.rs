mod cycle;
mod facilities;

use std::process::ExitCode;
use std::sync::LazyLock;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use regex::Regex;
use remindher_core::Flow;
use tracing_subscriber::EnvFilter;

static PINCODE_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[0-9]{6}$").ok());

#[derive(Debug, Parser)]
#[command(name = "remindher-cli")]
#[command(about = "Find nearby women's-health facilities and check cycle regularity")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search for hospitals and clinics around a pincode
    Facilities {
        /// 6-digit Indian postal code (e.g., 110001)
        #[arg(value_parser = parse_pincode)]
        pincode: String,
    },
    /// Classify cycle irregularity from recent period start dates
    Cycle {
        /// Period start date (YYYY-MM-DD); repeat for up to six dates
        #[arg(long = "date", required = true)]
        dates: Vec<NaiveDate>,
        /// Typical flow: light, medium, or heavy
        #[arg(long, default_value = "medium")]
        flow: Flow,
        /// Symptom experienced (repeatable); see `symptoms`
        #[arg(long = "symptom")]
        symptoms: Vec<String>,
        /// A period was missed in the tracked window
        #[arg(long)]
        missed: bool,
    },
    /// List recognised symptom names
    Symptoms,
}

fn parse_pincode(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if PINCODE_RE.as_ref().is_some_and(|re| re.is_match(trimmed)) {
        Ok(trimmed.to_string())
    } else {
        Err("pincode must be exactly 6 digits".to_string())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = remindher_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Facilities { pincode } => facilities::run_facilities(&config, &pincode).await,
        Commands::Cycle {
            dates,
            flow,
            symptoms,
            missed,
        } => {
            cycle::run_cycle(dates, flow, symptoms, missed)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Symptoms => {
            cycle::run_symptoms();
            Ok(ExitCode::SUCCESS)
        }
    }
}
