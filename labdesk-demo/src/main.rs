//! LabDesk acquisition demo
//!
//! Runs one prescription through the acquisition engine against an
//! in-memory medicine catalog and prints the submitted payload as JSON.
//!
//! Usage:
//!   labdesk-demo --query para --set dosage=1-0-1 --set duration="3 days"

use std::{fs, path::PathBuf, time::Duration};
use anyhow::{Context, Result, anyhow};
use clap::Parser;
use labdesk_acquire::AcquireConfig;
use labdesk_demo::{Scenario, run_scenario};
use labdesk_types::SessionContext;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "labdesk-demo")]
#[command(about = "Run a prescription through the LabDesk acquisition engine")]
struct Args {
    /// Search text; the first hit is prescribed
    #[arg(short, long, default_value = "para")]
    query: String,

    /// Overlay field for the prescribed item, as field=value (repeatable)
    #[arg(short, long = "set", value_parser = parse_assignment)]
    set: Vec<(String, String)>,

    /// Create a referrer inline, as "Name Surname:phone"
    #[arg(short, long)]
    referrer: Option<String>,

    /// Diagnosis written on the prescription
    #[arg(long, default_value = "Viral fever")]
    diagnosis: String,

    /// Search debounce in milliseconds (overrides the config file)
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Path to a JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = load_config(args.config.as_ref(), args.debounce_ms)?;
    info!(
        "Debounce {:?}, request timeout {:?}, duplicates {:?}",
        config.debounce, config.request_timeout, config.duplicate_policy
    );

    let scenario = Scenario {
        query: args.query,
        overrides: args.set,
        referrer: args.referrer.as_deref().map(parse_referrer).transpose()?,
        diagnosis: args.diagnosis,
    };
    let ctx = SessionContext::new("demo-org", "demo-user").with_center("main");

    let outcome = run_scenario(&ctx, &config, &scenario)
        .await
        .context("Prescription failed")?;
    info!("Submitted as {}", outcome.artifact);
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn load_config(path: Option<&PathBuf>, debounce_ms: Option<u64>) -> Result<AcquireConfig> {
    let mut config = match path {
        Some(path) => {
            info!("Loading config from {:?}", path);
            let json = fs::read_to_string(path).context("Failed to read config file")?;
            AcquireConfig::from_json(&json).context("Failed to parse config file")?
        }
        None => AcquireConfig::default(),
    };
    if let Some(ms) = debounce_ms {
        config.debounce = Duration::from_millis(ms);
    }
    Ok(config)
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (field, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got {s:?}"))?;
    if field.trim().is_empty() {
        return Err(format!("empty field name in {s:?}"));
    }
    Ok((field.trim().to_string(), value.to_string()))
}

fn parse_referrer(s: &str) -> Result<(String, String)> {
    let (name, phone) = s
        .rsplit_once(':')
        .ok_or_else(|| anyhow!("expected \"Name:phone\", got {s:?}"))?;
    Ok((name.trim().to_string(), phone.trim().to_string()))
}
