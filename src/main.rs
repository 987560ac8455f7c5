use std::path::PathBuf;
use std::sync::Arc;

use chrono::{NaiveTime, Utc};
use clap::Parser;
use factgate::cli::commands::{Cli, Commands};
use factgate::domain::entities::decision::DecisionRecord;
use factgate::domain::values::sentiment::SentimentStage;
use factgate::domain::values::signal::Signal;
use factgate::infrastructure::providers::ReplayProvider;
use factgate::{config_from_env, FactGate};
use tracing::Level;

#[tokio::main]
async fn main() {
    let level = std::env::var("FACTGATE_LOG")
        .ok()
        .and_then(|l| l.parse::<Level>().ok())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run_command(cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn open(replay: Option<PathBuf>) -> Result<FactGate, Box<dyn std::error::Error>> {
    let gate = match replay {
        Some(path) => FactGate::from_replay(&path, config_from_env()?)?,
        None => FactGate::new()?,
    };
    Ok(gate)
}

async fn run_command(cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Evaluate { id, replay } => {
            let gate = open(replay)?;
            let decision = gate.evaluate(&id).await?;
            println!("{}", serde_json::to_string_pretty(&decision)?);
        }
        Commands::Batch {
            replay,
            ids,
            min_score,
            buys_only,
        } => {
            let gate = open(replay)?;
            let mut report = gate.evaluate_batch(ids).await?;
            let keep = |d: &DecisionRecord| {
                min_score.map_or(true, |m| d.score >= m) && (!buys_only || d.signal == Signal::Buy)
            };
            report.retain(keep);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Thresholds {
            float_cap,
            time,
            stage,
            yesterday_amount,
        } => {
            let time = NaiveTime::parse_from_str(&time, "%H:%M")
                .map_err(|e| format!("Invalid --time '{time}', expected HH:MM: {e}"))?;
            let stage: SentimentStage = stage.parse()?;
            let timestamp = Utc::now().date_naive().and_time(time);
            // Thresholds read no market data; an empty provider is enough.
            let empty = Arc::new(ReplayProvider::new("none"));
            let gate = FactGate::with_providers(empty.clone(), empty, config_from_env()?)?;
            let thresholds = gate.thresholds(float_cap, timestamp, stage, yesterday_amount);
            println!("{}", serde_json::to_string_pretty(&thresholds)?);
        }
        Commands::Config => {
            let config = config_from_env()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
