use anyhow::{bail, Context};
use clap::Parser;
use lorry_routes::{
    sdk::config::RoutingConfig,
    sdk::routing::{load_destinations, BatchOrchestrator},
    sdk::util::log::init_logging,
};
use std::{fs::File, io::Write, num::NonZeroU32, path::PathBuf};
use tokio_util::sync::CancellationToken;

/// Calculates lorry distances from the depot to every row of a route table
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// CSV export of the route table (id,location,latitude,longitude)
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the JSON report
    #[arg(short, long, default_value = "route_results.json")]
    output: PathBuf,

    /// [Optional] Override the provider's requests-per-minute ceiling
    #[arg(long)]
    requests_per_minute: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = RoutingConfig::from_env().context("Invalid routing configuration")?;
    if let Some(rpm) = cli.requests_per_minute {
        match NonZeroU32::new(rpm) {
            Some(rpm) => config.requests_per_minute = rpm,
            None => bail!("--requests-per-minute must be greater than zero"),
        }
    }
    if config.api_key.is_none() {
        log::warn!("ORS_API_KEY is not set; every destination will fall back to zero");
    }

    let destinations = load_destinations(&cli.input)
        .with_context(|| format!("Failed to read destinations from {}", cli.input.display()))?;
    log::info!(
        "Loaded {} destinations from {}; pacing {} ms between calls",
        destinations.len(),
        cli.input.display(),
        config.pacing_delay().as_millis()
    );

    let orchestrator =
        BatchOrchestrator::remote(&config).context("Failed to build the routing client")?;

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted; finishing the current destination");
            on_ctrl_c.cancel();
        }
    });

    let report = orchestrator.run(&destinations, &cancel).await;

    let json_output = serde_json::to_string_pretty(&report)?;
    let mut file = File::create(&cli.output)
        .with_context(|| format!("Failed to create {}", cli.output.display()))?;
    file.write_all(json_output.as_bytes())?;
    log::info!(
        "Route results for {} destinations written to {}",
        report.result.len(),
        cli.output.display()
    );

    Ok(())
}
