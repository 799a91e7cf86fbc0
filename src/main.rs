use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use landmass::scenario::ScenarioLoader;

#[derive(Debug, Parser)]
#[command(author, version, about = "Landmass settlement and road generator")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/default.yaml")]
    scenario: PathBuf,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (falls back to the scenario's logging level)
    #[arg(long)]
    log_level: Option<String>,

    /// Print the generation report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| scenario.logging.level.clone());
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let landmass = scenario.run(cli.seed)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&landmass.report)?);
    } else {
        println!("{}", landmass.report.summary_line());
    }
    Ok(())
}
