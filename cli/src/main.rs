//! dacctl: replay custodian scenarios against in-memory tables.

mod scenario;

use anyhow::Context;
use clap::Parser;
use dac_types::CustodianConfig;
use dac_utils::LogFormat;
use scenario::Scenario;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dacctl", about = "DAC custodian scenario runner")]
struct Cli {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "DAC_LOG_LEVEL")]
    log_level: String,

    /// Log output format: "human" or "json". Logs go to stderr.
    #[arg(long, default_value = "human", env = "DAC_LOG_FORMAT")]
    log_format: LogFormat,

    /// Path to a TOML custodian configuration. Replaces the scenario's own
    /// `[config]` table when given.
    #[arg(long, env = "DAC_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Replay a scenario file and print the report as JSON.
    Run {
        scenario: PathBuf,

        /// Print single-line JSON.
        #[arg(long)]
        compact: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dac_utils::init_logging(cli.log_format, &cli.log_level);

    let config = match &cli.config {
        Some(path) => {
            let config = CustodianConfig::from_toml_file(path)
                .with_context(|| format!("loading config {}", path.display()))?;
            tracing::info!(path = %path.display(), "loaded config");
            Some(config)
        }
        None => None,
    };

    match cli.command {
        Command::Run { scenario, compact } => {
            let report = Scenario::from_toml_file(&scenario)?.run(config);
            let json = if compact {
                serde_json::to_string(&report)?
            } else {
                serde_json::to_string_pretty(&report)?
            };
            println!("{json}");
            let failed = report.failed_steps();
            if failed > 0 {
                tracing::warn!(failed, "scenario had failed calls");
            }
            if let Some(step) = report.stopped_at {
                anyhow::bail!("scenario stopped at step {step}");
            }
        }
        Command::Config => {
            print!("{}", config.unwrap_or_default().to_toml_string()?);
        }
    }
    Ok(())
}
