//! The `ccsim` command line

use ccsim_core::{
    init_simulation_logging_with_level, replicate, run_scenarios, ReplicationSummary, SimError,
    SimulationConfig,
};
use ccsim_viz::{charts, export, report, VizError};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Simulate a multi-agent call center under several staffing scenarios.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "ccsim", version, about, long_about = None)]
pub struct Cli {
    /// Configuration JSON file (run parameters and scenario table).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Simulated shift length in minutes.
    #[arg(long)]
    pub horizon: Option<f64>,

    /// Mean time between callers in minutes.
    #[arg(long)]
    pub inter_arrival_mean: Option<f64>,

    /// Random seed; runs are entropy-seeded when absent.
    #[arg(long, env = "CCSIM_SEED")]
    pub seed: Option<u64>,

    /// Share one random stream across scenarios instead of reseeding each.
    #[arg(long)]
    pub shared_rng: bool,

    /// Run scenarios in parallel (ignored with --shared-rng).
    #[arg(long)]
    pub parallel: bool,

    /// Directory to write SVG charts into.
    #[arg(long)]
    pub charts: Option<PathBuf>,

    /// Scenario whose wait times are shown in the histogram (default: first).
    #[arg(long, requires = "charts")]
    pub histogram_scenario: Option<String>,

    /// Write all results as JSON to this file.
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Also run this many seeded replications of every scenario and print
    /// their spread.
    #[arg(long)]
    pub replications: Option<usize>,

    /// Print arrival and completion counts per scenario.
    #[arg(long)]
    pub stats: bool,

    /// Log level: trace, debug, info, warn or error. RUST_LOG takes precedence.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Anything that makes the command fail
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Simulation(#[from] SimError),

    #[error(transparent)]
    Visualization(#[from] VizError),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl Cli {
    /// Load the configuration file (or the defaults) and apply the flags.
    pub fn resolve_config(&self) -> Result<SimulationConfig, SimError> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::load(path)?,
            None => SimulationConfig::default(),
        };
        let params = &mut config.params;
        if let Some(horizon) = self.horizon {
            params.horizon = horizon;
        }
        if let Some(mean) = self.inter_arrival_mean {
            params.inter_arrival_mean = mean;
        }
        if self.seed.is_some() {
            params.seed = self.seed;
        }
        if self.shared_rng {
            params.reseed_per_scenario = false;
        }
        if self.parallel {
            params.parallel = true;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Run the command, writing the text report to `out`.
pub fn run(cli: &Cli, out: &mut dyn Write) -> Result<(), CliError> {
    let config = cli.resolve_config()?;
    if let Some(label) = &cli.histogram_scenario {
        if config.scenario(label).is_none() {
            return Err(VizError::InvalidData(format!("no scenario labeled '{label}'")).into());
        }
    }

    let results = run_scenarios(&config)?;
    write!(out, "{}", report::render_summary(&results))?;

    if cli.stats {
        writeln!(out)?;
        write!(out, "{}", report::render_run_stats(&results))?;
    }

    if let Some(n) = cli.replications {
        let base_seed = config.params.seed.unwrap_or_default();
        let summaries = config
            .scenarios
            .iter()
            .map(|scenario| replicate(scenario, &config.params, base_seed, n))
            .collect::<Result<Vec<ReplicationSummary>, _>>()?;
        write!(out, "{}", report::render_replications(&summaries))?;
    }

    if let Some(path) = &cli.json {
        export::export_json(&config.params, &results, path)?;
        info!(path = %path.display(), "Results written");
    }

    if let Some(dir) = &cli.charts {
        charts::generate_all_charts(&results, cli.histogram_scenario.as_deref(), dir)?;
    }

    Ok(())
}

/// Entry point of the binary: parse arguments, set up logging and run.
pub fn main_with_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            // prints help/version to stdout, usage errors to stderr
            let _ = err.print();
            return err.exit_code();
        }
    };
    init_simulation_logging_with_level(&cli.log_level);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match run(&cli, &mut out) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {err}");
            1
        }
    }
}
