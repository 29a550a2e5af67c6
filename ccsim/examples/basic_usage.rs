//! Basic usage example showing how to use the ccsim meta-crate

use ccsim::prelude::*;

fn main() -> Result<(), SimError> {
    // The classic three-scenario study with a fixed seed
    let config = SimulationConfig {
        params: RunParameters::default().with_seed(42),
        ..SimulationConfig::default()
    };

    let results = run_scenarios(&config)?;
    print!("{}", render_summary(&results));

    // How much does the first scenario move from seed to seed?
    let summary = replicate(&config.scenarios[0], &config.params, 1, 20)?;
    println!(
        "\n{}: average wait {:.2} ± {:.2} over {} seeds",
        summary.label, summary.average_wait.mean, summary.average_wait.std_dev, summary.replications
    );
    Ok(())
}
