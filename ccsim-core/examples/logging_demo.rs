//! Demonstration of logging capabilities in ccsim-core
//!
//! Runs a short, heavily loaded shift with a single agent and every log
//! level switched on, so each arrival, grant, queueing decision and random
//! draw shows up in the terminal.
//!
//! ```bash
//! cargo run -p ccsim-core --example logging_demo
//! RUST_LOG=ccsim_core::request=debug cargo run -p ccsim-core --example logging_demo
//! ```

use ccsim_core::{
    init_detailed_simulation_logging, run_scenario, RunParameters, Scenario, SimError,
};
use tracing::info;

fn main() -> Result<(), SimError> {
    init_detailed_simulation_logging();

    let scenario = Scenario::new("single agent", 1, 6.0);
    let params = RunParameters::default()
        .with_horizon(30.0)
        .with_inter_arrival_mean(4.0)
        .with_seed(2024);

    let result = run_scenario(&scenario, &params)?;
    info!(
        arrived = result.stats.requests_arrived,
        served = result.stats.requests_served,
        still_in_system = result.stats.requests_in_system,
        average_wait = result.metrics.average_wait,
        "Demo finished"
    );
    Ok(())
}
