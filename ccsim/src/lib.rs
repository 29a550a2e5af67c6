//! # ccsim - Call-Center Queueing Simulator
//!
//! ccsim is a deterministic, replayable, discrete-event simulator of a
//! multi-agent call center: callers arrive at random, wait in one FIFO line
//! for the first free agent, and hang up after a random handling time.
//!
//! ## Feature Flags
//!
//! - `default`: Includes `viz`
//! - `viz`: Text reports, JSON export, SVG charts and the `ccsim` binary
//!
//! ## Example
//!
//! ```rust
//! use ccsim::prelude::*;
//!
//! let config = SimulationConfig {
//!     params: RunParameters::default().with_seed(7),
//!     ..SimulationConfig::default()
//! };
//! let results = run_scenarios(&config).unwrap();
//! assert_eq!(results.len(), 3);
//! ```

// Re-export core (always available)
pub use ccsim_core as core;

#[cfg(feature = "viz")]
pub use ccsim_viz as viz;

#[cfg(feature = "viz")]
pub mod cli;

// Convenience re-exports of commonly used items from core
pub mod prelude {
    //! Commonly used types and functions

    pub use ccsim_core::{
        replicate, run_scenario, run_scenarios, Execute, Executor, RandomSource, RunParameters,
        Scenario, ScenarioConfig, ScenarioResult, SimError, SimTime, Simulation, SimulationConfig,
    };

    #[cfg(feature = "viz")]
    pub use ccsim_viz::{charts::generate_all_charts, report::render_summary, VizError};
}
