//! Reporting and visualization for call-center simulation results
//!
//! This crate only consumes finished [`ccsim_core::ScenarioResult`]s; nothing
//! here feeds back into a run.
//!
//! # Features
//!
//! - **Text summary**: the per-scenario metrics block ([`report`])
//! - **JSON export**: results and run parameters on disk ([`export`])
//! - **SVG charts**: average wait and max queue bars, wait-time histogram ([`charts`])
//!
//! # Example
//!
//! ```no_run
//! use ccsim_core::{run_scenarios, SimulationConfig};
//! use ccsim_viz::{charts::generate_all_charts, report::render_summary};
//!
//! let config = SimulationConfig::default();
//! let results = run_scenarios(&config).unwrap();
//!
//! print!("{}", render_summary(&results));
//! generate_all_charts(&results, None, "charts").unwrap();
//! ```

pub mod charts;
pub mod error;
pub mod export;
pub mod report;

pub use error::VizError;
