//! Scenario table and run-wide parameters
//!
//! Configuration is plain data deserialized with `serde`. Defaults reproduce
//! the classic study of one eight-hour shift with a caller every five
//! minutes on average:
//!
//! ```json
//! {
//!   "horizon": 480.0,
//!   "inter_arrival_mean": 5.0,
//!   "seed": 42,
//!   "scenarios": [
//!     { "label": "Scenario A (3 agents, 10 min avg service)", "server_count": 3, "mean_service_time": 10.0 }
//!   ]
//! }
//! ```

use crate::error::SimError;
use crate::time::SimTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Default shift length, in minutes
pub const DEFAULT_HORIZON: f64 = 480.0;
/// Default mean gap between callers, in minutes
pub const DEFAULT_INTER_ARRIVAL_MEAN: f64 = 5.0;

/// Staffing and handling time of one scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Number of agents
    pub server_count: usize,
    /// Mean handling time per caller, in minutes
    pub mean_service_time: f64,
}

impl ScenarioConfig {
    pub fn new(server_count: usize, mean_service_time: f64) -> Self {
        Self {
            server_count,
            mean_service_time,
        }
    }
}

/// A labeled [`ScenarioConfig`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub label: String,
    #[serde(flatten)]
    pub config: ScenarioConfig,
}

impl Scenario {
    pub fn new(label: impl Into<String>, server_count: usize, mean_service_time: f64) -> Self {
        Self {
            label: label.into(),
            config: ScenarioConfig::new(server_count, mean_service_time),
        }
    }

    /// Check the scenario's own parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidScenario`] naming this scenario.
    pub fn validate(&self) -> Result<(), SimError> {
        let invalid = |message: String| SimError::InvalidScenario {
            scenario: self.label.clone(),
            message,
        };
        if self.config.server_count == 0 {
            return Err(invalid("server_count must be positive".to_string()));
        }
        let mean = self.config.mean_service_time;
        if !(mean.is_finite() && mean > 0.0) {
            return Err(invalid(format!(
                "mean_service_time must be a positive finite number, got {mean}"
            )));
        }
        Ok(())
    }
}

/// Process-wide parameters shared by every scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunParameters {
    /// Length of the run, in minutes
    pub horizon: f64,
    /// Mean gap between callers, in minutes
    pub inter_arrival_mean: f64,
    /// Seed for the random source; entropy when absent
    pub seed: Option<u64>,
    /// Give every scenario a fresh source seeded with `seed`. When false, one
    /// source is shared by the scenarios in order.
    pub reseed_per_scenario: bool,
    /// Run scenarios on a thread pool (only with `reseed_per_scenario`)
    pub parallel: bool,
}

impl Default for RunParameters {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            inter_arrival_mean: DEFAULT_INTER_ARRIVAL_MEAN,
            seed: None,
            reseed_per_scenario: true,
            parallel: false,
        }
    }
}

impl RunParameters {
    #[must_use]
    pub fn with_horizon(mut self, horizon: f64) -> Self {
        self.horizon = horizon;
        self
    }

    #[must_use]
    pub fn with_inter_arrival_mean(mut self, mean: f64) -> Self {
        self.inter_arrival_mean = mean;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_shared_rng(mut self) -> Self {
        self.reseed_per_scenario = false;
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The horizon as simulation time.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Configuration`] for a negative or non-finite
    /// horizon.
    pub fn horizon_time(&self) -> Result<SimTime, SimError> {
        SimTime::from_minutes(self.horizon).map_err(|_| {
            SimError::Configuration(format!(
                "horizon must be a non-negative finite number of minutes, got {}",
                self.horizon
            ))
        })
    }

    /// Check the run-wide parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Configuration`] describing the first bad value.
    pub fn validate(&self) -> Result<(), SimError> {
        self.horizon_time()?;
        let mean = self.inter_arrival_mean;
        if !(mean.is_finite() && mean > 0.0) {
            return Err(SimError::Configuration(format!(
                "inter_arrival_mean must be a positive finite number of minutes, got {mean}"
            )));
        }
        Ok(())
    }
}

/// The full input of a study: run parameters plus the scenario table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(flatten)]
    pub params: RunParameters,
    pub scenarios: Vec<Scenario>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            params: RunParameters::default(),
            scenarios: default_scenarios(),
        }
    }
}

/// The three staffing options of the classic study
pub fn default_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new("Scenario A (3 agents, 10 min avg service)", 3, 10.0),
        Scenario::new("Scenario B (5 agents, 10 min avg service)", 5, 10.0),
        Scenario::new("Scenario C (3 agents, 7 min avg service)", 3, 7.0),
    ]
}

impl SimulationConfig {
    pub fn new(params: RunParameters, scenarios: Vec<Scenario>) -> Self {
        Self { params, scenarios }
    }

    /// Parse a configuration from JSON. Missing run parameters take their
    /// defaults; the scenario table is required.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ConfigParse`] for malformed JSON.
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ConfigIo`] if the file cannot be read and
    /// [`SimError::ConfigParse`] if it is not valid configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading configuration");
        let json = std::fs::read_to_string(path).map_err(|source| SimError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Look up a scenario by label
    pub fn scenario(&self, label: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.label == label)
    }

    /// Check everything before any run starts.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error found: bad run parameters, an
    /// empty table, duplicate labels, or a bad scenario.
    pub fn validate(&self) -> Result<(), SimError> {
        self.params.validate()?;
        if self.scenarios.is_empty() {
            return Err(SimError::Configuration(
                "scenario table is empty".to_string(),
            ));
        }
        let mut labels = HashSet::new();
        for scenario in &self.scenarios {
            if !labels.insert(scenario.label.as_str()) {
                return Err(SimError::InvalidScenario {
                    scenario: scenario.label.clone(),
                    message: "duplicate label".to_string(),
                });
            }
            scenario.validate()?;
        }
        Ok(())
    }
}
