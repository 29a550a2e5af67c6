//! Scenario runner
//!
//! Each scenario gets a fresh clock, a fresh agent pool and an empty
//! observation set. Runs share nothing but, optionally, the random source.

use crate::center::{build_simulation, CallCenter};
use crate::config::{RunParameters, Scenario, ScenarioConfig, SimulationConfig};
use crate::dists::{ExponentialServiceTime, PoissonArrivals};
use crate::error::SimError;
use crate::execute::Executor;
use crate::logging::{events, scenario_span, simulation_span};
use crate::observation::ObservationSet;
use crate::randomness::RandomSource;
use crate::time::SimTime;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// The three headline numbers of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioMetrics {
    /// Mean wait of callers that reached an agent, in minutes
    pub average_wait: f64,
    /// Longest line seen by an arriving caller
    pub max_queue_length: usize,
    /// Busy agent-minutes over available agent-minutes, in percent
    pub utilization_pct: f64,
}

impl ScenarioMetrics {
    /// Derive the metrics from a finished run's observations
    pub fn from_observations(observations: &ObservationSet, server_count: usize, horizon: f64) -> Self {
        Self {
            average_wait: observations.average_wait(),
            max_queue_length: observations.max_queue_length(),
            utilization_pct: observations.utilization_pct(server_count, horizon),
        }
    }
}

/// Bookkeeping of a run, mostly useful for checking it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub requests_arrived: u64,
    /// Callers that reached an agent
    pub requests_served: u64,
    /// Callers that finished service before the horizon
    pub requests_completed: u64,
    /// Callers still waiting or talking at the horizon
    pub requests_in_system: u64,
    pub events_processed: u64,
    pub final_time: SimTime,
    /// Seed of the source the run started from, if seeded
    pub seed: Option<u64>,
}

/// Everything a finished scenario hands to reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub label: String,
    pub config: ScenarioConfig,
    pub metrics: ScenarioMetrics,
    pub stats: RunStats,
    pub observations: ObservationSet,
}

impl ScenarioResult {
    /// Individual waits in grant order, in minutes
    pub fn wait_times(&self) -> &[f64] {
        self.observations.wait_times()
    }
}

/// Run one scenario to the horizon with the given random source.
///
/// The source is handed back afterwards so it can be threaded through the
/// next scenario.
///
/// # Errors
///
/// Configuration errors are returned as is; anything that aborts the run is
/// wrapped in [`SimError::Scenario`] naming the scenario.
pub fn run_with_source(
    scenario: &Scenario,
    params: &RunParameters,
    rng: RandomSource,
) -> Result<(ScenarioResult, RandomSource), SimError> {
    let label = scenario.label.as_str();
    let config = scenario.config;
    let _span = scenario_span(label, config.server_count, config.mean_service_time).entered();

    scenario.validate()?;
    params.validate()?;
    let horizon = params.horizon_time()?;
    let seed = rng.seed();

    let arrivals = PoissonArrivals::new(params.inter_arrival_mean)?;
    let service = ExponentialServiceTime::new(config.mean_service_time)
        .map_err(|err| SimError::InvalidScenario {
            scenario: label.to_string(),
            message: err.to_string(),
        })?;
    let center = CallCenter::new(config.server_count, Box::new(arrivals), Box::new(service), rng)
        .map_err(|err| err.in_scenario(label))?;

    events::run_started(label, horizon, seed);
    let run = build_simulation(center).and_then(|mut sim| {
        sim.execute(Executor::timed(horizon))?;
        Ok(sim)
    });
    let sim = match run {
        Ok(sim) => sim,
        Err(err) => {
            events::run_aborted(label, &err);
            return Err(err.in_scenario(label));
        }
    };

    let final_time = sim.time();
    let events_processed = sim.events_processed();
    let center = sim.into_state();
    let stats = RunStats {
        requests_arrived: center.arrived(),
        requests_served: center.served(),
        requests_completed: center.departed(),
        requests_in_system: center.in_system(),
        events_processed,
        final_time,
        seed,
    };
    events::run_completed(label, final_time, events_processed, stats.requests_arrived);

    let (observations, rng) = center.into_parts();
    let metrics = ScenarioMetrics::from_observations(&observations, config.server_count, params.horizon);
    let result = ScenarioResult {
        label: label.to_string(),
        config,
        metrics,
        stats,
        observations,
    };
    Ok((result, rng))
}

/// Run one scenario with a source chosen by `params.seed`.
///
/// # Errors
///
/// See [`run_with_source`].
pub fn run_scenario(scenario: &Scenario, params: &RunParameters) -> Result<ScenarioResult, SimError> {
    let rng = RandomSource::from_optional_seed(params.seed);
    run_with_source(scenario, params, rng).map(|(result, _)| result)
}

/// Runs scenarios under one set of [`RunParameters`], applying the seeding
/// policy.
pub struct ScenarioRunner {
    params: RunParameters,
    shared: Option<RandomSource>,
}

impl ScenarioRunner {
    pub fn new(params: RunParameters) -> Self {
        let shared = (!params.reseed_per_scenario)
            .then(|| RandomSource::from_optional_seed(params.seed));
        Self { params, shared }
    }

    pub fn params(&self) -> &RunParameters {
        &self.params
    }

    fn next_source(&mut self) -> RandomSource {
        match self.shared.take() {
            Some(shared) => shared,
            None => RandomSource::from_optional_seed(self.params.seed),
        }
    }

    /// Run one scenario. With a shared source, the stream continues where the
    /// previous scenario left it.
    ///
    /// # Errors
    ///
    /// See [`run_with_source`].
    pub fn run(&mut self, scenario: &Scenario) -> Result<ScenarioResult, SimError> {
        let rng = self.next_source();
        let (result, rng) = run_with_source(scenario, &self.params, rng)?;
        if !self.params.reseed_per_scenario {
            self.shared = Some(rng);
        }
        Ok(result)
    }

    /// Run scenarios and return their results in table order.
    ///
    /// Scenarios run on the rayon pool when `parallel` is set and every
    /// scenario gets its own source; a shared stream forces table order.
    ///
    /// # Errors
    ///
    /// Returns the first error in table order.
    pub fn run_all(&mut self, scenarios: &[Scenario]) -> Result<Vec<ScenarioResult>, SimError> {
        if self.params.parallel && self.params.reseed_per_scenario {
            let params = &self.params;
            scenarios
                .par_iter()
                .map(|scenario| run_scenario(scenario, params))
                .collect()
        } else {
            scenarios.iter().map(|scenario| self.run(scenario)).collect()
        }
    }
}

/// Validate the whole configuration, then run every scenario.
///
/// # Errors
///
/// Nothing runs if the configuration is invalid. Otherwise the first failing
/// scenario's error is returned, naming it.
#[instrument(skip(config), fields(scenarios = config.scenarios.len()))]
pub fn run_scenarios(config: &SimulationConfig) -> Result<Vec<ScenarioResult>, SimError> {
    config.validate()?;
    let _span = simulation_span("call-center").entered();
    ScenarioRunner::new(config.params.clone()).run_all(&config.scenarios)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_a() -> Scenario {
        Scenario::new("Scenario A", 3, 10.0)
    }

    #[test]
    fn test_run_produces_consistent_stats() {
        let params = RunParameters::default().with_seed(11);
        let result = run_scenario(&scenario_a(), &params).unwrap();

        let stats = result.stats;
        assert!(stats.requests_arrived > 0);
        assert_eq!(stats.requests_served as usize, result.wait_times().len());
        assert_eq!(
            stats.requests_arrived as usize,
            result.observations.queue_length_samples().len()
        );
        assert_eq!(
            stats.requests_in_system,
            stats.requests_arrived - stats.requests_completed
        );
        assert!(stats.requests_completed <= stats.requests_served);
        assert!(stats.final_time <= SimTime::from_whole_minutes(480));
        assert_eq!(stats.seed, Some(11));
        assert!(result.metrics.average_wait >= 0.0);
    }

    #[test]
    fn test_same_seed_same_result() {
        let params = RunParameters::default().with_seed(5);
        let a = run_scenario(&scenario_a(), &params).unwrap();
        let b = run_scenario(&scenario_a(), &params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_scenario_is_not_run() {
        let params = RunParameters::default().with_seed(1);
        let err = run_scenario(&Scenario::new("empty", 0, 10.0), &params).unwrap_err();
        assert!(matches!(err, SimError::InvalidScenario { ref scenario, .. } if scenario == "empty"));
    }

    #[test]
    fn test_reseeding_gives_identical_streams() {
        let params = RunParameters::default().with_seed(3);
        let mut runner = ScenarioRunner::new(params);
        let first = runner.run(&scenario_a()).unwrap();
        let second = runner.run(&scenario_a()).unwrap();
        assert_eq!(first.metrics, second.metrics);
    }

    #[test]
    fn test_shared_stream_continues_across_scenarios() {
        let params = RunParameters::default().with_seed(3).with_shared_rng();
        let mut runner = ScenarioRunner::new(params.clone());
        let first = runner.run(&scenario_a()).unwrap();
        let second = runner.run(&scenario_a()).unwrap();
        assert_eq!(first, run_scenario(&scenario_a(), &params).unwrap());
        assert_ne!(first.wait_times(), second.wait_times());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let config = SimulationConfig::default();
        let sequential = run_scenarios(&SimulationConfig {
            params: config.params.clone().with_seed(9),
            ..config.clone()
        })
        .unwrap();
        let parallel = run_scenarios(&SimulationConfig {
            params: config.params.clone().with_seed(9).with_parallel(true),
            ..config
        })
        .unwrap();
        assert_eq!(sequential, parallel);
        assert_eq!(sequential[0].label, "Scenario A (3 agents, 10 min avg service)");
    }

    #[test]
    fn test_run_scenarios_validates_first() {
        let config = SimulationConfig::new(
            RunParameters::default().with_seed(1),
            vec![scenario_a(), Scenario::new("bad", 2, -1.0)],
        );
        assert!(matches!(
            run_scenarios(&config),
            Err(SimError::InvalidScenario { ref scenario, .. }) if scenario == "bad"
        ));
    }
}
