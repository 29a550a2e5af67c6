//! Core discrete event simulation engine for multi-agent call centers.
//!
//! This crate provides the building blocks of a call-center queueing study:
//! virtual time, a continuation scheduler, seedable random processes, a FIFO
//! pool of agents, the caller lifecycle, and a scenario runner that turns a
//! staffing configuration into wait, queue and utilization metrics.
//!
//! # Architecture Overview
//!
//! - [`Simulation`]: owns a [`Scheduler`] and the model state `S`. Use this to
//!   schedule continuations and run them with an [`Executor`].
//!
//! - [`Scheduler`]: the clock and its event queue. Continuations receive
//!   `&mut Scheduler<S>` and `&mut S` when resumed, so model logic schedules
//!   follow-up work without shared ownership or locks.
//!
//! - [`CallCenter`]: the model state of one run (agent pool, observations and
//!   random source), driven by an [`ArrivalSource`].
//!
//! - [`run_scenario`] / [`run_scenarios`]: build a fresh call center per
//!   scenario, run it to the horizon and return a [`ScenarioResult`].
//!
//! # Basic Usage
//!
//! ```rust
//! use ccsim_core::{run_scenario, RunParameters, Scenario};
//!
//! let scenario = Scenario::new("Scenario A", 3, 10.0);
//! let params = RunParameters::default().with_seed(42);
//!
//! let result = run_scenario(&scenario, &params).unwrap();
//! println!("Average Wait Time: {:.2}", result.metrics.average_wait);
//! ```
//!
//! # Scheduling Continuations
//!
//! ```rust
//! use ccsim_core::{Execute, Executor, Scheduler, SimError, SimTime, Simulation};
//!
//! let mut sim = Simulation::new(Vec::new());
//! sim.schedule_after(SimTime::from_whole_minutes(2), |s: &mut Scheduler<Vec<SimTime>>, log: &mut Vec<SimTime>| -> Result<(), SimError> {
//!     log.push(s.time());
//!     Ok(())
//! });
//! sim.execute(Executor::unbound()).unwrap();
//! assert_eq!(sim.state(), &vec![SimTime::from_whole_minutes(2)]);
//! ```
//!
//! # Time Model
//!
//! All timing uses [`SimTime`], which represents simulation time in virtual
//! minutes (not wall-clock time). Runs are deterministic given a seed.

pub mod arrival;
pub mod center;
pub mod config;
pub mod dists;
pub mod error;
pub mod execute;
pub mod logging;
pub mod observation;
pub mod pool;
pub mod randomness;
pub mod replication;
pub mod request;
pub mod scenario;
pub mod scheduler;
pub mod time;
pub mod types;

use tracing::{info, instrument};

pub use arrival::ArrivalSource;
pub use center::{build_simulation, CallCenter};
pub use config::{RunParameters, Scenario, ScenarioConfig, SimulationConfig};
pub use dists::{
    ArrivalPattern, ConstantArrivalPattern, ConstantServiceTime, ExponentialServiceTime,
    PoissonArrivals, ServiceTimeDistribution,
};
pub use error::{EventError, SimError};
pub use execute::{Execute, Executor};
pub use logging::{
    event_span, init_detailed_simulation_logging, init_simulation_logging,
    init_simulation_logging_with_level, scenario_span, simulation_span,
};
pub use observation::ObservationSet;
pub use pool::{Admission, ResourcePool};
pub use randomness::{DrawSite, RandomProvider, RandomSource};
pub use replication::{replicate, MetricSummary, ReplicationSummary};
pub use request::{Request, RequestRecord, RequestState};
pub use scenario::{
    run_scenario, run_scenarios, run_with_source, RunStats, ScenarioMetrics, ScenarioResult,
    ScenarioRunner,
};
pub use scheduler::{Continuation, EventEntry, Scheduler};
pub use time::SimTime;
pub use types::{EventId, RequestId};

/// Simulation struct that puts the scheduler and the model state together.
///
/// See the [crate-level documentation](index.html) for more information.
pub struct Simulation<S> {
    scheduler: Scheduler<S>,
    state: S,
}

impl<S: Default> Default for Simulation<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> Simulation<S> {
    /// Create a simulation at time zero with no pending events
    pub fn new(state: S) -> Self {
        Self {
            scheduler: Scheduler::default(),
            state,
        }
    }

    /// Returns the current simulation time.
    #[must_use]
    pub fn time(&self) -> SimTime {
        self.scheduler.time()
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Borrow the scheduler and the state at the same time, e.g. to start
    /// a process that schedules its first continuation.
    pub fn split_mut(&mut self) -> (&mut Scheduler<S>, &mut S) {
        (&mut self.scheduler, &mut self.state)
    }

    /// Consume the simulation, keeping only the model state
    pub fn into_state(self) -> S {
        self.state
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        self.scheduler.pending() > 0
    }

    /// Returns the time of the next scheduled event, or None if no events are scheduled.
    pub fn peek_next_event_time(&self) -> Option<SimTime> {
        self.scheduler.peek_time()
    }

    /// Whether the next pending event lies at or before `horizon`
    pub fn has_event_due_by(&self, horizon: SimTime) -> bool {
        self.scheduler.has_event_due_by(horizon)
    }

    /// Total number of events dispatched so far
    pub fn events_processed(&self) -> u64 {
        self.scheduler.events_dispatched()
    }
}

impl<S: 'static> Simulation<S> {
    /// Performs one step of the simulation. Returns `true` if there was in fact an event
    /// available to process, and `false` otherwise, which signifies that the simulation
    /// ended.
    ///
    /// # Errors
    ///
    /// Propagates the error of the resumed continuation, or a scheduling
    /// invariant violation.
    pub fn step(&mut self) -> Result<bool, SimError> {
        self.scheduler.step(&mut self.state)
    }

    /// Runs the simulation.
    ///
    /// The stopping condition and other execution details depend on the executor used.
    /// See [`Execute`] and [`Executor`] for more details.
    ///
    /// # Errors
    ///
    /// Stops at the first failing continuation and returns its error.
    #[instrument(skip(self, executor), fields(initial_time = %self.time()))]
    pub fn execute<E: Execute<S>>(&mut self, executor: E) -> Result<(), SimError> {
        info!("Starting simulation execution");
        executor.execute(self)?;
        info!(
            final_time = %self.time(),
            events_processed = self.events_processed(),
            "Simulation execution completed"
        );
        Ok(())
    }

    /// Schedules `continuation` to run `delay` after the current time.
    pub fn schedule_after<C: Continuation<S>>(&mut self, delay: SimTime, continuation: C) -> EventId {
        self.scheduler.schedule_after(delay, continuation)
    }

    /// Schedules `continuation` to run at the current time.
    pub fn schedule_now<C: Continuation<S>>(&mut self, continuation: C) -> EventId {
        self.scheduler.schedule_now(continuation)
    }
}
