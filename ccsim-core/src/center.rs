//! Model state of one call-center run

use crate::arrival::ArrivalSource;
use crate::dists::{ArrivalPattern, ServiceTimeDistribution};
use crate::error::SimError;
use crate::observation::ObservationSet;
use crate::pool::ResourcePool;
use crate::randomness::RandomSource;
use crate::request::{Request, RequestRecord};
use crate::types::RequestId;
use crate::Simulation;

/// Everything a run mutates: agents, observations and the random source.
///
/// Owned by the [`Simulation`] and lent to one continuation at a time.
pub struct CallCenter {
    pub(crate) pool: ResourcePool<Request>,
    pub(crate) observations: ObservationSet,
    pub(crate) rng: RandomSource,
    pub(crate) arrivals: Box<dyn ArrivalPattern>,
    pub(crate) service: Box<dyn ServiceTimeDistribution>,
    next_request_id: u64,
    arrived: u64,
    departed: u64,
    completed: Vec<RequestRecord>,
    keep_records: bool,
}

impl CallCenter {
    /// Create an empty call center with `server_count` idle agents
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Configuration`] if `server_count` is zero.
    pub fn new(
        server_count: usize,
        arrivals: Box<dyn ArrivalPattern>,
        service: Box<dyn ServiceTimeDistribution>,
        rng: RandomSource,
    ) -> Result<Self, SimError> {
        Ok(Self {
            pool: ResourcePool::new(server_count)?,
            observations: ObservationSet::new(),
            rng,
            arrivals,
            service,
            next_request_id: 0,
            arrived: 0,
            departed: 0,
            completed: Vec::new(),
            keep_records: false,
        })
    }

    /// Keep a [`RequestRecord`] for every departed caller
    #[must_use]
    pub fn with_departure_records(mut self) -> Self {
        self.keep_records = true;
        self
    }

    /// Hand out the next request identity and count the arrival
    pub(crate) fn admit(&mut self) -> RequestId {
        self.next_request_id += 1;
        self.arrived += 1;
        RequestId(self.next_request_id)
    }

    pub(crate) fn record_departure(&mut self, record: RequestRecord) {
        self.departed += 1;
        if self.keep_records {
            self.completed.push(record);
        }
    }

    pub fn pool(&self) -> &ResourcePool<Request> {
        &self.pool
    }

    pub fn observations(&self) -> &ObservationSet {
        &self.observations
    }

    pub fn rng(&self) -> &RandomSource {
        &self.rng
    }

    /// Callers that have arrived so far
    pub fn arrived(&self) -> u64 {
        self.arrived
    }

    /// Callers that have finished service
    pub fn departed(&self) -> u64 {
        self.departed
    }

    /// Callers connected to an agent so far, including those still talking
    pub fn served(&self) -> u64 {
        self.observations.wait_times().len() as u64
    }

    /// Callers still waiting or talking
    pub fn in_system(&self) -> u64 {
        self.arrived - self.departed
    }

    /// Departed callers in departure order, when records are kept
    pub fn completed(&self) -> &[RequestRecord] {
        &self.completed
    }

    /// Give back the observations and the random source
    pub fn into_parts(self) -> (ObservationSet, RandomSource) {
        (self.observations, self.rng)
    }
}

/// Wrap `center` in a simulation and schedule its first arrival.
///
/// # Errors
///
/// Fails if the first inter-arrival gap cannot be sampled.
pub fn build_simulation(center: CallCenter) -> Result<Simulation<CallCenter>, SimError> {
    let mut sim = Simulation::new(center);
    let (scheduler, center) = sim.split_mut();
    ArrivalSource::start(scheduler, center)?;
    Ok(sim)
}
