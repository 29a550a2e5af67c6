//! Callers and their lifecycle
//!
//! A [`Request`] is one caller. Its lifecycle is
//! `Arrived -> [Queued ->] Granted -> Departed`:
//!
//! - on arrival it asks the agent pool for a unit, queueing if all are busy;
//! - when granted, its wait is recorded and a handling time is sampled;
//! - after holding the agent for exactly that time it departs, releasing the
//!   agent to the next caller in line.
//!
//! The transitions are driven by continuations on the simulation clock; the
//! functions here are those continuations.

use crate::center::CallCenter;
use crate::error::{EventError, SimError};
use crate::pool::Admission;
use crate::scheduler::Scheduler;
use crate::time::SimTime;
use crate::types::RequestId;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

/// Where a request is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestState {
    Arrived,
    Queued,
    Granted,
    Departed,
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestState::Arrived => "arrived",
            RequestState::Queued => "queued",
            RequestState::Granted => "granted",
            RequestState::Departed => "departed",
        };
        f.write_str(name)
    }
}

/// One caller moving through the system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    id: RequestId,
    arrival_time: SimTime,
    state: RequestState,
    granted_at: Option<SimTime>,
    service_time: Option<SimTime>,
}

impl Request {
    /// Create a request that has just arrived
    pub fn new(id: RequestId, arrival_time: SimTime) -> Self {
        Self {
            id,
            arrival_time,
            state: RequestState::Arrived,
            granted_at: None,
            service_time: None,
        }
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn arrival_time(&self) -> SimTime {
        self.arrival_time
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    /// Time spent waiting for an agent, once granted
    pub fn wait_time(&self) -> Option<SimTime> {
        self.granted_at.map(|granted| granted - self.arrival_time)
    }

    /// Sampled handling time, once granted
    pub fn service_time(&self) -> Option<SimTime> {
        self.service_time
    }

    /// Time the agent is (or was) freed, once granted
    pub fn departure_time(&self) -> Option<SimTime> {
        self.granted_at.zip(self.service_time).map(|(g, s)| g + s)
    }

    fn illegal(&self, to: RequestState) -> EventError {
        EventError::IllegalTransition {
            request: self.id,
            from: self.state,
            to,
        }
    }

    /// `Arrived -> Queued`
    pub fn mark_queued(&mut self) -> Result<(), EventError> {
        if self.state != RequestState::Arrived {
            return Err(self.illegal(RequestState::Queued));
        }
        self.state = RequestState::Queued;
        Ok(())
    }

    /// `Arrived | Queued -> Granted`. Returns the wait.
    pub fn grant(&mut self, now: SimTime, service_time: SimTime) -> Result<SimTime, EventError> {
        if !matches!(self.state, RequestState::Arrived | RequestState::Queued) {
            return Err(self.illegal(RequestState::Granted));
        }
        let wait = now.checked_sub(self.arrival_time).ok_or_else(|| {
            EventError::InvalidTime(format!(
                "{} granted at {now} before arriving at {}",
                self.id, self.arrival_time
            ))
        })?;
        self.state = RequestState::Granted;
        self.granted_at = Some(now);
        self.service_time = Some(service_time);
        Ok(wait)
    }

    /// `Granted -> Departed`. Terminal.
    pub fn depart(&mut self, now: SimTime) -> Result<RequestRecord, EventError> {
        let (Some(granted_at), Some(service_time)) = (self.granted_at, self.service_time) else {
            return Err(self.illegal(RequestState::Departed));
        };
        if self.state != RequestState::Granted {
            return Err(self.illegal(RequestState::Departed));
        }
        if granted_at + service_time != now {
            return Err(EventError::InvalidTime(format!(
                "{} departed at {now}, expected {}",
                self.id,
                granted_at + service_time
            )));
        }
        self.state = RequestState::Departed;
        Ok(RequestRecord {
            id: self.id,
            arrival_time: self.arrival_time,
            granted_at,
            service_time,
            departed_at: now,
        })
    }
}

/// Snapshot of a request that has left the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestRecord {
    pub id: RequestId,
    pub arrival_time: SimTime,
    pub granted_at: SimTime,
    pub service_time: SimTime,
    pub departed_at: SimTime,
}

impl RequestRecord {
    pub fn wait_time(&self) -> SimTime {
        self.granted_at - self.arrival_time
    }
}

/// Enter the system: take a free agent or join the line.
///
/// The caller's queue-length sample has already been taken by the arrival
/// source at this point.
pub(crate) fn start(
    mut request: Request,
    scheduler: &mut Scheduler<CallCenter>,
    center: &mut CallCenter,
) -> Result<(), SimError> {
    if !center.pool.has_capacity() {
        request.mark_queued()?;
    }
    match center.pool.acquire(request) {
        Admission::Granted(request) => begin_service(request, scheduler, center),
        Admission::Queued { position } => {
            debug!(time = %scheduler.time(), position, "Caller waiting for an agent");
            Ok(())
        }
    }
}

/// The caller holds an agent from now on.
pub(crate) fn begin_service(
    mut request: Request,
    scheduler: &mut Scheduler<CallCenter>,
    center: &mut CallCenter,
) -> Result<(), SimError> {
    let now = scheduler.time();
    let service_time = center.service.sample(&mut center.rng)?;
    let wait = request.grant(now, service_time)?;
    center.observations.record_wait(wait.as_minutes());
    center.observations.record_service(service_time.as_minutes());
    debug!(
        request = %request.id(),
        time = %now,
        wait = %wait,
        service_time = %service_time,
        "Caller connected to an agent"
    );
    scheduler.schedule_after(service_time, move |scheduler: &mut Scheduler<CallCenter>, center: &mut CallCenter| {
        depart(request, scheduler, center)
    });
    Ok(())
}

/// Service is over: free the agent and wake the next caller in line.
fn depart(
    mut request: Request,
    scheduler: &mut Scheduler<CallCenter>,
    center: &mut CallCenter,
) -> Result<(), SimError> {
    let record = request.depart(scheduler.time())?;
    trace!(request = %record.id, time = %record.departed_at, "Caller departed");
    center.record_departure(record);
    if let Some(next) = center.pool.release()? {
        scheduler.schedule_now(move |scheduler: &mut Scheduler<CallCenter>, center: &mut CallCenter| {
            begin_service(next, scheduler, center)
        });
    }
    Ok(())
}
