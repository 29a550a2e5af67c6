//! Error types for the simulation framework

use crate::request::RequestState;
use crate::time::SimTime;
use crate::types::{EventId, RequestId};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for simulation operations
#[derive(Debug, Error)]
pub enum SimError {
    /// A run-wide parameter is unusable; the run never starts.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A scenario's parameters are unusable; the run never starts.
    #[error("Invalid configuration for scenario '{scenario}': {message}")]
    InvalidScenario { scenario: String, message: String },

    /// A distribution produced a negative or non-finite duration.
    #[error("Distribution '{site}' produced an invalid sample: {value}")]
    InvalidSample { site: &'static str, value: f64 },

    /// The core broke one of its own ordering invariants.
    #[error("Scheduling invariant violated: {0}")]
    Scheduling(#[from] EventError),

    /// A scenario aborted while running.
    #[error("Scenario '{scenario}' aborted: {source}")]
    Scenario {
        scenario: String,
        #[source]
        source: Box<SimError>,
    },

    #[error("Failed to read configuration from {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl SimError {
    /// Attach the scenario label to an error raised while running it.
    ///
    /// Configuration errors already carry their scenario and pass through
    /// unchanged.
    pub fn in_scenario(self, scenario: &str) -> SimError {
        match self {
            err @ (SimError::InvalidScenario { .. } | SimError::Scenario { .. }) => err,
            other => SimError::Scenario {
                scenario: scenario.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// True for errors the user can fix by changing the configuration.
    pub fn is_configuration(&self) -> bool {
        match self {
            SimError::Configuration(_)
            | SimError::InvalidScenario { .. }
            | SimError::InvalidSample { .. }
            | SimError::ConfigIo { .. }
            | SimError::ConfigParse(_) => true,
            SimError::Scheduling(_) => false,
            SimError::Scenario { source, .. } => source.is_configuration(),
        }
    }
}

/// Errors related to event scheduling and handling.
///
/// Every variant indicates a bug in the core rather than bad input.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Invalid event time: {0}")]
    InvalidTime(String),

    #[error("Event {event} dispatched out of order: scheduled at {scheduled} but clock is at {now}")]
    OutOfOrder {
        event: EventId,
        scheduled: SimTime,
        now: SimTime,
    },

    #[error("Resource pool released while no unit was held")]
    ReleaseWithoutHolder,

    #[error("Illegal lifecycle transition for {request}: {from} -> {to}")]
    IllegalTransition {
        request: RequestId,
        from: RequestState,
        to: RequestState,
    },
}
