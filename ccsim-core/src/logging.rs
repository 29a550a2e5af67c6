//! Structured logging for simulation runs
//!
//! The core logs through `tracing` macros with structured fields:
//!
//! - **TRACE**: every event dispatch and every random draw (very verbose)
//! - **DEBUG**: pool grants, queueing and request lifecycle transitions
//! - **INFO**: run start and completion
//! - **WARN**/**ERROR**: aborted scenarios
//!
//! Nothing is printed unless a subscriber is installed. The helpers below
//! install a `tracing-subscriber` formatter filtered by `RUST_LOG` when it is
//! set:
//!
//! ```bash
//! RUST_LOG=debug ccsim
//! RUST_LOG=ccsim_core::pool=debug,ccsim_core::scheduler=trace ccsim
//! ```
//!
//! ```rust
//! use ccsim_core::logging::init_simulation_logging_with_level;
//! init_simulation_logging_with_level("debug");
//! ```

use crate::{EventId, SimTime};
use tracing::{info, Span};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging at INFO, unless `RUST_LOG` says otherwise
pub fn init_simulation_logging() {
    init_simulation_logging_with_level("info")
}

/// Initialize logging with a specific level
///
/// # Arguments
/// * `level` - Log level: "trace", "debug", "info", "warn", or "error"
///
/// Installing a second subscriber is a no-op, so this is safe to call from
/// several tests.
pub fn init_simulation_logging_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("ccsim={level},ccsim_core={level},ccsim_viz={level}").into()
    });

    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init()
        .is_ok();

    if installed {
        info!("Simulation logging initialized at level: {}", level);
    }
}

/// Initialize logging with everything turned on, pretty-printed
pub fn init_detailed_simulation_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ccsim=trace,ccsim_core=trace,ccsim_viz=debug".into());

    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr)
                .pretty(),
        )
        .with(filter)
        .try_init()
        .is_ok();

    if installed {
        info!("Detailed simulation logging initialized");
    }
}

/// Create a span for tracking a whole batch of scenarios
pub fn simulation_span(name: &str) -> Span {
    tracing::info_span!("simulation", name = name)
}

/// Create a span for tracking one scenario run
pub fn scenario_span(label: &str, server_count: usize, mean_service_time: f64) -> Span {
    tracing::info_span!(
        "scenario",
        label = label,
        server_count = server_count,
        mean_service_time = mean_service_time
    )
}

/// Create a span for tracking event processing
pub fn event_span(event_id: EventId, time: SimTime) -> Span {
    tracing::trace_span!("event", id = %event_id, time = %time)
}

/// Logging utilities for common simulation events
pub mod events {
    use super::*;
    use tracing::warn;

    /// Log scenario start
    pub fn run_started(label: &str, horizon: SimTime, seed: Option<u64>) {
        match seed {
            Some(seed) => info!(scenario = label, horizon = %horizon, seed, "Scenario started"),
            None => info!(scenario = label, horizon = %horizon, "Scenario started (entropy-seeded)"),
        }
    }

    /// Log scenario completion
    pub fn run_completed(label: &str, final_time: SimTime, events_processed: u64, arrived: u64) {
        info!(
            scenario = label,
            final_time = %final_time,
            events_processed,
            arrived,
            "Scenario completed"
        );
    }

    /// Log a scenario that stopped on an error
    pub fn run_aborted(label: &str, error: &dyn std::error::Error) {
        warn!(scenario = label, error = %error, "Scenario aborted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{debug, trace};

    #[test]
    fn test_logging_initialization() {
        init_simulation_logging_with_level("debug");
        // a second call must not panic
        init_simulation_logging();

        info!("Test info message");
        debug!("Test debug message");
        trace!("Test trace message");
    }

    #[test]
    fn test_span_creation() {
        let _sim_span = simulation_span("test_simulation");
        let _scenario_span = scenario_span("Scenario A", 3, 10.0);
        let _event_span = event_span(EventId(1), SimTime::from_whole_minutes(1));
    }

    #[test]
    fn test_event_logging() {
        let horizon = SimTime::from_whole_minutes(480);
        events::run_started("test", horizon, Some(42));
        events::run_started("test", horizon, None);
        events::run_completed("test", horizon, 100, 90);
        let err = crate::SimError::Configuration("boom".to_string());
        events::run_aborted("test", &err);
    }
}
