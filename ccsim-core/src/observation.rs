//! Per-run observation buffers and the metrics derived from them

use serde::{Deserialize, Serialize};

/// Append-only samples collected by one scenario run.
///
/// All durations are in minutes. The set is owned by the run that filled it
/// and handed out read-only once the run is over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationSet {
    wait_times: Vec<f64>,
    queue_length_samples: Vec<usize>,
    service_times: Vec<f64>,
}

impl ObservationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the time a caller waited before an agent picked up
    pub fn record_wait(&mut self, minutes: f64) {
        self.wait_times.push(minutes);
    }

    /// Record the line length seen by an arriving caller, before joining it
    pub fn record_queue_length(&mut self, depth: usize) {
        self.queue_length_samples.push(depth);
    }

    /// Record the handling time sampled for a caller
    pub fn record_service(&mut self, minutes: f64) {
        self.service_times.push(minutes);
    }

    pub fn wait_times(&self) -> &[f64] {
        &self.wait_times
    }

    pub fn queue_length_samples(&self) -> &[usize] {
        &self.queue_length_samples
    }

    pub fn service_times(&self) -> &[f64] {
        &self.service_times
    }

    /// True when no caller arrived during the run
    pub fn is_empty(&self) -> bool {
        self.wait_times.is_empty()
            && self.queue_length_samples.is_empty()
            && self.service_times.is_empty()
    }

    /// Mean wait, or 0 when nobody was served
    pub fn average_wait(&self) -> f64 {
        if self.wait_times.is_empty() {
            0.0
        } else {
            self.wait_times.iter().sum::<f64>() / self.wait_times.len() as f64
        }
    }

    /// Longest line seen by an arriving caller, or 0 when nobody arrived
    pub fn max_queue_length(&self) -> usize {
        self.queue_length_samples.iter().copied().max().unwrap_or(0)
    }

    /// Sum of all sampled service times
    pub fn total_service_time(&self) -> f64 {
        self.service_times.iter().sum()
    }

    /// Busy agent-minutes over available agent-minutes, as a percentage.
    ///
    /// Service started before the horizon counts in full even when it ends
    /// after it, so the value can exceed 100. Returns 0 when nothing was
    /// served or no capacity was available.
    pub fn utilization_pct(&self, server_count: usize, horizon_minutes: f64) -> f64 {
        let available = server_count as f64 * horizon_minutes;
        if self.service_times.is_empty() || available <= 0.0 {
            0.0
        } else {
            100.0 * self.total_service_time() / available
        }
    }
}
