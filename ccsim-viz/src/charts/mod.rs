//! Chart generation for scenario results
//!
//! All charts are written as SVG with the plotters library.

pub mod bars;
pub mod histogram;
mod util;

use crate::error::VizError;
use ccsim_core::ScenarioResult;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the average wait comparison chart
pub const AVERAGE_WAIT_CHART: &str = "average_wait.svg";
/// File name of the max queue length comparison chart
pub const MAX_QUEUE_CHART: &str = "max_queue_length.svg";
/// File name of the wait-time histogram
pub const WAIT_HISTOGRAM_CHART: &str = "wait_time_histogram.svg";

/// Common chart configuration
#[derive(Debug, Clone)]
pub struct ChartConfig {
    /// Chart width in pixels
    pub width: u32,
    /// Chart height in pixels
    pub height: u32,
    /// Chart title
    pub title: String,
    /// X-axis label
    pub x_label: String,
    /// Y-axis label
    pub y_label: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 640,
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
        }
    }
}

impl ChartConfig {
    /// Create a new chart configuration with title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the chart dimensions
    pub fn dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the x-axis label
    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = label.into();
        self
    }

    /// Set the y-axis label
    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = label.into();
        self
    }

    pub(crate) fn check(&self) -> Result<(), VizError> {
        if self.width < 200 || self.height < 150 {
            return Err(VizError::InvalidConfiguration(format!(
                "chart of {}x{} pixels is too small",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Generate the standard charts for a set of scenario results
///
/// Creates:
/// - average wait per scenario
/// - max queue length per scenario
/// - wait-time histogram of the scenario labeled `histogram_label`, or of the
///   first scenario when `None`
///
/// Returns the paths written.
///
/// # Example
/// ```no_run
/// use ccsim_core::{run_scenarios, SimulationConfig};
/// use ccsim_viz::charts::generate_all_charts;
///
/// let results = run_scenarios(&SimulationConfig::default()).unwrap();
/// generate_all_charts(&results, None, "output/charts").unwrap();
/// ```
pub fn generate_all_charts(
    results: &[ScenarioResult],
    histogram_label: Option<&str>,
    output_dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>, VizError> {
    let output_dir = output_dir.as_ref();
    let histogram_source = match histogram_label {
        Some(label) => results.iter().find(|r| r.label == label).ok_or_else(|| {
            VizError::InvalidData(format!("no scenario labeled '{label}'"))
        })?,
        None => results
            .first()
            .ok_or_else(|| VizError::InvalidData("no scenario results".to_string()))?,
    };

    std::fs::create_dir_all(output_dir)?;

    let average_wait = output_dir.join(AVERAGE_WAIT_CHART);
    bars::create_average_wait_chart(results, &average_wait)?;

    let max_queue = output_dir.join(MAX_QUEUE_CHART);
    bars::create_max_queue_chart(results, &max_queue)?;

    let histogram = output_dir.join(WAIT_HISTOGRAM_CHART);
    histogram::create_wait_histogram(histogram_source, &histogram)?;

    let written = vec![average_wait, max_queue, histogram];
    info!(dir = %output_dir.display(), charts = written.len(), "Charts written");
    Ok(written)
}
