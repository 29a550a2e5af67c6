//! Wait-time distribution histogram

use crate::charts::util::{axis_max, tick_label};
use crate::charts::ChartConfig;
use crate::error::VizError;
use ccsim_core::ScenarioResult;
use plotters::prelude::*;
use std::path::Path;

/// Number of bins used for wait-time histograms
pub const DEFAULT_BINS: usize = 20;

const LIGHT_GREEN: RGBColor = RGBColor(144, 238, 144);

/// Equal-width bins over the observed range of the values.
///
/// Every bin is half-open except the last, which also holds the maximum.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub start: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins spanning `[min, max]`.
    ///
    /// A constant sample is centered in a unit-wide range; an empty one
    /// spans `[0, 1]` with all counts zero.
    pub fn from_values(values: &[f64], bins: usize) -> Result<Self, VizError> {
        if bins == 0 {
            return Err(VizError::InvalidConfiguration(
                "histogram needs at least one bin".to_string(),
            ));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(VizError::InvalidData(format!("non-finite sample {bad}")));
        }

        let (lo, hi) = match values.iter().copied().fold(None, |acc: Option<(f64, f64)>, v| {
            Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
        }) {
            None => (0.0, 1.0),
            Some((lo, hi)) if lo == hi => (lo - 0.5, hi + 0.5),
            Some(range) => range,
        };

        let bin_width = (hi - lo) / bins as f64;
        let mut counts = vec![0; bins];
        for v in values {
            let idx = (((v - lo) / bin_width) as usize).min(bins - 1);
            counts[idx] += 1;
        }
        Ok(Self {
            start: lo,
            bin_width,
            counts,
        })
    }

    pub fn end(&self) -> f64 {
        self.start + self.bin_width * self.counts.len() as f64
    }

    /// `(lower edge, upper edge, count)` for every bin
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.counts.iter().enumerate().map(|(i, count)| {
            let lower = self.start + self.bin_width * i as f64;
            (lower, lower + self.bin_width, *count)
        })
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Create a 20-bin histogram of one scenario's wait times
pub fn create_wait_histogram(
    result: &ScenarioResult,
    output_path: impl AsRef<Path>,
) -> Result<(), VizError> {
    let config = ChartConfig::new(format!(
        "Distribution of Wait Times - {}",
        tick_label(&result.label, 40)
    ))
    .x_label("Wait Time (minutes)")
    .y_label("Number of Calls");

    create_histogram_chart(result.wait_times(), DEFAULT_BINS, output_path, &config)
}

/// Create a histogram chart of arbitrary samples
pub fn create_histogram_chart(
    values: &[f64],
    bins: usize,
    output_path: impl AsRef<Path>,
    config: &ChartConfig,
) -> Result<(), VizError> {
    config.check()?;
    let histogram = Histogram::from_values(values, bins)?;

    let output_path = output_path.as_ref();
    let root = SVGBackend::new(output_path, (config.width, config.height)).into_drawing_area();

    root.fill(&WHITE)
        .map_err(|e| VizError::RenderingError(format!("Failed to fill background: {e}")))?;

    let max_count = histogram.counts.iter().copied().max().unwrap_or(0);

    let mut chart = ChartBuilder::on(&root)
        .caption(&config.title, ("sans-serif", 32).into_font())
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(histogram.start..histogram.end(), 0.0..axis_max(max_count as f64))
        .map_err(|e| VizError::RenderingError(format!("Failed to build chart: {e}")))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(&config.x_label)
        .y_desc(&config.y_label)
        .x_label_formatter(&|x| format!("{x:.1}"))
        .y_label_formatter(&|y| format!("{y:.0}"))
        .draw()
        .map_err(|e| VizError::RenderingError(format!("Failed to configure mesh: {e}")))?;

    chart
        .draw_series(histogram.bins().map(|(lower, upper, count)| {
            Rectangle::new([(lower, 0.0), (upper, count as f64)], LIGHT_GREEN.filled())
        }))
        .map_err(|e| VizError::RenderingError(format!("Failed to draw bins: {e}")))?;
    chart
        .draw_series(histogram.bins().filter(|(_, _, count)| *count > 0).map(
            |(lower, upper, count)| {
                Rectangle::new([(lower, 0.0), (upper, count as f64)], BLACK.stroke_width(1))
            },
        ))
        .map_err(|e| VizError::RenderingError(format!("Failed to draw bin outlines: {e}")))?;

    root.present()
        .map_err(|e| VizError::ExportFailed(format!("Failed to save chart: {e}")))?;

    Ok(())
}
