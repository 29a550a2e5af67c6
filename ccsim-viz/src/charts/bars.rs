//! Per-scenario comparison bar charts

use crate::charts::util::{axis_max, tick_label};
use crate::charts::ChartConfig;
use crate::error::VizError;
use ccsim_core::ScenarioResult;
use plotters::prelude::*;
use std::path::Path;

const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const SALMON: RGBColor = RGBColor(250, 128, 114);

/// Create a bar chart of the average wait in each scenario
///
/// # Example
/// ```no_run
/// use ccsim_core::{run_scenarios, SimulationConfig};
/// use ccsim_viz::charts::bars::create_average_wait_chart;
///
/// let results = run_scenarios(&SimulationConfig::default()).unwrap();
/// create_average_wait_chart(&results, "average_wait.svg").unwrap();
/// ```
pub fn create_average_wait_chart(
    results: &[ScenarioResult],
    output_path: impl AsRef<Path>,
) -> Result<(), VizError> {
    let config = ChartConfig::new("Average Wait Time Across Scenarios")
        .x_label("Scenario")
        .y_label("Average Wait Time (minutes)");
    let bars = results
        .iter()
        .map(|r| (r.label.clone(), r.metrics.average_wait))
        .collect::<Vec<_>>();
    create_bar_chart(&bars, output_path, &config, SKY_BLUE)
}

/// Create a bar chart of the longest line seen in each scenario
pub fn create_max_queue_chart(
    results: &[ScenarioResult],
    output_path: impl AsRef<Path>,
) -> Result<(), VizError> {
    let config = ChartConfig::new("Maximum Queue Length Across Scenarios")
        .x_label("Scenario")
        .y_label("Max Queue Length");
    let bars = results
        .iter()
        .map(|r| (r.label.clone(), r.metrics.max_queue_length as f64))
        .collect::<Vec<_>>();
    create_bar_chart(&bars, output_path, &config, SALMON)
}

/// Draw one bar per `(label, value)` pair, in the given order
pub fn create_bar_chart(
    bars: &[(String, f64)],
    output_path: impl AsRef<Path>,
    config: &ChartConfig,
    color: RGBColor,
) -> Result<(), VizError> {
    config.check()?;
    if bars.is_empty() {
        return Err(VizError::InvalidData(format!(
            "no scenarios for chart '{}'",
            config.title
        )));
    }
    if let Some((label, value)) = bars.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
        return Err(VizError::InvalidData(format!(
            "bar '{label}' has unplottable value {value}"
        )));
    }

    let output_path = output_path.as_ref();
    let root = SVGBackend::new(output_path, (config.width, config.height)).into_drawing_area();

    root.fill(&WHITE)
        .map_err(|e| VizError::RenderingError(format!("Failed to fill background: {e}")))?;

    let max_value = axis_max(bars.iter().map(|(_, v)| *v).fold(0.0, f64::max));

    let mut chart = ChartBuilder::on(&root)
        .caption(&config.title, ("sans-serif", 32).into_font())
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d((0..bars.len()).into_segmented(), 0.0..max_value)
        .map_err(|e| VizError::RenderingError(format!("Failed to build chart: {e}")))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(&config.x_label)
        .y_desc(&config.y_label)
        .x_labels(bars.len())
        .x_label_formatter(&|x| match x {
            SegmentValue::CenterOf(idx) => bars
                .get(*idx)
                .map(|(label, _)| tick_label(label, 24))
                .unwrap_or_default(),
            _ => String::new(),
        })
        .draw()
        .map_err(|e| VizError::RenderingError(format!("Failed to configure mesh: {e}")))?;

    let rect = |idx: usize, value: f64, style: ShapeStyle| {
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(idx), 0.0), (SegmentValue::Exact(idx + 1), value)],
            style,
        );
        bar.set_margin(0, 0, 25, 25);
        bar
    };

    chart
        .draw_series(bars.iter().enumerate().map(|(idx, (_, value))| rect(idx, *value, color.filled())))
        .map_err(|e| VizError::RenderingError(format!("Failed to draw bars: {e}")))?;
    chart
        .draw_series(
            bars.iter()
                .enumerate()
                .map(|(idx, (_, value))| rect(idx, *value, BLACK.stroke_width(1))),
        )
        .map_err(|e| VizError::RenderingError(format!("Failed to draw bar outlines: {e}")))?;

    root.present()
        .map_err(|e| VizError::ExportFailed(format!("Failed to save chart: {e}")))?;

    Ok(())
}
