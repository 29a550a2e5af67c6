//! Plain-text summary report

use crate::error::VizError;
use ccsim_core::{ReplicationSummary, ScenarioResult};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Render the per-scenario summary.
///
/// Each scenario is a blank line, its label, then its three headline
/// metrics with two decimals:
///
/// ```text
///
/// Scenario A (3 agents, 10 min avg service)
/// Average Wait Time: 7.41
/// Max Queue Length: 9.00
/// Agent Utilization (%): 88.72
/// ```
pub fn render_summary(results: &[ScenarioResult]) -> String {
    let mut out = String::new();
    for result in results {
        let metrics = &result.metrics;
        // writing to a String cannot fail
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", result.label);
        let _ = writeln!(out, "Average Wait Time: {:.2}", metrics.average_wait);
        let _ = writeln!(out, "Max Queue Length: {:.2}", metrics.max_queue_length as f64);
        let _ = writeln!(out, "Agent Utilization (%): {:.2}", metrics.utilization_pct);
    }
    out
}

/// Render a fixed-width table with run bookkeeping for each scenario
pub fn render_run_stats(results: &[ScenarioResult]) -> String {
    let width = results
        .iter()
        .map(|r| r.label.len())
        .max()
        .unwrap_or(0)
        .max("Scenario".len());
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<width$}  {:>8}  {:>8}  {:>9}  {:>9}  {:>8}",
        "Scenario", "Arrived", "Served", "Completed", "In system", "Events"
    );
    for r in results {
        let s = &r.stats;
        let _ = writeln!(
            out,
            "{:<width$}  {:>8}  {:>8}  {:>9}  {:>9}  {:>8}",
            r.label,
            s.requests_arrived,
            s.requests_served,
            s.requests_completed,
            s.requests_in_system,
            s.events_processed
        );
    }
    out
}

/// Render replication summaries as `mean ± std [min, max]` per metric
pub fn render_replications(summaries: &[ReplicationSummary]) -> String {
    let mut out = String::new();
    for summary in summaries {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{} ({} replications, seeds {}..{})",
            summary.label,
            summary.replications,
            summary.base_seed,
            summary.base_seed.wrapping_add(summary.replications as u64)
        );
        for (name, m) in [
            ("Average Wait Time", &summary.average_wait),
            ("Max Queue Length", &summary.max_queue_length),
            ("Agent Utilization (%)", &summary.utilization_pct),
        ] {
            let _ = writeln!(
                out,
                "{name}: {:.2} ± {:.2} [{:.2}, {:.2}]",
                m.mean, m.std_dev, m.min, m.max
            );
        }
    }
    out
}

/// Write the summary report to `output_path`, creating parent directories
pub fn write_summary(results: &[ScenarioResult], output_path: impl AsRef<Path>) -> Result<(), VizError> {
    let output_path = output_path.as_ref();
    if let Some(dir) = output_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(output_path, render_summary(results))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccsim_core::{
        ObservationSet, RunStats, ScenarioConfig, ScenarioMetrics, SimTime,
    };

    fn result(label: &str, average_wait: f64, max_queue_length: usize, utilization_pct: f64) -> ScenarioResult {
        ScenarioResult {
            label: label.to_string(),
            config: ScenarioConfig::new(3, 10.0),
            metrics: ScenarioMetrics {
                average_wait,
                max_queue_length,
                utilization_pct,
            },
            stats: RunStats {
                requests_arrived: 96,
                requests_served: 93,
                requests_completed: 90,
                requests_in_system: 6,
                events_processed: 280,
                final_time: SimTime::from_whole_minutes(479),
                seed: Some(42),
            },
            observations: ObservationSet::new(),
        }
    }

    #[test]
    fn test_summary_format() {
        let text = render_summary(&[
            result("Scenario A", 7.4139, 9, 88.7166),
            result("Scenario B", 0.0, 0, 0.0),
        ]);
        assert_eq!(
            text,
            "\nScenario A\n\
             Average Wait Time: 7.41\n\
             Max Queue Length: 9.00\n\
             Agent Utilization (%): 88.72\n\
             \nScenario B\n\
             Average Wait Time: 0.00\n\
             Max Queue Length: 0.00\n\
             Agent Utilization (%): 0.00\n"
        );
    }

    #[test]
    fn test_run_stats_table() {
        let text = render_run_stats(&[result("Scenario A", 1.0, 1, 1.0)]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Scenario"));
        assert!(lines[1].contains("96"));
        assert!(lines[1].ends_with("280"));
    }

    #[test]
    fn test_write_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("summary.txt");
        write_summary(&[result("Scenario A", 1.0, 2, 3.0)], &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("Max Queue Length: 2.00"));
    }
}
