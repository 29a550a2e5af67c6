//! JSON export of scenario results

use crate::error::VizError;
use ccsim_core::{RunParameters, ScenarioResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// On-disk layout of an export: the run parameters and every result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsExport {
    pub params: RunParameters,
    pub results: Vec<ScenarioResult>,
}

impl ResultsExport {
    pub fn new(params: &RunParameters, results: &[ScenarioResult]) -> Self {
        Self {
            params: params.clone(),
            results: results.to_vec(),
        }
    }
}

/// Serialize results as pretty-printed JSON
pub fn to_json_string(params: &RunParameters, results: &[ScenarioResult]) -> Result<String, VizError> {
    Ok(serde_json::to_string_pretty(&ResultsExport::new(params, results))?)
}

/// Write results as JSON to `output_path`, creating parent directories
pub fn export_json(
    params: &RunParameters,
    results: &[ScenarioResult],
    output_path: impl AsRef<Path>,
) -> Result<(), VizError> {
    let output_path = output_path.as_ref();
    if let Some(dir) = output_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let json = to_json_string(params, results)?;
    fs::write(output_path, json)?;
    debug!(path = %output_path.display(), scenarios = results.len(), "Results exported");
    Ok(())
}

/// Read an export written by [`export_json`]
pub fn load_json(path: impl AsRef<Path>) -> Result<ResultsExport, VizError> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccsim_core::{run_scenario, Scenario};

    #[test]
    fn test_export_and_reload() {
        let params = RunParameters::default().with_horizon(60.0).with_seed(4);
        let result = run_scenario(&Scenario::new("Scenario A", 3, 10.0), &params).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("results.json");
        export_json(&params, std::slice::from_ref(&result), &path).unwrap();

        let loaded = load_json(&path).unwrap();
        assert_eq!(loaded.params, params);
        assert_eq!(loaded.results.len(), 1);
        assert_eq!(loaded.results[0].label, "Scenario A");
        assert_eq!(loaded.results[0].metrics.max_queue_length, result.metrics.max_queue_length);
        assert_eq!(loaded.results[0].wait_times().len(), result.wait_times().len());
    }

    #[test]
    fn test_json_field_names() {
        let json = to_json_string(&RunParameters::default(), &[]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["params"]["horizon"], 480.0);
        assert!(value["results"].as_array().is_some_and(|r| r.is_empty()));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load_json("/nonexistent/results.json"),
            Err(VizError::IoError(_))
        ));
    }
}
