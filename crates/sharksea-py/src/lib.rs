use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use sharksea_core::{SimConfig, World};

fn parse_config(config_json: &str) -> PyResult<SimConfig> {
    let config: SimConfig =
        serde_json::from_str(config_json).map_err(|e| PyValueError::new_err(e.to_string()))?;
    config
        .validate()
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(config)
}

fn build_world(config_json: &str) -> PyResult<World> {
    World::new(parse_config(config_json)?).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Minimal PyO3 module exposing sharksea-core to Python renderers.
#[pyfunction]
fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Shark preset as a JSON document, a starting point for custom configs.
#[pyfunction]
fn default_config_json() -> PyResult<String> {
    serde_json::to_string(&SimConfig::default()).map_err(|e| PyValueError::new_err(e.to_string()))
}

#[pyfunction]
fn run_experiment_json(config_json: &str, steps: usize, sample_every: usize) -> PyResult<String> {
    let mut world = build_world(config_json)?;
    let summary = world
        .try_run_experiment(steps, sample_every)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    serde_json::to_string(&summary).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Snapshots of every `every`-th step (and the last) as a JSON array, for
/// plotting frame by frame.
#[pyfunction]
#[pyo3(signature = (config_json, steps, every = 1))]
fn run_snapshots_json(config_json: &str, steps: usize, every: usize) -> PyResult<String> {
    let mut world = build_world(config_json)?;
    let frames = world
        .try_collect_snapshots(steps, every)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    serde_json::to_string(&frames).map_err(|e| PyValueError::new_err(e.to_string()))
}

#[pyfunction]
fn development_days(temperature: f64) -> PyResult<u32> {
    sharksea_core::development::development_days(temperature)
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(version, m)?)?;
    m.add_function(wrap_pyfunction!(default_config_json, m)?)?;
    m.add_function(wrap_pyfunction!(run_experiment_json, m)?)?;
    m.add_function(wrap_pyfunction!(run_snapshots_json, m)?)?;
    m.add_function(wrap_pyfunction!(development_days, m)?)?;
    Ok(())
}
